//! Running aggregate for a single streaming call.

use crate::types::GenerateContentResponse;
use super::merge::join_responses;

/// Exclusively owned aggregate of every chunk seen so far.
///
/// Each [`add_chunk`](Self::add_chunk) replaces the held value with the
/// result of merging the chunk into it; no reference to the aggregate is
/// handed out while the stream is still being consumed except through
/// [`merged`](Self::merged).
#[derive(Debug, Default)]
pub struct StreamAccumulator {
    merged: Option<GenerateContentResponse>,
    chunks: usize,
}

impl StreamAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one decoded chunk into the aggregate.
    pub fn add_chunk(&mut self, chunk: GenerateContentResponse) {
        self.merged = Some(join_responses(self.merged.take(), chunk));
        self.chunks += 1;
    }

    /// The aggregate so far, if any chunk has been added.
    pub fn merged(&self) -> Option<&GenerateContentResponse> {
        self.merged.as_ref()
    }

    /// Number of chunks folded in.
    pub fn chunk_count(&self) -> usize {
        self.chunks
    }

    /// Consume the accumulator and return the aggregate.
    pub fn finalize(self) -> Option<GenerateContentResponse> {
        self.merged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Candidate, Content, FinishReason, Part};

    fn chunk(text: &str, finish_reason: FinishReason) -> GenerateContentResponse {
        GenerateContentResponse {
            candidates: vec![Candidate {
                index: 0,
                content: Some(Content::model(vec![Part::text(text)])),
                finish_reason,
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_accumulator() {
        let acc = StreamAccumulator::new();
        assert!(acc.merged().is_none());
        assert_eq!(acc.chunk_count(), 0);
        assert!(acc.finalize().is_none());
    }

    #[test]
    fn test_accumulates_chunks() {
        let mut acc = StreamAccumulator::new();
        acc.add_chunk(chunk("Hello", FinishReason::Unspecified));
        acc.add_chunk(chunk(", world", FinishReason::Stop));

        assert_eq!(acc.chunk_count(), 2);
        let merged = acc.finalize().unwrap();
        assert_eq!(merged.text().as_deref(), Some("Hello, world"));
        assert_eq!(merged.candidates[0].finish_reason, FinishReason::Stop);
    }
}
