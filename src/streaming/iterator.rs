//! Pull-based cursor over one streaming call.

use std::fmt;
use std::sync::Arc;

use futures::stream::{self, BoxStream, StreamExt};
use serde_json::json;

use crate::error::{BlockedError, VertexError, VertexResult};
use crate::observability::{Logger, NoopLogger, Span, SpanStatus};
use crate::session::HistorySink;
use crate::types::{FinishReason, GenerateContentResponse};
use super::accumulator::StreamAccumulator;
use super::receiver::{ChunkReceiver, RawChunk};

/// Observable state of a [`ResponseIterator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IteratorState {
    /// More chunks may follow.
    Active,
    /// The stream ended cleanly.
    Done,
    /// The transport or the decoder failed.
    Failed,
    /// A chunk reported a policy block.
    Blocked,
}

enum State {
    Active(Box<dyn ChunkReceiver>),
    Done,
    Failed(VertexError),
    Blocked(VertexError),
}

/// Returns the block carried by a decoded chunk, if any.
///
/// Non-empty prompt feedback takes precedence; otherwise the first candidate,
/// in list order, that stopped for safety is reported.
pub fn check_blocked(response: &GenerateContentResponse) -> Result<(), BlockedError> {
    if let Some(feedback) = &response.prompt_feedback {
        if !feedback.is_empty() {
            return Err(BlockedError::prompt(feedback.clone()));
        }
    }

    match response
        .candidates
        .iter()
        .find(|c| c.finish_reason == FinishReason::Safety)
    {
        Some(candidate) => Err(BlockedError::candidate(candidate.clone())),
        None => Ok(()),
    }
}

/// Iterates over the chunks of one streaming generation call.
///
/// Each successful [`next`](Self::next) returns the chunk as received, while
/// the merged view of all chunks so far is kept inside the iterator and is
/// available through [`merged`](Self::merged). Once the stream ends, fails or
/// is blocked, every later call returns the same outcome without touching the
/// transport again.
///
/// One iterator serves one call; it is not meant to be polled from several
/// tasks at once.
pub struct ResponseIterator {
    state: State,
    accumulator: StreamAccumulator,
    history: Option<Arc<dyn HistorySink>>,
    logger: Arc<dyn Logger>,
    span: Option<Box<dyn Span>>,
    call_id: String,
}

impl ResponseIterator {
    /// Create an iterator reading from `receiver`.
    pub fn new(receiver: Box<dyn ChunkReceiver>) -> Self {
        Self::with_state(State::Active(receiver))
    }

    /// Create an iterator for a call that could not be started.
    ///
    /// Every pull returns `error`.
    pub fn failed(error: VertexError) -> Self {
        Self::with_state(State::Failed(error))
    }

    fn with_state(state: State) -> Self {
        Self {
            state,
            accumulator: StreamAccumulator::new(),
            history: None,
            logger: Arc::new(NoopLogger),
            span: None,
            call_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    /// Hand the merged candidates to `sink` when the stream ends cleanly.
    pub fn with_history(mut self, sink: Arc<dyn HistorySink>) -> Self {
        self.history = Some(sink);
        self
    }

    /// Report progress through `logger`.
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Close `span` when the call reaches its outcome.
    pub fn with_span(mut self, span: Box<dyn Span>) -> Self {
        if matches!(self.state, State::Active(_)) {
            self.span = Some(span);
        } else {
            let mut span = span;
            if let State::Failed(error) = &self.state {
                span.set_status(SpanStatus::Error(error.to_string()));
            }
            span.end();
        }
        self
    }

    /// Identifier used to correlate this call's log events.
    pub fn call_id(&self) -> &str {
        &self.call_id
    }

    /// Current state.
    pub fn state(&self) -> IteratorState {
        match self.state {
            State::Active(_) => IteratorState::Active,
            State::Done => IteratorState::Done,
            State::Failed(_) => IteratorState::Failed,
            State::Blocked(_) => IteratorState::Blocked,
        }
    }

    /// Pull the next chunk.
    ///
    /// Returns `Ok(Some(chunk))` for every chunk, `Ok(None)` once the stream
    /// has ended, or the error that terminated it.
    pub async fn next(&mut self) -> VertexResult<Option<GenerateContentResponse>> {
        let receiver = match &mut self.state {
            State::Active(receiver) => receiver,
            State::Done => return Ok(None),
            State::Failed(error) | State::Blocked(error) => return Err(error.clone()),
        };

        let received = receiver.receive().await;
        match received {
            Ok(Some(raw)) => self.accept(raw),
            Ok(None) => {
                self.finish();
                Ok(None)
            }
            Err(error) => Err(self.fail(error)),
        }
    }

    /// The merged response so far, if any chunk has been accepted.
    pub fn merged(&self) -> Option<&GenerateContentResponse> {
        self.accumulator.merged()
    }

    /// Consume the iterator and return the merged response.
    pub fn into_merged(self) -> Option<GenerateContentResponse> {
        self.accumulator.finalize()
    }

    /// Drive the stream to its end and return only the merged response.
    ///
    /// The first failure or block is returned instead. A stream that ends
    /// without any chunk yields an empty response.
    pub async fn collect_merged(mut self) -> VertexResult<GenerateContentResponse> {
        while self.next().await?.is_some() {}
        Ok(self.into_merged().unwrap_or_default())
    }

    /// Adapt the iterator to a [`Stream`](futures::Stream) of chunks.
    ///
    /// The stream ends after the end signal or after yielding the terminal error.
    pub fn into_stream(self) -> BoxStream<'static, VertexResult<GenerateContentResponse>> {
        stream::unfold(Some(self), |iterator| async move {
            let mut iterator = iterator?;
            match iterator.next().await {
                Ok(Some(chunk)) => Some((Ok(chunk), Some(iterator))),
                Ok(None) => None,
                Err(error) => Some((Err(error), None)),
            }
        })
        .boxed()
    }

    fn accept(&mut self, raw: RawChunk) -> VertexResult<Option<GenerateContentResponse>> {
        let chunk = match raw.decode() {
            Ok(chunk) => chunk,
            Err(error) => return Err(self.fail(error)),
        };

        if let Err(blocked) = check_blocked(&chunk) {
            return Err(self.block(blocked));
        }

        self.accumulator.add_chunk(chunk.clone());
        if let Some(span) = self.span.as_mut() {
            span.add_event("chunk");
        }
        self.logger.debug(
            "Chunk received",
            json!({
                "call_id": self.call_id,
                "chunk": self.accumulator.chunk_count(),
                "candidates": chunk.candidates.len(),
            }),
        );

        Ok(Some(chunk))
    }

    fn finish(&mut self) {
        self.state = State::Done;

        if let Some(sink) = self.history.take() {
            if let Some(merged) = self.accumulator.merged() {
                sink.add_to_history(&merged.candidates);
            }
        }

        self.logger.debug(
            "Stream completed",
            json!({
                "call_id": self.call_id,
                "chunks": self.accumulator.chunk_count(),
            }),
        );
        self.end_span(SpanStatus::Ok);
    }

    fn fail(&mut self, error: VertexError) -> VertexError {
        self.logger.error(
            "Stream failed",
            json!({
                "call_id": self.call_id,
                "chunks": self.accumulator.chunk_count(),
                "error": error.to_string(),
            }),
        );
        self.state = State::Failed(error.clone());
        self.end_span(SpanStatus::Error(error.to_string()));
        error
    }

    fn block(&mut self, blocked: BlockedError) -> VertexError {
        self.logger.warn(
            "Response blocked",
            json!({
                "call_id": self.call_id,
                "chunks": self.accumulator.chunk_count(),
                "reason": blocked.to_string(),
            }),
        );
        let error = VertexError::Blocked(blocked);
        self.state = State::Blocked(error.clone());
        self.end_span(SpanStatus::Error(error.to_string()));
        error
    }

    fn end_span(&mut self, status: SpanStatus) {
        if let Some(mut span) = self.span.take() {
            span.set_status(status);
            span.end();
        }
    }
}

impl fmt::Debug for ResponseIterator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseIterator")
            .field("call_id", &self.call_id)
            .field("state", &self.state())
            .field("chunks", &self.accumulator.chunk_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{NetworkError, ResponseError};
    use crate::mocks::{MockChunkReceiver, RecordingHistorySink};
    use crate::types::{BlockReason, Role};
    use pretty_assertions::assert_eq;

    const SKY: [&str; 3] = [
        r#"{"candidates":[{"index":0,"content":{"role":"model","parts":[{"text":"The sky"}]}}]}"#,
        r#"{"candidates":[{"index":0,"content":{"role":"model","parts":[{"text":" is"}]}}]}"#,
        r#"{"candidates":[{"index":0,"content":{"role":"model","parts":[{"text":" blue."}]},"finishReason":"STOP"}]}"#,
    ];

    #[tokio::test]
    async fn test_streams_chunks_and_merges() {
        let receiver = MockChunkReceiver::from_chunks(SKY);
        let mut iterator = ResponseIterator::new(Box::new(receiver));

        let mut texts = Vec::new();
        while let Some(chunk) = iterator.next().await.unwrap() {
            texts.push(chunk.text().unwrap());
        }

        assert_eq!(texts, vec!["The sky", " is", " blue."]);
        assert_eq!(iterator.state(), IteratorState::Done);
        let merged = iterator.into_merged().unwrap();
        assert_eq!(merged.candidates.len(), 1);
        assert_eq!(
            merged.candidates[0].content.as_ref().unwrap().parts,
            vec![crate::types::Part::text("The sky is blue.")]
        );
    }

    #[tokio::test]
    async fn test_done_is_idempotent() {
        let receiver = MockChunkReceiver::from_chunks([SKY[0]]);
        let calls = receiver.call_counter();
        let mut iterator = ResponseIterator::new(Box::new(receiver));

        assert!(iterator.next().await.unwrap().is_some());
        assert!(iterator.next().await.unwrap().is_none());
        assert!(iterator.next().await.unwrap().is_none());
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_prompt_feedback_blocks() {
        let receiver = MockChunkReceiver::from_chunks([
            r#"{"promptFeedback":{"blockReason":"SAFETY","blockReasonMessage":"no"}}"#,
            SKY[0],
        ]);
        let calls = receiver.call_counter();
        let mut iterator = ResponseIterator::new(Box::new(receiver));

        let err = iterator.next().await.unwrap_err();
        let blocked = err.as_blocked().unwrap();
        assert_eq!(blocked.prompt_feedback.as_ref().unwrap().block_reason, BlockReason::Safety);
        assert!(blocked.candidate.is_none());

        assert!(iterator.next().await.unwrap_err().is_blocked());
        assert_eq!(iterator.state(), IteratorState::Blocked);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 1);
        assert!(iterator.merged().is_none());
    }

    #[tokio::test]
    async fn test_empty_prompt_feedback_does_not_block() {
        let receiver = MockChunkReceiver::from_chunks([
            r#"{"promptFeedback":{},"candidates":[{"index":0,"content":{"parts":[{"text":"ok"}]}}]}"#,
        ]);
        let merged = ResponseIterator::new(Box::new(receiver))
            .collect_merged()
            .await
            .unwrap();
        assert_eq!(merged.text().as_deref(), Some("ok"));
    }

    #[tokio::test]
    async fn test_first_safety_candidate_reported() {
        let receiver = MockChunkReceiver::from_chunks([
            SKY[0],
            r#"{"candidates":[{"index":0,"finishReason":"STOP"},{"index":1,"finishReason":"SAFETY"},{"index":2,"finishReason":"SAFETY"}]}"#,
        ]);
        let mut iterator = ResponseIterator::new(Box::new(receiver));

        assert!(iterator.next().await.unwrap().is_some());
        let err = iterator.next().await.unwrap_err();
        let candidate = err.as_blocked().unwrap().candidate.as_ref().unwrap();
        assert_eq!(candidate.index, 1);
        assert_eq!(candidate.finish_reason, FinishReason::Safety);

        // The blocked chunk is never merged.
        assert_eq!(iterator.merged().unwrap().text().as_deref(), Some("The sky"));
    }

    #[tokio::test]
    async fn test_transport_error_is_memoised() {
        let receiver = MockChunkReceiver::new(vec![
            Ok(RawChunk::new(SKY[0])),
            Err(NetworkError::Cancelled.into()),
        ]);
        let calls = receiver.call_counter();
        let mut iterator = ResponseIterator::new(Box::new(receiver));

        assert!(iterator.next().await.unwrap().is_some());
        for _ in 0..2 {
            assert!(matches!(
                iterator.next().await.unwrap_err(),
                VertexError::Network(NetworkError::Cancelled)
            ));
        }
        assert_eq!(iterator.state(), IteratorState::Failed);
        assert_eq!(calls.load(std::sync::atomic::Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_decode_error_fails() {
        let receiver = MockChunkReceiver::from_chunks(["{oops"]);
        let mut iterator = ResponseIterator::new(Box::new(receiver));

        assert!(matches!(
            iterator.next().await.unwrap_err(),
            VertexError::Response(ResponseError::MalformedChunk { .. })
        ));
        assert_eq!(iterator.state(), IteratorState::Failed);
    }

    #[tokio::test]
    async fn test_failed_iterator() {
        let mut iterator = ResponseIterator::failed(NetworkError::Timeout.into());
        assert_eq!(iterator.state(), IteratorState::Failed);
        assert!(matches!(
            iterator.next().await.unwrap_err(),
            VertexError::Network(NetworkError::Timeout)
        ));
    }

    #[tokio::test]
    async fn test_history_handed_once_on_done() {
        let sink = Arc::new(RecordingHistorySink::new());
        let receiver = MockChunkReceiver::from_chunks(SKY);
        let mut iterator = ResponseIterator::new(Box::new(receiver)).with_history(sink.clone());

        while iterator.next().await.unwrap().is_some() {
            assert!(sink.calls().is_empty());
        }
        assert!(iterator.next().await.unwrap().is_none());

        let calls = sink.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0][0].text(), "The sky is blue.");
        assert_eq!(calls[0][0].content.as_ref().unwrap().role, Some(Role::Model));
    }

    #[tokio::test]
    async fn test_history_not_touched_on_block() {
        let sink = Arc::new(RecordingHistorySink::new());
        let receiver = MockChunkReceiver::from_chunks([
            SKY[0],
            r#"{"candidates":[{"index":0,"finishReason":"SAFETY"}]}"#,
        ]);
        let result = ResponseIterator::new(Box::new(receiver))
            .with_history(sink.clone())
            .collect_merged()
            .await;

        assert!(result.unwrap_err().is_blocked());
        assert!(sink.calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_stream() {
        let sink = Arc::new(RecordingHistorySink::new());
        let receiver = MockChunkReceiver::from_chunks(Vec::<&str>::new());
        let merged = ResponseIterator::new(Box::new(receiver))
            .with_history(sink.clone())
            .collect_merged()
            .await
            .unwrap();

        assert_eq!(merged, GenerateContentResponse::default());
        assert!(sink.calls().is_empty());
    }

    #[tokio::test]
    async fn test_into_stream() {
        let receiver = MockChunkReceiver::from_chunks(SKY);
        let chunks: Vec<_> = ResponseIterator::new(Box::new(receiver))
            .into_stream()
            .collect()
            .await;

        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.is_ok()));
    }

    #[tokio::test]
    async fn test_into_stream_stops_after_error() {
        let receiver = MockChunkReceiver::new(vec![
            Ok(RawChunk::new(SKY[0])),
            Err(NetworkError::Timeout.into()),
            Ok(RawChunk::new(SKY[1])),
        ]);
        let chunks: Vec<_> = ResponseIterator::new(Box::new(receiver))
            .into_stream()
            .collect()
            .await;

        assert_eq!(chunks.len(), 2);
        assert!(chunks[1].is_err());
    }
}
