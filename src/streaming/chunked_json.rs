//! Framing of the REST streaming response.
//!
//! `streamGenerateContent` answers with a single JSON array whose elements
//! arrive incrementally:
//! ```json
//! [{"candidates":[...]}
//! ,{"candidates":[...],"usageMetadata":{...}}
//! ]
//! ```
//! The parser splits the byte stream into one [`RawChunk`] per element.
//! Network reads may end anywhere, including inside a multi-byte UTF-8
//! sequence, so the buffer is kept as bytes and only complete elements are
//! converted to text.

use async_trait::async_trait;
use futures::StreamExt;

use crate::error::{ResponseError, VertexError, VertexResult};
use crate::transport::ChunkedStream;
use super::receiver::{ChunkReceiver, RawChunk};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    /// Nothing consumed yet.
    ExpectingStart,
    /// Between array elements.
    InArray,
    /// Closing bracket seen.
    Completed,
}

/// Splits a streamed JSON array into raw chunks.
pub struct ChunkedJsonParser {
    inner: Option<ChunkedStream>,
    buffer: Vec<u8>,
    state: ParserState,
}

impl ChunkedJsonParser {
    /// Create a parser reading from a transport byte stream.
    pub fn new(inner: ChunkedStream) -> Self {
        Self {
            inner: Some(inner),
            buffer: Vec::new(),
            state: ParserState::ExpectingStart,
        }
    }

    /// Create a parser with no upstream; input is supplied through [`feed`](Self::feed).
    pub fn detached() -> Self {
        Self {
            inner: None,
            buffer: Vec::new(),
            state: ParserState::ExpectingStart,
        }
    }

    /// Append bytes to the internal buffer.
    pub fn feed(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Extract the next complete element from the buffer, if there is one.
    pub fn next_buffered(&mut self) -> VertexResult<Option<RawChunk>> {
        loop {
            self.skip_separators();
            let Some(&first) = self.buffer.first() else {
                return Ok(None);
            };

            match (self.state, first) {
                (ParserState::ExpectingStart, b'[') => {
                    self.buffer.drain(..1);
                    self.state = ParserState::InArray;
                }
                (ParserState::ExpectingStart | ParserState::InArray, b'{') => {
                    self.state = ParserState::InArray;
                    let Some(end) = find_object_end(&self.buffer) else {
                        return Ok(None);
                    };
                    let object: Vec<u8> = self.buffer.drain(..end).collect();
                    let text = String::from_utf8(object).map_err(|_| malformed("invalid UTF-8 in chunk"))?;
                    return Ok(Some(RawChunk::new(text)));
                }
                (ParserState::InArray, b']') => {
                    self.buffer.drain(..1);
                    self.state = ParserState::Completed;
                }
                (_, other) => {
                    return Err(malformed(&format!(
                        "unexpected byte {:?} in stream",
                        char::from(other)
                    )));
                }
            }
        }
    }

    /// Signal that no more input will arrive.
    ///
    /// Leftover bytes mean the stream was cut inside an element; an array
    /// that was opened but never closed was cut between elements.
    pub fn finish(&mut self) -> VertexResult<Option<RawChunk>> {
        if let Some(chunk) = self.next_buffered()? {
            return Ok(Some(chunk));
        }
        if !self.buffer.is_empty() {
            return Err(malformed("stream ended inside a chunk"));
        }
        match self.state {
            ParserState::InArray => Err(malformed("stream ended before the closing bracket")),
            ParserState::ExpectingStart | ParserState::Completed => Ok(None),
        }
    }

    fn skip_separators(&mut self) {
        let skip = self
            .buffer
            .iter()
            .take_while(|b| b.is_ascii_whitespace() || (**b == b',' && self.state == ParserState::InArray))
            .count();
        self.buffer.drain(..skip);
    }
}

#[async_trait]
impl ChunkReceiver for ChunkedJsonParser {
    async fn receive(&mut self) -> VertexResult<Option<RawChunk>> {
        loop {
            if let Some(chunk) = self.next_buffered()? {
                return Ok(Some(chunk));
            }

            let Some(inner) = self.inner.as_mut() else {
                return self.finish();
            };

            match inner.next().await {
                Some(Ok(bytes)) => self.feed(&bytes),
                Some(Err(e)) => {
                    self.inner = None;
                    return Err(e.into());
                }
                None => self.inner = None,
            }
        }
    }
}

fn malformed(message: &str) -> VertexError {
    ResponseError::MalformedChunk {
        message: message.to_string(),
    }
    .into()
}

/// Returns the length of the JSON object at the start of `input`, or `None`
/// if it is not yet complete.
///
/// Structural bytes are all ASCII, so scanning bytes is safe even when the
/// input ends inside a multi-byte character.
fn find_object_end(input: &[u8]) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, &byte) in input.iter().enumerate() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match byte {
            b'\\' if in_string => escape_next = true,
            b'"' => in_string = !in_string,
            b'{' | b'[' if !in_string => depth += 1,
            b'}' | b']' if !in_string => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }

    None
}
