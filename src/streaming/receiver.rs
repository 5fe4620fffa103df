//! Boundary between the transport and the response iterator.

use async_trait::async_trait;
use futures::{Stream, StreamExt};
use serde_json::Value;

use crate::error::{map_http_status_with_body, ResponseError, VertexResult};
use crate::types::GenerateContentResponse;

/// One undecoded message from the streaming RPC.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawChunk {
    data: String,
}

impl RawChunk {
    /// Wrap one JSON-encoded response message.
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }

    /// The encoded message.
    pub fn as_str(&self) -> &str {
        &self.data
    }

    /// Decode the message into a response.
    ///
    /// A message of the form `{"error": {...}}` is an error the service
    /// reported after the stream was opened and is mapped like an HTTP
    /// error body with the embedded status code.
    pub fn decode(&self) -> VertexResult<GenerateContentResponse> {
        let value: Value = serde_json::from_str(&self.data).map_err(|e| {
            ResponseError::MalformedChunk {
                message: e.to_string(),
            }
        })?;

        if let Some(error) = value.get("error") {
            let status = error
                .get("code")
                .and_then(Value::as_u64)
                .and_then(|code| u16::try_from(code).ok())
                .unwrap_or(500);
            return Err(map_http_status_with_body(status, self.data.as_bytes()));
        }

        serde_json::from_value(value).map_err(|e| {
            ResponseError::DeserializationError {
                message: format!("Failed to decode chunk: {}", e),
            }
            .into()
        })
    }
}

/// Source of raw chunks for one streaming call.
///
/// `Ok(None)` is a clean end of stream. Cancellation is the transport's
/// concern and is reported as an ordinary error.
#[async_trait]
pub trait ChunkReceiver: Send {
    /// Wait for the next chunk, the end of the stream, or a failure.
    async fn receive(&mut self) -> VertexResult<Option<RawChunk>>;
}

/// Adapts any stream of raw chunks to [`ChunkReceiver`].
pub struct StreamChunkReceiver<S> {
    inner: S,
}

impl<S> StreamChunkReceiver<S>
where
    S: Stream<Item = VertexResult<RawChunk>> + Send + Unpin,
{
    /// Wrap `inner`; its end is the end of the call.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S> ChunkReceiver for StreamChunkReceiver<S>
where
    S: Stream<Item = VertexResult<RawChunk>> + Send + Unpin,
{
    async fn receive(&mut self) -> VertexResult<Option<RawChunk>> {
        self.inner.next().await.transpose()
    }
}
