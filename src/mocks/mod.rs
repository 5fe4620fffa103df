//! Mock implementations for testing.
//!
//! This module provides scripted stand-ins for the transport, the chunk
//! receiver, the content service, the history sink and authentication, so
//! the client can be exercised without a network.

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use futures::stream;

use crate::auth::AuthManager;
use crate::error::{VertexError, VertexResult};
use crate::services::ContentService;
use crate::session::HistorySink;
use crate::streaming::{ChunkReceiver, RawChunk, ResponseIterator};
use crate::transport::{HttpTransport, HttpRequest, HttpResponse, HttpMethod, ChunkedStream, TransportError};
use crate::types::{
    Candidate, CountTokensRequest, CountTokensResponse, GenerateContentRequest,
    GenerateContentResponse,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Mock HTTP transport for testing.
///
/// This mock allows tests to enqueue responses and verify requests in a controlled manner.
/// Supports both regular and streaming responses.
///
/// # Example
///
/// ```
/// use integrations_vertexai::mocks::MockHttpTransport;
/// use integrations_vertexai::transport::{HttpTransport, HttpRequest, HttpMethod};
/// use std::collections::HashMap;
///
/// # async fn example() {
/// let transport = MockHttpTransport::new();
/// transport.enqueue_json_response(200, r#"{"totalTokens": 3}"#);
///
/// let request = HttpRequest {
///     method: HttpMethod::Post,
///     url: "https://example.com".to_string(),
///     headers: HashMap::new(),
///     body: None,
/// };
///
/// let response = transport.send(request).await.unwrap();
/// assert_eq!(response.status, 200);
/// transport.verify_request_count(1);
/// # }
/// ```
#[derive(Default)]
pub struct MockHttpTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    streaming_responses: Mutex<VecDeque<Result<Vec<Result<Bytes, TransportError>>, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockHttpTransport {
    /// Create a new mock HTTP transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a response to be returned by the next request.
    pub fn enqueue_response(&self, response: Result<HttpResponse, TransportError>) {
        lock(&self.responses).push_back(response);
    }

    /// Enqueue a JSON response with the given status code and body.
    pub fn enqueue_json_response(&self, status: u16, body: &str) {
        let mut headers = std::collections::HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());

        self.enqueue_response(Ok(HttpResponse {
            status,
            body: Bytes::from(body.to_string()),
            headers,
        }));
    }

    /// Enqueue an error response.
    pub fn enqueue_error(&self, error: TransportError) {
        self.enqueue_response(Err(error));
    }

    /// Enqueue a streaming response with multiple chunks.
    pub fn enqueue_streaming_response(&self, chunks: Vec<Bytes>) {
        lock(&self.streaming_responses).push_back(Ok(chunks.into_iter().map(Ok).collect()));
    }

    /// Enqueue a streaming response whose body fails after some chunks.
    pub fn enqueue_streaming_items(&self, items: Vec<Result<Bytes, TransportError>>) {
        lock(&self.streaming_responses).push_back(Ok(items));
    }

    /// Enqueue a failure to open the stream.
    pub fn enqueue_streaming_error(&self, error: TransportError) {
        lock(&self.streaming_responses).push_back(Err(error));
    }

    /// Get all requests that were made.
    pub fn get_requests(&self) -> Vec<HttpRequest> {
        lock(&self.requests).clone()
    }

    /// Get the last request that was made.
    pub fn last_request(&self) -> Option<HttpRequest> {
        lock(&self.requests).last().cloned()
    }

    /// Verify that exactly `expected` requests were made.
    pub fn verify_request_count(&self, expected: usize) {
        let actual = lock(&self.requests).len();
        assert_eq!(actual, expected, "Expected {} requests, got {}", expected, actual);
    }

    /// Verify that a request was made with the expected method and URL.
    pub fn verify_request(&self, index: usize, method: HttpMethod, url_contains: &str) {
        let requests = lock(&self.requests);
        assert!(index < requests.len(), "No request at index {}", index);

        let request = &requests[index];
        assert_eq!(request.method, method, "Expected method {:?}, got {:?}", method, request.method);
        assert!(
            request.url.contains(url_contains),
            "Expected URL to contain '{}', got '{}'",
            url_contains,
            request.url
        );
    }

    /// Verify that a request contains a specific header.
    pub fn verify_header(&self, index: usize, header_name: &str, header_value: &str) {
        let requests = lock(&self.requests);
        assert!(index < requests.len(), "No request at index {}", index);

        let actual_value = requests[index].headers.get(header_name);
        assert_eq!(
            actual_value,
            Some(&header_value.to_string()),
            "Expected header '{}' to be '{}', got {:?}",
            header_name,
            header_value,
            actual_value
        );
    }

    /// Parse the JSON body of the request at `index`.
    pub fn request_body(&self, index: usize) -> Option<serde_json::Value> {
        let requests = lock(&self.requests);
        let body = requests.get(index)?.body.as_ref()?;
        serde_json::from_slice(body).ok()
    }
}

#[async_trait]
impl HttpTransport for MockHttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        lock(&self.requests).push(request);

        lock(&self.responses).pop_front().unwrap_or_else(|| {
            Err(TransportError::Connection(
                "No response configured in MockHttpTransport".to_string(),
            ))
        })
    }

    async fn send_streaming(&self, request: HttpRequest) -> Result<ChunkedStream, TransportError> {
        lock(&self.requests).push(request);

        let items = lock(&self.streaming_responses).pop_front().unwrap_or_else(|| {
            Err(TransportError::Connection(
                "No streaming response configured in MockHttpTransport".to_string(),
            ))
        })?;

        Ok(Box::pin(stream::iter(items)))
    }
}

/// Chunk receiver that replays a fixed script.
///
/// After the script is exhausted every call reports the end of the stream.
pub struct MockChunkReceiver {
    script: VecDeque<VertexResult<RawChunk>>,
    calls: Arc<AtomicUsize>,
}

impl MockChunkReceiver {
    /// Replay the given outcomes in order.
    pub fn new(script: Vec<VertexResult<RawChunk>>) -> Self {
        Self {
            script: script.into(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Replay the given JSON chunks, then end.
    pub fn from_chunks<I>(chunks: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self::new(chunks.into_iter().map(|c| Ok(RawChunk::new(c))).collect())
    }

    /// Counter of `receive` calls, readable after the receiver is moved.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl ChunkReceiver for MockChunkReceiver {
    async fn receive(&mut self) -> VertexResult<Option<RawChunk>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script.pop_front().transpose()
    }
}

/// History sink that records every hand-off.
#[derive(Default)]
pub struct RecordingHistorySink {
    calls: Mutex<Vec<Vec<Candidate>>>,
}

impl RecordingHistorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Candidate lists received so far, one entry per call.
    pub fn calls(&self) -> Vec<Vec<Candidate>> {
        lock(&self.calls).clone()
    }
}

impl HistorySink for RecordingHistorySink {
    fn add_to_history(&self, candidates: &[Candidate]) {
        lock(&self.calls).push(candidates.to_vec());
    }
}

enum ScriptedCall {
    Chunks(Vec<VertexResult<RawChunk>>),
    OpenError(VertexError),
}

/// Content service that serves scripted streams and records requests.
#[derive(Default)]
pub struct MockContentService {
    streams: Mutex<VecDeque<ScriptedCall>>,
    token_counts: Mutex<VecDeque<VertexResult<CountTokensResponse>>>,
    requests: Mutex<Vec<GenerateContentRequest>>,
    count_requests: Mutex<Vec<CountTokensRequest>>,
}

impl MockContentService {
    /// Create a service with nothing scripted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the next call to stream the given JSON chunks.
    pub fn enqueue_chunks<I>(&self, chunks: I)
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let chunks = chunks.into_iter().map(|c| Ok(RawChunk::new(c))).collect();
        lock(&self.streams).push_back(ScriptedCall::Chunks(chunks));
    }

    /// Script the next call to stream the given outcomes.
    pub fn enqueue_stream(&self, script: Vec<VertexResult<RawChunk>>) {
        lock(&self.streams).push_back(ScriptedCall::Chunks(script));
    }

    /// Script the next call to fail before any chunk.
    pub fn enqueue_open_error(&self, error: VertexError) {
        lock(&self.streams).push_back(ScriptedCall::OpenError(error));
    }

    /// Script the next token count.
    pub fn enqueue_count_tokens(&self, response: VertexResult<CountTokensResponse>) {
        lock(&self.token_counts).push_back(response);
    }

    /// Generation requests received so far.
    pub fn requests(&self) -> Vec<GenerateContentRequest> {
        lock(&self.requests).clone()
    }

    /// The most recent generation request.
    pub fn last_request(&self) -> Option<GenerateContentRequest> {
        lock(&self.requests).last().cloned()
    }

    /// Token count requests received so far.
    pub fn count_requests(&self) -> Vec<CountTokensRequest> {
        lock(&self.count_requests).clone()
    }
}

#[async_trait]
impl ContentService for MockContentService {
    async fn generate(
        &self,
        request: GenerateContentRequest,
    ) -> VertexResult<GenerateContentResponse> {
        self.generate_stream(request).await.collect_merged().await
    }

    async fn generate_stream(&self, request: GenerateContentRequest) -> ResponseIterator {
        lock(&self.requests).push(request);

        match lock(&self.streams).pop_front() {
            Some(ScriptedCall::Chunks(script)) => {
                ResponseIterator::new(Box::new(MockChunkReceiver::new(script)))
            }
            Some(ScriptedCall::OpenError(error)) => ResponseIterator::failed(error),
            None => ResponseIterator::failed(
                TransportError::Connection(
                    "No stream configured in MockContentService".to_string(),
                )
                .into(),
            ),
        }
    }

    async fn count_tokens(
        &self,
        request: CountTokensRequest,
    ) -> VertexResult<CountTokensResponse> {
        lock(&self.count_requests).push(request);
        lock(&self.token_counts).pop_front().unwrap_or_else(|| {
            Err(TransportError::Connection(
                "No token count configured in MockContentService".to_string(),
            )
            .into())
        })
    }
}

/// Mock authentication manager for testing.
///
/// # Example
///
/// ```
/// use integrations_vertexai::mocks::MockAuthManager;
/// use integrations_vertexai::auth::AuthManager;
///
/// let auth = MockAuthManager::new("test-token");
/// let header = auth.get_auth_header();
/// assert_eq!(header, Some(("Authorization".to_string(), "Bearer test-token".to_string())));
/// ```
#[derive(Clone)]
pub struct MockAuthManager {
    token: String,
}

impl MockAuthManager {
    /// Create a new mock auth manager with the given token.
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
        }
    }
}

impl AuthManager for MockAuthManager {
    fn get_auth_header(&self) -> Option<(String, String)> {
        Some(("Authorization".to_string(), format!("Bearer {}", self.token)))
    }
}
