//! # Vertex AI Generative Model Client
//!
//! Async Rust client for generative models hosted on Google Cloud Vertex AI.
//!
//! ## Features
//!
//! - Streaming generation with per-chunk delivery and a merged final response
//! - Candidate alignment by index, text-run concatenation and citation accumulation across chunks
//! - Policy blocks (prompt feedback, safety-stopped candidates) reported as typed errors
//! - Multi-turn chat sessions with automatic history
//! - Multi-modal input (text, inline blobs, file references)
//! - Structured logging and per-call spans over `tracing`
//! - Secure credential handling with `SecretString`
//! - Mock transports and services for testing
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use integrations_vertexai::{Part, VertexClient, VertexConfig};
//! use secrecy::SecretString;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = VertexConfig::builder()
//!         .project_id("my-project")
//!         .location("us-central1")
//!         .access_token(SecretString::new("ya29...".into()))
//!         .build()?;
//!
//!     let client = VertexClient::new(config)?;
//!     let model = client.generative_model("gemini-pro");
//!
//!     let mut stream = model.generate_content_stream(vec![Part::text("Why is the sky blue?")]).await;
//!     while let Some(chunk) = stream.next().await? {
//!         print!("{}", chunk.text().unwrap_or_default());
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - `client` - Client, builder and generative model handles
//! - `config` - Configuration types and builder
//! - `auth` - Bearer token attachment
//! - `transport` - HTTP transport layer and endpoints
//! - `streaming` - Chunk framing, merge engine and response iterator
//! - `session` - Chat sessions and history
//! - `error` - Error types and taxonomy
//! - `types` - Request and response types
//! - `services` - Content generation service

#![warn(missing_docs)]
#![warn(clippy::all)]

// Public modules
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod observability;
pub mod services;
pub mod session;
pub mod streaming;
pub mod transport;
pub mod types;

// Development/testing modules - always available for integration tests
pub mod mocks;
pub mod fixtures;

// Re-exports for convenience
pub use auth::{AuthManager, BearerTokenAuthManager};
pub use client::{GenerativeModel, VertexClient, VertexClientBuilder};
pub use config::{
    LogLevel, VertexConfig, VertexConfigBuilder, DEFAULT_API_VERSION,
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS,
};
pub use error::{
    // Main error types
    VertexError,
    VertexResult,
    BlockedError,
    // Error categories
    AuthenticationError,
    ConfigurationError,
    NetworkError,
    RateLimitError,
    RequestError,
    ResourceError,
    ResponseError,
    ServerError,
    ValidationDetail,
    // Error mapping utilities
    map_http_status_with_body,
};
pub use transport::{
    ChunkedStream, HttpMethod, HttpRequest, HttpResponse, HttpTransport, TransportError,
    RequestBuilder, ResponseParser, ReqwestTransport,
};

// Type re-exports
pub use types::{
    // Content types
    Blob, Content, FileData, Part, Role,
    // Safety types
    HarmBlockThreshold, HarmCategory, HarmProbability, SafetyRating, SafetySetting,
    // Generation types
    GenerationConfig, FinishReason, UsageMetadata, BlockReason, PromptFeedback,
    Candidate, CitationMetadata, Citation, Date,
    // Request/Response types
    GenerateContentRequest, GenerateContentResponse,
    CountTokensRequest, CountTokensResponse,
};

// Service re-exports
pub use services::{ContentService, ContentServiceImpl};

// Session re-exports
pub use session::{ChatHistory, ChatSession, HistorySink};

// Streaming re-exports
pub use streaming::{
    check_blocked, ChunkReceiver, ChunkedJsonParser, IteratorState, RawChunk, ResponseIterator,
    StreamAccumulator,
};

// Observability re-exports
pub use observability::{
    // Logging
    Logger, StructuredLogger, NoopLogger,
    // Tracing
    Tracer, Span, SpanStatus, TracingTracer, TracingSpan, DefaultTracer,
    // Factory functions
    create_default_stack, create_noop_stack,
};
