//! Client interface for Vertex AI generative models.
//!
//! Provides the main `VertexClient` with a builder, a lazily-initialized
//! content service, and `GenerativeModel` handles bound to one model.

mod builder;
mod client;
mod model;

// Re-export public API
pub use builder::VertexClientBuilder;
pub use client::VertexClient;
pub use model::{GenerativeModel, DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_TOP_K};
