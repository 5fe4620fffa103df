//! Content generation service for Vertex AI generative models.

mod service;
mod validation;

use async_trait::async_trait;
use crate::error::VertexResult;
use crate::streaming::ResponseIterator;
use crate::types::{
    GenerateContentRequest, GenerateContentResponse,
    CountTokensRequest, CountTokensResponse,
};

pub use service::ContentServiceImpl;
pub use validation::{validate_count_tokens_request, validate_generate_request};

/// Service for content generation with Vertex AI models.
///
/// Every request carries the model's full resource name in its `model` field.
#[async_trait]
pub trait ContentService: Send + Sync {
    /// Generate content and return the merged response of the whole stream.
    async fn generate(
        &self,
        request: GenerateContentRequest,
    ) -> VertexResult<GenerateContentResponse>;

    /// Open a streaming call.
    ///
    /// Failures to start the call are reported by the returned iterator on
    /// its first pull.
    async fn generate_stream(&self, request: GenerateContentRequest) -> ResponseIterator;

    /// Count tokens for content.
    async fn count_tokens(
        &self,
        request: CountTokensRequest,
    ) -> VertexResult<CountTokensResponse>;
}
