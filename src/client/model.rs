//! Handle bound to one generative model.

use std::fmt;
use std::sync::Arc;

use crate::error::VertexResult;
use crate::observability::Logger;
use crate::services::ContentService;
use crate::session::ChatSession;
use crate::streaming::ResponseIterator;
use crate::types::{
    Content, CountTokensRequest, CountTokensResponse, GenerateContentRequest,
    GenerateContentResponse, GenerationConfig, Part, SafetySetting,
};

/// Default `max_output_tokens` of a new [`GenerativeModel`].
pub const DEFAULT_MAX_OUTPUT_TOKENS: i32 = 2048;

/// Default `top_k` of a new [`GenerativeModel`].
pub const DEFAULT_TOP_K: i32 = 3;

/// A generative model, e.g. `gemini-pro`.
///
/// The generation config and safety settings are sent with every request
/// made through this handle; adjust them before calling. Cloning is cheap and
/// clones share the underlying service.
#[derive(Clone)]
pub struct GenerativeModel {
    service: Arc<dyn ContentService>,
    logger: Arc<dyn Logger>,
    name: String,
    full_name: String,
    /// Sampling and length settings.
    pub generation_config: GenerationConfig,
    /// Safety overrides.
    pub safety_settings: Vec<SafetySetting>,
}

impl GenerativeModel {
    pub(crate) fn new(
        service: Arc<dyn ContentService>,
        logger: Arc<dyn Logger>,
        name: &str,
        full_name: String,
    ) -> Self {
        Self {
            service,
            logger,
            name: name.to_string(),
            full_name,
            generation_config: GenerationConfig {
                max_output_tokens: Some(DEFAULT_MAX_OUTPUT_TOKENS),
                top_k: Some(DEFAULT_TOP_K),
                ..Default::default()
            },
            safety_settings: Vec::new(),
        }
    }

    /// Short model name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full resource name, `projects/{p}/locations/{l}/publishers/google/models/{name}`.
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Generate a response to `parts` and return it merged.
    pub async fn generate_content(&self, parts: Vec<Part>) -> VertexResult<GenerateContentResponse> {
        let request = self.new_request(vec![Content::user(parts)], self.generation_config.clone());
        self.service.generate(request).await
    }

    /// Generate a response to `parts` chunk by chunk.
    pub async fn generate_content_stream(&self, parts: Vec<Part>) -> ResponseIterator {
        self.stream_contents(vec![Content::user(parts)], self.generation_config.clone())
            .await
    }

    /// Count the tokens `parts` would use as a prompt.
    pub async fn count_tokens(&self, parts: Vec<Part>) -> VertexResult<CountTokensResponse> {
        self.service
            .count_tokens(CountTokensRequest {
                model: self.full_name.clone(),
                contents: vec![Content::user(parts)],
            })
            .await
    }

    /// Start a conversation with an empty history.
    pub fn start_chat(&self) -> ChatSession {
        ChatSession::new(self.clone())
    }

    pub(crate) async fn stream_contents(
        &self,
        contents: Vec<Content>,
        generation_config: GenerationConfig,
    ) -> ResponseIterator {
        let request = self.new_request(contents, generation_config);
        self.service.generate_stream(request).await
    }

    pub(crate) fn logger(&self) -> &dyn Logger {
        self.logger.as_ref()
    }

    fn new_request(
        &self,
        contents: Vec<Content>,
        generation_config: GenerationConfig,
    ) -> GenerateContentRequest {
        GenerateContentRequest {
            model: self.full_name.clone(),
            contents,
            safety_settings: self.safety_settings.clone(),
            generation_config: Some(generation_config),
        }
    }
}

impl fmt::Debug for GenerativeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerativeModel")
            .field("full_name", &self.full_name)
            .field("generation_config", &self.generation_config)
            .field("safety_settings", &self.safety_settings)
            .finish_non_exhaustive()
    }
}
