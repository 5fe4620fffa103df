//! Content service implementation for generating and streaming content with Vertex AI models.

use std::sync::Arc;
use std::time::Instant;
use async_trait::async_trait;
use serde_json::json;

use super::ContentService;
use super::validation::{validate_generate_request, validate_count_tokens_request};
use crate::auth::AuthManager;
use crate::config::VertexConfig;
use crate::error::{VertexError, VertexResult};
use crate::observability::{Logger, Span, SpanStatus, Tracer};
use crate::streaming::{ChunkedJsonParser, ResponseIterator};
use crate::transport::{HttpTransport, HttpMethod, RequestBuilder, ResponseParser, endpoints};
use crate::types::{
    GenerateContentRequest, GenerateContentResponse,
    CountTokensRequest, CountTokensResponse,
};

/// Implementation of the ContentService.
pub struct ContentServiceImpl {
    transport: Arc<dyn HttpTransport>,
    request_builder: RequestBuilder,
    logger: Arc<dyn Logger>,
    tracer: Arc<dyn Tracer>,
}

impl ContentServiceImpl {
    /// Create a new content service implementation.
    pub fn new(
        config: &VertexConfig,
        transport: Arc<dyn HttpTransport>,
        auth_manager: Arc<dyn AuthManager>,
        logger: Arc<dyn Logger>,
        tracer: Arc<dyn Tracer>,
    ) -> Self {
        let request_builder = RequestBuilder::new(
            config.endpoint.clone(),
            config.api_version.clone(),
            auth_manager,
        );

        Self {
            transport,
            request_builder,
            logger,
            tracer,
        }
    }

    /// Open the stream, or report why it could not be opened.
    async fn open_stream(
        &self,
        request: &GenerateContentRequest,
        span: &mut dyn Span,
    ) -> VertexResult<ChunkedJsonParser> {
        validate_generate_request(request)?;

        let path = endpoints::stream_generate_content(&request.model);
        let http_request = self.request_builder.build_streaming_request(&path, request)?;

        let chunk_stream = self.transport.send_streaming(http_request).await?;
        span.add_event("stream_opened");

        Ok(ChunkedJsonParser::new(chunk_stream))
    }

    fn log_usage_statistics(&self, model: &str, started: Instant, response: &GenerateContentResponse) {
        let duration = started.elapsed();
        match &response.usage_metadata {
            Some(usage) => self.logger.info("Content generation completed", json!({
                "model": model,
                "duration_ms": duration.as_millis(),
                "prompt_tokens": usage.prompt_token_count,
                "completion_tokens": usage.candidates_token_count,
                "total_tokens": usage.total_token_count,
                "candidates": response.candidates.len(),
            })),
            None => self.logger.info("Content generation completed", json!({
                "model": model,
                "duration_ms": duration.as_millis(),
                "candidates": response.candidates.len(),
            })),
        }
    }
}

#[async_trait]
impl ContentService for ContentServiceImpl {
    async fn generate(
        &self,
        request: GenerateContentRequest,
    ) -> VertexResult<GenerateContentResponse> {
        let started = Instant::now();
        let model = request.model.clone();

        let response = self.generate_stream(request).await.collect_merged().await?;

        self.log_usage_statistics(&model, started, &response);
        Ok(response)
    }

    async fn generate_stream(&self, request: GenerateContentRequest) -> ResponseIterator {
        let mut span = self.tracer.start_span("vertexai.content.stream");
        span.set_attribute("model", &request.model);
        span.set_attribute("service", "content");
        span.set_attribute("method", "stream_generate_content");

        self.logger.debug("Starting streaming content generation", json!({
            "model": request.model,
            "contents_count": request.contents.len(),
            "has_generation_config": request.generation_config.is_some(),
            "safety_settings_count": request.safety_settings.len(),
        }));

        let iterator = match self.open_stream(&request, &mut *span).await {
            Ok(parser) => ResponseIterator::new(Box::new(parser)),
            Err(error) => {
                self.logger.error("Failed to open content stream", json!({
                    "error": error.to_string(),
                    "model": request.model,
                }));
                ResponseIterator::failed(error)
            }
        };

        span.set_attribute("call_id", iterator.call_id());
        iterator
            .with_logger(Arc::clone(&self.logger))
            .with_span(span)
    }

    async fn count_tokens(
        &self,
        request: CountTokensRequest,
    ) -> VertexResult<CountTokensResponse> {
        let mut span = self.tracer.start_span("vertexai.content.count_tokens");
        span.set_attribute("model", &request.model);
        span.set_attribute("service", "content");
        span.set_attribute("method", "count_tokens");

        let started = Instant::now();

        self.logger.debug("Starting token count", json!({
            "model": request.model,
            "contents_count": request.contents.len(),
        }));

        let result: VertexResult<CountTokensResponse> = async {
            validate_count_tokens_request(&request)?;

            let path = endpoints::count_tokens(&request.model);
            let http_request = self.request_builder.build_request(
                HttpMethod::Post,
                &path,
                Some(&request),
                None,
            )?;

            let http_response = self.transport
                .send(http_request)
                .await
                .map_err(VertexError::from)?;

            ResponseParser::parse_response(http_response)
        }
        .await;

        match &result {
            Ok(response) => {
                self.logger.info("Token count completed", json!({
                    "model": request.model,
                    "duration_ms": started.elapsed().as_millis(),
                    "total_tokens": response.total_tokens,
                }));
                span.set_status(SpanStatus::Ok);
            }
            Err(error) => {
                self.logger.error("Token count failed", json!({
                    "model": request.model,
                    "error": error.to_string(),
                }));
                span.set_status(SpanStatus::Error(error.to_string()));
            }
        }
        span.end();

        result
    }
}
