//! Main client implementation for Vertex AI.

use once_cell::sync::OnceCell;
use std::sync::Arc;

use crate::auth::AuthManager;
use crate::config::VertexConfig;
use crate::error::VertexError;
use crate::observability::{Logger, Tracer};
use crate::services::{ContentService, ContentServiceImpl};
use crate::transport::{endpoints, HttpTransport};

use super::builder::VertexClientBuilder;
use super::model::GenerativeModel;

/// Client for the Vertex AI generative models of one project and location.
///
/// The client is `Send + Sync`; share it through an `Arc` to run independent
/// calls concurrently. Each call owns its own stream state.
///
/// # Example
///
/// ```no_run
/// use integrations_vertexai::{Part, VertexClient};
/// use secrecy::SecretString;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = VertexClient::builder()
///     .project_id("my-project")
///     .location("us-central1")
///     .access_token(SecretString::new("ya29...".into()))
///     .build()?;
///
/// let model = client.generative_model("gemini-pro");
/// let response = model.generate_content(vec![Part::text("Why is the sky blue?")]).await?;
/// println!("{}", response.text().unwrap_or_default());
/// # Ok(())
/// # }
/// ```
pub struct VertexClient {
    config: VertexConfig,
    transport: Arc<dyn HttpTransport>,
    auth_manager: Arc<dyn AuthManager>,

    // Lazy-initialized services
    content_service: OnceCell<Arc<dyn ContentService>>,

    // Observability
    logger: Arc<dyn Logger>,
    tracer: Arc<dyn Tracer>,
}

impl VertexClient {
    /// Creates a new client builder.
    pub fn builder() -> VertexClientBuilder {
        VertexClientBuilder::new()
    }

    /// Creates a client from environment variables.
    ///
    /// See [`VertexConfig::from_env`] for the variables read.
    pub fn from_env() -> Result<Self, VertexError> {
        let config = VertexConfig::from_env()?;
        Self::new(config)
    }

    /// Creates a client from a configuration object.
    pub fn new(config: VertexConfig) -> Result<Self, VertexError> {
        VertexClientBuilder::from_config(config).build()
    }

    /// Creates a client from pre-constructed parts (used by builder).
    pub(super) fn from_parts(
        config: VertexConfig,
        transport: Arc<dyn HttpTransport>,
        auth_manager: Arc<dyn AuthManager>,
        logger: Arc<dyn Logger>,
        tracer: Arc<dyn Tracer>,
    ) -> Self {
        Self {
            config,
            transport,
            auth_manager,
            content_service: OnceCell::new(),
            logger,
            tracer,
        }
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &VertexConfig {
        &self.config
    }

    /// Access the content generation service.
    pub fn content(&self) -> Arc<dyn ContentService> {
        let service = self.content_service.get_or_init(|| {
            Arc::new(ContentServiceImpl::new(
                &self.config,
                Arc::clone(&self.transport),
                Arc::clone(&self.auth_manager),
                Arc::clone(&self.logger),
                Arc::clone(&self.tracer),
            ))
        });
        Arc::clone(service)
    }

    /// A handle to the named publisher model, e.g. `gemini-pro`.
    pub fn generative_model(&self, name: &str) -> GenerativeModel {
        let full_name = endpoints::model_resource(&self.config.project_id, &self.config.location, name);
        GenerativeModel::new(self.content(), Arc::clone(&self.logger), name, full_name)
    }
}

impl std::fmt::Debug for VertexClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VertexClient")
            .field("project_id", &self.config.project_id)
            .field("location", &self.config.location)
            .finish_non_exhaustive()
    }
}
