//! Builder for creating Vertex AI client instances.

use secrecy::SecretString;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::{AuthManager, BearerTokenAuthManager};
use crate::config::{LogLevel, VertexConfig};
use crate::error::{NetworkError, VertexError};
use crate::observability::{create_default_stack, DefaultTracer, Logger, Tracer};
use crate::transport::{HttpTransport, ReqwestTransport};

use super::client::VertexClient;

/// Builder for creating a [`VertexClient`] instance.
///
/// # Example
///
/// ```no_run
/// use integrations_vertexai::VertexClientBuilder;
/// use secrecy::SecretString;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = VertexClientBuilder::new()
///     .project_id("my-project")
///     .location("us-central1")
///     .access_token(SecretString::new("ya29...".into()))
///     .timeout(Duration::from_secs(60))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct VertexClientBuilder {
    project_id: Option<String>,
    location: Option<String>,
    access_token: Option<SecretString>,
    endpoint: Option<String>,
    api_version: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    log_level: Option<LogLevel>,
    enable_tracing: Option<bool>,

    // Injectable dependencies for testing
    transport: Option<Arc<dyn HttpTransport>>,
    auth_manager: Option<Arc<dyn AuthManager>>,
    logger: Option<Arc<dyn Logger>>,
    tracer: Option<Arc<dyn Tracer>>,
}

impl VertexClientBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder from an existing configuration.
    pub fn from_config(config: VertexConfig) -> Self {
        Self {
            project_id: Some(config.project_id),
            location: Some(config.location),
            access_token: Some(config.access_token),
            endpoint: Some(config.endpoint.to_string()),
            api_version: Some(config.api_version),
            timeout: Some(config.timeout),
            connect_timeout: Some(config.connect_timeout),
            log_level: Some(config.log_level),
            enable_tracing: Some(config.enable_tracing),
            ..Self::default()
        }
    }

    /// Sets the Google Cloud project.
    pub fn project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Sets the region, e.g. `us-central1`.
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Sets the OAuth2 access token.
    pub fn access_token(mut self, token: SecretString) -> Self {
        self.access_token = Some(token);
        self
    }

    /// Overrides the regional endpoint.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the API version.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = Some(version.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, duration: Duration) -> Self {
        self.connect_timeout = Some(duration);
        self
    }

    /// Sets the minimum level of the default logger.
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Enables or disables per-call spans.
    pub fn enable_tracing(mut self, enable: bool) -> Self {
        self.enable_tracing = Some(enable);
        self
    }

    /// Sets a custom HTTP transport (for testing).
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets a custom auth manager.
    pub fn auth_manager(mut self, auth_manager: Arc<dyn AuthManager>) -> Self {
        self.auth_manager = Some(auth_manager);
        self
    }

    /// Sets a custom logger (for testing).
    pub fn logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Sets a custom tracer (for testing).
    pub fn tracer(mut self, tracer: Arc<dyn Tracer>) -> Self {
        self.tracer = Some(tracer);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - project, location or access token is missing
    /// - the endpoint is not a valid URL
    /// - the HTTP transport cannot be created
    pub fn build(self) -> Result<VertexClient, VertexError> {
        let mut config_builder = VertexConfig::builder();
        if let Some(project_id) = self.project_id {
            config_builder = config_builder.project_id(project_id);
        }
        if let Some(location) = self.location {
            config_builder = config_builder.location(location);
        }
        if let Some(token) = self.access_token {
            config_builder = config_builder.access_token(token);
        }
        if let Some(endpoint) = &self.endpoint {
            config_builder = config_builder.endpoint(endpoint)?;
        }
        if let Some(version) = &self.api_version {
            config_builder = config_builder.api_version(version);
        }
        if let Some(timeout) = self.timeout {
            config_builder = config_builder.timeout(timeout);
        }
        if let Some(timeout) = self.connect_timeout {
            config_builder = config_builder.connect_timeout(timeout);
        }
        if let Some(level) = self.log_level {
            config_builder = config_builder.log_level(level);
        }
        if let Some(enable) = self.enable_tracing {
            config_builder = config_builder.enable_tracing(enable);
        }
        let config = config_builder.build()?;

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(t) => t,
            None => Arc::new(
                ReqwestTransport::new(config.timeout, config.connect_timeout).map_err(|e| {
                    VertexError::Network(NetworkError::ConnectionFailed {
                        message: format!("Failed to create HTTP transport: {}", e),
                    })
                })?,
            ),
        };

        let auth_manager: Arc<dyn AuthManager> = self
            .auth_manager
            .unwrap_or_else(|| Arc::new(BearerTokenAuthManager::from_config(&config)));

        let (default_logger, default_tracer) = create_default_stack("vertexai", config.log_level);
        let logger = self.logger.unwrap_or(default_logger);
        let tracer = match self.tracer {
            Some(tracer) => tracer,
            None if config.enable_tracing => default_tracer,
            None => Arc::new(DefaultTracer::new()),
        };

        logger.info(
            "Vertex AI client initialized",
            serde_json::json!({
                "project_id": config.project_id,
                "location": config.location,
                "endpoint": config.endpoint.as_str(),
                "api_version": config.api_version,
            }),
        );

        Ok(VertexClient::from_parts(
            config,
            transport,
            auth_manager,
            logger,
            tracer,
        ))
    }
}
