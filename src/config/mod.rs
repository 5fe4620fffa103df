//! Configuration types for the Vertex AI client.

use secrecy::SecretString;
use std::time::Duration;
use url::Url;
use crate::error::{VertexError, ConfigurationError};
use crate::transport::endpoints;

/// Default API version.
pub const DEFAULT_API_VERSION: &str = "v1beta1";

/// Default request timeout (120 seconds).
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Default connect timeout (30 seconds).
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

/// Log level for the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LogLevel {
    /// Error level - only errors.
    Error,
    /// Warning level - errors and warnings.
    Warn,
    /// Info level - general information.
    #[default]
    Info,
    /// Debug level - detailed information.
    Debug,
    /// Trace level - very detailed information.
    Trace,
}

/// Configuration for the Vertex AI client.
#[derive(Clone)]
pub struct VertexConfig {
    /// Google Cloud project that owns the request.
    pub project_id: String,
    /// Region hosting the model, e.g. `us-central1`.
    pub location: String,
    /// Caller-supplied OAuth2 access token.
    pub access_token: SecretString,
    /// Service root. Defaults to the regional endpoint for `location`.
    pub endpoint: Url,
    /// API version.
    pub api_version: String,
    /// Default timeout for requests.
    pub timeout: Duration,
    /// Connect timeout.
    pub connect_timeout: Duration,
    /// Enable tracing spans.
    pub enable_tracing: bool,
    /// Log level.
    pub log_level: LogLevel,
}

impl VertexConfig {
    /// Create a new configuration builder.
    pub fn builder() -> VertexConfigBuilder {
        VertexConfigBuilder::default()
    }

    /// Create configuration from environment variables.
    ///
    /// Reads `VERTEX_PROJECT_ID` (or `GOOGLE_CLOUD_PROJECT`), `VERTEX_LOCATION`
    /// (or `GOOGLE_CLOUD_LOCATION`), `VERTEX_ACCESS_TOKEN`, and optionally
    /// `VERTEX_ENDPOINT` and `VERTEX_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, VertexError> {
        let project_id = std::env::var("VERTEX_PROJECT_ID")
            .or_else(|_| std::env::var("GOOGLE_CLOUD_PROJECT"))
            .map_err(|_| ConfigurationError::MissingProjectId)?;

        let location = std::env::var("VERTEX_LOCATION")
            .or_else(|_| std::env::var("GOOGLE_CLOUD_LOCATION"))
            .map_err(|_| ConfigurationError::MissingLocation)?;

        let access_token = std::env::var("VERTEX_ACCESS_TOKEN")
            .map_err(|_| ConfigurationError::MissingAccessToken)?;

        let timeout_secs: u64 = std::env::var("VERTEX_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let mut builder = Self::builder()
            .project_id(project_id)
            .location(location)
            .access_token(SecretString::new(access_token))
            .timeout(Duration::from_secs(timeout_secs));

        if let Ok(endpoint) = std::env::var("VERTEX_ENDPOINT") {
            builder = builder.endpoint(&endpoint)?;
        }

        builder.build()
    }
}

impl std::fmt::Debug for VertexConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VertexConfig")
            .field("project_id", &self.project_id)
            .field("location", &self.location)
            .field("access_token", &"[REDACTED]")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Builder for VertexConfig.
#[derive(Default)]
pub struct VertexConfigBuilder {
    project_id: Option<String>,
    location: Option<String>,
    access_token: Option<SecretString>,
    endpoint: Option<Url>,
    api_version: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    enable_tracing: Option<bool>,
    log_level: Option<LogLevel>,
}

impl VertexConfigBuilder {
    /// Set the project ID.
    pub fn project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Set the location.
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the access token.
    pub fn access_token(mut self, token: SecretString) -> Self {
        self.access_token = Some(token);
        self
    }

    /// Override the service root.
    pub fn endpoint(mut self, endpoint: &str) -> Result<Self, VertexError> {
        self.endpoint = Some(Url::parse(endpoint)?);
        Ok(self)
    }

    /// Set the API version.
    pub fn api_version(mut self, version: &str) -> Self {
        self.api_version = Some(version.to_string());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Enable or disable tracing.
    pub fn enable_tracing(mut self, enable: bool) -> Self {
        self.enable_tracing = Some(enable);
        self
    }

    /// Set the log level.
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.log_level = Some(level);
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<VertexConfig, VertexError> {
        let project_id = self.project_id
            .filter(|p| !p.is_empty())
            .ok_or(ConfigurationError::MissingProjectId)?;

        let location = self.location
            .filter(|l| !l.is_empty())
            .ok_or(ConfigurationError::MissingLocation)?;

        let access_token = self.access_token
            .ok_or(ConfigurationError::MissingAccessToken)?;

        let endpoint = match self.endpoint {
            Some(endpoint) => endpoint,
            None => Url::parse(&endpoints::default_endpoint(&location))?,
        };

        Ok(VertexConfig {
            project_id,
            location,
            access_token,
            endpoint,
            api_version: self.api_version.unwrap_or_else(|| DEFAULT_API_VERSION.to_string()),
            timeout: self.timeout.unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            connect_timeout: self.connect_timeout.unwrap_or(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS)),
            enable_tracing: self.enable_tracing.unwrap_or(true),
            log_level: self.log_level.unwrap_or_default(),
        })
    }
}
