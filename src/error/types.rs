//! Main error type for the Vertex AI client.

use std::time::Duration;
use thiserror::Error;
use super::blocked::BlockedError;
use super::categories::*;
use crate::transport::TransportError;

/// Result type alias for Vertex AI operations.
pub type VertexResult<T> = Result<T, VertexError>;

/// Top-level error type for the Vertex AI integration.
#[derive(Error, Debug, Clone)]
pub enum VertexError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthenticationError),

    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    #[error("Rate limit error: {0}")]
    RateLimit(#[from] RateLimitError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    #[error("Response error: {0}")]
    Response(#[from] ResponseError),

    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),

    #[error("{0}")]
    Blocked(#[from] BlockedError),
}

impl VertexError {
    /// Returns true if this error is a policy block rather than a technical failure.
    pub fn is_blocked(&self) -> bool {
        matches!(self, VertexError::Blocked(_))
    }

    /// Returns the block details if this error is a policy block.
    pub fn as_blocked(&self) -> Option<&BlockedError> {
        match self {
            VertexError::Blocked(blocked) => Some(blocked),
            _ => None,
        }
    }

    /// Returns true if repeating the whole call might succeed.
    ///
    /// This layer never retries; the flag is for callers.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            VertexError::RateLimit(_)
                | VertexError::Network(NetworkError::Timeout)
                | VertexError::Network(NetworkError::ConnectionFailed { .. })
                | VertexError::Network(NetworkError::StreamInterrupted { .. })
                | VertexError::Server(ServerError::ServiceUnavailable { .. })
        )
    }

    /// Returns the retry-after duration if available.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            VertexError::RateLimit(e) => e.retry_after(),
            VertexError::Server(ServerError::ServiceUnavailable { retry_after }) => *retry_after,
            _ => None,
        }
    }
}

impl From<TransportError> for VertexError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout => VertexError::Network(NetworkError::Timeout),
            TransportError::Cancelled => VertexError::Network(NetworkError::Cancelled),
            TransportError::Connection(message) => {
                VertexError::Network(NetworkError::ConnectionFailed { message })
            }
            TransportError::Stream(message) => {
                VertexError::Network(NetworkError::StreamInterrupted { message })
            }
            TransportError::Status { status, body } => {
                super::mapper::map_http_status_with_body(status, &body)
            }
        }
    }
}

impl From<serde_json::Error> for VertexError {
    fn from(err: serde_json::Error) -> Self {
        VertexError::Response(ResponseError::DeserializationError {
            message: err.to_string(),
        })
    }
}

impl From<url::ParseError> for VertexError {
    fn from(err: url::ParseError) -> Self {
        VertexError::Configuration(ConfigurationError::InvalidEndpoint {
            url: err.to_string(),
        })
    }
}
