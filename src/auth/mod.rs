//! Credential attachment for Vertex AI requests.
//!
//! Token acquisition and refresh belong to the caller; this layer only
//! places the supplied token on each request.

use crate::config::VertexConfig;
use secrecy::{SecretString, ExposeSecret};

/// Authentication manager for Vertex AI requests.
pub trait AuthManager: Send + Sync {
    /// Get the authentication header name and value.
    fn get_auth_header(&self) -> Option<(String, String)>;
}

/// Attaches a caller-supplied OAuth2 access token as a bearer credential.
pub struct BearerTokenAuthManager {
    token: SecretString,
}

impl BearerTokenAuthManager {
    /// Create a new bearer token auth manager.
    pub fn new(token: SecretString) -> Self {
        Self { token }
    }

    /// Create from config.
    pub fn from_config(config: &VertexConfig) -> Self {
        Self::new(config.access_token.clone())
    }
}

impl AuthManager for BearerTokenAuthManager {
    fn get_auth_header(&self) -> Option<(String, String)> {
        Some((
            "Authorization".to_string(),
            format!("Bearer {}", self.token.expose_secret()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_header() {
        let manager = BearerTokenAuthManager::new(SecretString::new("ya29.token".into()));

        let (name, value) = manager.get_auth_header().unwrap();
        assert_eq!(name, "Authorization");
        assert_eq!(value, "Bearer ya29.token");
    }
}
