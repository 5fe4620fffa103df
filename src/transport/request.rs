//! HTTP request builder for the Vertex AI API.
//!
//! Joins resource paths onto the regional endpoint, attaches the caller's
//! credentials and serializes JSON bodies.

use bytes::Bytes;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

use crate::auth::AuthManager;
use crate::error::VertexError;
use super::http::{HttpRequest, HttpMethod};

/// Builder for constructing HTTP requests to the Vertex AI API.
#[derive(Clone)]
pub struct RequestBuilder {
    /// Regional service root.
    base_url: Url,
    /// API version (e.g., "v1beta1").
    api_version: String,
    /// Authentication manager.
    auth_manager: Arc<dyn AuthManager>,
}

impl RequestBuilder {
    /// Creates a new request builder.
    ///
    /// ```no_run
    /// use integrations_vertexai::transport::RequestBuilder;
    /// use integrations_vertexai::auth::BearerTokenAuthManager;
    /// use integrations_vertexai::config::VertexConfig;
    /// use secrecy::SecretString;
    /// use std::sync::Arc;
    ///
    /// let config = VertexConfig::builder()
    ///     .project_id("my-project")
    ///     .location("us-central1")
    ///     .access_token(SecretString::new("token".into()))
    ///     .build()
    ///     .unwrap();
    ///
    /// let builder = RequestBuilder::new(
    ///     config.endpoint.clone(),
    ///     config.api_version.clone(),
    ///     Arc::new(BearerTokenAuthManager::from_config(&config)),
    /// );
    /// ```
    pub fn new(
        base_url: Url,
        api_version: String,
        auth_manager: Arc<dyn AuthManager>,
    ) -> Self {
        Self {
            base_url,
            api_version,
            auth_manager,
        }
    }

    /// Builds a complete URL for the given resource path.
    ///
    /// `projects/p/locations/l/...:streamGenerateContent` becomes
    /// `{base}/v1beta1/projects/p/locations/l/...:streamGenerateContent`.
    pub fn build_url(&self, path: &str) -> Result<Url, VertexError> {
        let path = path.trim_start_matches('/');
        let full_path = format!("{}/{}", self.api_version, path);
        Ok(self.base_url.join(&full_path)?)
    }

    /// Builds an HTTP request with an optional JSON body.
    pub fn build_request<T: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&T>,
        extra_headers: Option<HashMap<String, String>>,
    ) -> Result<HttpRequest, VertexError> {
        let url = self.build_url(path)?;

        let mut headers = HashMap::new();

        if body.is_some() {
            headers.insert("Content-Type".to_string(), "application/json".to_string());
        }

        if let Some((key, value)) = self.auth_manager.get_auth_header() {
            headers.insert(key, value);
        }

        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let body_bytes = match body {
            Some(body) => Some(Bytes::from(serde_json::to_vec(body)?)),
            None => None,
        };

        Ok(HttpRequest {
            method,
            url: url.to_string(),
            headers,
            body: body_bytes,
        })
    }

    /// Builds a POST request for a server-streaming method.
    pub fn build_streaming_request<T: Serialize>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<HttpRequest, VertexError> {
        self.build_request(HttpMethod::Post, path, Some(body), None)
    }
}
