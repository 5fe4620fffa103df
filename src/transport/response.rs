//! HTTP response parser for the Vertex AI API.

use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;

use crate::error::{map_http_status_with_body, RateLimitError, ServerError, VertexError};
use super::http::HttpResponse;

/// Parser for unary HTTP responses.
pub struct ResponseParser;

impl ResponseParser {
    /// Parses a successful HTTP response into the expected type.
    pub fn parse_response<T: DeserializeOwned>(response: HttpResponse) -> Result<T, VertexError> {
        if (200..300).contains(&response.status) {
            Ok(serde_json::from_slice(&response.body)?)
        } else {
            Err(Self::parse_error_response(response))
        }
    }

    /// Maps an error response to a [`VertexError`], filling in `retry_after`
    /// from the response headers where the category carries one.
    pub fn parse_error_response(response: HttpResponse) -> VertexError {
        let retry_after = Self::parse_retry_after(&response.headers);
        let mut error = map_http_status_with_body(response.status, &response.body);

        match &mut error {
            VertexError::RateLimit(RateLimitError::TooManyRequests { retry_after: ra })
            | VertexError::RateLimit(RateLimitError::QuotaExceeded { retry_after: ra })
            | VertexError::Server(ServerError::ServiceUnavailable { retry_after: ra }) => {
                *ra = retry_after;
            }
            _ => {}
        }

        if let Some(id) = Self::extract_request_id(&response.headers) {
            tracing::debug!(
                request_id = %id,
                status = response.status,
                error = ?error,
                "API error occurred"
            );
        }

        error
    }

    /// Parses a `Retry-After` header given in seconds.
    pub fn parse_retry_after(headers: &HashMap<String, String>) -> Option<Duration> {
        headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case("retry-after"))
            .and_then(|(_, value)| value.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
    }

    /// Extracts the request ID from response headers for debugging.
    pub fn extract_request_id(headers: &HashMap<String, String>) -> Option<String> {
        let possible_headers = ["x-request-id", "x-goog-request-id", "request-id"];

        headers
            .iter()
            .find(|(key, _)| possible_headers.contains(&key.to_lowercase().as_str()))
            .map(|(_, value)| value.clone())
    }
}
