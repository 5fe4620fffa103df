//! Error mapping utilities for HTTP status codes and API responses.

use serde::Deserialize;
use super::categories::*;
use super::types::VertexError;

/// Structured API error response.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

/// Detailed error information from the API.
#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub code: i32,
    pub message: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub details: Vec<serde_json::Value>,
}

/// Maps HTTP status codes and response body to appropriate VertexError variants.
///
/// The service wraps errors in `{"error": {...}}` (a JSON array of one such
/// object on streaming endpoints); plain-text bodies are used verbatim.
pub fn map_http_status_with_body(status: u16, body: &[u8]) -> VertexError {
    let detail = parse_error_detail(body);
    let message = detail
        .as_ref()
        .map(|d| d.message.clone())
        .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_string());

    match status {
        400 => {
            let details = detail
                .as_ref()
                .map(|d| parse_validation_details(&d.details))
                .unwrap_or_default();
            VertexError::Request(RequestError::ValidationError { message, details })
        }
        401 => VertexError::Authentication(AuthenticationError::InvalidCredentials),
        403 => VertexError::Authentication(AuthenticationError::PermissionDenied { message }),
        404 => VertexError::Resource(ResourceError::ModelNotFound {
            model: extract_resource_name(&message),
        }),
        413 => VertexError::Request(RequestError::PayloadTooLarge { message }),
        429 => {
            let exhausted = detail
                .as_ref()
                .map(|d| d.status == "RESOURCE_EXHAUSTED")
                .unwrap_or(false);
            if exhausted && message.to_lowercase().contains("quota") {
                VertexError::RateLimit(RateLimitError::QuotaExceeded { retry_after: None })
            } else {
                VertexError::RateLimit(RateLimitError::TooManyRequests { retry_after: None })
            }
        }
        503 => VertexError::Server(ServerError::ServiceUnavailable { retry_after: None }),
        _ => VertexError::Server(ServerError::InternalError {
            message: format!("HTTP {}: {}", status, message),
        }),
    }
}

fn parse_error_detail(body: &[u8]) -> Option<ApiErrorDetail> {
    if let Ok(response) = serde_json::from_slice::<ApiErrorResponse>(body) {
        return Some(response.error);
    }
    serde_json::from_slice::<Vec<ApiErrorResponse>>(body)
        .ok()
        .and_then(|responses| responses.into_iter().next())
        .map(|response| response.error)
}

/// Extracts a model resource name from an error message.
fn extract_resource_name(message: &str) -> String {
    if let Some(found) = message
        .split_whitespace()
        .map(|s| s.trim_matches(|c: char| !c.is_alphanumeric() && c != '/' && c != '-' && c != '_' && c != '.'))
        .find(|s| s.starts_with("projects/") || s.starts_with("models/"))
    {
        return found.to_string();
    }

    if let Some(start) = message.find('\'') {
        if let Some(end) = message[start + 1..].find('\'') {
            return message[start + 1..start + 1 + end].to_string();
        }
    }

    "unknown".to_string()
}

/// Parses field violations out of the error details array.
fn parse_validation_details(details: &[serde_json::Value]) -> Vec<ValidationDetail> {
    details
        .iter()
        .filter_map(|d| d.get("fieldViolations").and_then(|v| v.as_array()))
        .flatten()
        .filter_map(|violation| {
            let description = violation.get("description")?.as_str()?;
            let field = violation
                .get("field")
                .and_then(|f| f.as_str())
                .unwrap_or("unknown");
            Some(ValidationDetail {
                field: field.to_string(),
                description: description.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_http_status_401() {
        let error = map_http_status_with_body(401, b"Unauthorized");
        assert!(matches!(
            error,
            VertexError::Authentication(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_map_http_status_400_with_violations() {
        let body = r#"{"error":{"code":400,"message":"Invalid request","status":"INVALID_ARGUMENT","details":[{"fieldViolations":[{"field":"contents","description":"must not be empty"}]}]}}"#;
        match map_http_status_with_body(400, body.as_bytes()) {
            VertexError::Request(RequestError::ValidationError { message, details }) => {
                assert_eq!(message, "Invalid request");
                assert_eq!(details.len(), 1);
                assert_eq!(details[0].field, "contents");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_map_http_status_streaming_array_body() {
        let body = r#"[{"error":{"code":404,"message":"Publisher Model `projects/p/locations/l/publishers/google/models/nope` not found.","status":"NOT_FOUND"}}]"#;
        match map_http_status_with_body(404, body.as_bytes()) {
            VertexError::Resource(ResourceError::ModelNotFound { model }) => {
                assert_eq!(model, "projects/p/locations/l/publishers/google/models/nope");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_map_http_status_429_quota() {
        let body = r#"{"error":{"code":429,"message":"Quota exceeded for aiplatform.googleapis.com","status":"RESOURCE_EXHAUSTED"}}"#;
        assert!(matches!(
            map_http_status_with_body(429, body.as_bytes()),
            VertexError::RateLimit(RateLimitError::QuotaExceeded { .. })
        ));
    }

    #[test]
    fn test_map_http_status_unknown() {
        match map_http_status_with_body(418, b"teapot") {
            VertexError::Server(ServerError::InternalError { message }) => {
                assert_eq!(message, "HTTP 418: teapot");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
