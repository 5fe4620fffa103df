//! Token counting types for the Vertex AI generative API.

use serde::{Deserialize, Serialize};

use super::content::Content;

/// Request to count tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CountTokensRequest {
    /// Full resource name of the model. Sent in the URL path, not the body.
    #[serde(skip)]
    pub model: String,
    /// The contents to count tokens for.
    pub contents: Vec<Content>,
}

/// Response from counting tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CountTokensResponse {
    /// The total number of tokens.
    #[serde(default)]
    pub total_tokens: i32,
    /// The total number of billable characters.
    #[serde(default)]
    pub total_billable_characters: i32,
}
