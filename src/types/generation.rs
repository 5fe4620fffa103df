//! Content generation types for the Vertex AI generative API.
//!
//! This module contains types for configuring and handling content generation.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::content::Content;
use super::safety::{SafetyRating, SafetySetting};

/// Configuration for content generation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// The temperature for sampling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// The nucleus sampling probability.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    /// The top-k sampling parameter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<i32>,
    /// The number of candidates to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_count: Option<i32>,
    /// The maximum number of tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<i32>,
    /// Sequences that will stop generation.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop_sequences: Vec<String>,
}

/// The reason why a candidate's generation finished.
///
/// Values the client does not know decode as [`FinishReason::Other`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(from = "String", into = "&'static str")]
pub enum FinishReason {
    /// Not reported yet; generation is still in progress.
    #[default]
    Unspecified,
    /// Natural stop point.
    Stop,
    /// Maximum token limit reached.
    MaxTokens,
    /// Safety threshold triggered.
    Safety,
    /// Content recitation detected.
    Recitation,
    /// Other reason.
    Other,
}

impl FinishReason {
    /// The wire name of this finish reason.
    pub fn as_str(self) -> &'static str {
        match self {
            FinishReason::Unspecified => "FINISH_REASON_UNSPECIFIED",
            FinishReason::Stop => "STOP",
            FinishReason::MaxTokens => "MAX_TOKENS",
            FinishReason::Safety => "SAFETY",
            FinishReason::Recitation => "RECITATION",
            FinishReason::Other => "OTHER",
        }
    }
}

impl From<String> for FinishReason {
    fn from(value: String) -> Self {
        match value.as_str() {
            "FINISH_REASON_UNSPECIFIED" => FinishReason::Unspecified,
            "STOP" => FinishReason::Stop,
            "MAX_TOKENS" => FinishReason::MaxTokens,
            "SAFETY" => FinishReason::Safety,
            "RECITATION" => FinishReason::Recitation,
            _ => FinishReason::Other,
        }
    }
}

impl From<FinishReason> for &'static str {
    fn from(reason: FinishReason) -> Self {
        reason.as_str()
    }
}

impl fmt::Display for FinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metadata about token usage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Number of tokens in the prompt.
    #[serde(default)]
    pub prompt_token_count: i32,
    /// Number of tokens in the candidates.
    #[serde(default)]
    pub candidates_token_count: i32,
    /// Total number of tokens.
    #[serde(default)]
    pub total_token_count: i32,
}

/// Citations to sources for a candidate's content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CitationMetadata {
    /// Citations, in the order they were reported.
    #[serde(default)]
    pub citations: Vec<Citation>,
}

/// A source attribution for a span of generated content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    /// Start of the attributed segment, in bytes.
    #[serde(default)]
    pub start_index: i32,
    /// End of the attributed segment, exclusive.
    #[serde(default)]
    pub end_index: i32,
    /// URI of the source.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub uri: String,
    /// Title of the source.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    /// License of the source.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub license: String,
    /// Publication date of the source.
    #[serde(
        default,
        deserialize_with = "deserialize_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub publication_date: Option<Date>,
}

/// A calendar date. Fields follow `google.type.Date`: a zero month or day
/// means the value is partial.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Date {
    /// Year, 1 to 9999.
    #[serde(default)]
    pub year: i32,
    /// Month of year, 1 to 12.
    #[serde(default)]
    pub month: i32,
    /// Day of month, 1 to 31.
    #[serde(default)]
    pub day: i32,
}

impl Date {
    /// Returns true when every field is zero.
    pub fn is_zero(&self) -> bool {
        self.year == 0 && self.month == 0 && self.day == 0
    }
}

// An all-zero date on the wire means "no date".
fn deserialize_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Date>, D::Error> {
    let date = Option::<Date>::deserialize(deserializer)?;
    Ok(date.filter(|d| !d.is_zero()))
}

/// One generation alternative.
///
/// `index` is stable across the chunks of one stream and identifies the
/// candidate when chunks are merged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The index of this candidate.
    #[serde(default)]
    pub index: i32,
    /// The content of the candidate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,
    /// The reason generation finished.
    #[serde(default)]
    pub finish_reason: FinishReason,
    /// Safety ratings for the candidate.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub safety_ratings: Vec<SafetyRating>,
    /// Citation metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation_metadata: Option<CitationMetadata>,
}

impl Candidate {
    /// Concatenation of the candidate's text parts.
    pub fn text(&self) -> String {
        self.content.as_ref().map(Content::text).unwrap_or_default()
    }
}

/// Request to generate content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// Full resource name of the model. Sent in the URL path, not the body.
    #[serde(skip)]
    pub model: String,
    /// The content to send to the model.
    pub contents: Vec<Content>,
    /// Safety setting overrides.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub safety_settings: Vec<SafetySetting>,
    /// Generation configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// Feedback on why the prompt was blocked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// The reason the prompt was blocked.
    #[serde(default)]
    pub block_reason: BlockReason,
    /// Human-readable description of the block.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub block_reason_message: String,
    /// Safety ratings for the prompt.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub safety_ratings: Vec<SafetyRating>,
}

impl PromptFeedback {
    /// Returns true when the feedback carries no information.
    pub fn is_empty(&self) -> bool {
        self.block_reason == BlockReason::Unspecified
            && self.block_reason_message.is_empty()
            && self.safety_ratings.is_empty()
    }
}

/// Reason why the prompt was blocked.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum BlockReason {
    /// Unspecified block reason.
    #[default]
    #[serde(rename = "BLOCKED_REASON_UNSPECIFIED")]
    Unspecified,
    /// Blocked due to safety.
    #[serde(rename = "SAFETY")]
    Safety,
    /// Blocked for any other reason, including reasons this client does not know.
    #[serde(rename = "OTHER", other)]
    Other,
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BlockReason::Unspecified => "BLOCKED_REASON_UNSPECIFIED",
            BlockReason::Safety => "SAFETY",
            BlockReason::Other => "OTHER",
        })
    }
}

/// Response from content generation.
///
/// A streaming call yields one of these per chunk; the merged form of all
/// chunks has the same shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// The candidate responses, in the order the service reported them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<Candidate>,
    /// Feedback about the prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,
    /// Usage metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, if any.
    pub fn text(&self) -> Option<String> {
        self.candidates.first().map(Candidate::text)
    }
}
