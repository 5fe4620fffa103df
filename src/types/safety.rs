//! Safety-related types for the Vertex AI generative API.
//!
//! This module contains types for configuring and reporting content safety.

use serde::{Deserialize, Serialize};

/// Safety setting overriding the default blocking threshold for one category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SafetySetting {
    /// The harm category to configure.
    pub category: HarmCategory,
    /// The blocking threshold for this category.
    pub threshold: HarmBlockThreshold,
}

/// Categories of harmful content.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum HarmCategory {
    /// Hate speech content.
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    /// Dangerous content.
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
    /// Harassment content.
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    /// Sexually explicit content.
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    /// Civic integrity content.
    #[serde(rename = "HARM_CATEGORY_CIVIC_INTEGRITY")]
    CivicIntegrity,
    /// Unspecified or unrecognised category.
    #[default]
    #[serde(rename = "HARM_CATEGORY_UNSPECIFIED", other)]
    Unspecified,
}

/// Thresholds for blocking harmful content.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum HarmBlockThreshold {
    /// Unspecified threshold; the server default applies.
    #[default]
    #[serde(rename = "HARM_BLOCK_THRESHOLD_UNSPECIFIED")]
    Unspecified,
    /// Block low and above.
    #[serde(rename = "BLOCK_LOW_AND_ABOVE")]
    BlockLowAndAbove,
    /// Block medium and above.
    #[serde(rename = "BLOCK_MEDIUM_AND_ABOVE")]
    BlockMediumAndAbove,
    /// Block only high.
    #[serde(rename = "BLOCK_ONLY_HIGH")]
    BlockOnlyHigh,
    /// Block none.
    #[serde(rename = "BLOCK_NONE")]
    BlockNone,
}

/// Safety rating for a piece of content.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SafetyRating {
    /// The harm category.
    #[serde(default)]
    pub category: HarmCategory,
    /// The probability of harm.
    #[serde(default)]
    pub probability: HarmProbability,
    /// Whether the content was filtered because of this rating.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub blocked: bool,
}

/// Probability levels for harmful content.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmProbability {
    /// Negligible probability.
    Negligible,
    /// Low probability.
    Low,
    /// Medium probability.
    Medium,
    /// High probability.
    High,
    /// Unspecified or unrecognised probability.
    #[default]
    #[serde(rename = "HARM_PROBABILITY_UNSPECIFIED", other)]
    Unspecified,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_civic_integrity_rating() {
        let rating: SafetyRating = serde_json::from_value(json!({
            "category": "HARM_CATEGORY_CIVIC_INTEGRITY",
            "probability": "LOW"
        }))
        .unwrap();
        assert_eq!(rating.category, HarmCategory::CivicIntegrity);
        assert_eq!(rating.probability, HarmProbability::Low);
    }

    #[test]
    fn test_unknown_rating_values_fall_back() {
        let rating: SafetyRating = serde_json::from_value(json!({
            "category": "HARM_CATEGORY_SOMETHING_NEW",
            "probability": "SOMEWHAT_LIKELY",
            "blocked": true
        }))
        .unwrap();
        assert_eq!(rating.category, HarmCategory::Unspecified);
        assert_eq!(rating.probability, HarmProbability::Unspecified);
        assert!(rating.blocked);
    }

    #[test]
    fn test_setting_serializes_wire_names() {
        let setting = SafetySetting {
            category: HarmCategory::CivicIntegrity,
            threshold: HarmBlockThreshold::BlockNone,
        };
        assert_eq!(
            serde_json::to_value(&setting).unwrap(),
            json!({"category": "HARM_CATEGORY_CIVIC_INTEGRITY", "threshold": "BLOCK_NONE"})
        );
    }
}
