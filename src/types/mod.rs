//! Core types for the Vertex AI generative API.
//!
//! This module contains the request, response, and configuration types
//! exchanged with the prediction service.

// Module declarations
pub mod common;
pub mod content;
pub mod generation;
pub mod safety;

// Re-exports for common types
pub use common::{CountTokensRequest, CountTokensResponse};

// Re-exports for content types
pub use content::{Blob, Content, FileData, Part, Role};

// Re-exports for generation types
pub use generation::{
    BlockReason, Candidate, Citation, CitationMetadata, Date, FinishReason,
    GenerateContentRequest, GenerateContentResponse, GenerationConfig, PromptFeedback,
    UsageMetadata,
};

// Re-exports for safety types
pub use safety::{HarmBlockThreshold, HarmCategory, HarmProbability, SafetyRating, SafetySetting};
