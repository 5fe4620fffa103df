//! Validation functions for content generation requests.

use crate::error::{RequestError, ValidationDetail, VertexError, VertexResult};
use crate::types::{Content, CountTokensRequest, GenerateContentRequest, GenerationConfig, Part};

/// Validate a generate content request.
pub fn validate_generate_request(request: &GenerateContentRequest) -> VertexResult<()> {
    validate_model(&request.model)?;

    let mut details = validate_contents(&request.contents);

    if let Some(config) = &request.generation_config {
        details.extend(validate_generation_config(config));
    }

    into_result("Invalid generate content request", details)
}

/// Validate a count tokens request.
pub fn validate_count_tokens_request(request: &CountTokensRequest) -> VertexResult<()> {
    validate_model(&request.model)?;
    into_result("Invalid count tokens request", validate_contents(&request.contents))
}

fn validate_model(model: &str) -> VertexResult<()> {
    if model.trim().is_empty() {
        return Err(RequestError::InvalidModel {
            model: model.to_string(),
        }
        .into());
    }
    Ok(())
}

fn validate_contents(contents: &[Content]) -> Vec<ValidationDetail> {
    let mut details = Vec::new();

    if contents.is_empty() {
        details.push(detail("contents", "Contents array cannot be empty"));
    }

    for (idx, content) in contents.iter().enumerate() {
        if content.parts.is_empty() {
            details.push(detail(
                format!("contents[{}].parts", idx),
                "Content must have at least one part",
            ));
        }

        for (part_idx, part) in content.parts.iter().enumerate() {
            details.extend(validate_part(part, &format!("contents[{}].parts[{}]", idx, part_idx)));
        }
    }

    details
}

fn validate_part(part: &Part, field_prefix: &str) -> Vec<ValidationDetail> {
    let mut details = Vec::new();

    match part {
        // Empty text is legal; the service accepts it.
        Part::Text(_) => {}
        Part::Blob(blob) => {
            if blob.mime_type.is_empty() {
                details.push(detail(
                    format!("{}.inline_data.mime_type", field_prefix),
                    "MIME type is required",
                ));
            }
        }
        Part::FileData(file_data) => {
            if file_data.file_uri.is_empty() {
                details.push(detail(
                    format!("{}.file_data.file_uri", field_prefix),
                    "File URI is required",
                ));
            }
            if file_data.mime_type.is_empty() {
                details.push(detail(
                    format!("{}.file_data.mime_type", field_prefix),
                    "MIME type is required",
                ));
            }
        }
    }

    details
}

/// Validate generation configuration.
pub fn validate_generation_config(config: &GenerationConfig) -> Vec<ValidationDetail> {
    let mut details = Vec::new();

    if let Some(temp) = config.temperature {
        if !(0.0..=2.0).contains(&temp) {
            details.push(detail(
                "generation_config.temperature",
                "Temperature must be between 0.0 and 2.0",
            ));
        }
    }

    if let Some(top_p) = config.top_p {
        if !(0.0..=1.0).contains(&top_p) {
            details.push(detail(
                "generation_config.top_p",
                "top_p must be between 0.0 and 1.0",
            ));
        }
    }

    if let Some(top_k) = config.top_k {
        if top_k < 1 {
            details.push(detail("generation_config.top_k", "top_k must be >= 1"));
        }
    }

    if let Some(max_tokens) = config.max_output_tokens {
        if max_tokens < 1 {
            details.push(detail(
                "generation_config.max_output_tokens",
                "max_output_tokens must be >= 1",
            ));
        }
    }

    if let Some(count) = config.candidate_count {
        if count < 1 {
            details.push(detail(
                "generation_config.candidate_count",
                "candidate_count must be >= 1",
            ));
        }
    }

    details
}

fn detail(field: impl Into<String>, description: &str) -> ValidationDetail {
    ValidationDetail {
        field: field.into(),
        description: description.to_string(),
    }
}

fn into_result(message: &str, details: Vec<ValidationDetail>) -> VertexResult<()> {
    if details.is_empty() {
        return Ok(());
    }
    Err(VertexError::Request(RequestError::ValidationError {
        message: message.to_string(),
        details,
    }))
}
