//! Policy rejection of a prompt or a candidate.

use thiserror::Error;

use crate::types::{Candidate, PromptFeedback};

/// The model's response was blocked.
///
/// There are two underlying causes: the prompt was rejected before
/// generation (`prompt_feedback`), or a generated candidate was stopped for
/// safety (`candidate`). At least one of them is set.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{}", describe(.candidate, .prompt_feedback))]
pub struct BlockedError {
    /// The blocked candidate. Consult its finish reason and safety ratings.
    pub candidate: Option<Box<Candidate>>,
    /// Feedback explaining why the prompt was rejected.
    pub prompt_feedback: Option<PromptFeedback>,
}

impl BlockedError {
    /// The prompt was rejected.
    pub fn prompt(feedback: PromptFeedback) -> Self {
        Self {
            candidate: None,
            prompt_feedback: Some(feedback),
        }
    }

    /// A candidate was blocked.
    pub fn candidate(candidate: Candidate) -> Self {
        Self {
            candidate: Some(Box::new(candidate)),
            prompt_feedback: None,
        }
    }
}

fn describe(candidate: &Option<Box<Candidate>>, feedback: &Option<PromptFeedback>) -> String {
    let mut out = String::from("blocked: ");
    if let Some(candidate) = candidate {
        out.push_str(&format!("candidate: {}", candidate.finish_reason));
    }
    if let Some(feedback) = feedback {
        if candidate.is_some() {
            out.push_str(", ");
        }
        out.push_str(&format!(
            "prompt: {} ({})",
            feedback.block_reason, feedback.block_reason_message
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BlockReason, FinishReason};

    #[test]
    fn test_display_prompt() {
        let err = BlockedError::prompt(PromptFeedback {
            block_reason: BlockReason::Safety,
            block_reason_message: "unsafe prompt".to_string(),
            safety_ratings: vec![],
        });
        assert_eq!(err.to_string(), "blocked: prompt: SAFETY (unsafe prompt)");
    }

    #[test]
    fn test_display_candidate() {
        let err = BlockedError::candidate(Candidate {
            finish_reason: FinishReason::Safety,
            ..Default::default()
        });
        assert_eq!(err.to_string(), "blocked: candidate: SAFETY");
    }

    #[test]
    fn test_display_both() {
        let mut err = BlockedError::candidate(Candidate {
            finish_reason: FinishReason::Safety,
            ..Default::default()
        });
        err.prompt_feedback = Some(PromptFeedback {
            block_reason: BlockReason::Other,
            ..Default::default()
        });
        assert_eq!(err.to_string(), "blocked: candidate: SAFETY, prompt: OTHER ()");
    }

    #[test]
    fn test_is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(BlockedError::prompt(PromptFeedback {
            block_reason: BlockReason::Safety,
            ..Default::default()
        }));
        assert_eq!(err.to_string(), "blocked: prompt: SAFETY ()");
        assert!(err.source().is_none());
    }
}
