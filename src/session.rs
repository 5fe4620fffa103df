//! Multi-turn chat sessions.
//!
//! A [`ChatSession`] keeps the conversation so far and sends all of it with
//! each new message. The model's reply is appended once its stream has ended
//! cleanly.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::json;

use crate::client::GenerativeModel;
use crate::error::VertexResult;
use crate::streaming::ResponseIterator;
use crate::types::{Candidate, Content, GenerateContentResponse, Part, Role};

/// Receives the merged candidates of a stream that ended cleanly.
///
/// A [`ResponseIterator`] calls this at most once, and only when at least one
/// chunk was accepted.
pub trait HistorySink: Send + Sync {
    /// Record the final candidates of a completed call.
    fn add_to_history(&self, candidates: &[Candidate]);
}

/// Shared, append-only conversation history.
///
/// Clones share the same underlying list.
#[derive(Debug, Clone, Default)]
pub struct ChatHistory {
    turns: Arc<Mutex<Vec<Content>>>,
}

impl ChatHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn.
    pub fn push(&self, content: Content) {
        self.lock().push(content);
    }

    /// Copy of every turn recorded so far.
    pub fn snapshot(&self) -> Vec<Content> {
        self.lock().clone()
    }

    /// Number of recorded turns.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Content>> {
        self.turns.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl HistorySink for ChatHistory {
    fn add_to_history(&self, candidates: &[Candidate]) {
        // Only the first candidate continues the conversation.
        let Some(content) = candidates.first().and_then(|c| c.content.clone()) else {
            tracing::debug!("Completed call has no candidate content; history unchanged");
            return;
        };

        self.push(Content {
            role: Some(Role::Model),
            ..content
        });
    }
}

/// A conversation with a generative model.
///
/// # Example
///
/// ```no_run
/// use integrations_vertexai::{Part, VertexClient};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = VertexClient::from_env()?;
/// let mut chat = client.generative_model("gemini-pro").start_chat();
///
/// let reply = chat.send_message(vec![Part::text("Name a blue thing.")]).await?;
/// println!("{}", reply.text().unwrap_or_default());
///
/// let reply = chat.send_message(vec![Part::text("Another one?")]).await?;
/// println!("{}", reply.text().unwrap_or_default());
/// assert_eq!(chat.history().len(), 4);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ChatSession {
    model: GenerativeModel,
    history: ChatHistory,
}

impl ChatSession {
    pub(crate) fn new(model: GenerativeModel) -> Self {
        Self {
            model,
            history: ChatHistory::new(),
        }
    }

    /// Send a message and wait for the merged reply.
    ///
    /// On success the reply has already been added to the history.
    pub async fn send_message(&mut self, parts: Vec<Part>) -> VertexResult<GenerateContentResponse> {
        self.send_message_stream(parts).await.collect_merged().await
    }

    /// Send a message and stream the reply.
    ///
    /// The user turn is recorded immediately and stays in the history even if
    /// the call fails. The reply is recorded when the returned iterator
    /// reaches the end of the stream; a failed, blocked or abandoned call
    /// leaves no model turn behind.
    pub async fn send_message_stream(&mut self, parts: Vec<Part>) -> ResponseIterator {
        self.history.push(Content::user(parts));

        let mut config = self.model.generation_config.clone();
        config.candidate_count = Some(1);

        let contents = self.history.snapshot();
        self.model.logger().debug(
            "Sending chat message",
            json!({
                "model": self.model.name(),
                "turns": contents.len(),
            }),
        );

        self.model
            .stream_contents(contents, config)
            .await
            .with_history(Arc::new(self.history.clone()))
    }

    /// The conversation so far, oldest turn first.
    pub fn history(&self) -> Vec<Content> {
        self.history.snapshot()
    }

    /// The model this session talks to.
    pub fn model(&self) -> &GenerativeModel {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FinishReason;
    use pretty_assertions::assert_eq;

    fn candidate(index: i32, text: Option<&str>) -> Candidate {
        Candidate {
            index,
            content: text.map(|t| Content {
                role: None,
                parts: vec![Part::text(t)],
            }),
            finish_reason: FinishReason::Stop,
            ..Default::default()
        }
    }

    #[test]
    fn test_history_appends_first_candidate_as_model() {
        let history = ChatHistory::new();
        history.add_to_history(&[candidate(0, Some("first")), candidate(1, Some("second"))]);

        assert_eq!(history.snapshot(), vec![Content::model(vec![Part::text("first")])]);
    }

    #[test]
    fn test_history_skips_missing_content() {
        let history = ChatHistory::new();
        history.add_to_history(&[candidate(0, None)]);
        history.add_to_history(&[]);

        assert!(history.is_empty());
    }

    #[test]
    fn test_clones_share_turns() {
        let history = ChatHistory::new();
        let shared = history.clone();

        shared.push(Content::user(vec![Part::text("hi")]));

        assert_eq!(history.len(), 1);
    }
}
