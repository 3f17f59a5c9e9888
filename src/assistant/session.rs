//! Session client — turns the message log into one backend call.
//!
//! Stateless: every call receives the full prior history and the new user
//! message, so the backend never needs session affinity and the log stays
//! the single source of truth for conversation order.

use std::sync::Arc;

use tracing::info;

use super::log::{ChatTurn, Role};
use super::{AssistantConfig, EMPTY_REPLY, SYSTEM_INSTRUCTION};
use crate::llm::LlmChat;
use crate::llm::types::{LlmError, Message};

pub struct SessionClient {
    llm: Arc<dyn LlmChat>,
    max_tokens: u32,
    history_limit: usize,
}

impl SessionClient {
    #[must_use]
    pub fn new(llm: Arc<dyn LlmChat>, config: &AssistantConfig) -> Self {
        Self { llm, max_tokens: config.max_tokens, history_limit: config.history_limit }
    }

    /// Ask the backend for the reply to `new_message`, given every turn that
    /// preceded it.
    ///
    /// An empty or text-less backend answer becomes [`EMPTY_REPLY`]; callers
    /// never receive an empty string.
    ///
    /// # Errors
    ///
    /// Returns the backend's [`LlmError`] unchanged; the fallback policy
    /// decides how the user sees it.
    pub async fn next_reply(&self, history: &[ChatTurn], new_message: &str) -> Result<String, LlmError> {
        let messages = build_messages(history, new_message, self.history_limit);
        let response = self
            .llm
            .chat(self.max_tokens, SYSTEM_INSTRUCTION, &messages)
            .await?;

        info!(
            model = %response.model,
            stop_reason = %response.stop_reason,
            context_turns = messages.len() - 1,
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            "assistant: backend reply"
        );

        Ok(response.text().unwrap_or_else(|| EMPTY_REPLY.to_string()))
    }
}

/// Build the backend conversation: the most recent `history_limit` prior
/// turns, minus any leading assistant turns, followed by the new prompt.
///
/// Dropping leading assistant turns (the seeded greeting) keeps the context
/// starting with a user turn; Gemini rejects a conversation that opens
/// with a model turn.
pub(crate) fn build_messages(history: &[ChatTurn], new_message: &str, history_limit: usize) -> Vec<Message> {
    let start = history.len().saturating_sub(history_limit);
    let mut messages: Vec<Message> = history[start..]
        .iter()
        .skip_while(|turn| turn.role == Role::Assistant)
        .map(|turn| match turn.role {
            Role::User => Message::user(turn.text.clone()),
            Role::Assistant => Message::assistant(turn.text.clone()),
        })
        .collect();
    messages.push(Message::user(new_message));
    messages
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
