//! Message log — ordered, append-only chat history.
//!
//! Insertion order is conversation order. Turns are never edited or removed
//! individually; the only bulk operation is [`MessageLog::reset_to`], used
//! when the session ends.

use serde::{Deserialize, Serialize};

/// Author of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in the conversation. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
}

impl ChatTurn {
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Role::User, text: text.into() }
    }

    #[must_use]
    pub fn assistant(text: impl Into<String>) -> Self {
        Self { role: Role::Assistant, text: text.into() }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    turns: Vec<ChatTurn>,
}

impl MessageLog {
    /// A log holding a single seed turn (e.g. the assistant greeting).
    #[must_use]
    pub fn seeded(seed: ChatTurn) -> Self {
        Self { turns: vec![seed] }
    }

    pub fn append(&mut self, turn: ChatTurn) {
        self.turns.push(turn);
    }

    /// Owned snapshot of every turn in order. Later appends do not affect it.
    #[must_use]
    pub fn all(&self) -> Vec<ChatTurn> {
        self.turns.clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Drop all turns and start over from `seed`.
    pub fn reset_to(&mut self, seed: ChatTurn) {
        self.turns.clear();
        self.turns.push(seed);
    }
}

#[cfg(test)]
#[path = "log_test.rs"]
mod tests;
