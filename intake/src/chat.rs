//! Assistant conversation history.
//!
//! Append-only: messages are never edited after creation, ordering is
//! insertion order, and only an explicit session reset clears the log.

use serde::{Deserialize, Serialize};

use crate::ai::{ChatTurn, Suggestion, TurnRole};

#[cfg(test)]
#[path = "chat_test.rs"]
mod chat_test;

pub const GREETING: &str = "Hi! I'm the studio assistant. Tell me about the project you have in mind \
                            and I'll help you shape it, or ask me anything about how we work.";

/// Monotonic per-history message identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
    System,
}

/// A single conversation turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: Role,
    pub text: String,
    pub timestamp: i64,
    /// Only populated for `Role::Model`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<Suggestion>,
}

#[derive(Clone, Debug, Default)]
pub struct ChatHistory {
    messages: Vec<ChatMessage>,
    next_id: u64,
}

impl ChatHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A history opened with the assistant's greeting.
    #[must_use]
    pub fn with_greeting() -> Self {
        let mut history = Self::new();
        history.push(Role::Model, GREETING.to_owned(), Vec::new());
        history
    }

    /// Append a message and return its id. Suggestions on non-model
    /// messages are dropped.
    pub fn push(&mut self, role: Role, text: String, suggestions: Vec<Suggestion>) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        let suggestions = if role == Role::Model { suggestions } else { Vec::new() };
        self.messages.push(ChatMessage { id, role, text, timestamp: crate::now_ms(), suggestions });
        id
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    #[must_use]
    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Prior user/model turns in backend form. System notes are not sent.
    #[must_use]
    pub fn turns(&self) -> Vec<ChatTurn> {
        self.messages
            .iter()
            .filter_map(|m| match m.role {
                Role::User => Some(ChatTurn { role: TurnRole::User, text: m.text.clone() }),
                Role::Model => Some(ChatTurn { role: TurnRole::Model, text: m.text.clone() }),
                Role::System => None,
            })
            .collect()
    }

    /// One-paragraph recap of the conversation, used to prefill project
    /// notes. The greeting alone counts as no participation.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.messages.is_empty() {
            return "No conversation history available.".to_owned();
        }
        let user_messages: Vec<&ChatMessage> = self.messages.iter().filter(|m| m.role == Role::User).collect();
        match user_messages.last() {
            None => "User has not actively participated yet.".to_owned(),
            Some(last) => format!(
                "Session Summary: User exchanged {} messages. Last topic of interest appeared to be: \"{}\".",
                user_messages.len(),
                last.text
            ),
        }
    }

    /// Remove every message. Ids keep increasing across a clear.
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
