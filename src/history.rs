//! Conversation turns and their encoding into provider messages.

use serde::{Deserialize, Serialize};

use crate::providers::base::Message;

/// One user message and its assistant reply (pending until the round
/// trip completes).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub user_text: String,
    #[serde(default)]
    pub assistant_text: Option<String>,
}

impl Turn {
    /// A turn whose reply has not arrived yet.
    pub fn pending(user_text: impl Into<String>) -> Self {
        Self {
            user_text: user_text.into(),
            assistant_text: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.assistant_text.is_some()
    }
}

/// Encode a history of turns plus a new user message into an ordered
/// message list.
///
/// Per turn: a user message, then an assistant message only when the reply
/// is present. No system message is prepended; callers that need one supply
/// it as an explicit first element. Pure function, no side effects.
pub fn encode(history: &[Turn], new_message: &str) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() * 2 + 1);
    for turn in history {
        messages.push(Message::user(&turn.user_text));
        if let Some(reply) = &turn.assistant_text {
            messages.push(Message::assistant(reply));
        }
    }
    messages.push(Message::user(new_message));
    messages
}
