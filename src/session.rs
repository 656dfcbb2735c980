//! In-memory conversation session.
//!
//! History is an explicit value owned by the session, created per session
//! and cleared on an explicit reset. Nothing here is process-global.

use anyhow::Result;
use tracing::debug;

use crate::history::{self, Turn};
use crate::orchestrator::run_round_trip;
use crate::providers::base::{ChatProvider, Message, SamplingParams};
use crate::tools::registry::ToolRegistry;

/// A conversation session: optional system prompt plus the turn history.
#[derive(Default)]
pub struct ChatSession {
    system_prompt: Option<String>,
    turns: Vec<Turn>,
}

impl ChatSession {
    /// Create a new, empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session whose encoded history always starts with the given
    /// system message.
    pub fn with_system_prompt(prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: Some(prompt.into()),
            turns: Vec::new(),
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Clear the conversation history. The system prompt survives a reset.
    pub fn clear(&mut self) {
        self.turns.clear();
    }

    /// Send one user message through a full round trip and record the
    /// completed turn.
    ///
    /// The pending turn is appended before the round trip and removed again
    /// on failure, so the history never holds a half-completed exchange.
    pub async fn send(
        &mut self,
        provider: &dyn ChatProvider,
        registry: &ToolRegistry,
        text: &str,
        sampling: &SamplingParams,
    ) -> Result<String> {
        let mut messages = Vec::new();
        if let Some(prompt) = &self.system_prompt {
            messages.push(Message::system(prompt));
        }
        messages.extend(history::encode(&self.turns, text));

        self.turns.push(Turn::pending(text));
        match run_round_trip(provider, registry, messages, sampling).await {
            Ok(reply) => {
                debug!("round trip complete ({} chars)", reply.len());
                if let Some(turn) = self.turns.last_mut() {
                    turn.assistant_text = Some(reply.clone());
                }
                Ok(reply)
            }
            Err(e) => {
                self.turns.pop();
                Err(e)
            }
        }
    }
}
