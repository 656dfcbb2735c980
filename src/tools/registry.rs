//! Tool registry and dispatch.
//!
//! A lookup table from tool name to handler replaces chained name
//! comparisons: O(1) dispatch, and new tools register without touching
//! the orchestrator.

use futures_util::FutureExt;
use tracing::warn;

use std::collections::HashMap;

use super::base::Tool;
use crate::errors::DispatchError;
use crate::providers::base::{Message, ToolCallRequest};

/// Registry of local tools, populated at startup and immutable afterwards.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new, empty registry.
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool. Replaces any existing tool with the same name.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Get a reference to a tool by name.
    pub fn get(&self, name: &str) -> Option<&dyn Tool> {
        self.tools.get(name).map(|t| t.as_ref())
    }

    /// Check if a tool is registered.
    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Registered tool names, sorted for stable output.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// All tool definitions in OpenAI function format.
    pub fn definitions(&self) -> Vec<serde_json::Value> {
        self.names()
            .iter()
            .filter_map(|name| self.tools.get(*name))
            .map(|tool| tool.to_schema())
            .collect()
    }

    /// Execute one model-requested tool call and wrap the outcome in a
    /// tool-result message.
    ///
    /// A name absent from the registry is a [`DispatchError::UnknownTool`],
    /// never a silent no-op. A handler that fails (or panics; the future is
    /// run under `catch_unwind`) still yields a tool message carrying a
    /// failure description, so the model can react to it in the second
    /// completion.
    pub async fn dispatch(&self, call: &ToolCallRequest) -> Result<Message, DispatchError> {
        let tool = self
            .tools
            .get(&call.name)
            .ok_or_else(|| DispatchError::UnknownTool(call.name.clone()))?;

        let fut = std::panic::AssertUnwindSafe(tool.execute(call.arguments.clone()));
        let content = match fut.catch_unwind().await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                warn!("tool '{}' failed: {:#}", call.name, e);
                format!("Error: tool '{}' failed: {:#}", call.name, e)
            }
            Err(_) => {
                warn!("tool '{}' panicked during execution", call.name);
                format!("Error: tool '{}' panicked during execution", call.name)
            }
        };

        Ok(Message::tool(&call.id, &call.name, content))
    }
}
