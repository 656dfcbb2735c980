//! Base trait for local tools.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;

/// A local capability the model can invoke by name.
///
/// Handlers receive already-parsed JSON arguments and return a string
/// result; they may perform local side effects (show a notification,
/// look something up). A handler failure is reported to the model as a
/// tool result, never propagated as a crash.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name used in function calls. Unique within a registry.
    fn name(&self) -> &str;

    /// Description of what the tool does.
    fn description(&self) -> &str;

    /// JSON Schema for tool parameters.
    fn parameters(&self) -> serde_json::Value;

    /// Execute the tool with the given arguments.
    async fn execute(&self, args: HashMap<String, serde_json::Value>) -> Result<String>;

    /// Convert to the OpenAI function schema envelope. The parameter
    /// schema stays structured; it is never stringified.
    fn to_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name(),
                "description": self.description(),
                "parameters": self.parameters(),
            }
        })
    }
}

/// Pull a required string argument out of a tool-call argument map.
pub(crate) fn require_str<'a>(
    args: &'a HashMap<String, serde_json::Value>,
    key: &str,
) -> Result<&'a str> {
    args.get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| anyhow::anyhow!("missing required parameter: {}", key))
}
