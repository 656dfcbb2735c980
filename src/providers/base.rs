//! Base chat provider interface and the wire-level message model.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Message role on the chat-completions wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// A single chat message, serialized directly into the OpenAI wire shape.
///
/// `tool_call_id` and `name` are set only on `role: tool` messages;
/// `tool_calls` only on the assistant message that requested them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<serde_json::Value>>,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::plain(Role::Assistant, content)
    }

    /// The assistant message carrying the model's tool-call requests,
    /// replayed back to the endpoint ahead of the tool results.
    pub fn assistant_tool_calls(content: Option<&str>, calls: &[ToolCallRequest]) -> Self {
        Self {
            role: Role::Assistant,
            content: content.unwrap_or_default().to_string(),
            tool_call_id: None,
            name: None,
            tool_calls: Some(calls.iter().map(ToolCallRequest::to_openai_json).collect()),
        }
    }

    /// A tool-result message answering one tool call.
    pub fn tool(
        tool_call_id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            role: Role::Tool,
            content: content.into(),
            tool_call_id: Some(tool_call_id.into()),
            name: Some(name.into()),
            tool_calls: None,
        }
    }

    fn plain(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_call_id: None,
            name: None,
            tool_calls: None,
        }
    }
}

/// A tool call requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub id: String,
    pub name: String,
    pub arguments: HashMap<String, serde_json::Value>,
}

impl ToolCallRequest {
    /// Convert to OpenAI function-call JSON format. The wire form carries
    /// `arguments` as a JSON-encoded string, not an object.
    pub fn to_openai_json(&self) -> serde_json::Value {
        serde_json::json!({
            "id": self.id,
            "type": "function",
            "function": {
                "name": self.name,
                "arguments": serde_json::to_string(&self.arguments)
                    .unwrap_or_else(|_| "{}".to_string()),
            }
        })
    }
}

/// Outcome of one completion call: either a text answer or the model's
/// decision to invoke tools (in request order).
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionResult {
    Text(String),
    ToolCalls(Vec<ToolCallRequest>),
}

/// Parsed response from a chat-completion endpoint.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCallRequest>,
    pub finish_reason: String,
}

impl ChatResponse {
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }

    /// Collapse into the tagged result the orchestrator branches on.
    /// Tool calls win over any text content that accompanies them.
    pub fn outcome(&self) -> CompletionResult {
        if self.has_tool_calls() {
            CompletionResult::ToolCalls(self.tool_calls.clone())
        } else {
            CompletionResult::Text(self.content.clone().unwrap_or_default())
        }
    }
}

/// Sampling parameters for a completion request.
#[derive(Debug, Clone, Copy)]
pub struct SamplingParams {
    pub temperature: f64,
    pub max_tokens: u32,
}

impl SamplingParams {
    /// Clamp temperature into `[0, 2]` and max_tokens to at least 1.
    /// Out-of-range config values become usable requests instead of errors.
    pub fn new(temperature: f64, max_tokens: u32) -> Self {
        Self {
            temperature: temperature.clamp(0.0, 2.0),
            max_tokens: max_tokens.max(1),
        }
    }
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 800,
        }
    }
}

/// Abstract chat-completion provider.
///
/// One implementation talks to real OpenAI-compatible endpoints; tests
/// substitute a scripted mock. Exactly one outbound request per call.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Send a chat completion request.
    ///
    /// # Arguments
    /// * `messages` - Ordered conversation messages.
    /// * `tools` - Optional tool definitions in OpenAI function format.
    /// * `sampling` - Temperature and output-token cap.
    async fn complete(
        &self,
        messages: &[Message],
        tools: Option<&[serde_json::Value]>,
        sampling: &SamplingParams,
    ) -> Result<ChatResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_omits_tool_fields() {
        let msg = Message::user("hi");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "hi");
        assert!(json.get("tool_call_id").is_none());
        assert!(json.get("name").is_none());
        assert!(json.get("tool_calls").is_none());
    }

    #[test]
    fn test_tool_message_carries_call_id_and_name() {
        let msg = Message::tool("call_1", "notify", "Notification displayed");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "tool");
        assert_eq!(json["tool_call_id"], "call_1");
        assert_eq!(json["name"], "notify");
    }

    #[test]
    fn test_to_openai_json_stringifies_arguments() {
        let call = ToolCallRequest {
            id: "call_1".into(),
            name: "get_current_weather".into(),
            arguments: HashMap::from([(
                "location".to_string(),
                serde_json::Value::String("Paris".into()),
            )]),
        };
        let json = call.to_openai_json();
        assert_eq!(json["type"], "function");
        assert_eq!(json["function"]["name"], "get_current_weather");
        let args = json["function"]["arguments"].as_str().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(args).unwrap();
        assert_eq!(parsed["location"], "Paris");
    }

    #[test]
    fn test_assistant_tool_calls_message_shape() {
        let calls = vec![ToolCallRequest {
            id: "call_1".into(),
            name: "notify".into(),
            arguments: HashMap::new(),
        }];
        let msg = Message::assistant_tool_calls(None, &calls);
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.content, "");
        assert_eq!(msg.tool_calls.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn test_outcome_prefers_tool_calls() {
        let resp = ChatResponse {
            content: Some("thinking".into()),
            tool_calls: vec![ToolCallRequest {
                id: "1".into(),
                name: "notify".into(),
                arguments: HashMap::new(),
            }],
            finish_reason: "tool_calls".into(),
        };
        assert!(matches!(resp.outcome(), CompletionResult::ToolCalls(c) if c.len() == 1));
    }

    #[test]
    fn test_outcome_text_when_no_calls() {
        let resp = ChatResponse {
            content: Some("Hello!".into()),
            tool_calls: Vec::new(),
            finish_reason: "stop".into(),
        };
        assert_eq!(resp.outcome(), CompletionResult::Text("Hello!".into()));
    }

    #[test]
    fn test_sampling_params_clamped() {
        let s = SamplingParams::new(5.0, 0);
        assert_eq!(s.temperature, 2.0);
        assert_eq!(s.max_tokens, 1);

        let s = SamplingParams::new(-1.0, 800);
        assert_eq!(s.temperature, 0.0);
        assert_eq!(s.max_tokens, 800);
    }
}
