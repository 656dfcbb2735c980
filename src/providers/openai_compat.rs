//! OpenAI-compatible chat-completions client.
//!
//! Talks to any endpoint implementing the OpenAI chat completions format:
//! the hosted API, OpenRouter, or local servers (Ollama, llama-server,
//! LM Studio, vLLM). Failures surface as typed [`ProviderError`]s; they are
//! never rewritten into assistant text.

use std::collections::HashMap;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use super::base::{ChatProvider, ChatResponse, Message, SamplingParams, ToolCallRequest};
use crate::errors::ProviderError;

/// How long one completion request may block before the transport gives up.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// A [`ChatProvider`] backed by an OpenAI-compatible HTTP endpoint.
pub struct OpenAICompatClient {
    api_key: String,
    api_base: String,
    model: String,
    client: Client,
}

impl OpenAICompatClient {
    /// Create a new client. `api_key` may be empty for local servers that
    /// do not check authentication.
    pub fn new(api_key: &str, api_base: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client: Client::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }
}

#[async_trait]
impl ChatProvider for OpenAICompatClient {
    async fn complete(
        &self,
        messages: &[Message],
        tools: Option<&[serde_json::Value]>,
        sampling: &SamplingParams,
    ) -> Result<ChatResponse> {
        let url = format!("{}/chat/completions", self.api_base);

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": sampling.temperature,
            "max_tokens": sampling.max_tokens,
        });
        if let Some(tool_defs) = tools {
            if !tool_defs.is_empty() {
                body["tools"] = serde_json::Value::Array(tool_defs.to_vec());
                body["tool_choice"] = serde_json::json!("auto");
            }
        }

        debug!(
            "complete: base={} model={} messages={} tools={}",
            self.api_base,
            self.model,
            messages.len(),
            tools.map_or(0, <[serde_json::Value]>::len),
        );

        let mut request = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .timeout(REQUEST_TIMEOUT)
            .json(&body);
        if !self.api_key.is_empty() {
            request = request.header("Authorization", format!("Bearer {}", self.api_key));
        }

        let response = request.send().await.map_err(|e| {
            warn!("HTTP request to {} failed: {}", url, e);
            ProviderError::Transport(e.to_string())
        })?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| ProviderError::Transport(format!("failed to read body: {}", e)))?;

        if !status.is_success() {
            warn!(
                "completion endpoint returned status {} (base={}): {}",
                status, self.api_base, response_text
            );
            return Err(ProviderError::HttpStatus {
                status: status.as_u16(),
                message: response_text,
            }
            .into());
        }

        let data: serde_json::Value = serde_json::from_str(&response_text)
            .map_err(|e| ProviderError::MalformedResponse(format!("invalid JSON: {}", e)))?;

        Ok(parse_response(&data)?)
    }
}

/// Parse a chat-completions response body into a [`ChatResponse`].
///
/// Accepts `function.arguments` both as a JSON-encoded string (the OpenAI
/// wire form) and as an inline object (some local servers send it decoded).
fn parse_response(data: &serde_json::Value) -> Result<ChatResponse, ProviderError> {
    let message = data
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|arr| arr.first())
        .and_then(|choice| choice.get("message"))
        .ok_or_else(|| ProviderError::MalformedResponse("no choices[0].message".into()))?;

    let finish_reason = data["choices"][0]
        .get("finish_reason")
        .and_then(|v| v.as_str())
        .unwrap_or("stop")
        .to_string();

    let content = message
        .get("content")
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string());

    let mut tool_calls = Vec::new();
    if let Some(calls) = message.get("tool_calls").and_then(|v| v.as_array()) {
        for call in calls {
            tool_calls.push(parse_tool_call(call)?);
        }
    }

    if content.is_none() && tool_calls.is_empty() {
        return Err(ProviderError::MalformedResponse(
            "message carries neither content nor tool_calls".into(),
        ));
    }

    Ok(ChatResponse {
        content,
        tool_calls,
        finish_reason,
    })
}

fn parse_tool_call(call: &serde_json::Value) -> Result<ToolCallRequest, ProviderError> {
    let id = call
        .get("id")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ProviderError::MalformedResponse("tool call without id".into()))?;
    let function = call
        .get("function")
        .ok_or_else(|| ProviderError::MalformedResponse("tool call without function".into()))?;
    let name = function
        .get("name")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ProviderError::MalformedResponse("tool call without name".into()))?;

    let arguments = match function.get("arguments") {
        None | Some(serde_json::Value::Null) => HashMap::new(),
        Some(serde_json::Value::String(raw)) if raw.trim().is_empty() => HashMap::new(),
        Some(serde_json::Value::String(raw)) => serde_json::from_str(raw).map_err(|e| {
            ProviderError::MalformedResponse(format!(
                "tool call '{}' arguments are not a JSON object: {}",
                name, e
            ))
        })?,
        Some(serde_json::Value::Object(map)) => map.clone().into_iter().collect(),
        Some(other) => {
            return Err(ProviderError::MalformedResponse(format!(
                "tool call '{}' arguments have unexpected type: {}",
                name, other
            )))
        }
    };

    Ok(ToolCallRequest {
        id: id.to_string(),
        name: name.to_string(),
        arguments,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_text_response() {
        let data = json!({
            "choices": [{
                "message": {"role": "assistant", "content": "Hello!"},
                "finish_reason": "stop"
            }]
        });
        let resp = parse_response(&data).unwrap();
        assert_eq!(resp.content.as_deref(), Some("Hello!"));
        assert!(resp.tool_calls.is_empty());
        assert_eq!(resp.finish_reason, "stop");
    }

    #[test]
    fn test_parse_tool_calls_with_string_arguments() {
        let data = json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {
                            "name": "get_current_weather",
                            "arguments": "{\"location\": \"Paris\"}"
                        }
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        });
        let resp = parse_response(&data).unwrap();
        assert_eq!(resp.tool_calls.len(), 1);
        assert_eq!(resp.tool_calls[0].id, "call_1");
        assert_eq!(resp.tool_calls[0].name, "get_current_weather");
        assert_eq!(
            resp.tool_calls[0].arguments.get("location").unwrap(),
            "Paris"
        );
    }

    #[test]
    fn test_parse_tool_calls_with_inline_object_arguments() {
        let data = json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "tool_calls": [{
                        "id": "call_1",
                        "function": {
                            "name": "notify",
                            "arguments": {"title": "hi", "message": "there"}
                        }
                    }]
                },
                "finish_reason": "tool_calls"
            }]
        });
        let resp = parse_response(&data).unwrap();
        assert_eq!(resp.tool_calls[0].arguments.get("title").unwrap(), "hi");
    }

    #[test]
    fn test_parse_preserves_call_order() {
        let data = json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "tool_calls": [
                        {"id": "a", "function": {"name": "first", "arguments": "{}"}},
                        {"id": "b", "function": {"name": "second", "arguments": "{}"}},
                        {"id": "c", "function": {"name": "third", "arguments": "{}"}}
                    ]
                }
            }]
        });
        let resp = parse_response(&data).unwrap();
        let names: Vec<_> = resp.tool_calls.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["first", "second", "third"]);
    }

    #[test]
    fn test_parse_no_choices_is_malformed() {
        let err = parse_response(&json!({"choices": []})).unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_empty_message_is_malformed() {
        let data = json!({
            "choices": [{"message": {"role": "assistant", "content": ""}}]
        });
        let err = parse_response(&data).unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_broken_argument_string_is_malformed() {
        let data = json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "tool_calls": [{
                        "id": "call_1",
                        "function": {"name": "notify", "arguments": "{not json"}
                    }]
                }
            }]
        });
        let err = parse_response(&data).unwrap_err();
        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }

    #[test]
    fn test_parse_empty_argument_string_yields_empty_map() {
        let data = json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "tool_calls": [{
                        "id": "call_1",
                        "function": {"name": "notify", "arguments": ""}
                    }]
                }
            }]
        });
        let resp = parse_response(&data).unwrap();
        assert!(resp.tool_calls[0].arguments.is_empty());
    }

    #[test]
    fn test_client_strips_trailing_slash() {
        let client = OpenAICompatClient::new("sk-test", "http://localhost:11434/v1/", "phi4");
        assert_eq!(client.api_base(), "http://localhost:11434/v1");
        assert_eq!(client.model(), "phi4");
    }
}
