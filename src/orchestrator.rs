//! The two-phase tool-calling round trip.
//!
//! State machine: first completion → done on a text answer, or dispatch of
//! every requested tool call followed by exactly one second completion.
//! The depth is fixed at two phases; tool results never trigger further
//! tool execution.

use anyhow::Result;
use tracing::{debug, warn};

use crate::errors::DispatchError;
use crate::providers::base::{ChatProvider, CompletionResult, Message, SamplingParams};
use crate::tools::registry::ToolRegistry;

/// Drive one round trip from an encoded message list to the final text.
///
/// Phase 1 declares the registry's tools. If the model answers with text,
/// that text is final and nothing is dispatched. If it requests tool calls,
/// every call is dispatched in request order; a call naming an unknown tool
/// becomes an error-content tool message and the round trip proceeds with
/// partial results. Phase 2 declares no tools, and its text is final even
/// if the response asks for more tools.
///
/// Transport and malformed-response errors abort the round trip and
/// propagate to the caller.
pub async fn run_round_trip(
    provider: &dyn ChatProvider,
    registry: &ToolRegistry,
    mut messages: Vec<Message>,
    sampling: &SamplingParams,
) -> Result<String> {
    let definitions = registry.definitions();
    let tools = (!definitions.is_empty()).then_some(definitions.as_slice());

    let first = provider.complete(&messages, tools, sampling).await?;
    let calls = match first.outcome() {
        CompletionResult::Text(text) => return Ok(text),
        CompletionResult::ToolCalls(calls) => calls,
    };

    debug!("model requested {} tool call(s)", calls.len());
    messages.push(Message::assistant_tool_calls(first.content.as_deref(), &calls));

    for call in &calls {
        let result = match registry.dispatch(call).await {
            Ok(msg) => msg,
            Err(DispatchError::UnknownTool(name)) => {
                warn!("model requested unknown tool '{}'", name);
                Message::tool(&call.id, &call.name, format!("Error: unknown tool '{}'", name))
            }
        };
        messages.push(result);
    }

    let second = provider.complete(&messages, None, sampling).await?;
    if second.has_tool_calls() {
        warn!(
            "second completion requested {} further tool call(s); \
             the protocol is fixed at two phases, not dispatching",
            second.tool_calls.len()
        );
    }
    Ok(second.content.unwrap_or_default())
}
