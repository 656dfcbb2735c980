//! Domain error types for nanochat.
//!
//! Typed errors at module boundaries replace string-encoded errors and
//! enable structured error handling via pattern matching. A completion
//! failure must never be folded into the conversation as if it were
//! assistant text; callers render it as a distinct failure.

use thiserror::Error;

/// Errors from the chat-completion client.
///
/// Embedded in `anyhow::Error` so the `ChatProvider` trait signature
/// (`-> anyhow::Result<ChatResponse>`) stays unchanged while callers
/// can downcast: `e.downcast_ref::<ProviderError>()`.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The request could not be sent or the response body could not be read.
    #[error("HTTP request failed: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success status code.
    #[error("completion endpoint returned status {status}: {message}")]
    HttpStatus { status: u16, message: String },

    /// The response body could not be parsed into either a text answer
    /// or a list of tool calls.
    #[error("malformed completion response: {0}")]
    MalformedResponse(String),
}

/// Errors from dispatching a model-requested tool call.
///
/// A handler that runs and fails is *not* a dispatch error; its failure is
/// folded into the tool-result message so the model can react to it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The model requested a tool that is absent from the registry.
    #[error("unknown tool: {0}")]
    UnknownTool(String),
}
