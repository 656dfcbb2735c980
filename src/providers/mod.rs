//! Chat-completion providers.

pub mod base;
pub mod openai_compat;

pub use base::{ChatProvider, ChatResponse, CompletionResult, Message, Role, SamplingParams, ToolCallRequest};
pub use openai_compat::OpenAICompatClient;
