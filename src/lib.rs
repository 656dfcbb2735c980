//! nanochat — a minimal tool-calling chat client.
//!
//! Drives the bounded two-phase round trip against any OpenAI-compatible
//! chat-completion endpoint: encode history, complete with declared tools,
//! dispatch every requested tool call through the registry, complete once
//! more with the results, return the final text.

pub mod cli;
pub mod config;
pub mod errors;
pub mod history;
pub mod orchestrator;
pub mod providers;
pub mod session;
pub mod tools;

pub use errors::{DispatchError, ProviderError};
pub use history::Turn;
pub use orchestrator::run_round_trip;
pub use providers::{ChatProvider, ChatResponse, CompletionResult, Message, SamplingParams, ToolCallRequest};
pub use session::ChatSession;
pub use tools::{Tool, ToolRegistry};
