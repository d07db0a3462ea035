//! LLM Engine module for legal-text simplification
//!
//! The chat backend is reached through the OpenAI-compatible API, which
//! covers a local Ollama server as well as hosted endpoints.

pub mod provider;
pub mod providers;

pub use provider::{
    CompletionRequest, CompletionResponse, LlmError, LlmProvider, Message, MessageRole,
};
pub use providers::{OpenAiCompatibleConfig, OpenAiCompatibleProvider};
