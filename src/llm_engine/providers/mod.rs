//! LLM Provider implementations
//!
//! Each provider implements the LlmProvider trait for a specific backend

pub mod openai_compatible;

pub use openai_compatible::{OpenAiCompatibleConfig, OpenAiCompatibleProvider};
