//! LLM Provider trait and types
//!
//! Defines the common interface for chat-completion backends

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error types for LLM operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LlmError {
    /// Provider not reachable (e.g., Ollama not running)
    ProviderUnavailable(String),
    /// API key missing or rejected
    AuthenticationFailed(String),
    /// Request failed (non-success status, timeout, etc.)
    RequestFailed(String),
    /// Response body did not contain a usable completion
    InvalidResponse(String),
    /// Client could not be constructed
    Configuration(String),
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmError::ProviderUnavailable(msg) => write!(f, "Provider unavailable: {}", msg),
            LlmError::AuthenticationFailed(msg) => write!(f, "Authentication failed: {}", msg),
            LlmError::RequestFailed(msg) => write!(f, "Request failed: {}", msg),
            LlmError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
            LlmError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for LlmError {}

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
}

/// A message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Request for text completion/generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// Conversation messages
    pub messages: Vec<Message>,
    /// Temperature for sampling (0.0 = deterministic, 1.0+ = creative)
    pub temperature: Option<f32>,
}

impl Default for CompletionRequest {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            temperature: Some(0.7),
        }
    }
}

impl CompletionRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            ..Default::default()
        }
    }

    /// Single-turn exchange: one system instruction, one user message
    pub fn with_system_and_user(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self::new(vec![Message::system(system), Message::user(user)])
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Response from a completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Generated text content
    pub content: String,
    /// Model that generated the response
    pub model: String,
    /// Number of tokens in the prompt
    pub prompt_tokens: Option<u32>,
    /// Number of tokens generated
    pub completion_tokens: Option<u32>,
    /// Finish reason (stop, length, etc.)
    pub finish_reason: Option<String>,
}

/// The trait every chat backend implements
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Get the provider name (e.g., "openai-compatible")
    fn provider_name(&self) -> &'static str;

    /// Model the provider sends requests to
    fn model(&self) -> &str;

    /// Check that the backend answers; returns the models it advertises
    async fn check_connection(&self) -> Result<Vec<String>, LlmError>;

    /// Run a completion request (non-streaming)
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}
