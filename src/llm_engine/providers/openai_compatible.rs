//! OpenAI-compatible chat completions provider
//!
//! Talks to any server exposing `/v1/chat/completions`. The default points at
//! a local Ollama instance (`http://127.0.0.1:11434/v1`), which ignores the
//! API key but still expects one to be sent.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::llm_engine::provider::{
    CompletionRequest, CompletionResponse, LlmError, LlmProvider, Message,
};

/// Chat request body
#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Chat response body
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: Option<u32>,
    #[serde(default)]
    completion_tokens: Option<u32>,
}

/// `/models` listing
#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
}

/// Provider configuration
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleConfig {
    /// Base URL including the `/v1` suffix
    pub base_url: String,
    /// Bearer token; Ollama accepts any placeholder
    pub api_key: String,
    /// Model name requested on every call
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for OpenAiCompatibleConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:11434/v1".to_string(),
            api_key: "ollama".to_string(),
            model: "llama3.2".to_string(),
            timeout_secs: 300,
        }
    }
}

pub struct OpenAiCompatibleProvider {
    config: OpenAiCompatibleConfig,
    client: Client,
}

impl OpenAiCompatibleProvider {
    pub fn new(config: OpenAiCompatibleConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn transport_error(&self, e: reqwest::Error) -> LlmError {
        if e.is_connect() || e.is_timeout() {
            LlmError::ProviderUnavailable(format!(
                "Cannot reach {}: {}",
                self.config.base_url, e
            ))
        } else {
            LlmError::RequestFailed(e.to_string())
        }
    }

    async fn status_error(response: reqwest::Response) -> LlmError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                LlmError::AuthenticationFailed(format!("{}: {}", status, body))
            }
            _ => LlmError::RequestFailed(format!("Server returned {}: {}", status, body)),
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn provider_name(&self) -> &'static str {
        "openai-compatible"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn check_connection(&self) -> Result<Vec<String>, LlmError> {
        let response = self
            .client
            .get(self.endpoint("models"))
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        let models: ModelList = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        Ok(models.data.into_iter().map(|m| m.id).collect())
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = ChatCompletionRequest {
            model: &self.config.model,
            messages: &request.messages,
            stream: false,
            temperature: request.temperature,
        };

        let response = self
            .client
            .post(self.endpoint("chat/completions"))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let (prompt_tokens, completion_tokens) = parsed
            .usage
            .map(|u| (u.prompt_tokens, u.completion_tokens))
            .unwrap_or((None, None));

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("response contained no choices".to_string()))?;

        let content = choice
            .message
            .content
            .ok_or_else(|| LlmError::InvalidResponse("choice had no message content".to_string()))?;

        Ok(CompletionResponse {
            content,
            model: parsed.model.unwrap_or_else(|| self.config.model.clone()),
            prompt_tokens,
            completion_tokens,
            finish_reason: choice.finish_reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider_for(server: &MockServer) -> OpenAiCompatibleProvider {
        OpenAiCompatibleProvider::new(OpenAiCompatibleConfig {
            base_url: format!("{}/v1", server.uri()),
            timeout_secs: 5,
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_complete_sends_single_turn_and_reads_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer ollama"))
            .and(body_partial_json(json!({
                "model": "llama3.2",
                "temperature": 0.1,
                "stream": false,
                "messages": [
                    {"role": "system", "content": "explain"},
                    {"role": "user", "content": "The lessee shall indemnify."}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": "llama3.2",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "**1. Simplified Summary:** You pay."},
                    "finish_reason": "stop"
                }],
                "usage": {"prompt_tokens": 12, "completion_tokens": 7, "total_tokens": 19}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider_for(&server);
        let request =
            CompletionRequest::with_system_and_user("explain", "The lessee shall indemnify.")
                .temperature(0.1);
        let response = provider.complete(request).await.unwrap();

        assert_eq!(response.content, "**1. Simplified Summary:** You pay.");
        assert_eq!(response.model, "llama3.2");
        assert_eq!(response.prompt_tokens, Some(12));
        assert_eq!(response.completion_tokens, Some(7));
        assert_eq!(response.finish_reason.as_deref(), Some("stop"));
    }

    #[tokio::test]
    async fn test_complete_maps_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .complete(CompletionRequest::with_system_and_user("s", "u"))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::AuthenticationFailed(_)));
    }

    #[tokio::test]
    async fn test_complete_rejects_empty_choices() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .complete(CompletionRequest::with_system_and_user("s", "u"))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_provider_unavailable() {
        let provider = OpenAiCompatibleProvider::new(OpenAiCompatibleConfig {
            base_url: "http://127.0.0.1:9/v1".to_string(),
            timeout_secs: 5,
            ..Default::default()
        })
        .unwrap();

        let err = provider
            .complete(CompletionRequest::with_system_and_user("s", "u"))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::ProviderUnavailable(_)));
    }

    #[tokio::test]
    async fn test_check_connection_lists_models() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "list",
                "data": [{"id": "llama3.2", "object": "model"}, {"id": "qwen2.5"}]
            })))
            .mount(&server)
            .await;

        let models = provider_for(&server).check_connection().await.unwrap();
        assert_eq!(models, vec!["llama3.2".to_string(), "qwen2.5".to_string()]);
    }

    #[test]
    fn test_endpoint_tolerates_trailing_slash() {
        let provider = OpenAiCompatibleProvider::new(OpenAiCompatibleConfig {
            base_url: "http://localhost:11434/v1/".to_string(),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            provider.endpoint("chat/completions"),
            "http://localhost:11434/v1/chat/completions"
        );
    }
}
