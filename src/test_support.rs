//! In-process stand-ins for the three engines, used by unit and router tests

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::llm_engine::{CompletionRequest, CompletionResponse, LlmError, LlmProvider};
use crate::tts_engine::{SpeechError, SpeechSynthesizer};
use crate::whisper_engine::Transcriber;

/// Records each path it was asked to transcribe and whether the file existed
pub struct FakeTranscriber {
    result: Result<String, String>,
    calls: Arc<Mutex<Vec<(PathBuf, bool)>>>,
}

impl FakeTranscriber {
    pub fn returning(text: &str) -> Self {
        Self {
            result: Ok(text.to_string()),
            calls: Arc::default(),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> Arc<Mutex<Vec<(PathBuf, bool)>>> {
        self.calls.clone()
    }
}

#[async_trait]
impl Transcriber for FakeTranscriber {
    async fn transcribe_file(&self, audio_path: &Path) -> Result<String> {
        self.calls
            .lock()
            .unwrap()
            .push((audio_path.to_path_buf(), audio_path.is_file()));
        self.result.clone().map_err(|e| anyhow!(e))
    }
}

/// Answers every request with fixed content, or fails as unreachable
pub struct FakeLlm {
    answer: Option<String>,
    requests: Arc<Mutex<Vec<CompletionRequest>>>,
}

impl FakeLlm {
    pub fn answering(content: &str) -> Self {
        Self {
            answer: Some(content.to_string()),
            requests: Arc::default(),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            answer: None,
            requests: Arc::default(),
        }
    }

    pub fn requests(&self) -> Arc<Mutex<Vec<CompletionRequest>>> {
        self.requests.clone()
    }
}

#[async_trait]
impl LlmProvider for FakeLlm {
    fn provider_name(&self) -> &'static str {
        "fake"
    }

    fn model(&self) -> &str {
        "fake-model"
    }

    async fn check_connection(&self) -> Result<Vec<String>, LlmError> {
        Ok(vec!["fake-model".to_string()])
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        self.requests.lock().unwrap().push(request);
        match &self.answer {
            Some(content) => Ok(CompletionResponse {
                content: content.clone(),
                model: "fake-model".to_string(),
                prompt_tokens: None,
                completion_tokens: None,
                finish_reason: Some("stop".to_string()),
            }),
            None => Err(LlmError::ProviderUnavailable("connection refused".to_string())),
        }
    }
}

/// Writes a small WAV-looking file containing the spoken text
#[derive(Default)]
pub struct FakeSynthesizer {
    fail: bool,
    spoken: Mutex<Vec<String>>,
}

impl FakeSynthesizer {
    pub fn failing() -> Self {
        Self {
            fail: true,
            spoken: Mutex::default(),
        }
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

impl SpeechSynthesizer for FakeSynthesizer {
    fn engine_name(&self) -> &'static str {
        "fake"
    }

    fn synthesize_to_file(&self, text: &str, output_path: &Path) -> Result<(), SpeechError> {
        if self.fail {
            return Err(SpeechError::EngineFailed {
                status: "exit status: 1".to_string(),
                stderr: "no voice".to_string(),
            });
        }
        self.spoken.lock().unwrap().push(text.to_string());

        let mut bytes = b"RIFF\0\0\0\0WAVE".to_vec();
        bytes.extend_from_slice(text.as_bytes());
        std::fs::write(output_path, bytes)?;
        Ok(())
    }
}
