//! AI orchestration: transcribe, converse, synthesize
//!
//! Each operation wraps one long-lived engine handle. The handles are built
//! once at startup and shared by every request.

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Result};

use crate::llm_engine::{CompletionRequest, LlmProvider};
use crate::prompts::{DISCLAIMER_MARKER, LLM_UNAVAILABLE_MESSAGE};
use crate::storage::new_clip_filename;
use crate::tts_engine::SpeechSynthesizer;
use crate::whisper_engine::Transcriber;

/// Sampling temperature used when no override is configured
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Text to speak for an explanation: everything before the first disclaimer
/// marker, trimmed. Without a marker the whole trimmed text is spoken.
pub fn speech_text(explanation: &str) -> &str {
    explanation
        .split_once(DISCLAIMER_MARKER)
        .map_or(explanation, |(before, _)| before)
        .trim()
}

pub struct AiServices {
    transcriber: Arc<dyn Transcriber>,
    llm: Arc<dyn LlmProvider>,
    speech: Arc<dyn SpeechSynthesizer>,
    temperature: f32,
}

impl AiServices {
    pub fn new(
        transcriber: Arc<dyn Transcriber>,
        llm: Arc<dyn LlmProvider>,
        speech: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        Self {
            transcriber,
            llm,
            speech,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Speech to text for an audio file. Engine errors propagate.
    pub async fn transcribe(&self, audio_path: &Path) -> Result<String> {
        log::info!("Transcribing {}", audio_path.display());
        self.transcriber.transcribe_file(audio_path).await
    }

    /// Ask the chat model for an explanation.
    ///
    /// Never fails: if the model cannot be reached the fixed
    /// [`LLM_UNAVAILABLE_MESSAGE`] is returned as the answer.
    pub async fn converse(&self, text: &str, system_prompt: &str) -> String {
        log::info!("Sending text to LLM ({} via {})", self.llm.model(), self.llm.provider_name());

        let request =
            CompletionRequest::with_system_and_user(system_prompt, text).temperature(self.temperature);

        match self.llm.complete(request).await {
            Ok(response) => {
                log::info!(
                    "LLM response received ({} prompt / {} completion tokens)",
                    response.prompt_tokens.map_or("?".to_string(), |n| n.to_string()),
                    response.completion_tokens.map_or("?".to_string(), |n| n.to_string()),
                );
                response.content
            }
            Err(e) => {
                log::error!("Error communicating with the language model: {}", e);
                LLM_UNAVAILABLE_MESSAGE.to_string()
            }
        }
    }

    /// Speak an explanation into a new `<uuid>.wav` under `output_dir`.
    /// Returns the bare filename.
    pub async fn synthesize(&self, text: &str, output_dir: &Path) -> Result<String> {
        let to_speak = speech_text(text).to_string();
        let filename = new_clip_filename();
        let output_path = output_dir.join(&filename);
        let speech = self.speech.clone();

        log::info!("Generating speech with {}", speech.engine_name());
        tokio::task::spawn_blocking(move || speech.synthesize_to_file(&to_speak, &output_path))
            .await
            .map_err(|e| anyhow!("Speech task failed: {}", e))??;

        Ok(filename)
    }
}
