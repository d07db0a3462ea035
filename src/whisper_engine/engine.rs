// Whisper Engine - Core Engine
use std::path::{Path, PathBuf};
use std::sync::Arc;
use async_trait::async_trait;
use whisper_rs::{WhisperContext, FullParams, SamplingStrategy};
use anyhow::{Result, anyhow};
use crate::audio::{AudioDecoder, WHISPER_SAMPLE_RATE};

use super::model_loader::{detect_gpu_acceleration, load_context, log_acceleration_capabilities, model_display_name};

/// Speech-to-text over a complete audio file
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe the file at `audio_path`, returning the full text
    async fn transcribe_file(&self, audio_path: &Path) -> Result<String>;
}

/// Whisper configuration
#[derive(Debug, Clone)]
pub struct WhisperConfig {
    /// Path to a ggml model file
    pub model_path: PathBuf,
    /// Beam-search width
    pub beam_size: usize,
    /// Spoken language; `None` lets whisper auto-detect
    pub language: Option<String>,
    /// FFmpeg override used for decoding uploads
    pub ffmpeg_path: Option<PathBuf>,
}

impl Default for WhisperConfig {
    fn default() -> Self {
        let model_path = dirs::data_dir()
            .map(|d| d.join("legalease").join("models"))
            .unwrap_or_else(|| PathBuf::from("models"))
            .join("ggml-tiny.en.bin");

        Self {
            model_path,
            beam_size: 5,
            language: Some("en".to_string()),
            ffmpeg_path: None,
        }
    }
}

pub struct WhisperEngine {
    context: Arc<WhisperContext>,
    model_name: String,
    decoder: AudioDecoder,
    beam_size: usize,
    language: Option<String>,
}

impl WhisperEngine {
    /// Load the model once; the context is shared by every later call
    pub fn load(config: &WhisperConfig) -> Result<Self> {
        // Suppress verbose whisper.cpp logs
        std::env::set_var("GGML_METAL_LOG_LEVEL", "1");
        std::env::set_var("WHISPER_LOG_LEVEL", "1");

        log_acceleration_capabilities();

        let decoder = AudioDecoder::locate(config.ffmpeg_path.as_deref())?;
        let context = load_context(&config.model_path, detect_gpu_acceleration())?;

        Ok(Self {
            context: Arc::new(context),
            model_name: model_display_name(&config.model_path),
            decoder,
            beam_size: config.beam_size.max(1),
            language: config.language.clone(),
        })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// Run whisper over decoded samples. Blocking.
    fn transcribe_samples(
        context: &WhisperContext,
        audio_data: &[f32],
        beam_size: usize,
        language: Option<&str>,
    ) -> Result<String> {
        let mut params = FullParams::new(SamplingStrategy::BeamSearch {
            beam_size: beam_size as i32,
            patience: 1.0,
        });

        params.set_language(language);
        params.set_translate(false);
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        let duration_seconds = audio_data.len() as f64 / WHISPER_SAMPLE_RATE as f64;
        log::info!(
            "Starting transcription of {} samples ({:.1}s duration)",
            audio_data.len(),
            duration_seconds
        );

        let mut state = context.create_state()?;
        state.full(params, audio_data)?;

        let num_segments = state.full_n_segments()?;
        let mut segments = Vec::with_capacity(num_segments.max(0) as usize);
        for i in 0..num_segments {
            match state.full_get_segment_text_lossy(i) {
                Ok(text) => segments.push(text),
                Err(e) => log::warn!("Skipping unreadable segment {}: {}", i, e),
            }
        }

        log::debug!("Transcription completed with {} segments", num_segments);
        Ok(join_segments(segments))
    }
}

#[async_trait]
impl Transcriber for WhisperEngine {
    async fn transcribe_file(&self, audio_path: &Path) -> Result<String> {
        let decoder = self.decoder.clone();
        let context = self.context.clone();
        let beam_size = self.beam_size;
        let language = self.language.clone();
        let path = audio_path.to_path_buf();

        let text = tokio::task::spawn_blocking(move || {
            let samples = decoder.decode_file(&path)?;
            Self::transcribe_samples(&context, &samples, beam_size, language.as_deref())
        })
        .await
        .map_err(|e| anyhow!("Transcription task failed: {}", e))??;

        log::info!("Transcription complete ({}): {}", self.model_name, text);
        Ok(text)
    }
}

/// Concatenate segment texts in emitted order. Whisper segments already carry
/// their own leading whitespace, so no separator is inserted.
pub fn join_segments<I>(segments: I) -> String
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    segments.into_iter().fold(String::new(), |mut acc, segment| {
        acc.push_str(segment.as_ref());
        acc
    })
}
