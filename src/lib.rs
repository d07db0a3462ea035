// LegalEase - plain-English explanations of legal text
//
// A small HTTP service that:
// - Transcribes a spoken recording with Whisper (or takes pasted text)
// - Asks a local OpenAI-compatible chat model to explain it
// - Speaks the explanation with espeak-ng and renders it to HTML

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;

// Pipeline timing macros - exported for use by other modules
#[macro_use]
pub mod macros;

pub mod api;
pub mod audio;
pub mod config;
pub mod llm_engine;
pub mod markup;
pub mod prompts;
pub mod services;
pub mod state;
pub mod storage;
pub mod tts_engine;
pub mod whisper_engine;

#[cfg(test)]
mod test_support;

use config::AppConfig;
use llm_engine::{LlmProvider, OpenAiCompatibleProvider};
use services::AiServices;
use state::AppState;
use storage::{spawn_clip_sweeper, ClipStore};
use tts_engine::{EspeakSynthesizer, SpeechSynthesizer};
use whisper_engine::{Transcriber, WhisperEngine};

// ============== Main App Entry ==============

pub async fn run() -> anyhow::Result<()> {
    // Initialize env_logger to output to stderr (reads RUST_LOG env var)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    log::info!("LegalEase starting...");

    let config = AppConfig::from_env();
    config.validate()?;

    let store = ClipStore::open(&config.storage.temp_dir)?;
    log::info!("Temp directory: {}", store.dir().display());

    // Engines are loaded once and shared by every request
    let whisper = WhisperEngine::load(&config.whisper).context("Failed to load Whisper model")?;
    log::info!("Whisper model ready: {}", whisper.model_name());

    let llm = OpenAiCompatibleProvider::new(config.llm.clone())
        .context("Failed to create language model client")?;
    match llm.check_connection().await {
        Ok(models) => log::info!(
            "Language model server at {} is reachable ({} models available)",
            config.llm.base_url,
            models.len()
        ),
        // Not fatal: requests get the fallback answer until the server is up
        Err(e) => log::warn!(
            "Language model server at {} is not reachable yet: {}",
            config.llm.base_url,
            e
        ),
    }

    let speech = EspeakSynthesizer::locate(&config.tts).context("Failed to find speech engine")?;
    log::info!("Speech engine ready: {}", speech.engine_name());

    let transcriber: Arc<dyn Transcriber> = Arc::new(whisper);
    let llm: Arc<dyn LlmProvider> = Arc::new(llm);
    let speech: Arc<dyn SpeechSynthesizer> = Arc::new(speech);
    let services = AiServices::new(transcriber, llm, speech).with_temperature(config.temperature);

    let state = AppState::new(services, store);

    if let Some(max_age) = config.storage.clip_max_age {
        spawn_clip_sweeper(state.store.clone(), max_age);
    }

    let app = api::create_router(state, config.server.max_upload_bytes);

    let addr = config.bind_address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    log::info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("LegalEase stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                log::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => log::info!("Received Ctrl+C, shutting down..."),
        _ = terminate => log::info!("Received SIGTERM, shutting down..."),
    }
}
