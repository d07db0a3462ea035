// Whisper Engine Module
//
// Split into focused files:
// - model_loader.rs: Model loading and GPU detection
// - engine.rs: WhisperEngine, the Transcriber seam and transcription

pub mod model_loader;
pub mod engine;

pub use engine::{join_segments, Transcriber, WhisperConfig, WhisperEngine};
