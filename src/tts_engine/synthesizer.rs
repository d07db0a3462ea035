//! Speech synthesis interface

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("Speech engine not found: {0}")]
    EngineNotFound(String),

    #[error("Failed to start speech engine: {0}")]
    Spawn(std::io::Error),

    #[error("Speech engine I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Speech engine exited with {status}: {stderr}")]
    EngineFailed { status: String, stderr: String },

    #[error("Speech engine produced no output at {}", .0.display())]
    OutputMissing(PathBuf),
}

/// Text-to-speech engine writing WAV files.
///
/// `synthesize_to_file` blocks until the file is complete and readable. Call
/// it from a blocking worker, never directly on the async executor.
pub trait SpeechSynthesizer: Send + Sync {
    fn engine_name(&self) -> &'static str;

    fn synthesize_to_file(&self, text: &str, output_path: &Path) -> Result<(), SpeechError>;
}
