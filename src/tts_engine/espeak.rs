//! espeak-ng speech backend.
//!
//! Drives the system `espeak-ng` command, which writes a complete WAV file
//! before it exits. Requires espeak-ng to be installed:
//! - macOS: `brew install espeak-ng`
//! - Linux: `apt-get install espeak-ng`

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use super::synthesizer::{SpeechError, SpeechSynthesizer};

/// Voice settings for espeak-ng
#[derive(Debug, Clone)]
pub struct EspeakConfig {
    /// Voice / language code (e.g., "en-us", "en-gb")
    pub voice: String,
    /// Words per minute
    pub rate: u32,
    /// Explicit binary path; otherwise `espeak-ng`, then `espeak`, from PATH
    pub binary_path: Option<PathBuf>,
}

impl Default for EspeakConfig {
    fn default() -> Self {
        Self {
            voice: "en-us".to_string(),
            rate: 175,
            binary_path: None,
        }
    }
}

pub struct EspeakSynthesizer {
    binary: PathBuf,
    voice: String,
    rate: u32,
}

impl EspeakSynthesizer {
    /// Resolve the espeak binary once; the handle is reused for every clip
    pub fn locate(config: &EspeakConfig) -> Result<Self, SpeechError> {
        let binary = match &config.binary_path {
            Some(path) if path.exists() => path.clone(),
            Some(path) => {
                return Err(SpeechError::EngineNotFound(format!(
                    "{} does not exist",
                    path.display()
                )))
            }
            None => which::which("espeak-ng")
                .or_else(|_| which::which("espeak"))
                .map_err(|_| {
                    SpeechError::EngineNotFound(
                        "espeak-ng is not on PATH. Install with: brew install espeak-ng (macOS) or apt-get install espeak-ng (Linux)"
                            .to_string(),
                    )
                })?,
        };

        log::info!("Using espeak at: {}", binary.display());
        Ok(Self::with_binary(binary, config))
    }

    pub fn with_binary(binary: PathBuf, config: &EspeakConfig) -> Self {
        Self {
            binary,
            voice: config.voice.clone(),
            rate: config.rate,
        }
    }

    fn command(&self, output_path: &Path) -> Command {
        let mut command = Command::new(&self.binary);
        command
            .arg("-v")
            .arg(&self.voice)
            .arg("-s")
            .arg(self.rate.to_string())
            .arg("-w")
            .arg(output_path)
            .arg("--stdin")
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        command
    }
}

impl SpeechSynthesizer for EspeakSynthesizer {
    fn engine_name(&self) -> &'static str {
        "espeak-ng"
    }

    fn synthesize_to_file(&self, text: &str, output_path: &Path) -> Result<(), SpeechError> {
        let mut child = self.command(output_path).spawn().map_err(SpeechError::Spawn)?;

        // Text goes through stdin so leading dashes are never read as flags
        if let Some(mut stdin) = child.stdin.take() {
            if let Err(e) = stdin.write_all(text.as_bytes()) {
                // An engine that died early is reported through its exit status
                if e.kind() != ErrorKind::BrokenPipe {
                    return Err(e.into());
                }
            }
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(SpeechError::EngineFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        if !output_path.is_file() {
            return Err(SpeechError::OutputMissing(output_path.to_path_buf()));
        }

        log::info!("Speech generated at {}", output_path.display());
        Ok(())
    }
}
