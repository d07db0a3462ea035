// Audio decoding for uploaded recordings
//
// Uploads arrive in whatever container the browser produced (webm, ogg, mp3,
// wav...). FFmpeg normalises all of them to the raw PCM Whisper expects.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{anyhow, Result};
use log::{debug, error, info};

/// Sample rate Whisper models are trained on
pub const WHISPER_SAMPLE_RATE: u32 = 16_000;

/// Locate an FFmpeg binary: explicit override first, then `PATH`
pub fn find_ffmpeg_path(override_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = override_path {
        if path.exists() {
            return Some(path.to_path_buf());
        }
        log::warn!("Configured FFmpeg path {} does not exist, searching PATH", path.display());
    }
    which::which("ffmpeg").ok()
}

/// Decodes arbitrary audio files into mono 16kHz f32 samples via FFmpeg
#[derive(Debug, Clone)]
pub struct AudioDecoder {
    ffmpeg_path: PathBuf,
}

impl AudioDecoder {
    pub fn new(ffmpeg_path: PathBuf) -> Self {
        Self { ffmpeg_path }
    }

    /// Build a decoder around the first FFmpeg found
    pub fn locate(override_path: Option<&Path>) -> Result<Self> {
        let ffmpeg_path = find_ffmpeg_path(override_path)
            .ok_or_else(|| anyhow!("FFmpeg not found. Please install FFmpeg or set FFMPEG_PATH."))?;
        info!("Using FFmpeg at: {}", ffmpeg_path.display());
        Ok(Self::new(ffmpeg_path))
    }

    /// Decode a file to raw samples. Blocks until FFmpeg exits.
    pub fn decode_file(&self, audio_path: &Path) -> Result<Vec<f32>> {
        if !audio_path.exists() {
            return Err(anyhow!("Audio file does not exist: {}", audio_path.display()));
        }

        let mut command = Command::new(&self.ffmpeg_path);
        command
            .arg("-nostdin")
            .arg("-i")
            .arg(audio_path)
            .arg("-f")
            .arg("f32le")
            .arg("-acodec")
            .arg("pcm_f32le")
            .arg("-ar")
            .arg(WHISPER_SAMPLE_RATE.to_string())
            .arg("-ac")
            .arg("1")
            .arg("-")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        debug!("FFmpeg command: {:?}", command);

        let output = command
            .output()
            .map_err(|e| anyhow!("Failed to spawn FFmpeg process: {}", e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("FFmpeg decode failed: {}", stderr);
            return Err(anyhow!("FFmpeg failed to decode audio: {}", stderr.trim()));
        }

        let samples = samples_from_le_bytes(&output.stdout)?;
        info!(
            "Decoded {} samples ({:.2} seconds) from {}",
            samples.len(),
            samples.len() as f32 / WHISPER_SAMPLE_RATE as f32,
            audio_path.display()
        );
        Ok(samples)
    }
}

/// Reinterpret little-endian f32 PCM bytes as samples
pub fn samples_from_le_bytes(raw: &[u8]) -> Result<Vec<f32>> {
    if raw.len() % 4 != 0 {
        return Err(anyhow!(
            "Invalid audio data length: {} bytes (not divisible by 4)",
            raw.len()
        ));
    }

    Ok(raw
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_from_le_bytes() {
        let mut raw = Vec::new();
        raw.extend_from_slice(&0.5f32.to_le_bytes());
        raw.extend_from_slice(&(-1.0f32).to_le_bytes());

        let samples = samples_from_le_bytes(&raw).unwrap();
        assert_eq!(samples, vec![0.5, -1.0]);
    }

    #[test]
    fn test_samples_rejects_truncated_data() {
        let err = samples_from_le_bytes(&[0, 0, 128]).unwrap_err();
        assert!(err.to_string().contains("not divisible by 4"));
    }

    #[test]
    fn test_decode_missing_file_fails_before_spawning() {
        let decoder = AudioDecoder::new(PathBuf::from("/nonexistent/ffmpeg"));
        let err = decoder
            .decode_file(Path::new("/nonexistent/recording.webm"))
            .unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_find_ffmpeg_prefers_existing_override() {
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("ffmpeg");
        std::fs::write(&fake, b"").unwrap();

        assert_eq!(find_ffmpeg_path(Some(&fake)), Some(fake));
    }
}
