//! Request and response types for the HTTP API

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Multipart/form field names accepted for the recording
pub const AUDIO_FIELDS: &[&str] = &["audio_file", "file", "audio"];
/// Multipart/form field names accepted for pasted text
pub const TEXT_FIELDS: &[&str] = &["text_input", "text"];

pub const NO_INPUT_MESSAGE: &str = "Please provide either an audio file or text.";
pub const EMPTY_TEXT_MESSAGE: &str = "Input text is empty after processing.";
pub const CLIP_NOT_FOUND_MESSAGE: &str = "Audio file not found.";

/// An uploaded recording
#[derive(Debug, Clone)]
pub struct AudioUpload {
    /// Client-supplied filename, if any
    pub filename: Option<String>,
    pub bytes: Bytes,
}

/// What the caller submitted. Audio takes precedence when both are present.
#[derive(Debug, Default, Clone)]
pub struct Submission {
    pub audio: Option<AudioUpload>,
    pub text: Option<String>,
}

impl Submission {
    pub fn is_empty(&self) -> bool {
        self.audio.is_none() && self.text.is_none()
    }

    pub(crate) fn set_audio(&mut self, filename: Option<String>, bytes: Bytes) {
        if !bytes.is_empty() {
            self.audio = Some(AudioUpload { filename, bytes });
        }
    }

    pub(crate) fn set_text(&mut self, text: String) {
        if !text.is_empty() {
            self.text = Some(text);
        }
    }
}

/// Body of a successful `POST /api/simplify`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimplifyResponse {
    /// The explanation rendered to HTML
    pub simplified_text: String,
    /// Clip name to fetch from `GET /api/audio/{filename}`
    pub audio_filename: String,
}
