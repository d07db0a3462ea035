//! Text-to-speech engine module
//!
//! Produces the spoken version of an explanation as a WAV file.

pub mod synthesizer;
pub mod espeak;

pub use synthesizer::{SpeechError, SpeechSynthesizer};
pub use espeak::{EspeakConfig, EspeakSynthesizer};
