// Audio input handling
pub mod decode;

pub use decode::{AudioDecoder, WHISPER_SAMPLE_RATE};
