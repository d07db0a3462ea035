//! Server configuration from environment variables
//!
//! Every setting has a default, so the server starts with no environment at
//! all. Malformed values are logged and replaced by the default.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::llm_engine::OpenAiCompatibleConfig;
use crate::services::DEFAULT_TEMPERATURE;
use crate::tts_engine::EspeakConfig;
use crate::whisper_engine::WhisperConfig;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("beam size must be at least 1")]
    BeamSize,
    #[error("temperature {0} is outside 0.0..=2.0")]
    Temperature(f32),
    #[error("LLM base URL must start with http:// or https://, got {0:?}")]
    BaseUrl(String),
    #[error("upload limit must be greater than zero")]
    UploadLimit,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted request body, in bytes
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            max_upload_bytes: 50 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Shared directory for uploads and speech clips
    pub temp_dir: PathBuf,
    /// Clips older than this are swept; `None` keeps them forever
    pub clip_max_age: Option<Duration>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            temp_dir: PathBuf::from("temp_files"),
            clip_max_age: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub whisper: WhisperConfig,
    pub llm: OpenAiCompatibleConfig,
    pub temperature: f32,
    pub tts: EspeakConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            whisper: WhisperConfig::default(),
            llm: OpenAiCompatibleConfig::default(),
            temperature: DEFAULT_TEMPERATURE,
            tts: EspeakConfig::default(),
        }
    }
}

/// Parse `key` with `lookup`, falling back to `default` when unset or invalid
fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => match raw.trim().parse::<T>() {
            Ok(value) => value,
            Err(_) => {
                log::warn!("Invalid {}='{}', falling back to default", key, raw);
                default
            }
        },
        None => default,
    }
}

fn string_or<F>(lookup: &F, key: &str, default: String) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
}

fn path_opt<F>(lookup: &F, key: &str) -> Option<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

impl AppConfig {
    /// Load from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let server = ServerConfig {
            host: string_or(&lookup, "LEGALEASE_HOST", defaults.server.host),
            port: parse_or(&lookup, "LEGALEASE_PORT", defaults.server.port),
            max_upload_bytes: parse_or(
                &lookup,
                "LEGALEASE_MAX_UPLOAD_BYTES",
                defaults.server.max_upload_bytes,
            ),
        };

        let storage = StorageConfig {
            temp_dir: path_opt(&lookup, "LEGALEASE_TEMP_DIR").unwrap_or(defaults.storage.temp_dir),
            clip_max_age: lookup("LEGALEASE_CLIP_MAX_AGE_SECS").and_then(|raw| {
                match raw.trim().parse::<u64>() {
                    Ok(0) => None,
                    Ok(secs) => Some(Duration::from_secs(secs)),
                    Err(_) => {
                        log::warn!("Invalid LEGALEASE_CLIP_MAX_AGE_SECS='{}', clips kept forever", raw);
                        None
                    }
                }
            }),
        };

        let whisper = WhisperConfig {
            model_path: path_opt(&lookup, "LEGALEASE_WHISPER_MODEL")
                .unwrap_or(defaults.whisper.model_path),
            beam_size: parse_or(&lookup, "LEGALEASE_WHISPER_BEAM_SIZE", defaults.whisper.beam_size),
            language: match lookup("LEGALEASE_WHISPER_LANGUAGE").map(|v| v.trim().to_string()) {
                Some(lang) if lang == "auto" => None,
                Some(lang) if !lang.is_empty() => Some(lang),
                _ => defaults.whisper.language,
            },
            ffmpeg_path: path_opt(&lookup, "FFMPEG_PATH"),
        };

        let llm = OpenAiCompatibleConfig {
            base_url: string_or(&lookup, "LEGALEASE_LLM_BASE_URL", defaults.llm.base_url),
            api_key: string_or(&lookup, "LEGALEASE_LLM_API_KEY", defaults.llm.api_key),
            model: string_or(&lookup, "LEGALEASE_LLM_MODEL", defaults.llm.model),
            timeout_secs: parse_or(&lookup, "LEGALEASE_LLM_TIMEOUT_SECS", defaults.llm.timeout_secs),
        };

        let tts = EspeakConfig {
            voice: string_or(&lookup, "LEGALEASE_TTS_VOICE", defaults.tts.voice),
            rate: parse_or(&lookup, "LEGALEASE_TTS_RATE", defaults.tts.rate),
            binary_path: path_opt(&lookup, "ESPEAK_PATH"),
        };

        Self {
            server,
            storage,
            whisper,
            llm,
            temperature: parse_or(&lookup, "LEGALEASE_LLM_TEMPERATURE", defaults.temperature),
            tts,
        }
    }

    /// Reject settings the engines cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.whisper.beam_size == 0 {
            return Err(ConfigError::BeamSize);
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::Temperature(self.temperature));
        }
        if !(self.llm.base_url.starts_with("http://") || self.llm.base_url.starts_with("https://")) {
            return Err(ConfigError::BaseUrl(self.llm.base_url.clone()));
        }
        if self.server.max_upload_bytes == 0 {
            return Err(ConfigError::UploadLimit);
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
