use std::str::FromStr;

use serde::Deserialize;

use crate::infrastructure::audio::DecodeStrategy;

use super::environment::Environment;

/// Hard upper bound on the configurable clip duration.
const MAX_DURATION_CEILING_SECONDS: u64 = 300;

const DEFAULT_MAX_SIZE_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub audio: AudioSettings,
    pub recognition: RecognitionSettings,
    pub retry: RetrySettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AudioSettings {
    pub max_duration_seconds: u64,
    pub max_size_bytes: usize,
    pub decode_strategy: DecodeStrategy,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecognitionSettings {
    pub endpoint: String,
    pub api_token: String,
    pub default_language: String,
    pub punctuation: bool,
    pub word_timings: bool,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub json_format: bool,
}

impl Settings {
    /// Load from the process environment, falling back to defaults for
    /// anything unset or unparseable.
    pub fn from_env() -> Self {
        let environment: Environment = std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".to_string())
            .try_into()
            .unwrap_or(Environment::Local);

        let decode_strategy = std::env::var("AUDIO_DECODE_STRATEGY")
            .ok()
            .and_then(|v| DecodeStrategy::parse(&v))
            .unwrap_or(DecodeStrategy::Auto);

        Self {
            server: ServerSettings {
                host: env_or("SERVER_HOST", "0.0.0.0".to_string()),
                port: env_or("SERVER_PORT", 8080),
            },
            audio: AudioSettings {
                max_duration_seconds: env_or("MAX_AUDIO_DURATION", 60),
                max_size_bytes: env_or("MAX_AUDIO_SIZE", DEFAULT_MAX_SIZE_BYTES),
                decode_strategy,
            },
            recognition: RecognitionSettings {
                endpoint: env_or(
                    "SPEECH_API_ENDPOINT",
                    "https://speech.googleapis.com".to_string(),
                ),
                api_token: std::env::var("SPEECH_API_TOKEN").unwrap_or_default(),
                default_language: env_or("DEFAULT_LANGUAGE_CODE", "en-US".to_string()),
                punctuation: env_or("ENABLE_PUNCTUATION", true),
                word_timings: env_or("ENABLE_WORD_TIMINGS", false),
                request_timeout_seconds: env_or("TRANSCRIPTION_TIMEOUT", 30),
            },
            retry: RetrySettings {
                max_attempts: env_or("MAX_RETRY_ATTEMPTS", 3),
                base_delay_ms: env_or("RETRY_DELAY_MS", 1000),
            },
            logging: LoggingSettings {
                level: env_or(
                    "LOG_LEVEL",
                    "info,speechgate=debug,tower_http=debug".to_string(),
                ),
                json_format: std::env::var("LOG_FORMAT")
                    .map(|v| v.to_lowercase() == "json")
                    .unwrap_or(environment == Environment::Prod),
            },
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.audio.max_duration_seconds == 0 {
            return Err(ConfigError("MAX_AUDIO_DURATION must be positive".into()));
        }
        if self.audio.max_duration_seconds > MAX_DURATION_CEILING_SECONDS {
            return Err(ConfigError(format!(
                "MAX_AUDIO_DURATION cannot exceed {MAX_DURATION_CEILING_SECONDS} seconds"
            )));
        }
        if self.audio.max_size_bytes == 0 {
            return Err(ConfigError("MAX_AUDIO_SIZE must be positive".into()));
        }
        if self.recognition.default_language.trim().is_empty() {
            return Err(ConfigError("DEFAULT_LANGUAGE_CODE cannot be empty".into()));
        }
        if self.recognition.request_timeout_seconds == 0 {
            return Err(ConfigError("TRANSCRIPTION_TIMEOUT must be positive".into()));
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError("MAX_RETRY_ATTEMPTS must be at least 1".into()));
        }
        Ok(())
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, thiserror::Error)]
#[error("invalid configuration: {0}")]
pub struct ConfigError(String);
