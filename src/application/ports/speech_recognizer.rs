use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{CanonicalAudio, TranscriptionResult};

/// One bounded request/response cycle against the recognition backend.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    async fn recognize(
        &self,
        request: &RecognitionRequest,
    ) -> Result<TranscriptionResult, RecognitionError>;
}

/// Fully-built backend request. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct RecognitionRequest {
    audio: CanonicalAudio,
    language_code: String,
    punctuation: bool,
    word_timings: bool,
}

impl RecognitionRequest {
    pub fn new(
        audio: CanonicalAudio,
        language_code: String,
        punctuation: bool,
        word_timings: bool,
    ) -> Self {
        Self {
            audio,
            language_code,
            punctuation,
            word_timings,
        }
    }

    pub fn audio(&self) -> &CanonicalAudio {
        &self.audio
    }

    pub fn language_code(&self) -> &str {
        &self.language_code
    }

    pub fn punctuation(&self) -> bool {
        self.punctuation
    }

    pub fn word_timings(&self) -> bool {
        self.word_timings
    }

    pub fn audio_duration_seconds(&self) -> f64 {
        self.audio.duration_seconds()
    }
}

/// Closed set of backend failure kinds. Retry decisions key off
/// [`RecognitionError::is_retryable`] instead of downcasting.
#[derive(Debug, thiserror::Error)]
pub enum RecognitionError {
    #[error("recognition backend rejected the credentials")]
    Auth(String),
    #[error("recognition backend quota exhausted: {0}")]
    Quota(String),
    #[error("recognition backend unavailable: {0}")]
    Transient(String),
    #[error("recognition request timed out after {0:?}")]
    Timeout(Duration),
    #[error("recognition backend refused the request: {0}")]
    Rejected(String),
    #[error("recognition response could not be interpreted: {0}")]
    InvalidResponse(String),
}

impl RecognitionError {
    /// True when re-attempting the same request may plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Quota(_) | Self::Transient(_) | Self::Timeout(_)
        )
    }

    /// Stable lowercase tag for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Auth(_) => "auth",
            Self::Quota(_) => "quota",
            Self::Transient(_) => "transient",
            Self::Timeout(_) => "timeout",
            Self::Rejected(_) => "rejected",
            Self::InvalidResponse(_) => "invalid_response",
        }
    }
}
