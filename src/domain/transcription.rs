use std::time::Duration;

/// Best-effort word-level timing from the recognition backend.
#[derive(Debug, Clone, PartialEq)]
pub struct WordTiming {
    pub word: String,
    pub start_seconds: f64,
    pub end_seconds: f64,
}

/// Outcome of a single recognition attempt. Constructed once, never mutated,
/// never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptionResult {
    pub transcript: String,
    pub confidence: f32,
    pub language_code: String,
    pub duration_seconds: f64,
    pub words: Vec<WordTiming>,
    pub latency: Duration,
}

impl TranscriptionResult {
    /// Backend returned zero recognized segments. This is a valid outcome,
    /// not an error.
    pub fn no_speech(language_code: String, duration_seconds: f64, latency: Duration) -> Self {
        Self {
            transcript: String::new(),
            confidence: 0.0,
            language_code,
            duration_seconds,
            words: Vec::new(),
            latency,
        }
    }

    pub fn word_count(&self) -> usize {
        self.transcript.split_whitespace().count()
    }
}
