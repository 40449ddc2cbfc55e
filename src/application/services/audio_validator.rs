use crate::domain::AudioFormat;

/// Pre-flight checks on a raw clip. Everything here runs before any decode
/// or network work, except the duration check which needs decoded samples
/// and runs before the backend is contacted.
#[derive(Debug, Clone)]
pub struct AudioValidator {
    max_duration_seconds: u64,
    max_size_bytes: usize,
}

impl AudioValidator {
    pub fn new(max_duration_seconds: u64, max_size_bytes: usize) -> Self {
        Self {
            max_duration_seconds,
            max_size_bytes,
        }
    }

    /// Validate the raw buffer: non-empty, recognized signature, within the
    /// size limit. The caller-provided hint is advisory; a mismatch is
    /// logged and the detected signature wins.
    pub fn validate_bytes(
        &self,
        data: &[u8],
        hint: Option<AudioFormat>,
    ) -> Result<AudioFormat, AudioError> {
        if data.is_empty() {
            return Err(AudioError::Empty);
        }

        let detected = AudioFormat::from_signature(data).ok_or_else(|| {
            AudioError::Format("unrecognized or unsupported audio signature".to_string())
        })?;

        if let Some(hinted) = hint {
            if hinted != detected {
                tracing::warn!(
                    hinted = hinted.as_str(),
                    detected = detected.as_str(),
                    "Format hint disagrees with signature"
                );
            }
        }

        if data.len() > self.max_size_bytes {
            return Err(AudioError::Size {
                actual: data.len(),
                max: self.max_size_bytes,
            });
        }

        Ok(detected)
    }

    /// Duration exactly at the maximum is accepted.
    pub fn check_duration(&self, duration_seconds: f64) -> Result<(), AudioError> {
        if duration_seconds > self.max_duration_seconds as f64 {
            return Err(AudioError::Duration {
                actual: duration_seconds,
                max: self.max_duration_seconds,
            });
        }
        Ok(())
    }
}

/// Audio-side failures, kept distinct so the gateway can render specific
/// error types.
#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("audio payload is empty")]
    Empty,
    #[error("unsupported audio format: {0}")]
    Format(String),
    #[error("audio duration {actual:.1}s exceeds maximum {max}s")]
    Duration { actual: f64, max: u64 },
    #[error("audio size {actual} bytes exceeds maximum {max} bytes")]
    Size { actual: usize, max: usize },
    #[error("audio conversion failed: {0}")]
    Conversion(String),
}
