use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{AudioDecoder, AudioDecoderError, DecodedAudio};
use crate::domain::AudioFormat;

/// Cascade decoder: the primary path first, the fallback only when the
/// primary cannot decode the clip.
pub struct FallbackAudioDecoder {
    primary: Arc<dyn AudioDecoder>,
    fallback: Arc<dyn AudioDecoder>,
}

impl FallbackAudioDecoder {
    pub fn new(primary: Arc<dyn AudioDecoder>, fallback: Arc<dyn AudioDecoder>) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl AudioDecoder for FallbackAudioDecoder {
    async fn decode(
        &self,
        data: &[u8],
        format: AudioFormat,
    ) -> Result<DecodedAudio, AudioDecoderError> {
        let primary_error = match self.primary.decode(data, format).await {
            Ok(decoded) => return Ok(decoded),
            Err(e) => e,
        };

        tracing::warn!(
            format = format.as_str(),
            error = %primary_error,
            "In-process decode failed, trying external fallback"
        );

        self.fallback.decode(data, format).await.map_err(|e| {
            AudioDecoderError::DecodingFailed(format!(
                "primary: {primary_error}; fallback: {e}"
            ))
        })
    }
}
