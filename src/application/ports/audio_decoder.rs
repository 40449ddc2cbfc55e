use async_trait::async_trait;

use crate::domain::{AudioFormat, CANONICAL_SAMPLE_RATE};

/// Decodes an encoded clip into canonical 16 kHz mono samples.
#[async_trait]
pub trait AudioDecoder: Send + Sync {
    async fn decode(
        &self,
        data: &[u8],
        format: AudioFormat,
    ) -> Result<DecodedAudio, AudioDecoderError>;
}

/// Decoder output, already resampled and downmixed to the canonical rate.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub samples: Vec<i16>,
    pub source_sample_rate: Option<u32>,
    pub source_channels: Option<u16>,
}

impl DecodedAudio {
    pub fn duration_seconds(&self) -> f64 {
        self.samples.len() as f64 / CANONICAL_SAMPLE_RATE as f64
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AudioDecoderError {
    #[error("audio decoding failed: {0}")]
    DecodingFailed(String),
    #[error("decoder unavailable: {0}")]
    Unavailable(String),
}
