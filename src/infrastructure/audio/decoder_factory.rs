use std::sync::Arc;

use serde::Deserialize;

use crate::application::ports::{AudioDecoder, AudioDecoderError};

use super::fallback_decoder::FallbackAudioDecoder;
use super::ffmpeg_decoder::{check_ffmpeg_binary, FfmpegAudioDecoder};
use super::symphonia_decoder::SymphoniaAudioDecoder;

/// Explicit decode-path selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DecodeStrategy {
    /// symphonia only.
    InProcess,
    /// ffmpeg only; requires the binary at startup.
    External,
    /// symphonia first, ffmpeg when the in-process decode fails.
    Auto,
}

impl DecodeStrategy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "in-process" | "inprocess" => Some(Self::InProcess),
            "external" => Some(Self::External),
            "auto" => Some(Self::Auto),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProcess => "in-process",
            Self::External => "external",
            Self::Auto => "auto",
        }
    }
}

pub struct AudioDecoderFactory;

impl AudioDecoderFactory {
    pub fn create(strategy: DecodeStrategy) -> Result<Arc<dyn AudioDecoder>, AudioDecoderError> {
        match strategy {
            DecodeStrategy::InProcess => Ok(Arc::new(SymphoniaAudioDecoder)),
            DecodeStrategy::External => {
                check_ffmpeg_binary()?;
                Ok(Arc::new(FfmpegAudioDecoder))
            }
            DecodeStrategy::Auto => {
                // The fallback stays configured even when ffmpeg is absent;
                // clips the in-process path handles still succeed.
                if let Err(e) = check_ffmpeg_binary() {
                    tracing::warn!(error = %e, "External decoder unavailable, fallback degraded");
                }
                Ok(Arc::new(FallbackAudioDecoder::new(
                    Arc::new(SymphoniaAudioDecoder),
                    Arc::new(FfmpegAudioDecoder),
                )))
            }
        }
    }
}
