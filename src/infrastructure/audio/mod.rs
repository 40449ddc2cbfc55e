mod decoder_factory;
mod fallback_decoder;
pub mod ffmpeg_decoder;
mod symphonia_decoder;

pub use decoder_factory::{AudioDecoderFactory, DecodeStrategy};
pub use fallback_decoder::FallbackAudioDecoder;
pub use ffmpeg_decoder::{check_ffmpeg_binary, FfmpegAudioDecoder};
pub use symphonia_decoder::SymphoniaAudioDecoder;
