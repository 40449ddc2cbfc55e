mod audio;
mod transcription;

pub use audio::{AudioClip, AudioFormat, CanonicalAudio, CANONICAL_SAMPLE_RATE};
pub use transcription::{TranscriptionResult, WordTiming};
