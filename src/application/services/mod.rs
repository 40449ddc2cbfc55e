mod audio_validator;
mod retry_policy;
mod transcription_service;

pub use audio_validator::{AudioError, AudioValidator};
pub use retry_policy::RetryPolicy;
pub use transcription_service::{
    PipelineError, PipelineOutcome, RecognitionOptions, TranscriptionService,
};
