use std::sync::Arc;

use crate::application::ports::{
    AudioDecoder, AudioDecoderError, RecognitionError, RecognitionRequest, SpeechRecognizer,
};
use crate::application::services::{AudioError, AudioValidator, RetryPolicy};
use crate::domain::{AudioClip, AudioFormat, CanonicalAudio, TranscriptionResult};

/// Recognition defaults applied to every request.
#[derive(Debug, Clone)]
pub struct RecognitionOptions {
    pub punctuation: bool,
    pub word_timings: bool,
}

/// Drives one clip through validate -> convert -> retried recognize.
///
/// Each invocation owns its buffers; the only shared state is read-only
/// configuration and the recognizer handle.
pub struct TranscriptionService<D: ?Sized, R>
where
    D: AudioDecoder,
    R: SpeechRecognizer,
{
    validator: AudioValidator,
    decoder: Arc<D>,
    recognizer: Arc<R>,
    retry: RetryPolicy,
    options: RecognitionOptions,
}

impl<D: ?Sized, R> TranscriptionService<D, R>
where
    D: AudioDecoder,
    R: SpeechRecognizer,
{
    pub fn new(
        validator: AudioValidator,
        decoder: Arc<D>,
        recognizer: Arc<R>,
        retry: RetryPolicy,
        options: RecognitionOptions,
    ) -> Self {
        Self {
            validator,
            decoder,
            recognizer,
            retry,
            options,
        }
    }

    pub async fn transcribe(
        &self,
        audio: &[u8],
        format_hint: Option<AudioFormat>,
        language_code: &str,
    ) -> Result<PipelineOutcome, PipelineError> {
        let format = self.validator.validate_bytes(audio, format_hint)?;

        tracing::debug!(
            format = format.as_str(),
            size_bytes = audio.len(),
            "Audio validated"
        );

        let decoded = self
            .decoder
            .decode(audio, format)
            .await
            .map_err(|e| AudioError::Conversion(conversion_context(&e)))?;

        let duration_seconds = decoded.duration_seconds();
        self.validator.check_duration(duration_seconds)?;

        let clip = AudioClip {
            format,
            sample_rate: decoded.source_sample_rate,
            channels: decoded.source_channels,
            duration_seconds,
            size_bytes: audio.len(),
        };

        tracing::debug!(
            format = clip.format.as_str(),
            duration_seconds,
            sample_rate = ?clip.sample_rate,
            channels = ?clip.channels,
            "Audio converted to canonical encoding"
        );

        let request = RecognitionRequest::new(
            CanonicalAudio::from_samples(&decoded.samples),
            language_code.to_string(),
            self.options.punctuation,
            self.options.word_timings,
        );

        let result = self
            .retry
            .run(|| self.recognizer.recognize(&request))
            .await?;

        Ok(PipelineOutcome { result, clip })
    }
}

fn conversion_context(error: &AudioDecoderError) -> String {
    match error {
        AudioDecoderError::DecodingFailed(context) => context.clone(),
        AudioDecoderError::Unavailable(context) => format!("decoder unavailable: {context}"),
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub result: TranscriptionResult,
    pub clip: AudioClip,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("audio: {0}")]
    Audio(#[from] AudioError),
    #[error("recognition: {0}")]
    Recognition(#[from] RecognitionError),
}
