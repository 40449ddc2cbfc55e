use std::sync::Arc;
use std::time::Instant;

use base64::{engine::general_purpose, Engine as _};
use serde::Serialize;
use serde_json::{json, Value};

use crate::application::ports::{AudioDecoder, RecognitionError, SpeechRecognizer};
use crate::application::services::{AudioError, PipelineError, TranscriptionService};
use crate::domain::AudioFormat;

pub const TOOL_NAME: &str = "transcribe_audio";
pub const TOOL_DESCRIPTION: &str = "Transcribe audio/voice messages to text using a remote \
     speech-recognition backend. Accepts base64-encoded audio in OGG, MP3, WAV, or FLAC format. \
     Returns transcription text with confidence score and metadata.";

/// JSON schema the invoking host uses to register the tool.
pub fn tool_schema() -> Value {
    json!({
        "name": TOOL_NAME,
        "description": TOOL_DESCRIPTION,
        "inputSchema": {
            "type": "object",
            "properties": {
                "audio_data": {
                    "type": "string",
                    "description": "Base64-encoded audio file. Supports OGG, MP3, WAV, and FLAC formats.",
                },
                "metadata": {
                    "type": "object",
                    "description": "Optional metadata about the audio",
                    "properties": {
                        "original_format": {
                            "type": "string",
                            "enum": ["ogg", "mp3", "wav", "flac"],
                            "description": "Original audio format hint",
                        },
                        "language_code": {
                            "type": "string",
                            "description": "BCP-47 language code (e.g. 'en-US')",
                        },
                        "user_id": {
                            "type": "string",
                            "description": "User identifier for tracking",
                        },
                        "message_id": {
                            "type": "string",
                            "description": "Message identifier for tracking",
                        },
                    },
                },
            },
            "required": ["audio_data"],
        },
    })
}

/// Validated tool invocation arguments. Tracking identifiers are opaque and
/// never interpreted.
#[derive(Debug, Clone)]
pub struct ToolInput {
    pub audio: Vec<u8>,
    pub language_code: String,
    pub format_hint: Option<AudioFormat>,
    pub user_id: Option<String>,
    pub message_id: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ToolInputError {
    #[error("missing required parameter: {0}")]
    MissingField(&'static str),
    #[error("audio_data must be a base64-encoded string")]
    NotAString,
    #[error("audio_data cannot be empty")]
    EmptyField,
    #[error("invalid base64 encoding: {0}")]
    InvalidBase64(String),
    #[error("decoded audio data is empty")]
    EmptyAudio,
    #[error("unsupported declared format: {0}")]
    UnsupportedFormat(String),
}

/// Closed external error vocabulary carried in the response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    ValidationError,
    DurationError,
    SizeError,
    FormatError,
    ConversionError,
    TimeoutError,
    QuotaError,
    ApiError,
    TranscriptionError,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "validation_error",
            Self::DurationError => "duration_error",
            Self::SizeError => "size_error",
            Self::FormatError => "format_error",
            Self::ConversionError => "conversion_error",
            Self::TimeoutError => "timeout_error",
            Self::QuotaError => "quota_error",
            Self::ApiError => "api_error",
            Self::TranscriptionError => "transcription_error",
        }
    }

    fn from_pipeline_error(error: &PipelineError) -> Self {
        match error {
            PipelineError::Audio(AudioError::Empty) => Self::ValidationError,
            PipelineError::Audio(AudioError::Format(_)) => Self::FormatError,
            PipelineError::Audio(AudioError::Duration { .. }) => Self::DurationError,
            PipelineError::Audio(AudioError::Size { .. }) => Self::SizeError,
            PipelineError::Audio(AudioError::Conversion(_)) => Self::ConversionError,
            PipelineError::Recognition(RecognitionError::Timeout(_)) => Self::TimeoutError,
            PipelineError::Recognition(RecognitionError::Quota(_)) => Self::QuotaError,
            PipelineError::Recognition(
                RecognitionError::Auth(_)
                | RecognitionError::Transient(_)
                | RecognitionError::Rejected(_),
            ) => Self::ApiError,
            PipelineError::Recognition(RecognitionError::InvalidResponse(_)) => {
                Self::TranscriptionError
            }
        }
    }
}

/// Stable response envelope crossing the tool boundary. Never carries raw
/// audio; the transcript appears here and nowhere else.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcription: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    pub language_code: String,
    pub duration_seconds: f64,
    pub word_count: usize,
    pub processing_time_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ResponseMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<ErrorType>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invocation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_format: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

impl ToolResponse {
    /// Envelope for arguments that never made it past the input gate.
    pub fn input_failure(
        error: &ToolInputError,
        language_code: String,
        invocation_id: Option<String>,
    ) -> Self {
        Self {
            success: false,
            transcription: None,
            confidence: None,
            language_code,
            duration_seconds: 0.0,
            word_count: 0,
            processing_time_ms: 0,
            metadata: Some(ResponseMetadata {
                invocation_id,
                original_format: None,
                user_id: None,
                message_id: None,
            }),
            error: Some(error.to_string()),
            error_type: Some(ErrorType::ValidationError),
        }
    }
}

/// Tool gateway: validates raw arguments, drives the pipeline, and collapses
/// every outcome into the response envelope.
pub struct TranscribeTool<D: ?Sized, R>
where
    D: AudioDecoder,
    R: SpeechRecognizer,
{
    service: Arc<TranscriptionService<D, R>>,
    default_language: String,
}

impl<D: ?Sized, R> TranscribeTool<D, R>
where
    D: AudioDecoder,
    R: SpeechRecognizer,
{
    pub fn new(service: Arc<TranscriptionService<D, R>>, default_language: String) -> Self {
        Self {
            service,
            default_language,
        }
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Side-effect-free fast gate over the raw arguments. Nothing is decoded
    /// or transmitted until this passes.
    pub fn validate_input(&self, arguments: &Value) -> Result<ToolInput, ToolInputError> {
        let audio_data = arguments
            .get("audio_data")
            .ok_or(ToolInputError::MissingField("audio_data"))?;

        let audio_data = audio_data.as_str().ok_or(ToolInputError::NotAString)?;

        if audio_data.trim().is_empty() {
            return Err(ToolInputError::EmptyField);
        }

        let audio = general_purpose::STANDARD
            .decode(audio_data.trim())
            .map_err(|e| ToolInputError::InvalidBase64(e.to_string()))?;

        if audio.is_empty() {
            return Err(ToolInputError::EmptyAudio);
        }

        let metadata = arguments.get("metadata").and_then(Value::as_object);

        let format_hint = match metadata
            .and_then(|m| m.get("original_format"))
            .and_then(Value::as_str)
        {
            Some(declared) => Some(
                AudioFormat::from_hint(declared)
                    .ok_or_else(|| ToolInputError::UnsupportedFormat(declared.to_string()))?,
            ),
            None => None,
        };

        let language_code = metadata
            .and_then(|m| m.get("language_code"))
            .and_then(Value::as_str)
            .filter(|code| !code.trim().is_empty())
            .unwrap_or(&self.default_language)
            .to_string();

        let opaque = |key: &str| {
            metadata
                .and_then(|m| m.get(key))
                .and_then(Value::as_str)
                .map(String::from)
        };

        Ok(ToolInput {
            audio,
            language_code,
            format_hint,
            user_id: opaque("user_id"),
            message_id: opaque("message_id"),
        })
    }

    /// Run the pipeline and map the outcome into the envelope. Total
    /// wall-clock time is measured here, failures included.
    pub async fn execute(&self, input: ToolInput, invocation_id: Option<String>) -> ToolResponse {
        let started = Instant::now();

        tracing::debug!(
            invocation_id = invocation_id.as_deref(),
            language_code = %input.language_code,
            format_hint = input.format_hint.map(|f| f.as_str()),
            audio_bytes = input.audio.len(),
            "Executing transcription"
        );

        let outcome = self
            .service
            .transcribe(&input.audio, input.format_hint, &input.language_code)
            .await;

        let processing_time_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(outcome) => {
                let response = ToolResponse {
                    success: true,
                    transcription: Some(outcome.result.transcript.clone()),
                    confidence: Some(outcome.result.confidence),
                    language_code: outcome.result.language_code.clone(),
                    duration_seconds: outcome.clip.duration_seconds,
                    word_count: outcome.result.word_count(),
                    processing_time_ms,
                    metadata: Some(ResponseMetadata {
                        invocation_id: invocation_id.clone(),
                        original_format: Some(outcome.clip.format.as_str()),
                        user_id: input.user_id,
                        message_id: input.message_id,
                    }),
                    error: None,
                    error_type: None,
                };

                tracing::info!(
                    invocation_id = invocation_id.as_deref(),
                    confidence = response.confidence,
                    duration_seconds = response.duration_seconds,
                    word_count = response.word_count,
                    processing_time_ms,
                    "Transcription completed"
                );

                response
            }
            Err(error) => {
                let error_type = ErrorType::from_pipeline_error(&error);

                tracing::error!(
                    invocation_id = invocation_id.as_deref(),
                    error_type = error_type.as_str(),
                    processing_time_ms,
                    "Transcription failed"
                );

                ToolResponse {
                    success: false,
                    transcription: None,
                    confidence: None,
                    language_code: input.language_code,
                    duration_seconds: 0.0,
                    word_count: 0,
                    processing_time_ms,
                    metadata: Some(ResponseMetadata {
                        invocation_id,
                        original_format: None,
                        user_id: input.user_id,
                        message_id: input.message_id,
                    }),
                    error: Some(external_message(&error)),
                    error_type: Some(error_type),
                }
            }
        }
    }
}

/// Externally visible failure text. Audio-side messages stay specific so
/// callers can render them; backend failures collapse into generic advice
/// with no credential or payload detail.
fn external_message(error: &PipelineError) -> String {
    match error {
        PipelineError::Audio(audio) => audio.to_string(),
        PipelineError::Recognition(RecognitionError::Timeout(_)) => {
            "Transcription request timed out. Please try again.".to_string()
        }
        PipelineError::Recognition(RecognitionError::Quota(_)) => {
            "Transcription service quota exceeded. Please try again later.".to_string()
        }
        PipelineError::Recognition(RecognitionError::InvalidResponse(_)) => {
            "Transcription failed: unexpected backend response.".to_string()
        }
        PipelineError::Recognition(_) => {
            "Transcription service error. Please try again.".to_string()
        }
    }
}
