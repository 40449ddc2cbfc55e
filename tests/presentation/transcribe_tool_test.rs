use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use speechgate::application::ports::{
    AudioDecoder, AudioDecoderError, DecodedAudio, RecognitionError, RecognitionRequest,
    SpeechRecognizer,
};
use speechgate::application::services::{
    AudioValidator, RecognitionOptions, RetryPolicy, TranscriptionService,
};
use speechgate::domain::{AudioFormat, TranscriptionResult};
use speechgate::presentation::tool::{tool_schema, ErrorType, ToolInputError, TranscribeTool};

use crate::helpers::{build_wav, silence, to_base64};

const TEST_MAX_DURATION_SECONDS: u64 = 60;
const TEST_MAX_SIZE_BYTES: usize = 10 * 1024 * 1024;
const TEST_DEFAULT_LANGUAGE: &str = "en-US";

struct PassthroughDecoder;

#[async_trait::async_trait]
impl AudioDecoder for PassthroughDecoder {
    async fn decode(
        &self,
        _data: &[u8],
        _format: AudioFormat,
    ) -> Result<DecodedAudio, AudioDecoderError> {
        Ok(DecodedAudio {
            samples: vec![0i16; 16_000],
            source_sample_rate: Some(16_000),
            source_channels: Some(1),
        })
    }
}

enum Script {
    Succeed,
    Fail(fn() -> RecognitionError),
}

struct ScriptedRecognizer {
    script: Script,
}

#[async_trait::async_trait]
impl SpeechRecognizer for ScriptedRecognizer {
    async fn recognize(
        &self,
        request: &RecognitionRequest,
    ) -> Result<TranscriptionResult, RecognitionError> {
        match &self.script {
            Script::Succeed => Ok(TranscriptionResult {
                transcript: "mock transcript".to_string(),
                confidence: 0.9,
                language_code: request.language_code().to_string(),
                duration_seconds: request.audio_duration_seconds(),
                words: Vec::new(),
                latency: Duration::from_millis(5),
            }),
            Script::Fail(make) => Err(make()),
        }
    }
}

fn tool(script: Script) -> TranscribeTool<PassthroughDecoder, ScriptedRecognizer> {
    let service = Arc::new(TranscriptionService::new(
        AudioValidator::new(TEST_MAX_DURATION_SECONDS, TEST_MAX_SIZE_BYTES),
        Arc::new(PassthroughDecoder),
        Arc::new(ScriptedRecognizer { script }),
        // A single attempt keeps error-mapping tests free of backoff sleeps
        RetryPolicy::new(1, Duration::from_millis(1)),
        RecognitionOptions {
            punctuation: true,
            word_timings: false,
        },
    ));
    TranscribeTool::new(service, TEST_DEFAULT_LANGUAGE.to_string())
}

fn valid_audio_b64() -> String {
    to_base64(&build_wav(16_000, &silence(16_000, 1.0)))
}

#[test]
fn given_schema_when_inspecting_then_declares_required_audio_data() {
    let schema = tool_schema();

    assert_eq!(schema["name"], "transcribe_audio");
    assert_eq!(schema["inputSchema"]["required"][0], "audio_data");
    assert!(schema["inputSchema"]["properties"]["metadata"]["properties"]["original_format"]
        .is_object());
}

#[test]
fn given_missing_audio_data_when_validating_then_returns_missing_field() {
    let result = tool(Script::Succeed).validate_input(&json!({}));

    assert!(matches!(result, Err(ToolInputError::MissingField(_))));
}

#[test]
fn given_non_string_audio_data_when_validating_then_returns_type_error() {
    let result = tool(Script::Succeed).validate_input(&json!({ "audio_data": 42 }));

    assert!(matches!(result, Err(ToolInputError::NotAString)));
}

#[test]
fn given_blank_audio_data_when_validating_then_returns_empty_error() {
    let result = tool(Script::Succeed).validate_input(&json!({ "audio_data": "   " }));

    assert!(matches!(result, Err(ToolInputError::EmptyField)));
}

#[test]
fn given_malformed_base64_when_validating_then_returns_base64_error() {
    let result =
        tool(Script::Succeed).validate_input(&json!({ "audio_data": "@@not-base64@@" }));

    assert!(matches!(result, Err(ToolInputError::InvalidBase64(_))));
}

#[test]
fn given_unsupported_declared_format_when_validating_then_rejected() {
    let result = tool(Script::Succeed).validate_input(&json!({
        "audio_data": valid_audio_b64(),
        "metadata": { "original_format": "aac" }
    }));

    assert!(matches!(result, Err(ToolInputError::UnsupportedFormat(_))));
}

#[test]
fn given_no_language_code_when_validating_then_default_applies() {
    let input = tool(Script::Succeed)
        .validate_input(&json!({ "audio_data": valid_audio_b64() }))
        .unwrap();

    assert_eq!(input.language_code, TEST_DEFAULT_LANGUAGE);
    assert_eq!(input.format_hint, None);
}

#[test]
fn given_full_metadata_when_validating_then_fields_carried_through() {
    let input = tool(Script::Succeed)
        .validate_input(&json!({
            "audio_data": valid_audio_b64(),
            "metadata": {
                "original_format": "wav",
                "language_code": "de-DE",
                "user_id": "user-7",
                "message_id": "msg-42"
            }
        }))
        .unwrap();

    assert_eq!(input.language_code, "de-DE");
    assert_eq!(input.format_hint, Some(AudioFormat::Wav));
    assert_eq!(input.user_id.as_deref(), Some("user-7"));
    assert_eq!(input.message_id.as_deref(), Some("msg-42"));
}

#[tokio::test]
async fn given_valid_input_when_executing_then_success_envelope() {
    let tool = tool(Script::Succeed);
    let input = tool
        .validate_input(&json!({ "audio_data": valid_audio_b64() }))
        .unwrap();

    let response = tool.execute(input, Some("inv-1".to_string())).await;

    assert!(response.success);
    assert_eq!(response.transcription.as_deref(), Some("mock transcript"));
    assert_eq!(response.word_count, 2);
    assert!((response.duration_seconds - 1.0).abs() < f64::EPSILON);
    assert!(response.error.is_none());
    assert!(response.error_type.is_none());

    let metadata = response.metadata.unwrap();
    assert_eq!(metadata.invocation_id.as_deref(), Some("inv-1"));
    assert_eq!(metadata.original_format, Some("wav"));
}

#[tokio::test]
async fn given_unrecognized_audio_when_executing_then_format_error_envelope() {
    let tool = tool(Script::Succeed);
    let input = tool
        .validate_input(&json!({ "audio_data": to_base64(b"garbage, not audio") }))
        .unwrap();

    let response = tool.execute(input, None).await;

    assert!(!response.success);
    assert_eq!(response.error_type, Some(ErrorType::FormatError));
    assert!(response.transcription.is_none());
}

#[tokio::test]
async fn given_timeout_failure_when_executing_then_timeout_error_envelope() {
    let tool = tool(Script::Fail(|| {
        RecognitionError::Timeout(Duration::from_secs(30))
    }));
    let input = tool
        .validate_input(&json!({ "audio_data": valid_audio_b64() }))
        .unwrap();

    let response = tool.execute(input, None).await;

    assert!(!response.success);
    assert_eq!(response.error_type, Some(ErrorType::TimeoutError));
}

#[tokio::test]
async fn given_quota_failure_when_executing_then_quota_error_envelope() {
    let tool = tool(Script::Fail(|| RecognitionError::Quota("exhausted".into())));
    let input = tool
        .validate_input(&json!({ "audio_data": valid_audio_b64() }))
        .unwrap();

    let response = tool.execute(input, None).await;

    assert_eq!(response.error_type, Some(ErrorType::QuotaError));
}

#[tokio::test]
async fn given_auth_failure_when_executing_then_generic_api_error_envelope() {
    let tool = tool(Script::Fail(|| {
        RecognitionError::Auth("token rejected upstream".into())
    }));
    let input = tool
        .validate_input(&json!({ "audio_data": valid_audio_b64() }))
        .unwrap();

    let response = tool.execute(input, None).await;

    assert_eq!(response.error_type, Some(ErrorType::ApiError));
    // Generic advice only, no credential detail
    assert!(!response.error.unwrap().contains("token"));
}

#[tokio::test]
async fn given_transient_exhaustion_when_executing_then_api_error_envelope() {
    let tool = tool(Script::Fail(|| {
        RecognitionError::Transient("unavailable".into())
    }));
    let input = tool
        .validate_input(&json!({ "audio_data": valid_audio_b64() }))
        .unwrap();

    let response = tool.execute(input, None).await;

    assert_eq!(response.error_type, Some(ErrorType::ApiError));
}

#[tokio::test]
async fn given_invalid_backend_payload_when_executing_then_transcription_error_envelope() {
    let tool = tool(Script::Fail(|| {
        RecognitionError::InvalidResponse("truncated json".into())
    }));
    let input = tool
        .validate_input(&json!({ "audio_data": valid_audio_b64() }))
        .unwrap();

    let response = tool.execute(input, None).await;

    assert_eq!(response.error_type, Some(ErrorType::TranscriptionError));
}

#[test]
fn given_error_types_when_serializing_then_snake_case_vocabulary() {
    assert_eq!(
        serde_json::to_value(ErrorType::ValidationError).unwrap(),
        "validation_error"
    );
    assert_eq!(
        serde_json::to_value(ErrorType::DurationError).unwrap(),
        "duration_error"
    );
    assert_eq!(
        serde_json::to_value(ErrorType::ApiError).unwrap(),
        "api_error"
    );
    assert_eq!(ErrorType::ConversionError.as_str(), "conversion_error");
}
