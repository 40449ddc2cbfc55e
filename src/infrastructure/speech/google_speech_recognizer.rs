use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::application::ports::{RecognitionError, RecognitionRequest, SpeechRecognizer};
use crate::domain::{TranscriptionResult, WordTiming};

const ENCODING: &str = "LINEAR16";
const MODEL: &str = "default";

/// Maximum backend body length echoed into error messages.
const MAX_ERROR_BODY: usize = 200;

/// REST client for the cloud speech-to-text recognize endpoint.
///
/// Construction is eager: an empty token or unparseable endpoint fails here,
/// at startup, never on the first clip.
pub struct GoogleSpeechRecognizer {
    client: Client,
    endpoint: String,
    api_token: String,
    request_timeout: Duration,
}

impl GoogleSpeechRecognizer {
    pub fn new(
        endpoint: &str,
        api_token: &str,
        request_timeout: Duration,
    ) -> Result<Self, RecognitionError> {
        if api_token.trim().is_empty() {
            return Err(RecognitionError::Auth(
                "no API token configured".to_string(),
            ));
        }
        reqwest::Url::parse(endpoint)
            .map_err(|e| RecognitionError::Rejected(format!("invalid endpoint: {e}")))?;

        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .expect("reqwest client build never fails with valid TLS config");

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_token: api_token.to_string(),
            request_timeout,
        })
    }
}

#[async_trait]
impl SpeechRecognizer for GoogleSpeechRecognizer {
    async fn recognize(
        &self,
        request: &RecognitionRequest,
    ) -> Result<TranscriptionResult, RecognitionError> {
        let url = format!("{}/v1/speech:recognize", self.endpoint);

        let body = RecognizeBody {
            config: RecognitionConfig {
                encoding: ENCODING,
                sample_rate_hertz: request.audio().sample_rate(),
                language_code: request.language_code(),
                enable_automatic_punctuation: request.punctuation(),
                enable_word_time_offsets: request.word_timings(),
                model: MODEL,
            },
            audio: RecognitionAudio {
                content: general_purpose::STANDARD.encode(request.audio().pcm()),
            },
        };

        tracing::debug!(
            language_code = request.language_code(),
            audio_bytes = request.audio().pcm().len(),
            "Sending audio to recognition backend"
        );

        let started = Instant::now();

        let send = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(&body)
            .send();

        let response = match tokio::time::timeout(self.request_timeout, send).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) if e.is_timeout() => {
                return Err(RecognitionError::Timeout(self.request_timeout));
            }
            Ok(Err(e)) => {
                return Err(RecognitionError::Transient(format!("request: {e}")));
            }
            Err(_) => {
                return Err(RecognitionError::Timeout(self.request_timeout));
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_error_status(status, &body));
        }

        let parsed: RecognizeResponse = response
            .json()
            .await
            .map_err(|e| RecognitionError::InvalidResponse(format!("parse response: {e}")))?;

        let latency = started.elapsed();
        let duration_seconds = request.audio_duration_seconds();
        let result = build_result(
            parsed,
            request.language_code().to_string(),
            duration_seconds,
            latency,
        );

        tracing::info!(
            confidence = result.confidence,
            language_code = %result.language_code,
            latency_ms = latency.as_millis() as u64,
            word_count = result.word_count(),
            "Recognition completed"
        );

        Ok(result)
    }
}

fn map_error_status(status: StatusCode, body: &str) -> RecognitionError {
    match status {
        // Credential detail is deliberately discarded.
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            RecognitionError::Auth(format!("status {}", status.as_u16()))
        }
        StatusCode::TOO_MANY_REQUESTS => {
            RecognitionError::Quota(format!("status {}", status.as_u16()))
        }
        s if s.is_server_error() => RecognitionError::Transient(format!(
            "status {}: {}",
            s.as_u16(),
            truncate(body, MAX_ERROR_BODY)
        )),
        s => RecognitionError::Rejected(format!(
            "status {}: {}",
            s.as_u16(),
            truncate(body, MAX_ERROR_BODY)
        )),
    }
}

/// Select the highest-confidence alternative across the top-level results.
/// Zero recognized segments is a valid empty result, not an error.
fn build_result(
    response: RecognizeResponse,
    language_code: String,
    duration_seconds: f64,
    latency: Duration,
) -> TranscriptionResult {
    let best = response
        .results
        .iter()
        .flat_map(|r| r.alternatives.iter())
        .max_by(|a, b| a.confidence.total_cmp(&b.confidence));

    let Some(best) = best else {
        tracing::info!(duration_seconds, "No speech detected in audio");
        return TranscriptionResult::no_speech(language_code, duration_seconds, latency);
    };

    let words = best
        .words
        .iter()
        .map(|w| WordTiming {
            word: w.word.clone(),
            start_seconds: parse_offset(w.start_time.as_deref()),
            end_seconds: parse_offset(w.end_time.as_deref()),
        })
        .collect();

    TranscriptionResult {
        transcript: best.transcript.clone(),
        confidence: best.confidence.clamp(0.0, 1.0),
        language_code,
        duration_seconds,
        words,
        latency,
    }
}

/// Offsets arrive as `"1.300s"` strings; unparseable values fall back to 0.
fn parse_offset(value: Option<&str>) -> f64 {
    value
        .and_then(|v| v.trim_end_matches('s').parse::<f64>().ok())
        .unwrap_or(0.0)
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

#[derive(Serialize)]
struct RecognizeBody<'a> {
    config: RecognitionConfig<'a>,
    audio: RecognitionAudio,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RecognitionConfig<'a> {
    encoding: &'static str,
    sample_rate_hertz: u32,
    language_code: &'a str,
    enable_automatic_punctuation: bool,
    enable_word_time_offsets: bool,
    model: &'static str,
}

#[derive(Serialize)]
struct RecognitionAudio {
    content: String,
}

#[derive(Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<SpeechResult>,
}

#[derive(Deserialize)]
struct SpeechResult {
    #[serde(default)]
    alternatives: Vec<SpeechAlternative>,
}

#[derive(Deserialize)]
struct SpeechAlternative {
    #[serde(default)]
    transcript: String,
    #[serde(default)]
    confidence: f32,
    #[serde(default)]
    words: Vec<SpeechWord>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpeechWord {
    word: String,
    start_time: Option<String>,
    end_time: Option<String>,
}
