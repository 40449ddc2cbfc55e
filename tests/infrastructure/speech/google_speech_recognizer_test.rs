use std::time::Duration;

use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

use speechgate::application::ports::{
    RecognitionError, RecognitionRequest, SpeechRecognizer,
};
use speechgate::domain::CanonicalAudio;
use speechgate::infrastructure::speech::GoogleSpeechRecognizer;

const TEST_TIMEOUT: Duration = Duration::from_secs(5);

async fn start_mock_speech_server(
    response_status: u16,
    response_body: &'static str,
) -> (String, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let app = Router::new().route(
        "/v1/speech:recognize",
        post(move || async move {
            let status = axum::http::StatusCode::from_u16(response_status).unwrap();
            (status, response_body).into_response()
        }),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (base_url, shutdown_tx)
}

fn request() -> RecognitionRequest {
    RecognitionRequest::new(
        CanonicalAudio::from_samples(&vec![0i16; 16_000]),
        "en-US".to_string(),
        true,
        false,
    )
}

#[tokio::test]
async fn given_single_alternative_when_recognizing_then_returns_transcript() {
    let body = r#"{"results": [{"alternatives": [
        {"transcript": "Hello from the backend", "confidence": 0.92}
    ]}]}"#;
    let (base_url, shutdown_tx) = start_mock_speech_server(200, body).await;

    let recognizer = GoogleSpeechRecognizer::new(&base_url, "test-token", TEST_TIMEOUT).unwrap();
    let result = recognizer.recognize(&request()).await.unwrap();

    assert_eq!(result.transcript, "Hello from the backend");
    assert!((result.confidence - 0.92).abs() < 1e-6);
    assert_eq!(result.language_code, "en-US");
    assert!((result.duration_seconds - 1.0).abs() < f64::EPSILON);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_multiple_alternatives_when_recognizing_then_highest_confidence_wins() {
    let body = r#"{"results": [{"alternatives": [
        {"transcript": "first guess", "confidence": 0.41},
        {"transcript": "better guess", "confidence": 0.87}
    ]}]}"#;
    let (base_url, shutdown_tx) = start_mock_speech_server(200, body).await;

    let recognizer = GoogleSpeechRecognizer::new(&base_url, "test-token", TEST_TIMEOUT).unwrap();
    let result = recognizer.recognize(&request()).await.unwrap();

    assert_eq!(result.transcript, "better guess");
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_zero_results_when_recognizing_then_returns_empty_success() {
    let (base_url, shutdown_tx) = start_mock_speech_server(200, r#"{"results": []}"#).await;

    let recognizer = GoogleSpeechRecognizer::new(&base_url, "test-token", TEST_TIMEOUT).unwrap();
    let result = recognizer.recognize(&request()).await.unwrap();

    assert_eq!(result.transcript, "");
    assert_eq!(result.confidence, 0.0);
    assert_eq!(result.word_count(), 0);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_missing_results_field_when_recognizing_then_returns_empty_success() {
    let (base_url, shutdown_tx) = start_mock_speech_server(200, "{}").await;

    let recognizer = GoogleSpeechRecognizer::new(&base_url, "test-token", TEST_TIMEOUT).unwrap();
    let result = recognizer.recognize(&request()).await.unwrap();

    assert_eq!(result.transcript, "");
    assert_eq!(result.confidence, 0.0);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_word_offsets_when_recognizing_then_parses_seconds() {
    let body = r#"{"results": [{"alternatives": [
        {"transcript": "hello world", "confidence": 0.9, "words": [
            {"word": "hello", "startTime": "0s", "endTime": "0.700s"},
            {"word": "world", "startTime": "0.700s", "endTime": "1.300s"}
        ]}
    ]}]}"#;
    let (base_url, shutdown_tx) = start_mock_speech_server(200, body).await;

    let recognizer = GoogleSpeechRecognizer::new(&base_url, "test-token", TEST_TIMEOUT).unwrap();
    let result = recognizer.recognize(&request()).await.unwrap();

    assert_eq!(result.words.len(), 2);
    assert_eq!(result.words[1].word, "world");
    assert!((result.words[1].start_seconds - 0.7).abs() < 1e-9);
    assert!((result.words[1].end_seconds - 1.3).abs() < 1e-9);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_unauthorized_status_when_recognizing_then_returns_auth_error() {
    let (base_url, shutdown_tx) =
        start_mock_speech_server(401, r#"{"error": {"message": "bad key"}}"#).await;

    let recognizer = GoogleSpeechRecognizer::new(&base_url, "bad-token", TEST_TIMEOUT).unwrap();
    let result = recognizer.recognize(&request()).await;

    assert!(matches!(result, Err(RecognitionError::Auth(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_forbidden_status_when_recognizing_then_auth_error_excludes_body() {
    let (base_url, shutdown_tx) =
        start_mock_speech_server(403, r#"{"error": {"message": "secret detail"}}"#).await;

    let recognizer = GoogleSpeechRecognizer::new(&base_url, "test-token", TEST_TIMEOUT).unwrap();
    let error = recognizer.recognize(&request()).await.unwrap_err();

    assert!(matches!(error, RecognitionError::Auth(_)));
    assert!(!error.to_string().contains("secret detail"));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_rate_limited_status_when_recognizing_then_returns_quota_error() {
    let (base_url, shutdown_tx) = start_mock_speech_server(429, "slow down").await;

    let recognizer = GoogleSpeechRecognizer::new(&base_url, "test-token", TEST_TIMEOUT).unwrap();
    let result = recognizer.recognize(&request()).await;

    assert!(matches!(result, Err(RecognitionError::Quota(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_server_error_status_when_recognizing_then_returns_transient_error() {
    let (base_url, shutdown_tx) = start_mock_speech_server(503, "overloaded").await;

    let recognizer = GoogleSpeechRecognizer::new(&base_url, "test-token", TEST_TIMEOUT).unwrap();
    let result = recognizer.recognize(&request()).await;

    assert!(matches!(result, Err(RecognitionError::Transient(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_bad_request_status_when_recognizing_then_returns_rejected_error() {
    let (base_url, shutdown_tx) =
        start_mock_speech_server(400, r#"{"error": {"message": "bad encoding"}}"#).await;

    let recognizer = GoogleSpeechRecognizer::new(&base_url, "test-token", TEST_TIMEOUT).unwrap();
    let result = recognizer.recognize(&request()).await;

    assert!(matches!(result, Err(RecognitionError::Rejected(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_unparseable_success_body_when_recognizing_then_returns_invalid_response() {
    let (base_url, shutdown_tx) = start_mock_speech_server(200, "not json at all").await;

    let recognizer = GoogleSpeechRecognizer::new(&base_url, "test-token", TEST_TIMEOUT).unwrap();
    let result = recognizer.recognize(&request()).await;

    assert!(matches!(result, Err(RecognitionError::InvalidResponse(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_slow_backend_when_recognizing_then_returns_timeout_error() {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let app = Router::new().route(
        "/v1/speech:recognize",
        post(|| async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            "too late"
        }),
    );
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    let recognizer =
        GoogleSpeechRecognizer::new(&base_url, "test-token", Duration::from_millis(100)).unwrap();
    let result = recognizer.recognize(&request()).await;

    assert!(matches!(result, Err(RecognitionError::Timeout(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_unreachable_backend_when_recognizing_then_returns_transient_error() {
    // Nothing listens on this port
    let recognizer =
        GoogleSpeechRecognizer::new("http://127.0.0.1:9", "test-token", TEST_TIMEOUT).unwrap();

    let result = recognizer.recognize(&request()).await;

    assert!(matches!(
        result,
        Err(RecognitionError::Transient(_)) | Err(RecognitionError::Timeout(_))
    ));
}

#[test]
fn given_empty_token_when_constructing_then_fails_as_auth_error() {
    let result = GoogleSpeechRecognizer::new("http://localhost:1234", "  ", TEST_TIMEOUT);

    assert!(matches!(result, Err(RecognitionError::Auth(_))));
}

#[test]
fn given_invalid_endpoint_when_constructing_then_fails_as_rejected() {
    let result = GoogleSpeechRecognizer::new("not a url", "token", TEST_TIMEOUT);

    assert!(matches!(result, Err(RecognitionError::Rejected(_))));
}
