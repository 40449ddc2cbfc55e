use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use speechgate::application::services::{
    AudioValidator, RecognitionOptions, RetryPolicy, TranscriptionService,
};
use speechgate::infrastructure::audio::AudioDecoderFactory;
use speechgate::infrastructure::observability::{init_tracing, TracingConfig};
use speechgate::infrastructure::speech::GoogleSpeechRecognizer;
use speechgate::presentation::tool::TranscribeTool;
use speechgate::presentation::{create_router, AppState, Settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env();
    settings.validate()?;

    init_tracing(
        TracingConfig {
            environment: std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "local".to_string()),
            level: settings.logging.level.clone(),
            json_format: settings.logging.json_format,
        },
        settings.server.port,
    );

    tracing::info!(
        decode_strategy = settings.audio.decode_strategy.as_str(),
        max_duration_seconds = settings.audio.max_duration_seconds,
        max_size_bytes = settings.audio.max_size_bytes,
        "Audio pipeline configured"
    );

    let decoder = AudioDecoderFactory::create(settings.audio.decode_strategy)?;

    let recognizer = Arc::new(GoogleSpeechRecognizer::new(
        &settings.recognition.endpoint,
        &settings.recognition.api_token,
        Duration::from_secs(settings.recognition.request_timeout_seconds),
    )?);

    let service = Arc::new(TranscriptionService::new(
        AudioValidator::new(
            settings.audio.max_duration_seconds,
            settings.audio.max_size_bytes,
        ),
        decoder,
        recognizer,
        RetryPolicy::new(
            settings.retry.max_attempts,
            Duration::from_millis(settings.retry.base_delay_ms),
        ),
        RecognitionOptions {
            punctuation: settings.recognition.punctuation,
            word_timings: settings.recognition.word_timings,
        },
    ));

    let tool = Arc::new(TranscribeTool::new(
        service,
        settings.recognition.default_language.clone(),
    ));

    let router = create_router(AppState { tool });

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
