use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::application::ports::{AudioDecoder, SpeechRecognizer};
use crate::infrastructure::observability::invocation_id_middleware;
use crate::presentation::handlers::{health_handler, list_tools_handler, transcribe_handler};
use crate::presentation::state::AppState;

pub fn create_router<D, R>(state: AppState<D, R>) -> Router
where
    D: AudioDecoder + 'static + ?Sized,
    R: SpeechRecognizer + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/v1/tools", get(list_tools_handler))
        .route("/api/v1/transcribe", post(transcribe_handler::<D, R>))
        .layer(middleware::from_fn(invocation_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}
