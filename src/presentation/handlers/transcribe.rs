use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde_json::Value;

use crate::application::ports::{AudioDecoder, SpeechRecognizer};
use crate::infrastructure::observability::InvocationId;
use crate::presentation::state::AppState;
use crate::presentation::tool::ToolResponse;

/// Tool invocation endpoint. Every outcome is a response envelope; only
/// arguments that fail the input gate are also flagged at the HTTP level.
#[tracing::instrument(skip_all)]
pub async fn transcribe_handler<D, R>(
    State(state): State<AppState<D, R>>,
    Extension(InvocationId(invocation_id)): Extension<InvocationId>,
    Json(arguments): Json<Value>,
) -> impl IntoResponse
where
    D: AudioDecoder + 'static + ?Sized,
    R: SpeechRecognizer + 'static,
{
    let input = match state.tool.validate_input(&arguments) {
        Ok(input) => input,
        Err(e) => {
            tracing::warn!(error = %e, "Tool input rejected");
            return (
                StatusCode::BAD_REQUEST,
                Json(ToolResponse::input_failure(
                    &e,
                    state.tool.default_language().to_string(),
                    Some(invocation_id),
                )),
            )
                .into_response();
        }
    };

    let response = state.tool.execute(input, Some(invocation_id)).await;

    (StatusCode::OK, Json(response)).into_response()
}
