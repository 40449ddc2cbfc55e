use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::presentation::tool::tool_schema;

/// Tool registration document consumed by the invoking host.
pub async fn list_tools_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "tools": [tool_schema()] })))
}
