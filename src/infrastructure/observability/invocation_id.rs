use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use uuid::Uuid;

pub const INVOCATION_ID_HEADER: &str = "x-invocation-id";

/// Opaque identifier the invoking host can use to correlate a tool call
/// with its log records.
#[derive(Clone, Debug)]
pub struct InvocationId(pub String);

pub async fn invocation_id_middleware(mut request: Request, next: Next) -> Response {
    let invocation_id = request
        .headers()
        .get(INVOCATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    request
        .extensions_mut()
        .insert(InvocationId(invocation_id.clone()));

    let span = tracing::info_span!(
        "invocation",
        invocation_id = %invocation_id,
        method = %request.method(),
        uri = %request.uri().path()
    );

    let _guard = span.enter();

    let mut response = next.run(request).await;

    if let Ok(header_value) = HeaderValue::from_str(&invocation_id) {
        response
            .headers_mut()
            .insert(INVOCATION_ID_HEADER, header_value);
    }

    response
}
