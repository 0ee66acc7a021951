use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Access log for every request.
///
/// For the relay this fires once headers are sent, not when the stream
/// ends; stream completion is logged by the relay itself.
pub async fn audit_log(req: Request, next: Next) -> Response {
    let method = req.method().as_str().to_owned();
    let path = req.uri().path().to_owned();
    let started = Instant::now();

    let response = next.run(req).await;

    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;
    if status.is_server_error() {
        tracing::warn!(%method, %path, status = status.as_u16(), elapsed_ms, "http_request");
    } else {
        tracing::info!(%method, %path, status = status.as_u16(), elapsed_ms, "http_request");
    }

    response
}
