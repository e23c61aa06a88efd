use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, info_span, Instrument};

/// Request span with route, latency and status, attached to every request.
pub async fn observability_middleware(
    matched_path: MatchedPath,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let route = matched_path.as_str().to_string();
    let start_time = Instant::now();

    let span = info_span!(
        "http_request",
        method = %method,
        uri = %uri,
        route = %route,
        request_id = %uuid::Uuid::new_v4(),
    );

    let response = next.run(request).instrument(span).await;

    let duration = start_time.elapsed();
    info!(
        method = %method,
        route = %route,
        status = response.status().as_u16(),
        elapsed_ms = duration.as_millis() as u64,
        "request completed"
    );

    response
}
