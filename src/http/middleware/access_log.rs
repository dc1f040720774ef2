//! Request access log and request metrics.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};

use crate::http::request::request_id;
use crate::observability::metrics;

/// Log every request on the way in and out, and record its latency.
///
/// The metric `path` label is the matched route template, never the raw
/// path, so user ids do not blow up label cardinality.
pub async fn access_log(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let request_id = request_id(&request).to_string();

    tracing::info!(request_id = %request_id, method = %method, path = %path, "Incoming request");

    let response = next.run(request).await;
    let status = response.status().as_u16();

    tracing::info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        status,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Completed request"
    );
    metrics::record_request(method.as_str(), &route, status, start);

    response
}
