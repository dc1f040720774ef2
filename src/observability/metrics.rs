//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define gateway metrics (requests, latency, downstream calls, errors)
//! - Expose Prometheus-compatible metrics endpoint
//! - Tag every series with the configured `application` label
//!
//! # Metrics
//! - `gateway_requests_total` (counter): inbound requests by method, path, status
//! - `gateway_request_duration_seconds` (histogram): inbound latency
//! - `gateway_downstream_calls_total` (counter): user-service calls by operation, outcome
//! - `gateway_proxy_errors_total` (counter): classified errors by code
//!
//! Recording is a no-op until [`init_metrics`] installs a recorder.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr, application: &str) -> Result<(), BuildError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .add_global_label("application", application)
        .install()?;

    tracing::info!(address = %addr, application, "Metrics exporter listening");
    Ok(())
}

/// Record a completed inbound request.
pub fn record_request(method: &str, path: &str, status: u16, start: Instant) {
    let status = status.to_string();
    counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status.clone()
    )
    .increment(1);
    histogram!(
        "gateway_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record one outbound call to the user service.
pub fn record_downstream_call(operation: &'static str, outcome: &'static str) {
    counter!(
        "gateway_downstream_calls_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}

/// Record a classified proxy error.
pub fn record_proxy_error(code: &'static str) {
    counter!("gateway_proxy_errors_total", "code" => code).increment(1);
}
