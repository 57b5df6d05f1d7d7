//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by action, status
//! - `gateway_request_duration_seconds` (histogram): end-to-end latency by action
//! - `gateway_upstream_duration_seconds` (histogram): outbound call latency
//! - `gateway_upstream_failures_total` (counter): transport failures by upstream
//!
//! Recording goes through the `metrics` facade and is a no-op until a
//! recorder is installed by [`init_metrics`].

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one finished inbound request.
pub fn record_request(action: &str, status: u16, start: Instant) {
    ::metrics::counter!(
        "gateway_requests_total",
        "action" => action.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("gateway_request_duration_seconds", "action" => action.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record one outbound call.
pub fn record_upstream(upstream: &'static str, start: Instant, reached: bool) {
    ::metrics::histogram!("gateway_upstream_duration_seconds", "upstream" => upstream)
        .record(start.elapsed().as_secs_f64());
    if !reached {
        ::metrics::counter!("gateway_upstream_failures_total", "upstream" => upstream).increment(1);
    }
}
