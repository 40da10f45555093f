//! Metrics collection and exposition.
//!
//! # Metrics
//! - `dispatch_resolutions_total` (counter): resolutions by outcome
//! - `dispatch_fallbacks_total` (counter): popped fallbacks by kind
//! - `dispatch_resolution_duration_seconds` (histogram): time spent resolving

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Count a finished resolution.
pub fn record_resolution(outcome: &'static str, start: Instant) {
    metrics::counter!("dispatch_resolutions_total", "outcome" => outcome).increment(1);
    metrics::histogram!("dispatch_resolution_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

/// Count a fallback popped during backtracking.
pub fn record_fallback(kind: &'static str) {
    metrics::counter!("dispatch_fallbacks_total", "kind" => kind).increment(1);
}
