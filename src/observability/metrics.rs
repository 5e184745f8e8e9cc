//! Metrics collection and exposition.
//!
//! # Metrics
//! - `resolver_probes_total` (counter): probes by endpoint URL and result
//! - `resolver_probe_duration_seconds` (histogram): probe latency
//! - `resolver_resolutions_total` (counter): uncached resolutions by chosen role
//! - `resolver_fallbacks_total` (counter): transport-failure fallbacks
//! - `gateway_upstream_requests_total` (counter): upstream attempts by role and outcome
//! - `gateway_upstream_duration_seconds` (histogram): time to response headers
//!
//! Without an installed recorder every call is a no-op.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Duration;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_probe(url: &str, reachable: bool, elapsed: Duration) {
    let result = if reachable { "reachable" } else { "unreachable" };
    counter!("resolver_probes_total", "endpoint" => url.to_string(), "result" => result).increment(1);
    histogram!("resolver_probe_duration_seconds", "endpoint" => url.to_string())
        .record(elapsed.as_secs_f64());
}

pub fn record_resolution(endpoint: &'static str) {
    counter!("resolver_resolutions_total", "endpoint" => endpoint).increment(1);
}

pub fn record_fallback(from: &'static str, to: &'static str) {
    counter!("resolver_fallbacks_total", "from" => from, "to" => to).increment(1);
}

pub fn record_upstream_request(endpoint: &'static str, outcome: &'static str, elapsed: Duration) {
    counter!("gateway_upstream_requests_total", "endpoint" => endpoint, "outcome" => outcome)
        .increment(1);
    histogram!("gateway_upstream_duration_seconds", "endpoint" => endpoint)
        .record(elapsed.as_secs_f64());
}
