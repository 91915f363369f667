//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by endpoint, status
//! - `gateway_request_duration_seconds` (histogram): latency by endpoint
//! - `gateway_memo_cache_total` (counter): memo lookups by result
//! - `gateway_upstream_fetch_total` (counter): fetches by target, outcome
//! - `gateway_upstream_fetch_duration_seconds` (histogram): fetch latency by target

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(endpoint: &'static str, status: u16, start: Instant) {
    counter!(
        "gateway_requests_total",
        "endpoint" => endpoint,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("gateway_request_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_memo_lookup(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    counter!("gateway_memo_cache_total", "result" => result).increment(1);
}

pub fn record_upstream_fetch(target: &str, outcome: &'static str, start: Instant) {
    counter!(
        "gateway_upstream_fetch_total",
        "target" => target.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    histogram!("gateway_upstream_fetch_duration_seconds", "target" => target.to_string())
        .record(start.elapsed().as_secs_f64());
}
