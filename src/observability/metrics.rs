//! Metrics collection and exposition.
//!
//! # Metrics
//! - `mirror_requests_total` (counter): mirrored requests by method, status
//! - `mirror_request_duration_seconds` (histogram): end-to-end latency
//! - `mirror_upstream_duration_seconds` (histogram): per-upstream exchange time
//! - `mirror_secondary_failures_total` (counter): secondary failures by reason
//! - `mirror_comparisons_total` (counter): comparisons by level, sampled
//! - `mirror_comparison_duration_seconds` (histogram): comparator cost
//!
//! # Design Decisions
//! - Recording is a no-op until `init_metrics` installs the exporter
//! - Labels are low-cardinality; paths are never used as labels

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "mirror_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("mirror_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_upstream(role: &'static str, elapsed: Duration) {
    histogram!("mirror_upstream_duration_seconds", "upstream" => role).record(elapsed.as_secs_f64());
}

pub fn record_secondary_failure(reason: &'static str) {
    counter!("mirror_secondary_failures_total", "reason" => reason).increment(1);
}

pub fn record_comparison(level: &'static str, sampled: bool, duration_secs: f64) {
    counter!(
        "mirror_comparisons_total",
        "level" => level,
        "sampled" => if sampled { "true" } else { "false" }
    )
    .increment(1);
    histogram!("mirror_comparison_duration_seconds").record(duration_secs);
}
