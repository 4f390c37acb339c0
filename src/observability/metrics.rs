//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_publish_requests_total` (counter): publishes by HTTP status
//! - `gateway_publish_duration_seconds` (histogram): end-to-end latency
//! - `gateway_publish_payload_bytes_total` (counter): accepted payload bytes
//!
//! Recording is a no-op until an exporter is installed.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter with its own scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one finished publish.
pub fn record_publish(status: u16, start: Instant) {
    metrics::counter!("gateway_publish_requests_total", "status" => status.to_string())
        .increment(1);
    metrics::histogram!("gateway_publish_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record payload bytes handed to the backend.
pub fn record_payload_bytes(len: usize) {
    metrics::counter!("gateway_publish_payload_bytes_total").increment(len as u64);
}
