//! Metrics collection and exposition.
//!
//! # Metrics
//! - `config_requests_total` (counter): requests by endpoint, status
//! - `config_request_duration_seconds` (histogram): latency by endpoint
//! - `config_tree_nodes` (gauge): node count of the served tree
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed, so handlers and
//!   tests never depend on the exporter being enabled
//! - Labels are endpoint names, never raw paths, to keep cardinality fixed

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::observability::ObservabilityError;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), ObservabilityError> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| ObservabilityError::Metrics(e.to_string()))?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record a completed request.
pub fn record_request(endpoint: &'static str, status: u16, start: Instant) {
    counter!(
        "config_requests_total",
        "endpoint" => endpoint,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("config_request_duration_seconds", "endpoint" => endpoint)
        .record(start.elapsed().as_secs_f64());
}

/// Record the size of the tree being served.
pub fn record_tree_size(nodes: usize) {
    gauge!("config_tree_nodes").set(nodes as f64);
}
