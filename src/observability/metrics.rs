//! Metrics collection and exposition.
//!
//! # Metrics
//! - `reloader_cycles_total` (counter): completed reconcile cycles
//! - `reloader_fetch_failures_total` (counter): failed descriptor fetches by service
//! - `reloader_deploys_total` (counter): deploy attempts by result
//! - `reloader_backend_routes` (gauge): routes discovered per service in the last cycle
//!
//! # Design Decisions
//! - Recording is a no-op until an exporter is installed
//! - Labels stay low-cardinality: service name and result only

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

pub fn record_cycle() {
    counter!("reloader_cycles_total").increment(1);
}

pub fn record_fetch_failure(service: &str) {
    counter!("reloader_fetch_failures_total", "service" => service.to_string()).increment(1);
}

pub fn record_deploy(success: bool) {
    let result = if success { "success" } else { "failure" };
    counter!("reloader_deploys_total", "result" => result).increment(1);
}

pub fn record_backend_routes(service: &str, count: usize) {
    gauge!("reloader_backend_routes", "service" => service.to_string()).set(count as f64);
}
