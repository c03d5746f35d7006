//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define controller metrics (events, probes, pool mutations, membership)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `balancer_events_total` (counter): pod events by role
//! - `balancer_snapshots_skipped_total` (counter): incomplete snapshots by reason
//! - `balancer_probe_total` (counter): admission probes by outcome
//! - `balancer_probe_duration_seconds` (histogram): time spent probing
//! - `balancer_pool_mutations_total` (counter): store inserts and deletes
//! - `balancer_reloads_total` (counter): front-end reloads
//! - `balancer_members` (gauge): tracked backends
//! - `balancer_frontend_available` (gauge): 1=available, 0=unavailable
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed, so tests need no setup

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_event(role: &'static str) {
    counter!("balancer_events_total", "role" => role).increment(1);
}

pub fn record_skipped(reason: &'static str) {
    counter!("balancer_snapshots_skipped_total", "reason" => reason).increment(1);
}

pub fn record_probe(healthy: bool, elapsed: Duration) {
    let outcome = if healthy { "healthy" } else { "exhausted" };
    counter!("balancer_probe_total", "outcome" => outcome).increment(1);
    histogram!("balancer_probe_duration_seconds").record(elapsed.as_secs_f64());
}

pub fn record_pool_mutation(op: &'static str) {
    counter!("balancer_pool_mutations_total", "op" => op).increment(1);
}

pub fn record_reload() {
    counter!("balancer_reloads_total").increment(1);
}

pub fn record_membership(members: usize, front_end_available: bool) {
    gauge!("balancer_members").set(members as f64);
    gauge!("balancer_frontend_available").set(if front_end_available { 1.0 } else { 0.0 });
}
