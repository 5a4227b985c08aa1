//! Metrics collection and exposition.
//!
//! # Metrics
//! - `pool_monitor_poll_cycles_total` (counter): poll cycles by outcome
//! - `pool_monitor_fetch_failures_total` (counter): failed fetches by resource
//! - `pool_monitor_transitions_total` (counter): member state changes
//! - `pool_monitor_members` (gauge): members in the last snapshot by state

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::snapshot::Snapshot;
use crate::upstream::Resource;

/// Initialize the Prometheus exporter on the given address.
pub fn init_metrics(addr: SocketAddr) {
    let builder = PrometheusBuilder::new().with_http_listener(addr);

    match builder.install() {
        Ok(_) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install Prometheus recorder"),
    }
}

/// Record a finished poll cycle ("published" or "failed").
pub fn record_cycle(outcome: &'static str) {
    counter!("pool_monitor_poll_cycles_total", "outcome" => outcome).increment(1);
}

pub fn record_fetch_failure(resource: &Resource) {
    counter!("pool_monitor_fetch_failures_total", "resource" => resource.kind()).increment(1);
}

pub fn record_transitions(count: usize) {
    counter!("pool_monitor_transitions_total").increment(count as u64);
}

/// Update member gauges from a freshly published snapshot.
pub fn record_snapshot(snapshot: &Snapshot) {
    let up = snapshot.count_up();
    let down = snapshot.count_down();
    let other = snapshot.members.len() - up - down;

    gauge!("pool_monitor_members", "state" => "up").set(up as f64);
    gauge!("pool_monitor_members", "state" => "down").set(down as f64);
    gauge!("pool_monitor_members", "state" => "other").set(other as f64);
}
