//! Metrics collection and exposition.
//!
//! # Metrics
//! - `orchestrator_calls_total` (counter): orchestrated calls by method, outcome
//! - `orchestrator_name_probes_total` (counter): `name()` probes by outcome
//! - `orchestrator_pause_seconds` (histogram): pacing pauses by kind

use std::net::SocketAddr;
use std::time::Duration;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_call(method: &str, outcome: &'static str) {
    counter!(
        "orchestrator_calls_total",
        "method" => method.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_name_probe(outcome: &'static str) {
    counter!("orchestrator_name_probes_total", "outcome" => outcome).increment(1);
}

pub fn record_pause(kind: &'static str, delay: Duration) {
    histogram!("orchestrator_pause_seconds", "kind" => kind).record(delay.as_secs_f64());
}
