//! Metrics collection and exposition.
//!
//! # Metrics
//! - `prerender_decisions_total` (counter): classifier outcomes by `decision`
//! - `prerender_responses_total` (counter): rendered answers by `source`
//!   (`hook` or `service`)
//! - `prerender_failures_total` (counter): pipeline failures by `kind`
//! - `prerender_fetch_duration_seconds` (histogram): render service latency
//! - `prerender_upstream_requests_total` (counter): pass-through requests by `status`

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::matching::Decision;

/// Install the Prometheus recorder and its scrape endpoint.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_decision(decision: Decision) {
    counter!("prerender_decisions_total", "decision" => decision.as_str()).increment(1);
}

pub fn record_response(source: &'static str) {
    counter!("prerender_responses_total", "source" => source).increment(1);
}

pub fn record_failure(kind: &'static str) {
    counter!("prerender_failures_total", "kind" => kind).increment(1);
}

pub fn record_fetch(start: Instant) {
    histogram!("prerender_fetch_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_upstream(status: u16) {
    counter!("prerender_upstream_requests_total", "status" => status.to_string()).increment(1);
}
