//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by endpoint, status
//! - `gateway_request_duration_seconds` (histogram): request latency
//! - `gateway_rpc_calls_total` (counter): RPC calls by method, outcome
//! - `gateway_rpc_call_duration_seconds` (histogram): RPC latency
//! - `gateway_submissions_total` (counter): submissions by outcome

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a completed HTTP request.
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

/// Record an outbound RPC call.
pub fn record_rpc_call(method: &'static str, ok: bool, start: Instant) {
    let outcome = if ok { "ok" } else { "error" };
    counter!("gateway_rpc_calls_total", "method" => method, "outcome" => outcome).increment(1);
    histogram!("gateway_rpc_call_duration_seconds", "method" => method)
        .record(start.elapsed().as_secs_f64());
}

/// Record the outcome of a multisig submission.
pub fn record_submission(outcome: &'static str) {
    counter!("gateway_submissions_total", "outcome" => outcome).increment(1);
}
