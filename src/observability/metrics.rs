//! Metrics collection and exposition.
//!
//! # Metrics
//! - `forwardhook_inbound_requests_total` (counter): inbound hooks by result
//! - `forwardhook_delivery_attempts_total` (counter): attempts by destination, outcome
//! - `forwardhook_dispatches_total` (counter): finished dispatchers by destination, state
//!
//! The `destination` label is the URL origin only; webhook paths often carry keys.
//! Recording is a no-op until an exporter is installed.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use url::Url;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Scheme, host and port of a destination URL.
pub fn destination_label(destination: &str) -> String {
    match Url::parse(destination) {
        Ok(url) if url.has_host() => url.origin().ascii_serialization(),
        _ => "invalid".to_string(),
    }
}

/// One inbound hook; `result` is "relayed" or "rejected".
pub fn record_inbound(result: &'static str) {
    metrics::counter!("forwardhook_inbound_requests_total", "result" => result).increment(1);
}

/// One delivery attempt.
pub fn record_attempt(destination: &str, outcome: &'static str) {
    metrics::counter!(
        "forwardhook_delivery_attempts_total",
        "destination" => destination_label(destination),
        "outcome" => outcome
    )
    .increment(1);
}

/// One dispatcher reaching a terminal state.
pub fn record_dispatch(destination: &str, state: &'static str) {
    metrics::counter!(
        "forwardhook_dispatches_total",
        "destination" => destination_label(destination),
        "state" => state
    )
    .increment(1);
}
