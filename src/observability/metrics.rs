//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by method, status
//! - `gateway_request_duration_seconds` (histogram): latency
//! - `gateway_retries_total` (counter): auth-failure retries issued
//! - `gateway_token_fetches_total` (counter): OAuth token requests
//! - `gateway_token_cache_{hits,misses}_total` (counters)
//! - `gateway_backend_cache_{hits,misses}_total` (counters)
//! - `gateway_{token,backend}_cache_size` (gauges)

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on the given address.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter started"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one completed proxied request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    metrics::counter!(
        "gateway_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "gateway_request_duration_seconds",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_retry() {
    metrics::counter!("gateway_retries_total").increment(1);
}

pub fn record_token_fetch() {
    metrics::counter!("gateway_token_fetches_total").increment(1);
}

pub fn record_token_cache_hit() {
    metrics::counter!("gateway_token_cache_hits_total").increment(1);
}

pub fn record_token_cache_miss() {
    metrics::counter!("gateway_token_cache_misses_total").increment(1);
}

pub fn record_backend_cache_hit() {
    metrics::counter!("gateway_backend_cache_hits_total").increment(1);
}

pub fn record_backend_cache_miss() {
    metrics::counter!("gateway_backend_cache_misses_total").increment(1);
}

pub fn record_token_cache_size(size: usize) {
    metrics::gauge!("gateway_token_cache_size").set(size as f64);
}

pub fn record_backend_cache_size(size: usize) {
    metrics::gauge!("gateway_backend_cache_size").set(size as f64);
}
