//! Metrics collection and exposition.
//!
//! # Metrics
//! - `alb_mock_requests_total` (counter): requests by route, status
//! - `alb_mock_request_duration_seconds` (histogram): dispatch latency by route
//! - `alb_mock_invocation_errors_total` (counter): failed invocations by function
//!
//! Recording is a no-op until [`init_metrics`] installs the Prometheus recorder.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_dispatch(route: &str, status: u16, start: Instant) {
    ::metrics::counter!(
        "alb_mock_requests_total",
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("alb_mock_request_duration_seconds", "route" => route.to_string())
        .record(start.elapsed().as_secs_f64());
}

pub fn record_invocation_error(function: &str) {
    ::metrics::counter!("alb_mock_invocation_errors_total", "function" => function.to_string())
        .increment(1);
}
