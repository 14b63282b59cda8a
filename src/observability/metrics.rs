//! Metrics collection and exposition.
//!
//! # Metrics
//! - `bridge_invocations_total` (counter): calls by operation, verb, outcome
//! - `bridge_invocation_duration_seconds` (histogram): latency by operation
//! - `bridge_downstream_healthy` (gauge): 1=healthy, 0=unhealthy
//! - `bridge_health_checks_total` (counter): probes by result
//!
//! # Design Decisions
//! - Method names are not labels (unbounded cardinality)
//! - Recording without an installed exporter is a no-op

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one Execute/Compensate call.
pub fn record_invocation(
    operation: &'static str,
    verb: &'static str,
    outcome: &'static str,
    start: Instant,
) {
    metrics::counter!(
        "bridge_invocations_total",
        "operation" => operation,
        "verb" => verb,
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("bridge_invocation_duration_seconds", "operation" => operation)
        .record(start.elapsed().as_secs_f64());
}

/// Record one health probe.
pub fn record_health(healthy: bool) {
    let result = if healthy { "healthy" } else { "unhealthy" };
    metrics::counter!("bridge_health_checks_total", "result" => result).increment(1);
    metrics::gauge!("bridge_downstream_healthy").set(if healthy { 1.0 } else { 0.0 });
}
