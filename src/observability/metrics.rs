//! Metrics collection and exposition.
//!
//! # Metrics
//! - `prepared_responses_total` (counter): served responses by status, encoding
//! - `prepared_artifacts_total` (counter): artifacts mounted at startup

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(
            address = %addr,
            error = %e,
            "Failed to install metrics exporter"
        ),
    }
}

/// Count one terminal serve action. `encoding` is `None` for 304s.
pub fn record_response(status: u16, encoding: Option<&str>) {
    ::metrics::counter!(
        "prepared_responses_total",
        "status" => status.to_string(),
        "encoding" => encoding.unwrap_or("none").to_string()
    )
    .increment(1);
}

/// Count an artifact mounted by the server.
pub fn record_artifact_mounted() {
    ::metrics::counter!("prepared_artifacts_total").increment(1);
}
