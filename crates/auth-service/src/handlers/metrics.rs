//! Prometheus metrics endpoint handler.
//!
//! The endpoint is unauthenticated so Prometheus can scrape it. Metric labels
//! are bounded and carry no identifiers.

use axum::{extract::State, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

/// Handler for GET /metrics
#[tracing::instrument(skip_all, name = "auth.metrics.scrape")]
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    handle.render()
}
