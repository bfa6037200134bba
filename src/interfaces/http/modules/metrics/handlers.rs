//! Prometheus scrape endpoint
//!
//! Renders the global `metrics-exporter-prometheus` recorder as the
//! Prometheus text format. Counters are emitted where the work happens
//! (e.g. `gate_commands_total` in the gate service).

use axum::{extract::State, http::header, http::StatusCode, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

/// Shared state for the metrics endpoint
#[derive(Clone)]
pub struct MetricsState {
    pub handle: PrometheusHandle,
}

/// `GET /metrics` — no auth, meant for an internal scraper.
pub async fn prometheus_metrics(State(state): State<MetricsState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        state.handle.render(),
    )
}
