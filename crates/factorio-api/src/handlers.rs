//! HTTP handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use factorio_metrics::ScrapeCoordinator;
use tracing::error;

use crate::ApiState;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Landing page text: where metrics live and how the last load went.
fn status_page(coordinator: &ScrapeCoordinator) -> String {
    let last_error = coordinator
        .last_error()
        .unwrap_or_else(|| "none".to_string());
    format!(
        "Factorio Exporter\n\n\
         Metrics are served at /metrics\n\n\
         Snapshot file: {}\n\
         Snapshots loaded: {}\n\
         Last load error: {last_error}\n",
        coordinator.path().display(),
        coordinator.loads(),
    )
}

/// GET /
///
/// Reading the load status waits for any in-flight scrape, so it runs on
/// the blocking pool like `/metrics`.
pub async fn index(State(state): State<ApiState>) -> impl IntoResponse {
    let coordinator = state.coordinator.clone();
    match tokio::task::spawn_blocking(move || status_page(&coordinator)).await {
        Ok(body) => (StatusCode::OK, [(CONTENT_TYPE, TEXT_PLAIN)], body),
        Err(e) => {
            error!(error = %e, "status task failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(CONTENT_TYPE, TEXT_PLAIN)],
                "status unavailable\n".to_string(),
            )
        }
    }
}

/// GET /healthz
///
/// Reports the exporter's own liveness only; a missing or broken snapshot
/// file does not fail it.
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

// ── Prometheus ─────────────────────────────────────────────────

/// GET /metrics
///
/// Runs one scrape on the blocking pool (the snapshot file is read
/// synchronously under the coordinator's lock). A failed load still answers
/// 200 with an empty exposition.
pub async fn prometheus_metrics(State(state): State<ApiState>) -> impl IntoResponse {
    let coordinator = state.coordinator.clone();
    let samples = match tokio::task::spawn_blocking(move || coordinator.scrape()).await {
        Ok(samples) => samples,
        Err(e) => {
            error!(error = %e, "scrape task failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(CONTENT_TYPE, TEXT_PLAIN)],
                "scrape failed\n".to_string(),
            );
        }
    };

    let body = factorio_metrics::render_prometheus(&samples);
    (
        StatusCode::OK,
        [(CONTENT_TYPE, factorio_metrics::CONTENT_TYPE)],
        body,
    )
}
