//! factorio-api — HTTP surface of the Factorio exporter.
//!
//! # Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/` | Landing page |
//! | GET | `/healthz` | Exporter liveness |
//! | GET | `/metrics` | Prometheus exposition |

pub mod handlers;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use factorio_metrics::ScrapeCoordinator;

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    pub coordinator: Arc<ScrapeCoordinator>,
}

/// Build the exporter router.
pub fn build_router(coordinator: Arc<ScrapeCoordinator>) -> Router {
    let state = ApiState { coordinator };

    Router::new()
        .route("/", get(handlers::index))
        .route("/healthz", get(handlers::healthz))
        .route("/metrics", get(handlers::prometheus_metrics))
        .with_state(state)
}
