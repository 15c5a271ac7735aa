//! camunda-api: the scrape endpoint.
//!
//! # Routes
//!
//! | Method | Path | Description |
//! |---|---|---|
//! | GET | `/metrics` | Prometheus exposition of the registry |
//! | GET | `/healthz` | Liveness probe |

pub mod handlers;

use axum::Router;
use axum::routing::get;
use camunda_sink::Registry;

/// Shared state for handlers.
#[derive(Clone)]
pub struct ApiState {
    pub registry: Registry,
}

/// Build the exporter router.
pub fn build_router(registry: Registry) -> Router {
    let state = ApiState { registry };

    Router::new()
        .route("/metrics", get(handlers::prometheus_metrics))
        .route("/healthz", get(handlers::healthz))
        .with_state(state)
}
