//! HTTP handlers.

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::{error, trace};

use crate::ApiState;

/// GET /metrics
pub async fn prometheus_metrics(State(state): State<ApiState>) -> Response {
    match camunda_sink::render_prometheus(&state.registry) {
        Ok(body) => {
            trace!(bytes = body.len(), "scrape");
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, camunda_sink::CONTENT_TYPE)],
                body,
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, "failed to encode metrics").into_response()
        }
    }
}

/// GET /healthz
pub async fn healthz() -> &'static str {
    "ok"
}
