//! Health, readiness and metrics handlers.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

#[derive(Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    pub log_store: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// GET /health - Liveness check
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// GET /ready - Readiness check (verifies the log store can be opened)
pub async fn ready_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    let backend = state.log_store.backend_name().to_string();

    let (status, response) = match state.log_store.open().await {
        Ok(mut collection) => {
            collection.close().await;
            (
                StatusCode::OK,
                ReadyResponse {
                    ready: true,
                    log_store: backend,
                    error: None,
                },
            )
        }
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            ReadyResponse {
                ready: false,
                log_store: backend,
                error: Some(e.to_string()),
            },
        ),
    };

    (status, Json(response)).into_response()
}

/// GET /metrics - Prometheus metrics
pub async fn metrics_handler(Extension(state): Extension<Arc<AppState>>) -> Response {
    match &state.prometheus {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "Metrics recorder not installed").into_response(),
    }
}
