//! HTTP router.

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::handlers;
use crate::state::AppState;

/// Build the HTTP router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Logs
        .route("/dashboard", get(handlers::dashboard_handler))
        .route("/api/logs", get(handlers::logs_handler))
        // Distribution lookup
        .route("/fishSelector", get(handlers::missing_name_handler))
        .route("/fishSelector/", get(handlers::missing_name_handler))
        .route(
            "/fishSelector/*fish_name",
            get(handlers::fish_selector_handler),
        )
        // Health and metrics
        .route("/health", get(handlers::health_handler))
        .route("/ready", get(handlers::ready_handler))
        .route("/metrics", get(handlers::metrics_handler))
        // Middleware
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
