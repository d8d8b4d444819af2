//! Log dashboard handlers.

use std::sync::Arc;

use axum::{extract::Extension, response::Html, Json};

use fish_common::LogRecord;
use storage::read_all_logs;

use crate::rendering::render_dashboard;
use crate::state::AppState;

/// GET /dashboard - HTML page of every request log
///
/// An unreachable log store renders an empty dashboard.
pub async fn dashboard_handler(Extension(state): Extension<Arc<AppState>>) -> Html<String> {
    let logs = read_all_logs(state.log_store.as_ref())
        .await
        .unwrap_or_default();
    Html(render_dashboard(&logs))
}

/// GET /api/logs - Request logs as JSON, oldest first
pub async fn logs_handler(Extension(state): Extension<Arc<AppState>>) -> Json<Vec<LogRecord>> {
    Json(
        read_all_logs(state.log_store.as_ref())
            .await
            .unwrap_or_default(),
    )
}
