//! Distribution lookup handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::PathRejection, Extension, Path},
    Json,
};
use tracing::debug;

use fish_common::DistributionResponse;

use crate::error::ApiError;
use crate::state::AppState;

/// GET /fishSelector/{fishName} - Occurrences and map for one species
///
/// A name that does not decode to UTF-8 is treated as missing.
pub async fn fish_selector_handler(
    Extension(state): Extension<Arc<AppState>>,
    fish_name: Result<Path<String>, PathRejection>,
) -> Result<Json<DistributionResponse>, ApiError> {
    let fish_name = match fish_name {
        Ok(Path(name)) => Some(name),
        Err(rejection) => {
            debug!(error = %rejection, "Undecodable fish name");
            None
        }
    };

    let response = state.distribution.handle(fish_name.as_deref()).await?;
    Ok(Json(response))
}

/// GET /fishSelector - Request without a fish name
pub async fn missing_name_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<DistributionResponse>, ApiError> {
    let response = state.distribution.handle(None).await?;
    Ok(Json(response))
}
