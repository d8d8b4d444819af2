//! HTTP error responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use fish_common::FishError;

/// A `FishError` rendered as `{"error": "..."}` with its status code.
#[derive(Debug)]
pub struct ApiError(pub FishError);

impl From<FishError> for ApiError {
    fn from(err: FishError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(json!({ "error": self.0.public_message() }))).into_response()
    }
}
