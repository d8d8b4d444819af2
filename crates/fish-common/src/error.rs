//! Error types for the fish distribution services.

use thiserror::Error;

/// Result type alias using FishError.
pub type FishResult<T> = Result<T, FishError>;

/// Public message for a request without a fish name.
pub const MISSING_NAME_MESSAGE: &str = "Fish name is required in the URL path.";

/// Public message for any upstream, rendering or internal failure.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch fish distribution data";

/// Primary error type for distribution requests.
#[derive(Debug, Error)]
pub enum FishError {
    // === Client Errors ===
    #[error("Fish name is required")]
    MissingFishName,

    #[error("No taxon key found for fish: {0}")]
    TaxonNotFound(String),

    // === Upstream Errors ===
    #[error("Upstream request failed: {0}")]
    Upstream(String),

    #[error("Upstream request timed out: {0}")]
    Timeout(String),

    // === Rendering Errors ===
    #[error("Map rendering failed: {0}")]
    Render(String),

    // === Internal Errors ===
    #[error("Request task failed: {0}")]
    Internal(String),

    // === Storage Errors ===
    #[error("Log store error: {0}")]
    Persistence(String),

    // === Infrastructure Errors ===
    #[error("Configuration error: {0}")]
    Config(String),
}

impl FishError {
    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            FishError::MissingFishName => 400,
            FishError::TaxonNotFound(_) => 404,
            _ => 500,
        }
    }

    /// Message safe to return to a client.
    ///
    /// Internal details (upstream URLs, database errors) never leave the
    /// service; they go to the request log and diagnostics instead.
    pub fn public_message(&self) -> String {
        match self {
            FishError::MissingFishName => MISSING_NAME_MESSAGE.to_string(),
            FishError::TaxonNotFound(name) => format!("No taxon key found for fish: {}", name),
            _ => FETCH_FAILED_MESSAGE.to_string(),
        }
    }

    /// Message stored in the FAILURE log record for this error.
    pub fn log_message(&self) -> String {
        match self {
            FishError::TaxonNotFound(_) => "No taxon key found".to_string(),
            FishError::Upstream(msg)
            | FishError::Timeout(msg)
            | FishError::Render(msg)
            | FishError::Internal(msg)
            | FishError::Persistence(msg)
            | FishError::Config(msg) => msg.clone(),
            FishError::MissingFishName => MISSING_NAME_MESSAGE.to_string(),
        }
    }
}
