//! GBIF client error types.

use std::fmt;
use thiserror::Error;

use fish_common::FishError;

pub type GbifResult<T> = Result<T, GbifError>;

/// Which upstream API a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Species,
    Occurrence,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Species => f.write_str("species search"),
            Endpoint::Occurrence => f.write_str("occurrence search"),
        }
    }
}

#[derive(Debug, Error)]
pub enum GbifError {
    #[error("{endpoint} request failed: {message}")]
    Request { endpoint: Endpoint, message: String },

    #[error("{endpoint} request timed out")]
    Timeout { endpoint: Endpoint },

    #[error("{endpoint} returned HTTP {status}")]
    Status { endpoint: Endpoint, status: u16 },

    #[error("Malformed {endpoint} response: {message}")]
    Malformed { endpoint: Endpoint, message: String },

    #[error("Invalid {endpoint} URL: {message}")]
    InvalidUrl { endpoint: Endpoint, message: String },

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

impl GbifError {
    pub(crate) fn from_reqwest(endpoint: Endpoint, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GbifError::Timeout { endpoint }
        } else {
            GbifError::Request {
                endpoint,
                message: err.to_string(),
            }
        }
    }

    pub(crate) fn malformed(endpoint: Endpoint, message: impl Into<String>) -> Self {
        GbifError::Malformed {
            endpoint,
            message: message.into(),
        }
    }
}

impl From<GbifError> for FishError {
    fn from(err: GbifError) -> Self {
        match err {
            GbifError::Timeout { .. } => FishError::Timeout(err.to_string()),
            GbifError::Client(msg) => FishError::Config(msg),
            other => FishError::Upstream(other.to_string()),
        }
    }
}
