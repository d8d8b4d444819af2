//! Common types and utilities shared across the fish distribution services.

pub mod distribution;
pub mod error;
pub mod log;

pub use distribution::{DistributionResponse, TaxonKey};
pub use error::{FishError, FishResult};
pub use log::{LogRecord, LogStatus};
