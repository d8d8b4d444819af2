//! HTTP handlers for the fish distribution service.

pub mod dashboard;
pub mod distribution;
pub mod health;

pub use dashboard::{dashboard_handler, logs_handler};
pub use distribution::{fish_selector_handler, missing_name_handler};
pub use health::{health_handler, metrics_handler, ready_handler};
