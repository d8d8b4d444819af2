//! Request log records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Outcome of a distribution request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogStatus {
    Success,
    Failure,
}

impl LogStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogStatus::Success => "SUCCESS",
            LogStatus::Failure => "FAILURE",
        }
    }
}

impl fmt::Display for LogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUCCESS" => Ok(LogStatus::Success),
            "FAILURE" => Ok(LogStatus::Failure),
            other => Err(format!("Unknown log status: {}", other)),
        }
    }
}

/// Persisted outcome summary for one distribution request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    pub fish_name: String,
    pub status: LogStatus,
    pub message: String,
    pub response_code: u16,
    /// Captured when the record is built, independent of start/end.
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

impl LogRecord {
    /// Build a record stamped with the current time.
    ///
    /// Start and end are kept only when both are supplied.
    pub fn new(
        fish_name: impl Into<String>,
        status: LogStatus,
        message: impl Into<String>,
        response_code: u16,
        start_time: Option<DateTime<Utc>>,
        end_time: Option<DateTime<Utc>>,
    ) -> Self {
        let (start_time, end_time) = match (start_time, end_time) {
            (Some(start), Some(end)) => (Some(start), Some(end)),
            _ => (None, None),
        };

        Self {
            fish_name: fish_name.into(),
            status,
            message: message.into(),
            response_code,
            timestamp: Utc::now(),
            start_time,
            end_time,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == LogStatus::Success
    }
}
