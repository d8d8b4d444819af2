//! Best-effort reading and writing of request logs.
//!
//! Persistence problems never reach the HTTP caller. Instead of swallowing
//! them silently, both operations return a [`BestEffort`] that the caller
//! has to look at, even if only to discard it.

use metrics::counter;
use tracing::warn;

use fish_common::{FishResult, LogRecord};

use crate::store::{LogCollection, LogStore};

/// Outcome of an operation that is allowed to fail.
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub enum BestEffort<T> {
    /// The operation completed.
    Done(T),
    /// The operation failed and was contained; carries the reason.
    Degraded(String),
}

impl<T> BestEffort<T> {
    pub fn from_result(result: FishResult<T>) -> Self {
        match result {
            Ok(value) => BestEffort::Done(value),
            Err(e) => BestEffort::Degraded(e.to_string()),
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, BestEffort::Degraded(_))
    }

    pub fn degraded_reason(&self) -> Option<&str> {
        match self {
            BestEffort::Done(_) => None,
            BestEffort::Degraded(reason) => Some(reason),
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            BestEffort::Done(value) => Some(value),
            BestEffort::Degraded(_) => None,
        }
    }
}

impl<T: Default> BestEffort<T> {
    /// The value, or `T::default()` when degraded.
    pub fn unwrap_or_default(self) -> T {
        self.into_option().unwrap_or_default()
    }
}

/// What happened to a log record handed to [`append_log`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogWrite {
    Written,
    /// No collection was available, so nothing was attempted.
    Skipped,
}

/// Read every log record in natural order.
///
/// Opens a fresh handle, reads, and releases it. Any failure yields
/// `Degraded`; callers show an empty list.
pub async fn read_all_logs(store: &dyn LogStore) -> BestEffort<Vec<LogRecord>> {
    let mut collection = match store.open().await {
        Ok(collection) => collection,
        Err(e) => {
            warn!(backend = store.backend_name(), error = %e, "Log store unavailable, showing no logs");
            return BestEffort::Degraded(e.to_string());
        }
    };

    let result = collection.find_all().await;
    collection.close().await;

    if let Err(e) = &result {
        warn!(backend = store.backend_name(), error = %e, "Failed to read logs");
    }
    BestEffort::from_result(result)
}

/// Append a record to an open collection.
///
/// With no collection this is a no-op reported as `Skipped`.
pub async fn append_log(
    collection: Option<&mut Box<dyn LogCollection>>,
    record: LogRecord,
) -> BestEffort<LogWrite> {
    let Some(collection) = collection else {
        counter!("fish_log_writes_total", "result" => "skipped").increment(1);
        return BestEffort::Done(LogWrite::Skipped);
    };

    match collection.insert(&record).await {
        Ok(()) => {
            counter!("fish_log_writes_total", "result" => "written").increment(1);
            BestEffort::Done(LogWrite::Written)
        }
        Err(e) => {
            counter!("fish_log_writes_total", "result" => "failed").increment(1);
            warn!(fish_name = %record.fish_name, error = %e, "Failed to write request log");
            BestEffort::Degraded(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fish_common::{FishError, LogStatus};

    #[test]
    fn test_best_effort_from_result() {
        let ok: BestEffort<u32> = BestEffort::from_result(Ok(3));
        assert_eq!(ok, BestEffort::Done(3));
        assert!(!ok.is_degraded());

        let failed: BestEffort<u32> =
            BestEffort::from_result(Err(FishError::Persistence("down".to_string())));
        assert!(failed.is_degraded());
        assert_eq!(failed.degraded_reason(), Some("Log store error: down"));
        assert_eq!(failed.unwrap_or_default(), 0);
    }

    #[tokio::test]
    async fn test_append_without_collection_is_skipped() {
        let record = LogRecord::new("Salmon", LogStatus::Failure, "x", 500, None, None);
        let outcome = append_log(None, record).await;
        assert_eq!(outcome, BestEffort::Done(LogWrite::Skipped));
    }
}
