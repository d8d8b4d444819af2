//! Log store traits.

use async_trait::async_trait;

use fish_common::{FishResult, LogRecord};

/// Source of log collection handles.
///
/// Every request opens its own handle and closes it when done; nothing is
/// shared between requests.
#[async_trait]
pub trait LogStore: Send + Sync {
    /// Open a fresh handle to the log collection.
    async fn open(&self) -> FishResult<Box<dyn LogCollection>>;

    /// Short backend name for diagnostics.
    fn backend_name(&self) -> &'static str;
}

/// An open handle to the append-only log collection.
#[async_trait]
pub trait LogCollection: Send {
    /// Append a record.
    async fn insert(&mut self, record: &LogRecord) -> FishResult<()>;

    /// Every record in insertion order.
    async fn find_all(&mut self) -> FishResult<Vec<LogRecord>>;

    /// Release the handle. Further calls on a closed handle fail.
    async fn close(&mut self);
}
