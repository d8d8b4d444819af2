//! In-process log store for development and tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use fish_common::{FishError, FishResult, LogRecord};

use crate::store::{LogCollection, LogStore};

/// Log store backed by a shared vector.
///
/// Clones share the same records. The store can be marked unreachable to
/// simulate a database outage.
#[derive(Clone, Default)]
pub struct MemoryLogStore {
    records: Arc<Mutex<Vec<LogRecord>>>,
    unreachable: Arc<AtomicBool>,
    reject_writes: Arc<AtomicBool>,
}

impl MemoryLogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent `open` calls fail (or succeed again).
    pub fn set_reachable(&self, reachable: bool) {
        self.unreachable.store(!reachable, Ordering::SeqCst);
    }

    /// Make inserts on open handles fail.
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    /// Snapshot of every stored record.
    pub async fn records(&self) -> Vec<LogRecord> {
        self.records.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl LogStore for MemoryLogStore {
    async fn open(&self) -> FishResult<Box<dyn LogCollection>> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(FishError::Persistence(
                "Connection failed: memory store marked unreachable".to_string(),
            ));
        }

        Ok(Box::new(MemoryLogCollection {
            store: self.clone(),
            open: true,
        }))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

struct MemoryLogCollection {
    store: MemoryLogStore,
    open: bool,
}

impl MemoryLogCollection {
    fn ensure_open(&self) -> FishResult<()> {
        if self.open {
            Ok(())
        } else {
            Err(FishError::Persistence("Connection already closed".to_string()))
        }
    }
}

#[async_trait]
impl LogCollection for MemoryLogCollection {
    async fn insert(&mut self, record: &LogRecord) -> FishResult<()> {
        self.ensure_open()?;
        if self.store.reject_writes.load(Ordering::SeqCst) {
            return Err(FishError::Persistence("Insert failed: writes rejected".to_string()));
        }
        self.store.records.lock().await.push(record.clone());
        Ok(())
    }

    async fn find_all(&mut self) -> FishResult<Vec<LogRecord>> {
        self.ensure_open()?;
        Ok(self.store.records.lock().await.clone())
    }

    async fn close(&mut self) {
        self.open = false;
    }
}
