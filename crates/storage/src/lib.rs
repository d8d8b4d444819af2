//! Storage abstractions for the fish distribution services.
//!
//! Provides:
//! - A log store interface with a connection opened per request
//! - PostgreSQL and in-memory backends
//! - Best-effort reading and appending of request logs

pub mod logbook;
pub mod memory;
pub mod postgres;
pub mod store;

pub use logbook::{append_log, read_all_logs, BestEffort, LogWrite};
pub use memory::MemoryLogStore;
pub use postgres::PgLogStore;
pub use store::{LogCollection, LogStore};
