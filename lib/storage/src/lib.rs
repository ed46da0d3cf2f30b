//! Persistence layer for the ContactX registry: a single bincode snapshot
//! plus an append-only write-ahead log replayed on startup.

pub mod manager;
pub mod snapshot;
pub mod wal;

pub use manager::StorageManager;
pub use snapshot::{RegistrySnapshot, SnapshotStore};
pub use wal::{WalRecord, WriteAheadLog};
