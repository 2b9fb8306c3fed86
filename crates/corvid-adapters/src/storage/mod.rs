//! Durable storage: the write-ahead log.

pub mod wal;

pub use wal::{WalManager, WalPosition, WalRecord, WalRecovery, WalSyncPolicy};
