//! CLI command implementations.

pub mod info;
pub mod snapshot;
pub mod stats;
pub mod wal;
