//! The on-disk snapshot format.

pub mod snapshot;

pub use snapshot::{SnapshotData, SnapshotHeader};
