//! # corvid-core
//!
//! The in-memory labeled-property-graph store: node/edge records, columnar
//! property storage, insertion-ordered adjacency lists, label and
//! property-value indices, and the snapshot codec. This crate knows nothing
//! about the WAL or the filesystem beyond the snapshot format itself —
//! durability is layered on top by `corvid-adapters`/`corvid-engine`.
//!
//! ## Modules
//!
//! - [`graph`] - The labeled-property-graph model (`LpgStore`, `Node`, `Edge`).
//! - [`index`] - Adjacency lists and secondary property-value indices.
//! - [`storage`] - The snapshot format.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod graph;
pub mod index;
pub mod storage;

pub use graph::lpg::{Edge, LpgStore, LpgStoreConfig, Node, StoreStatistics};
pub use index::adjacency::AdjacencyIndex;
pub use storage::snapshot::{SnapshotData, SnapshotHeader};
