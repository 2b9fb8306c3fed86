//! The shared error vocabulary for every corvid crate (spec §7).

use std::io;

/// Result alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Every error kind the engine can surface, per spec §7.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An id refers to no existing node/edge.
    #[error("not found")]
    NotFound,

    /// Malformed input (empty label, unsupported property type, negative
    /// weight on a weighted shortest-path query, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A [`crate::types::Value`] accessor was called with a tag that does
    /// not match the stored value.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// The type the caller asked for.
        expected: String,
        /// The type actually stored.
        found: String,
    },

    /// `create_edge` named a source or target node that does not exist.
    #[error("endpoint missing: node {0} does not exist")]
    EndpointMissing(u64),

    /// A snapshot or WAL entry failed validation (bad magic, bad checksum,
    /// truncated record).
    #[error("corrupt data: {0}")]
    CorruptData(String),

    /// An underlying filesystem operation failed.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// An operation was attempted on a database that has already been
    /// closed.
    #[error("database is already closed")]
    AlreadyClosed,

    /// `topological_sort` was called on a graph that is not a DAG.
    #[error("graph contains a cycle")]
    GraphHasCycle,

    /// An algorithm option was out of range (e.g. k-hop `max_hops < 1`).
    #[error("invalid option: {0}")]
    InvalidOption(String),
}
