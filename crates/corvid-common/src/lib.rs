//! # corvid-common
//!
//! Foundation layer for corvid: identifiers, the tagged [`Value`] type, and
//! shared utilities (hashing, error types). This crate has no internal
//! dependencies and is kept minimal so every other corvid crate can depend on
//! it without pulling in storage or algorithm concerns.
//!
//! ## Modules
//!
//! - [`types`] - Identifiers, [`Value`], [`Timestamp`].
//! - [`utils`] - Hashing aliases and the shared [`Error`]/[`Result`] types.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod types;
pub mod utils;

pub use types::{EdgeId, NodeId, PropertyKey, Timestamp, Value};
pub use utils::error::{Error, Result};
