//! # corvid-engine
//!
//! Database lifecycle: wires the in-memory store (`corvid-core`) to the
//! write-ahead log and snapshot codec (`corvid-adapters`/`corvid-core`)
//! behind a single-writer commit lock, and drives crash recovery on open.
//!
//! ## Modules
//!
//! - [`config`] - Where data lives and how durable writes are.
//! - [`database`] - [`database::GraphDatabase`]: open/recover, CRUD, snapshot, close.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod database;

pub use config::Config;
pub use database::{GraphDatabase, WalStatus};
