//! # corvid
//!
//! An embedded, pure-Rust, persistent labeled-property-graph database.
//!
//! If you're new here, start with [`GraphDatabase`] — that's your entry
//! point for opening a database and running mutations. Graph-analytic
//! queries (shortest paths, centrality, community detection, ...) live in
//! [`corvid_adapters::plugins::algorithms`] and take a `&LpgStore` directly.
//!
//! ## Quick Start
//!
//! ```rust
//! use corvid::GraphDatabase;
//!
//! let db = GraphDatabase::new_in_memory();
//! let alice = db.create_node(&["Person"], [("name", "Alice")]).unwrap();
//! let bob = db.create_node(&["Person"], [("name", "Bob")]).unwrap();
//! db.create_edge(alice.id, bob.id, "KNOWS", std::iter::empty::<(&str, &str)>(), 1.0).unwrap();
//!
//! assert_eq!(db.node_count(), 2);
//! ```

pub use corvid_engine::{Config, GraphDatabase, WalStatus};

pub use corvid_common::types::{EdgeId, NodeId, PropertyKey, Value, ValueType};
pub use corvid_common::utils::error::{Error, Result};

pub use corvid_core::graph::Direction;
pub use corvid_core::graph::lpg::{Edge, LpgStore, Node, StoreStatistics};

pub use corvid_adapters::plugins::algorithms;
