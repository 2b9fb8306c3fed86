//! The WAL entry enumeration.
//!
//! Exactly five kinds, one per store mutation (spec §4.3): there is no
//! transactional grouping kind, since every store mutation is already a
//! single atomic WAL append and corvid has no multi-entry transaction
//! manager to group. Label changes ride on [`WalRecord::NodeUpdated`]'s
//! `label_added`/`label_removed` fields rather than getting their own kind.

use corvid_common::types::{EdgeId, NodeId, PropertyKey, Value};
use serde::{Deserialize, Serialize};

/// A single durable mutation intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum WalRecord {
    /// A node was created with `labels` and `properties`.
    NodeCreated {
        id: NodeId,
        labels: Vec<String>,
        properties: Vec<(PropertyKey, Value)>,
    },
    /// A node's properties were merged and/or a single label was added or
    /// removed. At most one of `label_added`/`label_removed` is set per
    /// record, since `add_label`/`remove_label` are independent calls.
    NodeUpdated {
        id: NodeId,
        properties: Vec<(PropertyKey, Value)>,
        label_added: Option<String>,
        label_removed: Option<String>,
    },
    /// A node (and, implicitly, every edge incident on it) was deleted.
    /// Cascaded edge deletions are recorded as their own `EdgeDeleted`
    /// entries immediately preceding this one.
    NodeDeleted { id: NodeId },
    /// An edge was created.
    EdgeCreated {
        id: EdgeId,
        src: NodeId,
        dst: NodeId,
        edge_type: String,
        properties: Vec<(PropertyKey, Value)>,
        weight: f64,
    },
    /// An edge was deleted.
    EdgeDeleted { id: EdgeId },
}
