//! Internal node/edge records.
//!
//! These are the compact, storage-facing representations: labels and edge
//! types are interned ids rather than strings, and properties live in
//! [`crate::graph::lpg::property::PropertyStorage`] rather than inline. They
//! are resolved to the public [`crate::graph::lpg::Node`]/[`crate::graph::lpg::Edge`]
//! view structs on read.

use corvid_common::types::{EdgeId, EdgeTypeId, LabelId, NodeId, Timestamp};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// The stored representation of a node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: NodeId,
    pub labels: SmallVec<[LabelId; 4]>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl NodeRecord {
    #[must_use]
    pub fn new(id: NodeId, labels: SmallVec<[LabelId; 4]>, created_at: Timestamp) -> Self {
        Self {
            id,
            labels,
            created_at,
            updated_at: created_at,
        }
    }

    pub fn has_label(&self, label: LabelId) -> bool {
        self.labels.contains(&label)
    }

    pub fn add_label(&mut self, label: LabelId) -> bool {
        if self.has_label(label) {
            false
        } else {
            self.labels.push(label);
            true
        }
    }

    pub fn remove_label(&mut self, label: LabelId) -> bool {
        let before = self.labels.len();
        self.labels.retain(|&mut l| l != label);
        self.labels.len() != before
    }
}

/// The stored representation of an edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub id: EdgeId,
    pub src: NodeId,
    pub dst: NodeId,
    pub type_id: EdgeTypeId,
    pub weight: f64,
    pub created_at: Timestamp,
}

impl EdgeRecord {
    #[must_use]
    pub fn new(
        id: EdgeId,
        src: NodeId,
        dst: NodeId,
        type_id: EdgeTypeId,
        weight: f64,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            src,
            dst,
            type_id,
            weight,
            created_at,
        }
    }
}
