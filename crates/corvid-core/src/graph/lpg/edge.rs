//! The public, read-facing edge view.

use corvid_common::types::{EdgeId, NodeId, PropertyKey, Timestamp, Value};
use corvid_common::utils::hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// An edge as seen by callers: id, endpoints, resolved type name, a property
/// map, weight, and its creation timestamp. Edges are immutable in
/// endpoints/type/weight once created — only their properties can change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub src: NodeId,
    pub dst: NodeId,
    pub edge_type: String,
    pub properties: FxHashMap<PropertyKey, Value>,
    pub weight: f64,
    pub created_at: Timestamp,
}

impl Edge {
    #[must_use]
    pub fn new(
        id: EdgeId,
        src: NodeId,
        dst: NodeId,
        edge_type: String,
        weight: f64,
        created_at: Timestamp,
    ) -> Self {
        Self {
            id,
            src,
            dst,
            edge_type,
            properties: FxHashMap::default(),
            weight,
            created_at,
        }
    }

    #[must_use]
    pub fn get_property(&self, key: &str) -> Option<&Value> {
        self.properties.iter().find_map(|(k, v)| (k.as_str() == key).then_some(v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_edge_has_default_weight_and_no_properties() {
        let edge = Edge::new(
            EdgeId::new(1),
            NodeId::new(1),
            NodeId::new(2),
            "KNOWS".to_string(),
            1.0,
            Timestamp::from_secs(0),
        );
        assert_eq!(edge.weight, 1.0);
        assert!(edge.properties.is_empty());
    }
}
