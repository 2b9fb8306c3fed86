//! The public, read-facing node view.

use corvid_common::types::{NodeId, PropertyKey, Timestamp, Value};
use corvid_common::utils::hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// A node as seen by callers: id, resolved label names, a property map, and
/// its lifecycle timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub labels: Vec<String>,
    pub properties: FxHashMap<PropertyKey, Value>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Node {
    #[must_use]
    pub fn new(id: NodeId, created_at: Timestamp) -> Self {
        Self {
            id,
            labels: Vec::new(),
            properties: FxHashMap::default(),
            created_at,
            updated_at: created_at,
        }
    }

    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
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
    fn has_label_checks_exact_name() {
        let mut node = Node::new(NodeId::new(1), Timestamp::from_secs(0));
        node.labels.push("Person".to_string());
        assert!(node.has_label("Person"));
        assert!(!node.has_label("Animal"));
    }

    #[test]
    fn get_property_looks_up_by_key_name() {
        let mut node = Node::new(NodeId::new(1), Timestamp::from_secs(0));
        node.properties.insert(PropertyKey::new("name"), "Alice".into());
        assert_eq!(node.get_property("name").and_then(|v| v.as_str().ok()), Some("Alice"));
        assert!(node.get_property("missing").is_none());
    }
}
