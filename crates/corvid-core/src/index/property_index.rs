//! Opt-in secondary indices from a property value to the set of nodes
//! holding it.
//!
//! Unlike [`crate::graph::lpg::property::PropertyStorage`] (one column per
//! key, keyed by entity id), a `PropertyIndex` column is keyed by the
//! property's *value* so `find_nodes_by_property` can avoid a full scan.
//! Indexing is opt-in per `(name, type)` pair and limited to scalar types —
//! there is no sound equality semantics for indexing [`Value::Vector`]
//! without a similarity metric, so enabling one is rejected.

use corvid_common::types::{NodeId, PropertyKey, Value, ValueType};
use corvid_common::utils::error::{Error, Result};
use corvid_common::utils::hash::{FxHashMap, FxHashSet};
use parking_lot::RwLock;

/// A value's indexable binary key, produced by [`Value::to_bytes`]. Two
/// values index to the same bucket iff they encode identically.
type IndexKey = Vec<u8>;

struct PropertyIndexColumn {
    value_type: ValueType,
    buckets: FxHashMap<IndexKey, FxHashSet<NodeId>>,
}

/// A set of opt-in, eagerly maintained property-value indices over nodes.
#[derive(Default)]
pub struct PropertyIndex {
    columns: RwLock<FxHashMap<PropertyKey, PropertyIndexColumn>>,
}

impl PropertyIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares that `key` should be indexed as `value_type`. Idempotent if
    /// already enabled with the same type.
    pub fn enable(&self, key: PropertyKey, value_type: ValueType) -> Result<()> {
        if value_type == ValueType::Vector {
            return Err(Error::InvalidOption(
                "property indices do not support VECTOR values".to_string(),
            ));
        }
        let mut columns = self.columns.write();
        columns.entry(key).or_insert_with(|| PropertyIndexColumn {
            value_type,
            buckets: FxHashMap::default(),
        });
        Ok(())
    }

    /// Returns the declared type for `key`, if indexing is enabled.
    #[must_use]
    pub fn enabled_type(&self, key: &PropertyKey) -> Option<ValueType> {
        self.columns.read().get(key).map(|c| c.value_type)
    }

    /// Returns every enabled `(key, type)` declaration, for snapshotting.
    #[must_use]
    pub fn enabled_decls(&self) -> Vec<(PropertyKey, ValueType)> {
        self.columns.read().iter().map(|(key, column)| (key.clone(), column.value_type)).collect()
    }

    /// Indexes `(key, value)` under `id`, if `key` is enabled and `value`'s
    /// tag matches the declared type. No-op otherwise.
    pub fn insert(&self, key: &PropertyKey, value: &Value, id: NodeId) {
        let mut columns = self.columns.write();
        if let Some(column) = columns.get_mut(key) {
            if column.value_type == value.value_type() {
                column.buckets.entry(value.to_bytes()).or_default().insert(id);
            }
        }
    }

    /// Removes `id` from the `(key, value)` bucket, if present.
    pub fn remove(&self, key: &PropertyKey, value: &Value, id: NodeId) {
        let mut columns = self.columns.write();
        if let Some(column) = columns.get_mut(key) {
            if let Some(bucket) = column.buckets.get_mut(&value.to_bytes()) {
                bucket.remove(&id);
            }
        }
    }

    /// Looks up the set of node ids indexed under `(key, value)`. Returns
    /// `None` if `key` is not an enabled index, distinct from an empty
    /// result set.
    #[must_use]
    pub fn lookup(&self, key: &PropertyKey, value: &Value) -> Option<Vec<NodeId>> {
        let columns = self.columns.read();
        let column = columns.get(key)?;
        if column.value_type != value.value_type() {
            return Some(Vec::new());
        }
        Some(
            column
                .buckets
                .get(&value.to_bytes())
                .map(|bucket| bucket.iter().copied().collect())
                .unwrap_or_default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enable_rejects_vector_type() {
        let index = PropertyIndex::new();
        let err = index
            .enable(PropertyKey::new("embedding"), ValueType::Vector)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidOption(_)));
    }

    #[test]
    fn insert_and_lookup_round_trip() {
        let index = PropertyIndex::new();
        let key = PropertyKey::new("name");
        index.enable(key.clone(), ValueType::String).unwrap();

        index.insert(&key, &Value::from("Alice"), NodeId::new(1));
        index.insert(&key, &Value::from("Alice"), NodeId::new(2));
        index.insert(&key, &Value::from("Bob"), NodeId::new(3));

        let mut alices = index.lookup(&key, &Value::from("Alice")).unwrap();
        alices.sort();
        assert_eq!(alices, vec![NodeId::new(1), NodeId::new(2)]);

        let bobs = index.lookup(&key, &Value::from("Bob")).unwrap();
        assert_eq!(bobs, vec![NodeId::new(3)]);
    }

    #[test]
    fn lookup_on_disabled_key_is_none() {
        let index = PropertyIndex::new();
        assert!(index.lookup(&PropertyKey::new("name"), &Value::from("x")).is_none());
    }

    #[test]
    fn remove_drops_id_from_bucket() {
        let index = PropertyIndex::new();
        let key = PropertyKey::new("age");
        index.enable(key.clone(), ValueType::Int).unwrap();
        index.insert(&key, &Value::Int(30), NodeId::new(1));

        index.remove(&key, &Value::Int(30), NodeId::new(1));
        assert_eq!(index.lookup(&key, &Value::Int(30)).unwrap(), Vec::<NodeId>::new());
    }

    #[test]
    fn mismatched_value_type_is_ignored_on_insert() {
        let index = PropertyIndex::new();
        let key = PropertyKey::new("age");
        index.enable(key.clone(), ValueType::Int).unwrap();
        index.insert(&key, &Value::from("not an int"), NodeId::new(1));
        assert_eq!(index.lookup(&key, &Value::from("not an int")).unwrap(), Vec::<NodeId>::new());
    }

    #[test]
    fn enabled_decls_lists_every_enabled_key() {
        let index = PropertyIndex::new();
        index.enable(PropertyKey::new("name"), ValueType::String).unwrap();
        index.enable(PropertyKey::new("age"), ValueType::Int).unwrap();

        let mut decls = index.enabled_decls();
        decls.sort_by(|a, b| a.0.as_str().cmp(b.0.as_str()));
        assert_eq!(
            decls,
            vec![
                (PropertyKey::new("age"), ValueType::Int),
                (PropertyKey::new("name"), ValueType::String),
            ]
        );
    }

    #[test]
    fn enabled_decls_is_empty_for_a_fresh_index() {
        assert!(PropertyIndex::new().enabled_decls().is_empty());
    }
}
