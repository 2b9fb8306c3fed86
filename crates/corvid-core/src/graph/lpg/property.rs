//! Property storage for the LPG model.
//!
//! [`NodeRecord`](crate::graph::record::NodeRecord)/[`EdgeRecord`](crate::graph::record::EdgeRecord)
//! hold everything about a node or edge except its properties; the
//! properties themselves live here, one column per property key, keyed by
//! entity id within each column. This split is what lets [`LpgStore::update_node`](crate::graph::lpg::LpgStore::update_node)
//! read an old value (to keep [`PropertyIndex`](crate::index::property_index::PropertyIndex)
//! in sync) and write a new one through the same small per-key map, without
//! touching the record or re-serializing every other property the entity
//! carries.

use corvid_common::types::{EdgeId, NodeId, PropertyKey, Value};
use corvid_common::utils::hash::FxHashMap;
use parking_lot::RwLock;
use std::hash::Hash;

/// Entity id types usable as property-storage keys: [`NodeId`] and [`EdgeId`].
pub trait EntityId: Copy + Eq + Hash + 'static {}

impl EntityId for NodeId {}
impl EntityId for EdgeId {}

/// One column per property key, each mapping entity id to that key's value.
///
/// Generic over the entity id type so `LpgStore` can hold one instance for
/// nodes and one for edges without duplicating this type.
pub struct PropertyStorage<Id: EntityId = NodeId> {
    columns: RwLock<FxHashMap<PropertyKey, PropertyColumn<Id>>>,
}

impl<Id: EntityId> PropertyStorage<Id> {
    /// Creates an empty property storage.
    #[must_use]
    pub fn new() -> Self {
        Self { columns: RwLock::new(FxHashMap::default()) }
    }

    /// Sets `key`'s value for `id`, overwriting any prior value.
    pub fn set(&self, id: Id, key: PropertyKey, value: Value) {
        self.columns.write().entry(key).or_default().set(id, value);
    }

    /// Gets `key`'s value for `id`, if set.
    #[must_use]
    pub fn get(&self, id: Id, key: &PropertyKey) -> Option<Value> {
        self.columns.read().get(key).and_then(|col| col.get(id))
    }

    /// Removes every property `id` has, across every column.
    pub fn remove_all(&self, id: Id) {
        for col in self.columns.write().values_mut() {
            col.remove(id);
        }
    }

    /// Gets every property set for `id`.
    #[must_use]
    pub fn get_all(&self, id: Id) -> FxHashMap<PropertyKey, Value> {
        self.columns
            .read()
            .iter()
            .filter_map(|(key, col)| col.get(id).map(|value| (key.clone(), value)))
            .collect()
    }
}

impl<Id: EntityId> Default for PropertyStorage<Id> {
    fn default() -> Self {
        Self::new()
    }
}

/// A single property key's values, across every entity that has it set.
struct PropertyColumn<Id: EntityId> {
    values: FxHashMap<Id, Value>,
}

impl<Id: EntityId> PropertyColumn<Id> {
    fn set(&mut self, id: Id, value: Value) {
        self.values.insert(id, value);
    }

    fn get(&self, id: Id) -> Option<Value> {
        self.values.get(&id).cloned()
    }

    fn remove(&mut self, id: Id) -> Option<Value> {
        self.values.remove(&id)
    }
}

impl<Id: EntityId> Default for PropertyColumn<Id> {
    fn default() -> Self {
        Self { values: FxHashMap::default() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_get_round_trip_per_entity() {
        let storage = PropertyStorage::new();
        let alice = NodeId::new(1);
        let bob = NodeId::new(2);
        let name = PropertyKey::new("name");
        let age = PropertyKey::new("age");

        storage.set(alice, name.clone(), "Alice".into());
        storage.set(alice, age.clone(), 30i64.into());
        storage.set(bob, name.clone(), "Bob".into());

        assert_eq!(storage.get(alice, &name).and_then(|v| v.as_str().ok().map(str::to_string)), Some("Alice".to_string()));
        assert_eq!(storage.get(alice, &age).and_then(|v| v.as_int64().ok()), Some(30));
        assert_eq!(storage.get(bob, &name).and_then(|v| v.as_str().ok().map(str::to_string)), Some("Bob".to_string()));
        assert!(storage.get(bob, &age).is_none());
    }

    #[test]
    fn get_all_collects_every_column_the_entity_appears_in() {
        let storage = PropertyStorage::new();
        let node = NodeId::new(1);
        storage.set(node, PropertyKey::new("name"), "Alice".into());
        storage.set(node, PropertyKey::new("age"), 30i64.into());
        storage.set(node, PropertyKey::new("active"), true.into());

        assert_eq!(storage.get_all(node).len(), 3);
    }

    #[test]
    fn remove_all_clears_every_column_for_the_entity_but_not_others() {
        let storage = PropertyStorage::new();
        let node = NodeId::new(1);
        let other = NodeId::new(2);
        storage.set(node, PropertyKey::new("name"), "Alice".into());
        storage.set(node, PropertyKey::new("age"), 30i64.into());
        storage.set(other, PropertyKey::new("name"), "Bob".into());

        storage.remove_all(node);

        assert!(storage.get(node, &PropertyKey::new("name")).is_none());
        assert!(storage.get(node, &PropertyKey::new("age")).is_none());
        assert!(storage.get(other, &PropertyKey::new("name")).is_some());
    }
}
