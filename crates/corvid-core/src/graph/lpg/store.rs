//! The in-memory labeled-property-graph store.
//!
//! `LpgStore` is pure in-memory: it knows nothing about the WAL or the
//! filesystem. Durability is layered on top by `corvid-engine`, which
//! mutates a store and appends a WAL entry for every successful call.

use super::{Edge, Node, PropertyStorage};
use crate::graph::record::{EdgeRecord, NodeRecord};
use crate::graph::Direction;
use crate::index::adjacency::AdjacencyIndex;
use crate::index::property_index::PropertyIndex;
use corvid_common::types::{EdgeId, EdgeTypeId, LabelId, NodeId, PropertyKey, Timestamp, Value, ValueType};
use corvid_common::utils::error::{Error, Result};
use corvid_common::utils::hash::{FxHashMap, FxHashSet};
use parking_lot::RwLock;
use smallvec::SmallVec;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Configuration for an [`LpgStore`].
#[derive(Debug, Clone)]
pub struct LpgStoreConfig {
    /// Initial capacity hint for the node map.
    pub initial_node_capacity: usize,
    /// Initial capacity hint for the edge map.
    pub initial_edge_capacity: usize,
}

impl Default for LpgStoreConfig {
    fn default() -> Self {
        Self {
            initial_node_capacity: 1024,
            initial_edge_capacity: 4096,
        }
    }
}

/// Best-effort runtime counters surfaced by [`LpgStore::statistics`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StoreStatistics {
    pub node_count: usize,
    pub edge_count: usize,
    pub total_queries: u64,
    pub avg_query_time_ms: f64,
}

/// The in-memory labeled-property-graph store.
///
/// Node and edge ids are monotonically increasing 64-bit integers; 0 is
/// reserved and never allocated. Deleting a node cascades to every edge
/// incident on it (forward and reverse adjacency); deleting an edge removes
/// it from both endpoints' adjacency lists.
pub struct LpgStore {
    nodes: RwLock<FxHashMap<NodeId, NodeRecord>>,
    edges: RwLock<FxHashMap<EdgeId, EdgeRecord>>,

    node_properties: PropertyStorage<NodeId>,
    edge_properties: PropertyStorage<EdgeId>,
    property_index: PropertyIndex,

    label_to_id: RwLock<FxHashMap<Arc<str>, LabelId>>,
    id_to_label: RwLock<Vec<Arc<str>>>,
    label_index: RwLock<Vec<FxHashSet<NodeId>>>,

    edge_type_to_id: RwLock<FxHashMap<Arc<str>, EdgeTypeId>>,
    id_to_edge_type: RwLock<Vec<Arc<str>>>,

    forward_adj: AdjacencyIndex,
    backward_adj: AdjacencyIndex,

    next_node_id: AtomicU64,
    next_edge_id: AtomicU64,

    total_queries: AtomicU64,
    total_query_time_ms: RwLock<f64>,
}

impl LpgStore {
    /// Creates a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(LpgStoreConfig::default())
    }

    /// Creates a new, empty store with custom capacity hints.
    #[must_use]
    pub fn with_config(config: LpgStoreConfig) -> Self {
        Self {
            nodes: RwLock::new(FxHashMap::with_capacity_and_hasher(
                config.initial_node_capacity,
                Default::default(),
            )),
            edges: RwLock::new(FxHashMap::with_capacity_and_hasher(
                config.initial_edge_capacity,
                Default::default(),
            )),
            node_properties: PropertyStorage::new(),
            edge_properties: PropertyStorage::new(),
            property_index: PropertyIndex::new(),
            label_to_id: RwLock::new(FxHashMap::default()),
            id_to_label: RwLock::new(Vec::new()),
            label_index: RwLock::new(Vec::new()),
            edge_type_to_id: RwLock::new(FxHashMap::default()),
            id_to_edge_type: RwLock::new(Vec::new()),
            forward_adj: AdjacencyIndex::new(),
            backward_adj: AdjacencyIndex::new(),
            next_node_id: AtomicU64::new(1),
            next_edge_id: AtomicU64::new(1),
            total_queries: AtomicU64::new(0),
            total_query_time_ms: RwLock::new(0.0),
        }
    }

    // === Node operations ===

    /// Creates a new node with the given labels and properties.
    ///
    /// # Errors
    /// Returns [`Error::InvalidArgument`] if `labels` contains an empty
    /// string.
    pub fn create_node<K, V>(
        &self,
        labels: &[&str],
        properties: impl IntoIterator<Item = (K, V)>,
    ) -> Result<Node>
    where
        K: Into<PropertyKey>,
        V: Into<Value>,
    {
        for label in labels {
            if label.is_empty() {
                return Err(Error::InvalidArgument("label must not be empty".to_string()));
            }
        }

        let id = NodeId::new(self.next_node_id.fetch_add(1, Ordering::Relaxed));
        let now = Timestamp::now();

        let mut label_ids = SmallVec::new();
        for label in labels {
            let label_id = self.get_or_create_label_id(label);
            if !label_ids.contains(&label_id) {
                label_ids.push(label_id);
                self.ensure_label_bucket(label_id).insert(id);
            }
        }

        self.nodes.write().insert(id, NodeRecord::new(id, label_ids, now));

        for (key, value) in properties {
            self.set_node_property(id, key.into(), value.into());
        }

        self.get_node(id)
    }

    /// Reads a node by id.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if no such node exists.
    pub fn get_node(&self, id: NodeId) -> Result<Node> {
        let nodes = self.nodes.read();
        let record = nodes.get(&id).ok_or(Error::NotFound)?;
        Ok(self.resolve_node(record))
    }

    /// Merges `properties` into an existing node's property map, bumping its
    /// `updated_at` timestamp. Keys absent from `properties` are untouched.
    /// Labels are never affected; see [`LpgStore::add_label`]/[`LpgStore::remove_label`].
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if no such node exists.
    pub fn update_node<K, V>(&self, id: NodeId, properties: impl IntoIterator<Item = (K, V)>) -> Result<()>
    where
        K: Into<PropertyKey>,
        V: Into<Value>,
    {
        {
            let mut nodes = self.nodes.write();
            let record = nodes.get_mut(&id).ok_or(Error::NotFound)?;
            record.updated_at = Timestamp::now();
        }
        for (key, value) in properties {
            self.set_node_property(id, key.into(), value.into());
        }
        Ok(())
    }

    /// Adds `label` to a node's label set. Idempotent.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if no such node exists, or
    /// [`Error::InvalidArgument`] if `label` is empty.
    pub fn add_label(&self, id: NodeId, label: &str) -> Result<()> {
        if label.is_empty() {
            return Err(Error::InvalidArgument("label must not be empty".to_string()));
        }
        let label_id = self.get_or_create_label_id(label);
        let mut nodes = self.nodes.write();
        let record = nodes.get_mut(&id).ok_or(Error::NotFound)?;
        if record.add_label(label_id) {
            record.updated_at = Timestamp::now();
            drop(nodes);
            self.ensure_label_bucket(label_id).insert(id);
        }
        Ok(())
    }

    /// Removes `label` from a node's label set. Idempotent.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if no such node exists.
    pub fn remove_label(&self, id: NodeId, label: &str) -> Result<()> {
        let label_id = {
            let label_to_id = self.label_to_id.read();
            match label_to_id.get(label) {
                Some(&id) => id,
                None => return Ok(()),
            }
        };
        let mut nodes = self.nodes.write();
        let record = nodes.get_mut(&id).ok_or(Error::NotFound)?;
        if record.remove_label(label_id) {
            record.updated_at = Timestamp::now();
            drop(nodes);
            if let Some(bucket) = self.label_index.write().get_mut(label_id.get() as usize) {
                bucket.remove(&id);
            }
        }
        Ok(())
    }

    /// Deletes a node and cascades the delete to every edge incident on it
    /// in either direction.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if no such node exists.
    pub fn delete_node(&self, id: NodeId) -> Result<()> {
        let record = {
            let mut nodes = self.nodes.write();
            nodes.remove(&id).ok_or(Error::NotFound)?
        };

        for label in &record.labels {
            if let Some(bucket) = self.label_index.write().get_mut(label.get() as usize) {
                bucket.remove(&id);
            }
        }

        let incident: Vec<EdgeId> = self
            .forward_adj
            .edges_from(id)
            .map(|(_, edge_id)| edge_id)
            .chain(self.backward_adj.edges_from(id).map(|(_, edge_id)| edge_id))
            .collect();
        for edge_id in incident {
            let _ = self.delete_edge(edge_id);
        }

        self.remove_node_property_index_entries(id);
        self.node_properties.remove_all(id);
        Ok(())
    }

    /// Returns the number of live nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.read().len()
    }

    /// Returns every live node id. Order is unspecified.
    #[must_use]
    pub fn all_node_ids(&self) -> Vec<NodeId> {
        self.nodes.read().keys().copied().collect()
    }

    /// Returns every node carrying `label`. Order is unspecified.
    #[must_use]
    pub fn find_nodes_by_label(&self, label: &str) -> Vec<Node> {
        let label_to_id = self.label_to_id.read();
        let Some(&label_id) = label_to_id.get(label) else {
            return Vec::new();
        };
        let ids: Vec<NodeId> = self
            .label_index
            .read()
            .get(label_id.get() as usize)
            .map(|bucket| bucket.iter().copied().collect())
            .unwrap_or_default();
        ids.into_iter().filter_map(|id| self.get_node(id).ok()).collect()
    }

    /// Opts a property key into eager secondary indexing.
    ///
    /// # Errors
    /// Returns [`Error::InvalidOption`] if `value_type` is [`ValueType::Vector`].
    pub fn enable_property_index(&self, key: &str, value_type: ValueType) -> Result<()> {
        self.property_index.enable(PropertyKey::new(key), value_type)
    }

    /// Returns every node whose `name` property equals `value`. Uses the
    /// property index if `name` is enabled for indexing; otherwise scans
    /// every node.
    #[must_use]
    pub fn find_nodes_by_property(&self, name: &str, value: &Value) -> Vec<Node> {
        let key = PropertyKey::new(name);
        if let Some(ids) = self.property_index.lookup(&key, value) {
            return ids.into_iter().filter_map(|id| self.get_node(id).ok()).collect();
        }
        self.nodes
            .read()
            .keys()
            .copied()
            .filter_map(|id| self.get_node(id).ok())
            .filter(|node| node.get_property(name) == Some(value))
            .collect()
    }

    // === Edge operations ===

    /// Creates an edge from `src` to `dst`. Self-loops and parallel edges
    /// are permitted.
    ///
    /// # Errors
    /// Returns [`Error::EndpointMissing`] if either endpoint does not exist.
    pub fn create_edge<K, V>(
        &self,
        src: NodeId,
        dst: NodeId,
        edge_type: &str,
        properties: impl IntoIterator<Item = (K, V)>,
        weight: f64,
    ) -> Result<Edge>
    where
        K: Into<PropertyKey>,
        V: Into<Value>,
    {
        if !self.nodes.read().contains_key(&src) {
            return Err(Error::EndpointMissing(src.get()));
        }
        if !self.nodes.read().contains_key(&dst) {
            return Err(Error::EndpointMissing(dst.get()));
        }

        let id = EdgeId::new(self.next_edge_id.fetch_add(1, Ordering::Relaxed));
        let type_id = self.get_or_create_edge_type_id(edge_type);
        let now = Timestamp::now();

        self.edges
            .write()
            .insert(id, EdgeRecord::new(id, src, dst, type_id, weight, now));
        self.forward_adj.add_edge(src, dst, id);
        self.backward_adj.add_edge(dst, src, id);

        for (key, value) in properties {
            self.edge_properties.set(id, key.into(), value.into());
        }

        self.get_edge(id)
    }

    /// Reads an edge by id.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if no such edge exists.
    pub fn get_edge(&self, id: EdgeId) -> Result<Edge> {
        let edges = self.edges.read();
        let record = edges.get(&id).ok_or(Error::NotFound)?;
        Ok(self.resolve_edge(record))
    }

    /// Deletes an edge, removing it from both endpoints' adjacency lists.
    ///
    /// # Errors
    /// Returns [`Error::NotFound`] if no such edge exists.
    pub fn delete_edge(&self, id: EdgeId) -> Result<()> {
        let record = {
            let mut edges = self.edges.write();
            edges.remove(&id).ok_or(Error::NotFound)?
        };
        self.forward_adj.mark_deleted(record.src, id);
        self.backward_adj.mark_deleted(record.dst, id);
        self.edge_properties.remove_all(id);
        Ok(())
    }

    /// Returns the number of live edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.read().len()
    }

    /// Returns outgoing edges of `node`, in insertion order. Returns an
    /// empty list if `node` does not exist.
    #[must_use]
    pub fn get_outgoing_edges(&self, node: NodeId) -> Vec<Edge> {
        self.forward_adj
            .edges_from(node)
            .filter_map(|(_, edge_id)| self.get_edge(edge_id).ok())
            .collect()
    }

    /// Returns incoming edges of `node`, in insertion order. Returns an
    /// empty list if `node` does not exist.
    #[must_use]
    pub fn get_incoming_edges(&self, node: NodeId) -> Vec<Edge> {
        self.backward_adj
            .edges_from(node)
            .filter_map(|(_, edge_id)| self.get_edge(edge_id).ok())
            .collect()
    }

    /// Returns the neighbor node ids of `node` in the given direction. For
    /// `Direction::Both`, a node reachable by both an outgoing and an
    /// incoming edge is returned once, not twice.
    pub fn neighbors(&self, node: NodeId, direction: Direction) -> Vec<NodeId> {
        match direction {
            Direction::Outgoing => self.forward_adj.neighbors(node).collect(),
            Direction::Incoming => self.backward_adj.neighbors(node).collect(),
            Direction::Both => {
                let seen: FxHashSet<NodeId> =
                    self.forward_adj.neighbors(node).chain(self.backward_adj.neighbors(node)).collect();
                seen.into_iter().collect()
            }
        }
    }

    // === Lifecycle ===

    /// Returns best-effort runtime counters.
    #[must_use]
    pub fn statistics(&self) -> StoreStatistics {
        let total_queries = self.total_queries.load(Ordering::Relaxed);
        let total_time = *self.total_query_time_ms.read();
        StoreStatistics {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            total_queries,
            avg_query_time_ms: if total_queries == 0 {
                0.0
            } else {
                total_time / total_queries as f64
            },
        }
    }

    /// Records that a query/algorithm call took `elapsed_ms`, for
    /// [`LpgStore::statistics`].
    pub fn record_query(&self, elapsed_ms: f64) {
        self.total_queries.fetch_add(1, Ordering::Relaxed);
        *self.total_query_time_ms.write() += elapsed_ms;
    }

    /// Releases in-memory resources. A no-op beyond dropping buffers, since
    /// `LpgStore` owns no file handles; file-backed resources are owned by
    /// `corvid-engine::database::GraphDatabase`.
    pub fn close(&self) {
        self.forward_adj.clear();
        self.backward_adj.clear();
        self.nodes.write().clear();
        self.edges.write().clear();
    }

    // === Snapshotting ===

    /// Captures the full store state as a [`crate::storage::snapshot::SnapshotData`].
    #[must_use]
    pub fn snapshot_data(&self) -> crate::storage::snapshot::SnapshotData {
        let mut node_ids = self.all_node_ids();
        node_ids.sort_unstable();
        let nodes: Vec<Node> = node_ids.into_iter().filter_map(|id| self.get_node(id).ok()).collect();

        let mut edge_ids: Vec<EdgeId> = self.edges.read().keys().copied().collect();
        edge_ids.sort_unstable();
        let edges: Vec<Edge> = edge_ids.into_iter().filter_map(|id| self.get_edge(id).ok()).collect();

        let property_index_decls = self
            .property_index
            .enabled_decls()
            .into_iter()
            .map(|(key, value_type)| (key.as_str().to_string(), value_type))
            .collect();

        crate::storage::snapshot::SnapshotData {
            next_node_id: self.next_node_id.load(Ordering::Relaxed),
            next_edge_id: self.next_edge_id.load(Ordering::Relaxed),
            nodes,
            edges,
            property_index_decls,
            wal_segment: 0,
            wal_offset: 0,
        }
    }

    /// Rebuilds a store from a previously captured [`crate::storage::snapshot::SnapshotData`].
    #[must_use]
    pub fn restore_from_snapshot(data: crate::storage::snapshot::SnapshotData) -> Self {
        let store = Self::new();
        for (key, value_type) in data.property_index_decls {
            let _ = store.enable_property_index(&key, value_type);
        }
        for node in data.nodes {
            store.insert_node_verbatim(node);
        }
        for edge in data.edges {
            store.insert_edge_verbatim(edge);
        }
        store.next_node_id.store(data.next_node_id, Ordering::Relaxed);
        store.next_edge_id.store(data.next_edge_id, Ordering::Relaxed);
        store
    }

    /// Inserts a node exactly as given, preserving its id and timestamps.
    /// Used by snapshot restore and WAL replay of `NodeCreated`.
    pub fn insert_node_verbatim(&self, node: Node) {
        let label_ids: SmallVec<[LabelId; 4]> = node
            .labels
            .iter()
            .map(|label| {
                let label_id = self.get_or_create_label_id(label);
                self.ensure_label_bucket(label_id).insert(node.id);
                label_id
            })
            .collect();

        let mut record = NodeRecord::new(node.id, label_ids, node.created_at);
        record.updated_at = node.updated_at;
        self.nodes.write().insert(node.id, record);

        for (key, value) in node.properties {
            self.set_node_property(node.id, key, value);
        }
    }

    /// Inserts an edge exactly as given, preserving its id and timestamp.
    /// Used by snapshot restore and WAL replay of `EdgeCreated`.
    pub fn insert_edge_verbatim(&self, edge: Edge) {
        let type_id = self.get_or_create_edge_type_id(&edge.edge_type);
        self.edges
            .write()
            .insert(edge.id, EdgeRecord::new(edge.id, edge.src, edge.dst, type_id, edge.weight, edge.created_at));
        self.forward_adj.add_edge(edge.src, edge.dst, edge.id);
        self.backward_adj.add_edge(edge.dst, edge.src, edge.id);

        for (key, value) in edge.properties {
            self.edge_properties.set(edge.id, key, value);
        }
    }

    // === Internal helpers ===

    fn set_node_property(&self, id: NodeId, key: PropertyKey, value: Value) {
        if let Some(old) = self.node_properties.get(id, &key) {
            self.property_index.remove(&key, &old, id);
        }
        self.property_index.insert(&key, &value, id);
        self.node_properties.set(id, key, value);
    }

    fn remove_node_property_index_entries(&self, id: NodeId) {
        for (key, value) in self.node_properties.get_all(id) {
            self.property_index.remove(&key, &value, id);
        }
    }

    fn resolve_node(&self, record: &NodeRecord) -> Node {
        let mut node = Node::new(record.id, record.created_at);
        node.updated_at = record.updated_at;
        let id_to_label = self.id_to_label.read();
        for label_id in &record.labels {
            if let Some(name) = id_to_label.get(label_id.get() as usize) {
                node.labels.push(name.to_string());
            }
        }
        node.properties = self.node_properties.get_all(record.id);
        node
    }

    fn resolve_edge(&self, record: &EdgeRecord) -> Edge {
        let edge_type = self
            .id_to_edge_type
            .read()
            .get(record.type_id.get() as usize)
            .map_or_else(String::new, |name| name.to_string());
        let mut edge = Edge::new(record.id, record.src, record.dst, edge_type, record.weight, record.created_at);
        edge.properties = self.edge_properties.get_all(record.id);
        edge
    }

    fn ensure_label_bucket(&self, label_id: LabelId) -> parking_lot::MappedRwLockWriteGuard<'_, FxHashSet<NodeId>> {
        let mut index = self.label_index.write();
        while index.len() <= label_id.get() as usize {
            index.push(FxHashSet::default());
        }
        parking_lot::RwLockWriteGuard::map(index, |index| &mut index[label_id.get() as usize])
    }

    fn get_or_create_label_id(&self, label: &str) -> LabelId {
        if let Some(&id) = self.label_to_id.read().get(label) {
            return id;
        }
        let mut label_to_id = self.label_to_id.write();
        let mut id_to_label = self.id_to_label.write();
        if let Some(&id) = label_to_id.get(label) {
            return id;
        }
        let id = LabelId::new(id_to_label.len() as u32);
        let label: Arc<str> = label.into();
        label_to_id.insert(label.clone(), id);
        id_to_label.push(label);
        id
    }

    fn get_or_create_edge_type_id(&self, edge_type: &str) -> EdgeTypeId {
        if let Some(&id) = self.edge_type_to_id.read().get(edge_type) {
            return id;
        }
        let mut type_to_id = self.edge_type_to_id.write();
        let mut id_to_type = self.id_to_edge_type.write();
        if let Some(&id) = type_to_id.get(edge_type) {
            return id;
        }
        let id = EdgeTypeId::new(id_to_type.len() as u32);
        let edge_type: Arc<str> = edge_type.into();
        type_to_id.insert(edge_type.clone(), id);
        id_to_type.push(edge_type);
        id
    }
}

impl Default for LpgStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_props() -> std::iter::Empty<(PropertyKey, Value)> {
        std::iter::empty()
    }

    #[test]
    fn create_node_allocates_id_starting_at_one() {
        let store = LpgStore::new();
        let node = store.create_node(&["Person"], no_props()).unwrap();
        assert!(node.id.is_valid());
        assert_eq!(node.id.get(), 1);
    }

    #[test]
    fn create_node_with_props_round_trips() {
        let store = LpgStore::new();
        let node = store
            .create_node(&["Person"], [("name", Value::from("Alice")), ("age", Value::from(30i64))])
            .unwrap();

        let fetched = store.get_node(node.id).unwrap();
        assert_eq!(fetched.get_property("name").and_then(|v| v.as_str().ok()), Some("Alice"));
        assert_eq!(fetched.get_property("age").and_then(|v| v.as_int64().ok()), Some(30));
    }

    #[test]
    fn update_node_merges_without_touching_absent_keys() {
        let store = LpgStore::new();
        let node = store
            .create_node(&["Person"], [("name", Value::from("Alice")), ("age", Value::from(30i64))])
            .unwrap();

        store.update_node(node.id, [("age", Value::from(31i64))]).unwrap();

        let fetched = store.get_node(node.id).unwrap();
        assert_eq!(fetched.get_property("name").and_then(|v| v.as_str().ok()), Some("Alice"));
        assert_eq!(fetched.get_property("age").and_then(|v| v.as_int64().ok()), Some(31));
    }

    #[test]
    fn update_node_never_touches_labels() {
        let store = LpgStore::new();
        let node = store.create_node(&["Person"], no_props()).unwrap();
        store.update_node(node.id, [("name", Value::from("Alice"))]).unwrap();
        let fetched = store.get_node(node.id).unwrap();
        assert_eq!(fetched.labels, vec!["Person".to_string()]);
    }

    #[test]
    fn add_and_remove_label_are_idempotent() {
        let store = LpgStore::new();
        let node = store.create_node(&["Person"], no_props()).unwrap();

        store.add_label(node.id, "Employee").unwrap();
        store.add_label(node.id, "Employee").unwrap();
        let fetched = store.get_node(node.id).unwrap();
        assert!(fetched.has_label("Employee"));
        assert_eq!(fetched.labels.len(), 2);

        store.remove_label(node.id, "Employee").unwrap();
        store.remove_label(node.id, "Employee").unwrap();
        let fetched = store.get_node(node.id).unwrap();
        assert!(!fetched.has_label("Employee"));
    }

    #[test]
    fn delete_node_cascades_to_incident_edges() {
        let store = LpgStore::new();
        let a = store.create_node(&["Person"], no_props()).unwrap();
        let b = store.create_node(&["Person"], no_props()).unwrap();
        let edge = store.create_edge(a.id, b.id, "KNOWS", no_props(), 1.0).unwrap();

        store.delete_node(a.id).unwrap();

        assert!(store.get_node(a.id).is_err());
        assert!(store.get_edge(edge.id).is_err());
        assert!(store.get_outgoing_edges(b.id).is_empty());
        assert!(store.get_node(b.id).is_ok());

        // Double delete fails.
        assert!(matches!(store.delete_node(a.id), Err(Error::NotFound)));
    }

    #[test]
    fn create_edge_fails_on_missing_endpoint() {
        let store = LpgStore::new();
        let a = store.create_node(&["Person"], no_props()).unwrap();
        let err = store
            .create_edge(a.id, NodeId::new(999), "KNOWS", no_props(), 1.0)
            .unwrap_err();
        assert!(matches!(err, Error::EndpointMissing(999)));
    }

    #[test]
    fn outgoing_and_incoming_edges_preserve_insertion_order() {
        let store = LpgStore::new();
        let a = store.create_node(&["Person"], no_props()).unwrap();
        let b = store.create_node(&["Person"], no_props()).unwrap();
        let c = store.create_node(&["Person"], no_props()).unwrap();

        let e1 = store.create_edge(a.id, b.id, "KNOWS", no_props(), 1.0).unwrap();
        let e2 = store.create_edge(a.id, c.id, "KNOWS", no_props(), 1.0).unwrap();

        let outgoing = store.get_outgoing_edges(a.id);
        assert_eq!(outgoing.iter().map(|e| e.id).collect::<Vec<_>>(), vec![e1.id, e2.id]);

        let incoming = store.get_incoming_edges(b.id);
        assert_eq!(incoming.len(), 1);
        assert_eq!(incoming[0].id, e1.id);
    }

    #[test]
    fn get_outgoing_edges_on_missing_node_is_empty_not_error() {
        let store = LpgStore::new();
        assert!(store.get_outgoing_edges(NodeId::new(42)).is_empty());
    }

    #[test]
    fn delete_edge_removes_from_both_endpoints() {
        let store = LpgStore::new();
        let a = store.create_node(&["Person"], no_props()).unwrap();
        let b = store.create_node(&["Person"], no_props()).unwrap();
        let edge = store.create_edge(a.id, b.id, "KNOWS", no_props(), 1.0).unwrap();

        store.delete_edge(edge.id).unwrap();

        assert!(store.get_outgoing_edges(a.id).is_empty());
        assert!(store.get_incoming_edges(b.id).is_empty());
        assert!(matches!(store.delete_edge(edge.id), Err(Error::NotFound)));
    }

    #[test]
    fn find_nodes_by_label_returns_matching_nodes() {
        let store = LpgStore::new();
        let p1 = store.create_node(&["Person"], no_props()).unwrap();
        let p2 = store.create_node(&["Person"], no_props()).unwrap();
        let _a = store.create_node(&["Animal"], no_props()).unwrap();

        let mut persons: Vec<_> = store.find_nodes_by_label("Person").into_iter().map(|n| n.id).collect();
        persons.sort();
        let mut expected = vec![p1.id, p2.id];
        expected.sort();
        assert_eq!(persons, expected);

        assert_eq!(store.find_nodes_by_label("Animal").len(), 1);
        assert!(store.find_nodes_by_label("Unknown").is_empty());
    }

    #[test]
    fn find_nodes_by_property_uses_index_when_enabled() {
        let store = LpgStore::new();
        store.enable_property_index("name", ValueType::String).unwrap();

        let alice = store.create_node(&["Person"], [("name", Value::from("Alice"))]).unwrap();
        let _bob = store.create_node(&["Person"], [("name", Value::from("Bob"))]).unwrap();

        let found = store.find_nodes_by_property("name", &Value::from("Alice"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, alice.id);
    }

    #[test]
    fn find_nodes_by_property_falls_back_to_scan_without_index() {
        let store = LpgStore::new();
        let alice = store.create_node(&["Person"], [("name", Value::from("Alice"))]).unwrap();
        let found = store.find_nodes_by_property("name", &Value::from("Alice"));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, alice.id);
    }

    #[test]
    fn enable_property_index_rejects_vector() {
        let store = LpgStore::new();
        assert!(matches!(
            store.enable_property_index("embedding", ValueType::Vector),
            Err(Error::InvalidOption(_))
        ));
    }

    #[test]
    fn self_loops_and_parallel_edges_are_permitted() {
        let store = LpgStore::new();
        let a = store.create_node(&["Person"], no_props()).unwrap();

        let loop_edge = store.create_edge(a.id, a.id, "SELF", no_props(), 1.0).unwrap();
        assert_eq!(loop_edge.src, a.id);
        assert_eq!(loop_edge.dst, a.id);

        let e1 = store.create_edge(a.id, a.id, "SELF", no_props(), 1.0).unwrap();
        assert_ne!(loop_edge.id, e1.id);
    }

    #[test]
    fn statistics_track_query_count_and_average() {
        let store = LpgStore::new();
        store.record_query(10.0);
        store.record_query(20.0);
        let stats = store.statistics();
        assert_eq!(stats.total_queries, 2);
        assert!((stats.avg_query_time_ms - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn snapshot_round_trip_preserves_nodes_edges_and_ids() {
        let store = LpgStore::new();
        store.enable_property_index("name", ValueType::String).unwrap();
        let a = store.create_node(&["Person"], [("name", Value::from("Alice"))]).unwrap();
        let b = store.create_node(&["Person"], [("name", Value::from("Bob"))]).unwrap();
        let edge = store.create_edge(a.id, b.id, "KNOWS", [("since", Value::from(2020i64))], 0.5).unwrap();

        let data = store.snapshot_data();
        let restored = LpgStore::restore_from_snapshot(data);

        assert_eq!(restored.node_count(), 2);
        assert_eq!(restored.edge_count(), 1);
        let restored_a = restored.get_node(a.id).unwrap();
        assert_eq!(restored_a.labels, vec!["Person".to_string()]);
        assert_eq!(restored_a.get_property("name").and_then(|v| v.as_str().ok()), Some("Alice"));
        let restored_edge = restored.get_edge(edge.id).unwrap();
        assert_eq!(restored_edge.src, a.id);
        assert_eq!(restored_edge.dst, b.id);
        assert_eq!(restored_edge.get_property("since").and_then(|v| v.as_int64().ok()), Some(2020));

        // Ids allocated after restore continue from where the snapshot left off.
        let c = restored.create_node(&[], no_props()).unwrap();
        assert!(c.id.get() > b.id.get());

        // The property index survives restore.
        assert_eq!(restored.find_nodes_by_property("name", &Value::from("Bob")).len(), 1);
    }

    #[test]
    fn snapshot_of_an_empty_store_restores_empty() {
        let store = LpgStore::new();
        let restored = LpgStore::restore_from_snapshot(store.snapshot_data());
        assert_eq!(restored.node_count(), 0);
        assert_eq!(restored.edge_count(), 0);
    }
}
