//! Insertion-ordered forward/reverse adjacency lists.
//!
//! `LpgStore` keeps one [`AdjacencyIndex`] per direction (forward, reverse),
//! each mapping a node id to the edge ids incident on it in the order they
//! were created (spec §4.2: "adjacency lists are kept in insertion order").
//! There is no MVCC/copy-on-write layer here, since corvid has a single
//! writer (§5) — every mutation already holds the store's commit path, so
//! a plain `RwLock`-guarded map with tombstone deletes is all a reader
//! needs to see a consistent view.

use corvid_common::types::{EdgeId, NodeId};
use corvid_common::utils::hash::{FxHashMap, FxHashSet};
use parking_lot::RwLock;

/// One node's adjacency: the `(neighbor, edge_id)` pairs in insertion order,
/// plus a set of tombstoned edge ids so a delete doesn't need to shift the
/// vector.
#[derive(Debug, Default)]
struct AdjacencyList {
    entries: Vec<(NodeId, EdgeId)>,
    deleted: FxHashSet<EdgeId>,
}

impl AdjacencyList {
    fn push(&mut self, neighbor: NodeId, edge_id: EdgeId) {
        self.entries.push((neighbor, edge_id));
    }

    fn mark_deleted(&mut self, edge_id: EdgeId) {
        self.deleted.insert(edge_id);
    }

    fn iter(&self) -> impl Iterator<Item = (NodeId, EdgeId)> + '_ {
        let deleted = &self.deleted;
        self.entries
            .iter()
            .copied()
            .filter(move |(_, edge_id)| !deleted.contains(edge_id))
    }
}

/// A single-direction adjacency index: node id → incident edges, in
/// insertion order.
pub struct AdjacencyIndex {
    lists: RwLock<FxHashMap<NodeId, AdjacencyList>>,
}

impl AdjacencyIndex {
    /// Creates an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self { lists: RwLock::new(FxHashMap::default()) }
    }

    /// Records that `edge_id` connects `src` to `neighbor`, appended after
    /// every existing entry for `src`.
    pub fn add_edge(&self, src: NodeId, neighbor: NodeId, edge_id: EdgeId) {
        self.lists.write().entry(src).or_default().push(neighbor, edge_id);
    }

    /// Tombstones `edge_id` out of `src`'s adjacency list. A no-op if `src`
    /// has no adjacency list (already empty, or never had entries).
    pub fn mark_deleted(&self, src: NodeId, edge_id: EdgeId) {
        if let Some(list) = self.lists.write().get_mut(&src) {
            list.mark_deleted(edge_id);
        }
    }

    /// Neighbors of `src`, in insertion order, with deleted edges filtered
    /// out. Empty for a node with no adjacency list.
    pub fn neighbors(&self, src: NodeId) -> impl Iterator<Item = NodeId> {
        let lists = self.lists.read();
        let neighbors: Vec<NodeId> =
            lists.get(&src).map(|list| list.iter().map(|(n, _)| n).collect()).unwrap_or_default();
        neighbors.into_iter()
    }

    /// `(neighbor, edge_id)` pairs for `src`, in insertion order, with
    /// deleted edges filtered out.
    pub fn edges_from(&self, src: NodeId) -> impl Iterator<Item = (NodeId, EdgeId)> {
        let lists = self.lists.read();
        let edges: Vec<(NodeId, EdgeId)> = lists.get(&src).map(|list| list.iter().collect()).unwrap_or_default();
        edges.into_iter()
    }

    /// Drops every adjacency list.
    pub fn clear(&self) {
        self.lists.write().clear();
    }
}

impl Default for AdjacencyIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbors_are_returned_in_insertion_order() {
        let index = AdjacencyIndex::new();
        index.add_edge(NodeId::new(1), NodeId::new(3), EdgeId::new(10));
        index.add_edge(NodeId::new(1), NodeId::new(2), EdgeId::new(20));
        index.add_edge(NodeId::new(1), NodeId::new(4), EdgeId::new(30));

        let neighbors: Vec<_> = index.neighbors(NodeId::new(1)).collect();
        assert_eq!(neighbors, vec![NodeId::new(3), NodeId::new(2), NodeId::new(4)]);
    }

    #[test]
    fn neighbors_of_an_unknown_node_is_empty() {
        let index = AdjacencyIndex::new();
        assert_eq!(index.neighbors(NodeId::new(1)).count(), 0);
    }

    #[test]
    fn mark_deleted_filters_the_edge_out_of_both_iterators() {
        let index = AdjacencyIndex::new();
        index.add_edge(NodeId::new(1), NodeId::new(2), EdgeId::new(10));
        index.add_edge(NodeId::new(1), NodeId::new(3), EdgeId::new(20));

        index.mark_deleted(NodeId::new(1), EdgeId::new(10));

        let neighbors: Vec<_> = index.neighbors(NodeId::new(1)).collect();
        assert_eq!(neighbors, vec![NodeId::new(3)]);
        let edges: Vec<_> = index.edges_from(NodeId::new(1)).collect();
        assert_eq!(edges, vec![(NodeId::new(3), EdgeId::new(20))]);
    }

    #[test]
    fn mark_deleted_on_an_unknown_source_is_a_no_op() {
        let index = AdjacencyIndex::new();
        index.mark_deleted(NodeId::new(1), EdgeId::new(10));
        assert_eq!(index.neighbors(NodeId::new(1)).count(), 0);
    }

    #[test]
    fn edges_from_preserves_insertion_order_with_edge_ids() {
        let index = AdjacencyIndex::new();
        index.add_edge(NodeId::new(1), NodeId::new(2), EdgeId::new(10));
        index.add_edge(NodeId::new(1), NodeId::new(2), EdgeId::new(20));

        let edges: Vec<_> = index.edges_from(NodeId::new(1)).collect();
        assert_eq!(edges, vec![(NodeId::new(2), EdgeId::new(10)), (NodeId::new(2), EdgeId::new(20))]);
    }

    #[test]
    fn clear_drops_every_list() {
        let index = AdjacencyIndex::new();
        index.add_edge(NodeId::new(1), NodeId::new(2), EdgeId::new(10));
        index.clear();
        assert_eq!(index.neighbors(NodeId::new(1)).count(), 0);
    }
}
