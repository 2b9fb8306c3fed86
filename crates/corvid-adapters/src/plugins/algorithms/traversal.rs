//! Breadth-first traversal and bounded k-hop neighborhoods.

use corvid_common::types::NodeId;
use corvid_common::utils::hash::{FxHashMap, FxHashSet};
use corvid_core::graph::Direction;
use corvid_core::graph::lpg::LpgStore;
use std::collections::VecDeque;

fn step_neighbors(store: &LpgStore, node: NodeId, direction: Direction, edge_type: Option<&str>) -> Vec<NodeId> {
    match edge_type {
        None => store.neighbors(node, direction),
        Some(ty) => {
            let mut out = Vec::new();
            if matches!(direction, Direction::Outgoing | Direction::Both) {
                out.extend(store.get_outgoing_edges(node).into_iter().filter(|e| e.edge_type == ty).map(|e| e.dst));
            }
            if matches!(direction, Direction::Incoming | Direction::Both) {
                out.extend(store.get_incoming_edges(node).into_iter().filter(|e| e.edge_type == ty).map(|e| e.src));
            }
            out
        }
    }
}

/// Ordinary BFS from `source`, returning every reachable node (including
/// `source`) in discovery order.
#[must_use]
pub fn bfs(store: &LpgStore, source: NodeId, direction: Direction) -> Vec<NodeId> {
    let mut visited = FxHashSet::default();
    let mut order = Vec::new();
    let mut queue = VecDeque::new();
    visited.insert(source);
    queue.push_back(source);
    while let Some(node) = queue.pop_front() {
        order.push(node);
        for next in step_neighbors(store, node, direction, None) {
            if visited.insert(next) {
                queue.push_back(next);
            }
        }
    }
    order
}

/// BFS from `source` returning hop distances (source maps to 0; only
/// reachable nodes appear).
#[must_use]
pub fn bfs_distances(store: &LpgStore, source: NodeId, direction: Direction) -> FxHashMap<NodeId, u32> {
    let mut distances = FxHashMap::default();
    let mut queue = VecDeque::new();
    distances.insert(source, 0u32);
    queue.push_back(source);
    while let Some(node) = queue.pop_front() {
        let d = distances[&node];
        for next in step_neighbors(store, node, direction, None) {
            if !distances.contains_key(&next) {
                distances.insert(next, d + 1);
                queue.push_back(next);
            }
        }
    }
    distances
}

/// Result of a bounded k-hop neighborhood search.
#[derive(Debug, Clone, Default)]
pub struct KHopResult {
    /// Nodes grouped by hop distance, `layers[0]` holds the 1-hop frontier.
    pub layers: Vec<Vec<NodeId>>,
    /// Node id to hop distance, excluding the source.
    pub distances: FxHashMap<NodeId, u32>,
}

/// BFS bounded by `max_hops`, excluding `source` from the result. `max_results`
/// stops discovery early once that many nodes have been found, preserving
/// closer nodes.
#[must_use]
pub fn k_hop(
    store: &LpgStore,
    source: NodeId,
    max_hops: u32,
    direction: Direction,
    edge_type: Option<&str>,
    max_results: Option<usize>,
) -> KHopResult {
    let mut result = KHopResult::default();
    if max_hops == 0 {
        return result;
    }
    let mut visited = FxHashSet::default();
    visited.insert(source);
    let mut frontier = vec![source];
    let mut found = 0usize;

    for hop in 1..=max_hops {
        let mut layer = Vec::new();
        let mut next_frontier = Vec::new();
        for node in &frontier {
            for next in step_neighbors(store, *node, direction, edge_type) {
                if visited.insert(next) {
                    if let Some(limit) = max_results {
                        if found >= limit {
                            continue;
                        }
                    }
                    layer.push(next);
                    next_frontier.push(next);
                    result.distances.insert(next, hop);
                    found += 1;
                }
            }
        }
        if layer.is_empty() {
            break;
        }
        result.layers.push(layer);
        frontier = next_frontier;
        if let Some(limit) = max_results {
            if found >= limit {
                break;
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use corvid_core::graph::lpg::LpgStore;

    fn chain(len: usize) -> (LpgStore, Vec<NodeId>) {
        let store = LpgStore::new();
        let ids: Vec<NodeId> = (0..len)
            .map(|_| store.create_node(&[], std::iter::empty::<(&str, &str)>()).unwrap().id)
            .collect();
        for pair in ids.windows(2) {
            store.create_edge(pair[0], pair[1], "NEXT", std::iter::empty::<(&str, &str)>(), 1.0).unwrap();
        }
        (store, ids)
    }

    #[test]
    fn bfs_visits_every_reachable_node_in_order() {
        let (store, ids) = chain(4);
        let order = bfs(&store, ids[0], Direction::Outgoing);
        assert_eq!(order, ids);
    }

    #[test]
    fn bfs_distances_counts_hops() {
        let (store, ids) = chain(4);
        let distances = bfs_distances(&store, ids[0], Direction::Outgoing);
        assert_eq!(distances[&ids[0]], 0);
        assert_eq!(distances[&ids[3]], 3);
    }

    #[test]
    fn k_hop_excludes_source_and_groups_by_distance() {
        let (store, ids) = chain(4);
        let result = k_hop(&store, ids[0], 2, Direction::Outgoing, None, None);
        assert!(!result.distances.contains_key(&ids[0]));
        assert_eq!(result.layers.len(), 2);
        assert_eq!(result.layers[0], vec![ids[1]]);
        assert_eq!(result.layers[1], vec![ids[2]]);
    }

    #[test]
    fn k_hop_respects_max_results() {
        let (store, ids) = chain(4);
        let result = k_hop(&store, ids[0], 3, Direction::Outgoing, None, Some(1));
        assert_eq!(result.distances.len(), 1);
    }
}
