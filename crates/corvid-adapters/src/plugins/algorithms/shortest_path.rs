//! Unweighted and weighted shortest-path search.

use super::traits::MinScored;
use corvid_common::types::NodeId;
use corvid_common::utils::error::{Error, Result};
use corvid_common::utils::hash::{FxHashMap, FxHashSet};
use corvid_core::graph::Direction;
use corvid_core::graph::lpg::LpgStore;
use std::collections::{BinaryHeap, VecDeque};

/// Unweighted shortest path via bidirectional BFS. Respects edge direction:
/// both searches follow outgoing edges from their respective roots.
///
/// Returns `[source]` when `source == target`, `None` when no path exists.
#[must_use]
pub fn bidirectional_bfs(store: &LpgStore, source: NodeId, target: NodeId) -> Option<Vec<NodeId>> {
    if source == target {
        return Some(vec![source]);
    }

    let mut forward_parent: FxHashMap<NodeId, NodeId> = FxHashMap::default();
    let mut backward_parent: FxHashMap<NodeId, NodeId> = FxHashMap::default();
    let mut forward_frontier = VecDeque::from([source]);
    let mut backward_frontier = VecDeque::from([target]);
    let mut forward_visited = FxHashSet::default();
    let mut backward_visited = FxHashSet::default();
    forward_visited.insert(source);
    backward_visited.insert(target);

    let mut meeting: Option<NodeId> = None;
    while !forward_frontier.is_empty() || !backward_frontier.is_empty() {
        if let Some(node) = forward_frontier.pop_front() {
            for next in store.neighbors(node, Direction::Outgoing) {
                if backward_visited.contains(&next) {
                    forward_parent.insert(next, node);
                    meeting = Some(next);
                    break;
                }
                if forward_visited.insert(next) {
                    forward_parent.insert(next, node);
                    forward_frontier.push_back(next);
                }
            }
        }
        if meeting.is_some() {
            break;
        }
        if let Some(node) = backward_frontier.pop_front() {
            // Backward search walks outgoing edges from the target side, so a
            // predecessor `next` of `node` is any node with an outgoing edge
            // into `node`: that's an incoming-edge neighbor of `node`.
            for next in store.neighbors(node, Direction::Incoming) {
                if forward_visited.contains(&next) {
                    backward_parent.insert(next, node);
                    meeting = Some(next);
                    break;
                }
                if backward_visited.insert(next) {
                    backward_parent.insert(next, node);
                    backward_frontier.push_back(next);
                }
            }
        }
        if meeting.is_some() {
            break;
        }
    }

    let meet = meeting?;
    let mut forward_chain = vec![meet];
    let mut cursor = meet;
    while let Some(&parent) = forward_parent.get(&cursor) {
        forward_chain.push(parent);
        cursor = parent;
    }
    forward_chain.reverse();

    let mut backward_chain = Vec::new();
    cursor = meet;
    while let Some(&parent) = backward_parent.get(&cursor) {
        backward_chain.push(parent);
        cursor = parent;
    }

    forward_chain.extend(backward_chain);
    Some(forward_chain)
}

/// Single-source BFS distances (hop counts). Only reachable nodes appear;
/// `source` maps to 0.
#[must_use]
pub fn single_source_distances(store: &LpgStore, source: NodeId) -> FxHashMap<NodeId, u32> {
    super::traversal::bfs_distances(store, source, Direction::Outgoing)
}

/// The result of a Dijkstra search: the path (inclusive of endpoints) and
/// its total weight.
#[derive(Debug, Clone, PartialEq)]
pub struct DijkstraResult {
    pub path: Vec<NodeId>,
    pub total_weight: f64,
}

/// Dijkstra's algorithm using edge weights.
///
/// # Errors
/// Returns [`Error::InvalidArgument`] if any edge weight considered during
/// the search is negative — Dijkstra's relaxation order assumes non-negative
/// weights, and a negative edge can invalidate an already-settled distance.
pub fn dijkstra(store: &LpgStore, source: NodeId, target: NodeId) -> Result<Option<DijkstraResult>> {
    if source == target {
        return Ok(Some(DijkstraResult { path: vec![source], total_weight: 0.0 }));
    }

    let mut dist: FxHashMap<NodeId, f64> = FxHashMap::default();
    let mut parent: FxHashMap<NodeId, NodeId> = FxHashMap::default();
    let mut heap = BinaryHeap::new();

    dist.insert(source, 0.0);
    heap.push(MinScored(0.0, source));

    while let Some(MinScored(cost, node)) = heap.pop() {
        if node == target {
            break;
        }
        if cost > *dist.get(&node).unwrap_or(&f64::INFINITY) {
            continue;
        }
        for edge in store.get_outgoing_edges(node) {
            if edge.weight < 0.0 {
                return Err(Error::InvalidArgument(format!(
                    "dijkstra: edge {} has negative weight {}",
                    edge.id.get(),
                    edge.weight
                )));
            }
            let next_cost = cost + edge.weight;
            if next_cost < *dist.get(&edge.dst).unwrap_or(&f64::INFINITY) {
                dist.insert(edge.dst, next_cost);
                parent.insert(edge.dst, node);
                heap.push(MinScored(next_cost, edge.dst));
            }
        }
    }

    let Some(&total_weight) = dist.get(&target) else {
        return Ok(None);
    };
    let mut path = vec![target];
    let mut cursor = target;
    while let Some(&p) = parent.get(&cursor) {
        path.push(p);
        cursor = p;
    }
    path.reverse();
    Ok(Some(DijkstraResult { path, total_weight }))
}
