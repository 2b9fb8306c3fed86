//! Degree, closeness, and Brandes' betweenness centrality, plus PageRank.

use super::traits::MinScored;
use corvid_common::types::NodeId;
use corvid_common::utils::hash::FxHashMap;
use corvid_core::graph::Direction;
use corvid_core::graph::lpg::LpgStore;
use std::collections::{BinaryHeap, VecDeque};

/// `(in_degree + out_degree) / (N - 1)` for every node.
#[must_use]
pub fn degree_centrality(store: &LpgStore) -> FxHashMap<NodeId, f64> {
    let ids = store.all_node_ids();
    let denom = (ids.len().saturating_sub(1)).max(1) as f64;
    ids.into_iter()
        .map(|id| {
            let degree = store.get_outgoing_edges(id).len() + store.get_incoming_edges(id).len();
            (id, degree as f64 / denom)
        })
        .collect()
}

/// For each source, BFS hop distances to all reachable non-source nodes;
/// `score = reachable / sum(distances)`, or 0 when the source reaches
/// nothing.
#[must_use]
pub fn closeness_centrality(store: &LpgStore) -> FxHashMap<NodeId, f64> {
    store
        .all_node_ids()
        .into_iter()
        .map(|source| {
            let distances = super::traversal::bfs_distances(store, source, Direction::Outgoing);
            let reachable: usize = distances.len().saturating_sub(1);
            let sum: u32 = distances.values().copied().sum();
            let score = if sum == 0 { 0.0 } else { reachable as f64 / sum as f64 };
            (source, score)
        })
        .collect()
}

/// Brandes' algorithm. Normalizes by `1 / ((N-1)(N-2))` when `N > 2`.
#[must_use]
pub fn betweenness_centrality(store: &LpgStore) -> FxHashMap<NodeId, f64> {
    let ids = store.all_node_ids();
    let mut scores: FxHashMap<NodeId, f64> = ids.iter().map(|&id| (id, 0.0)).collect();

    for &source in &ids {
        let mut stack: Vec<NodeId> = Vec::new();
        let mut predecessors: FxHashMap<NodeId, Vec<NodeId>> = FxHashMap::default();
        let mut sigma: FxHashMap<NodeId, f64> = ids.iter().map(|&id| (id, 0.0)).collect();
        let mut distance: FxHashMap<NodeId, i64> = ids.iter().map(|&id| (id, -1)).collect();
        sigma.insert(source, 1.0);
        distance.insert(source, 0);

        let mut queue = VecDeque::from([source]);
        while let Some(v) = queue.pop_front() {
            stack.push(v);
            for w in store.neighbors(v, Direction::Outgoing) {
                if distance[&w] < 0 {
                    distance.insert(w, distance[&v] + 1);
                    queue.push_back(w);
                }
                if distance[&w] == distance[&v] + 1 {
                    let sigma_v = sigma[&v];
                    *sigma.get_mut(&w).expect("w must already be in the sigma map, seeded from all node ids") += sigma_v;
                    predecessors.entry(w).or_default().push(v);
                }
            }
        }

        let mut delta: FxHashMap<NodeId, f64> = ids.iter().map(|&id| (id, 0.0)).collect();
        while let Some(w) = stack.pop() {
            if let Some(preds) = predecessors.get(&w) {
                for &v in preds {
                    let contribution = (sigma[&v] / sigma[&w]) * (1.0 + delta[&w]);
                    *delta.get_mut(&v).expect("v must already be in the delta map, seeded from all node ids") += contribution;
                }
            }
            if w != source {
                *scores.get_mut(&w).expect("w must already be in the scores map, seeded from all node ids") += delta[&w];
            }
        }
    }

    let n = ids.len();
    if n > 2 {
        let norm = 1.0 / ((n - 1) as f64 * (n - 2) as f64);
        for score in scores.values_mut() {
            *score *= norm;
        }
    }
    scores
}

/// The result of a PageRank run.
#[derive(Debug, Clone, Default)]
pub struct PageRankResult {
    pub scores: FxHashMap<NodeId, f64>,
    pub top10: Vec<(NodeId, f64)>,
    pub iterations: u32,
    pub converged: bool,
}

/// Power-iteration PageRank. Dangling mass (nodes with out-degree 0) leaks
/// and is replenished only by the final sum-to-1 normalization, not
/// redistributed per iteration.
#[must_use]
pub fn pagerank(store: &LpgStore, damping: f64, tolerance: f64, max_iterations: u32) -> PageRankResult {
    let ids = store.all_node_ids();
    let n = ids.len();
    if n == 0 {
        return PageRankResult::default();
    }

    let out_degree: FxHashMap<NodeId, usize> =
        ids.iter().map(|&id| (id, store.get_outgoing_edges(id).len())).collect();
    let mut scores: FxHashMap<NodeId, f64> = ids.iter().map(|&id| (id, 1.0 / n as f64)).collect();

    let mut iterations = 0;
    let mut converged = false;
    let teleport = (1.0 - damping) / n as f64;

    for _ in 0..max_iterations {
        iterations += 1;
        let mut next_scores: FxHashMap<NodeId, f64> = ids.iter().map(|&id| (id, teleport)).collect();
        for &id in &ids {
            for edge in store.get_incoming_edges(id) {
                let u_degree = out_degree[&edge.src];
                if u_degree > 0 {
                    *next_scores.get_mut(&id).expect("id must already be in the next_scores map, seeded from all node ids") +=
                        damping * scores[&edge.src] / u_degree as f64;
                }
            }
        }

        let max_delta = ids.iter().map(|id| (next_scores[id] - scores[id]).abs()).fold(0.0, f64::max);
        scores = next_scores;
        if max_delta < tolerance {
            converged = true;
            break;
        }
    }

    let total: f64 = scores.values().sum();
    if total > 0.0 {
        for score in scores.values_mut() {
            *score /= total;
        }
    }

    let mut heap: BinaryHeap<MinScored<NodeId>> = BinaryHeap::new();
    for (&id, &score) in &scores {
        heap.push(MinScored(score, id));
        if heap.len() > 10 {
            heap.pop();
        }
    }
    let mut top10: Vec<(NodeId, f64)> = heap.into_iter().map(|MinScored(score, id)| (id, score)).collect();
    top10.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    PageRankResult { scores, top10, iterations, converged }
}
