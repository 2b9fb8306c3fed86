//! Label propagation community detection and modularity scoring.

use corvid_common::types::NodeId;
use corvid_common::utils::hash::FxHashMap;
use corvid_core::graph::Direction;
use corvid_core::graph::lpg::LpgStore;

/// A label-propagation run's output.
#[derive(Debug, Clone, Default)]
pub struct LabelPropagationResult {
    pub communities: Vec<Vec<NodeId>>,
    pub node_to_community: FxHashMap<NodeId, usize>,
    pub modularity: f64,
    pub iterations: u32,
}

/// Starts with every node in its own label; each pass assigns each node the
/// most-frequent label among its union of incoming and outgoing neighbors
/// (ties broken by encounter order). Stops when no label changes or
/// `max_iterations` is reached.
#[must_use]
pub fn label_propagation(store: &LpgStore, max_iterations: u32) -> LabelPropagationResult {
    let ids = store.all_node_ids();
    let mut label: FxHashMap<NodeId, NodeId> = ids.iter().map(|&id| (id, id)).collect();

    let mut iterations = 0;
    for _ in 0..max_iterations {
        iterations += 1;
        let mut changed = false;
        for &node in &ids {
            let neighbors = store.neighbors(node, Direction::Both);
            if neighbors.is_empty() {
                continue;
            }
            let mut counts: FxHashMap<NodeId, usize> = FxHashMap::default();
            let mut order: Vec<NodeId> = Vec::new();
            for neighbor in neighbors {
                let neighbor_label = label[&neighbor];
                if !counts.contains_key(&neighbor_label) {
                    order.push(neighbor_label);
                }
                *counts.entry(neighbor_label).or_insert(0) += 1;
            }
            let best = order
                .into_iter()
                .max_by_key(|candidate| counts[candidate])
                .expect("counts is nonempty whenever node has at least one neighbor");
            if best != label[&node] {
                label.insert(node, best);
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    let mut groups: FxHashMap<NodeId, Vec<NodeId>> = FxHashMap::default();
    for &id in &ids {
        groups.entry(label[&id]).or_default().push(id);
    }
    let communities: Vec<Vec<NodeId>> = groups.into_values().collect();
    let mut node_to_community = FxHashMap::default();
    for (community_id, members) in communities.iter().enumerate() {
        for &node in members {
            node_to_community.insert(node, community_id);
        }
    }
    let modularity = modularity_score(store, &communities);

    LabelPropagationResult { communities, node_to_community, modularity, iterations }
}

/// `Q = sum_c [(L_c / m) - (D_c / 2m)^2]`, where `m` is the total edge
/// count, `L_c` is the edge count with both endpoints in `c`, and `D_c` is
/// the summed (in+out) degree of `c`'s nodes. Returns 0 for an empty
/// partition.
#[must_use]
pub fn modularity_score(store: &LpgStore, communities: &[Vec<NodeId>]) -> f64 {
    let m = store.edge_count();
    if m == 0 || communities.is_empty() {
        return 0.0;
    }
    let m = m as f64;

    let mut membership: FxHashMap<NodeId, usize> = FxHashMap::default();
    for (community_id, members) in communities.iter().enumerate() {
        for &node in members {
            membership.insert(node, community_id);
        }
    }

    let mut internal_edges = vec![0usize; communities.len()];
    let mut degree_sum = vec![0usize; communities.len()];
    for (community_id, members) in communities.iter().enumerate() {
        for &node in members {
            let out_edges = store.get_outgoing_edges(node);
            let in_edges = store.get_incoming_edges(node);
            degree_sum[community_id] += out_edges.len() + in_edges.len();
            for edge in out_edges {
                if membership.get(&edge.dst) == Some(&community_id) {
                    internal_edges[community_id] += 1;
                }
            }
        }
    }

    (0..communities.len())
        .map(|c| {
            let l_c = internal_edges[c] as f64;
            let d_c = degree_sum[c] as f64;
            (l_c / m) - (d_c / (2.0 * m)).powi(2)
        })
        .sum()
}

/// For each node with >=2 outgoing neighbors, the fraction of directed pairs
/// among those neighbors that are themselves connected. Average clustering
/// coefficient is the arithmetic mean over all nodes.
#[must_use]
pub fn clustering_coefficients(store: &LpgStore) -> FxHashMap<NodeId, f64> {
    super::similarity::clustering_coefficients(store)
}

#[must_use]
pub fn average_clustering_coefficient(store: &LpgStore) -> f64 {
    let coefficients = clustering_coefficients(store);
    if coefficients.is_empty() {
        return 0.0;
    }
    coefficients.values().sum::<f64>() / coefficients.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(store: &LpgStore) -> NodeId {
        store.create_node(&[], std::iter::empty::<(&str, &str)>()).unwrap().id
    }

    #[test]
    fn label_propagation_merges_a_tight_cluster() {
        let store = LpgStore::new();
        let a = node(&store);
        let b = node(&store);
        let c = node(&store);
        store.create_edge(a, b, "E", std::iter::empty::<(&str, &str)>(), 1.0).unwrap();
        store.create_edge(b, c, "E", std::iter::empty::<(&str, &str)>(), 1.0).unwrap();
        store.create_edge(c, a, "E", std::iter::empty::<(&str, &str)>(), 1.0).unwrap();

        let result = label_propagation(&store, 20);
        assert_eq!(result.communities.len(), 1);
    }

    #[test]
    fn modularity_is_zero_for_empty_partition() {
        let store = LpgStore::new();
        assert_eq!(modularity_score(&store, &[]), 0.0);
    }
}
