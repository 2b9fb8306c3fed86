//! Topological sort, DAG/tree/bipartite predicates, weak connectivity, and
//! strongly connected components with condensation.

use corvid_common::types::NodeId;
use corvid_common::utils::error::{Error, Result};
use corvid_common::utils::hash::{FxHashMap, FxHashSet};
use corvid_core::graph::Direction;
use corvid_core::graph::lpg::LpgStore;
use std::collections::VecDeque;

/// Kahn's algorithm. Fails if the output covers fewer nodes than the graph
/// (i.e. the graph contains a cycle).
///
/// # Errors
/// Returns [`Error::GraphHasCycle`] if a full ordering cannot be produced.
pub fn topological_sort(store: &LpgStore) -> Result<Vec<NodeId>> {
    let ids = store.all_node_ids();
    let mut in_degree: FxHashMap<NodeId, usize> = ids.iter().map(|&id| (id, 0)).collect();
    for &id in &ids {
        for edge in store.get_outgoing_edges(id) {
            *in_degree.entry(edge.dst).or_insert(0) += 1;
        }
    }

    let mut queue: VecDeque<NodeId> = in_degree
        .iter()
        .filter(|&(_, &degree)| degree == 0)
        .map(|(&id, _)| id)
        .collect();
    let mut order = Vec::with_capacity(ids.len());

    while let Some(node) = queue.pop_front() {
        order.push(node);
        for edge in store.get_outgoing_edges(node) {
            let degree = in_degree.get_mut(&edge.dst).expect("edge destination must be in the degree map");
            *degree -= 1;
            if *degree == 0 {
                queue.push_back(edge.dst);
            }
        }
    }

    if order.len() < ids.len() {
        return Err(Error::GraphHasCycle);
    }
    Ok(order)
}

/// `not has_cycle`.
#[must_use]
pub fn is_dag(store: &LpgStore) -> bool {
    !super::cycles::has_cycle(store)
}

/// Weak connectivity: a single BFS from any node, following edges in either
/// direction, covers every node.
#[must_use]
pub fn is_connected(store: &LpgStore) -> bool {
    let ids = store.all_node_ids();
    let Some(&start) = ids.first() else {
        return true;
    };
    super::traversal::bfs(store, start, Direction::Both).len() == ids.len()
}

/// Connected ∧ acyclic ∧ `edge_count = node_count − 1` ∧ exactly one node
/// with in-degree 0.
#[must_use]
pub fn is_tree(store: &LpgStore) -> bool {
    let node_count = store.node_count();
    if node_count == 0 {
        return true;
    }
    if store.edge_count() != node_count - 1 {
        return false;
    }
    if !is_dag(store) || !is_connected(store) {
        return false;
    }
    let zero_in_degree = store
        .all_node_ids()
        .into_iter()
        .filter(|&id| store.get_incoming_edges(id).is_empty())
        .count();
    zero_in_degree == 1
}

/// 2-coloring BFS treating edges as undirected; succeeds with no
/// monochromatic edge.
#[must_use]
pub fn is_bipartite(store: &LpgStore) -> bool {
    let mut color: FxHashMap<NodeId, u8> = FxHashMap::default();
    for root in store.all_node_ids() {
        if color.contains_key(&root) {
            continue;
        }
        color.insert(root, 0);
        let mut queue = VecDeque::from([root]);
        while let Some(node) = queue.pop_front() {
            let node_color = color[&node];
            for next in store.neighbors(node, Direction::Both) {
                match color.get(&next) {
                    Some(&c) if c == node_color => return false,
                    Some(_) => {}
                    None => {
                        color.insert(next, 1 - node_color);
                        queue.push_back(next);
                    }
                }
            }
        }
    }
    true
}

/// A weak (undirected-view) connected component.
#[derive(Debug, Clone, Default)]
pub struct ConnectedComponentsResult {
    pub communities: Vec<Vec<NodeId>>,
    pub node_to_community: FxHashMap<NodeId, usize>,
}

/// BFS following both incoming and outgoing edges, painting each newly
/// discovered node with the current component id.
#[must_use]
pub fn connected_components(store: &LpgStore) -> ConnectedComponentsResult {
    let mut result = ConnectedComponentsResult::default();
    let mut visited = FxHashSet::default();
    for root in store.all_node_ids() {
        if visited.contains(&root) {
            continue;
        }
        let component_id = result.communities.len();
        let members = super::traversal::bfs(store, root, Direction::Both);
        for &node in &members {
            visited.insert(node);
            result.node_to_community.insert(node, component_id);
        }
        result.communities.push(members);
    }
    result
}

/// The number of weak connected components.
#[must_use]
pub fn connected_component_count(store: &LpgStore) -> usize {
    connected_components(store).communities.len()
}

/// Strongly connected components plus the largest SCC and the count of
/// size-1 SCCs.
#[derive(Debug, Clone, Default)]
pub struct SccResult {
    pub components: Vec<Vec<NodeId>>,
    pub node_to_component: FxHashMap<NodeId, usize>,
    pub largest: Vec<NodeId>,
    pub singleton_count: usize,
}

struct TarjanFrame {
    node: NodeId,
    edges: Vec<NodeId>,
    next_edge: usize,
}

/// Tarjan's algorithm over an explicit DFS stack.
#[must_use]
pub fn strongly_connected_components(store: &LpgStore) -> SccResult {
    let mut index_of: FxHashMap<NodeId, usize> = FxHashMap::default();
    let mut lowlink: FxHashMap<NodeId, usize> = FxHashMap::default();
    let mut on_stack: FxHashSet<NodeId> = FxHashSet::default();
    let mut tarjan_stack: Vec<NodeId> = Vec::new();
    let mut next_index = 0usize;
    let mut components: Vec<Vec<NodeId>> = Vec::new();

    for root in store.all_node_ids() {
        if index_of.contains_key(&root) {
            continue;
        }
        let mut call_stack = vec![TarjanFrame {
            node: root,
            edges: store.neighbors(root, Direction::Outgoing),
            next_edge: 0,
        }];
        index_of.insert(root, next_index);
        lowlink.insert(root, next_index);
        next_index += 1;
        tarjan_stack.push(root);
        on_stack.insert(root);

        while let Some(frame) = call_stack.last_mut() {
            if frame.next_edge < frame.edges.len() {
                let successor = frame.edges[frame.next_edge];
                frame.next_edge += 1;
                let current = frame.node;

                if !index_of.contains_key(&successor) {
                    index_of.insert(successor, next_index);
                    lowlink.insert(successor, next_index);
                    next_index += 1;
                    tarjan_stack.push(successor);
                    on_stack.insert(successor);
                    call_stack.push(TarjanFrame {
                        node: successor,
                        edges: store.neighbors(successor, Direction::Outgoing),
                        next_edge: 0,
                    });
                } else if on_stack.contains(&successor) {
                    let successor_index = index_of[&successor];
                    let current_low = lowlink[&current];
                    lowlink.insert(current, current_low.min(successor_index));
                }
            } else {
                let current = frame.node;
                call_stack.pop();
                if let Some(parent_frame) = call_stack.last() {
                    let parent = parent_frame.node;
                    let current_low = lowlink[&current];
                    let parent_low = lowlink[&parent];
                    lowlink.insert(parent, parent_low.min(current_low));
                }
                if lowlink[&current] == index_of[&current] {
                    let mut component = Vec::new();
                    loop {
                        let popped = tarjan_stack.pop().expect("tarjan stack must not be empty while unwinding an SCC root");
                        on_stack.remove(&popped);
                        component.push(popped);
                        if popped == current {
                            break;
                        }
                    }
                    components.push(component);
                }
            }
        }
    }

    let mut node_to_component = FxHashMap::default();
    for (id, members) in components.iter().enumerate() {
        for &node in members {
            node_to_component.insert(node, id);
        }
    }
    let largest = components.iter().max_by_key(|c| c.len()).cloned().unwrap_or_default();
    let singleton_count = components.iter().filter(|c| c.len() == 1).count();

    SccResult { components, node_to_component, largest, singleton_count }
}

#[must_use]
pub fn strongly_connected_component_count(store: &LpgStore) -> usize {
    strongly_connected_components(store).components.len()
}

/// A condensation edge: an aggregated original edge count between two SCCs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CondensationEdge {
    pub from_component: usize,
    pub to_component: usize,
    pub edge_count: usize,
}

/// For every original edge crossing SCC boundaries, aggregates by
/// `(scc(u), scc(v))`. The result is a DAG by construction.
#[must_use]
pub fn condensation(store: &LpgStore, scc: &SccResult) -> Vec<CondensationEdge> {
    let mut counts: FxHashMap<(usize, usize), usize> = FxHashMap::default();
    for &id in &store.all_node_ids() {
        let from_component = scc.node_to_component[&id];
        for edge in store.get_outgoing_edges(id) {
            let to_component = scc.node_to_component[&edge.dst];
            if from_component != to_component {
                *counts.entry((from_component, to_component)).or_insert(0) += 1;
            }
        }
    }
    counts
        .into_iter()
        .map(|((from_component, to_component), edge_count)| CondensationEdge { from_component, to_component, edge_count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(store: &LpgStore) -> NodeId {
        store.create_node(&[], std::iter::empty::<(&str, &str)>()).unwrap().id
    }

    #[test]
    fn topological_sort_orders_a_chain() {
        let store = LpgStore::new();
        let a = node(&store);
        let b = node(&store);
        store.create_edge(a, b, "E", std::iter::empty::<(&str, &str)>(), 1.0).unwrap();
        let order = topological_sort(&store).unwrap();
        assert_eq!(order, vec![a, b]);
    }

    #[test]
    fn topological_sort_fails_on_a_cycle() {
        let store = LpgStore::new();
        let a = node(&store);
        let b = node(&store);
        store.create_edge(a, b, "E", std::iter::empty::<(&str, &str)>(), 1.0).unwrap();
        store.create_edge(b, a, "E", std::iter::empty::<(&str, &str)>(), 1.0).unwrap();
        assert!(topological_sort(&store).is_err());
    }

    #[test]
    fn is_tree_detects_a_simple_tree() {
        let store = LpgStore::new();
        let a = node(&store);
        let b = node(&store);
        let c = node(&store);
        store.create_edge(a, b, "E", std::iter::empty::<(&str, &str)>(), 1.0).unwrap();
        store.create_edge(a, c, "E", std::iter::empty::<(&str, &str)>(), 1.0).unwrap();
        assert!(is_tree(&store));
    }

    #[test]
    fn is_bipartite_accepts_even_cycle() {
        let store = LpgStore::new();
        let a = node(&store);
        let b = node(&store);
        let c = node(&store);
        let d = node(&store);
        store.create_edge(a, b, "E", std::iter::empty::<(&str, &str)>(), 1.0).unwrap();
        store.create_edge(b, c, "E", std::iter::empty::<(&str, &str)>(), 1.0).unwrap();
        store.create_edge(c, d, "E", std::iter::empty::<(&str, &str)>(), 1.0).unwrap();
        store.create_edge(d, a, "E", std::iter::empty::<(&str, &str)>(), 1.0).unwrap();
        assert!(is_bipartite(&store));
    }

    #[test]
    fn is_bipartite_rejects_odd_cycle() {
        let store = LpgStore::new();
        let a = node(&store);
        let b = node(&store);
        let c = node(&store);
        store.create_edge(a, b, "E", std::iter::empty::<(&str, &str)>(), 1.0).unwrap();
        store.create_edge(b, c, "E", std::iter::empty::<(&str, &str)>(), 1.0).unwrap();
        store.create_edge(c, a, "E", std::iter::empty::<(&str, &str)>(), 1.0).unwrap();
        assert!(!is_bipartite(&store));
    }

    #[test]
    fn scc_groups_a_cycle_together() {
        let store = LpgStore::new();
        let a = node(&store);
        let b = node(&store);
        let c = node(&store);
        store.create_edge(a, b, "E", std::iter::empty::<(&str, &str)>(), 1.0).unwrap();
        store.create_edge(b, c, "E", std::iter::empty::<(&str, &str)>(), 1.0).unwrap();
        store.create_edge(c, a, "E", std::iter::empty::<(&str, &str)>(), 1.0).unwrap();
        let scc = strongly_connected_components(&store);
        assert_eq!(scc.components.len(), 1);
        assert_eq!(scc.largest.len(), 3);
        assert_eq!(scc.singleton_count, 0);
    }

    #[test]
    fn condensation_is_a_dag_of_sccs() {
        let store = LpgStore::new();
        let a = node(&store);
        let b = node(&store);
        let c = node(&store);
        store.create_edge(a, b, "E", std::iter::empty::<(&str, &str)>(), 1.0).unwrap();
        store.create_edge(b, a, "E", std::iter::empty::<(&str, &str)>(), 1.0).unwrap();
        store.create_edge(b, c, "E", std::iter::empty::<(&str, &str)>(), 1.0).unwrap();

        let scc = strongly_connected_components(&store);
        assert_eq!(scc.components.len(), 2);
        let edges = condensation(&store, &scc);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].edge_count, 1);
    }
}
