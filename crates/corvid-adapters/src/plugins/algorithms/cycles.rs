//! Cycle detection via three-color DFS over an explicit stack.

use corvid_common::types::NodeId;
use corvid_common::utils::hash::{FxHashMap, FxHashSet};
use corvid_core::graph::lpg::LpgStore;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// A discovered cycle: the node sequence from the back edge's target around
/// to its source, the source itself closing the loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    pub nodes: Vec<NodeId>,
}

/// Options narrowing [`detect_cycles_with_options`]'s result set.
#[derive(Clone, Default)]
pub struct CycleOptions<'a> {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub node_predicate: Option<&'a dyn Fn(NodeId) -> bool>,
    pub allowed_edge_types: Option<&'a [&'a str]>,
}

impl<'a> std::fmt::Debug for CycleOptions<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CycleOptions")
            .field("min_length", &self.min_length)
            .field("max_length", &self.max_length)
            .field("node_predicate", &self.node_predicate.map(|_| "<fn>"))
            .field("allowed_edge_types", &self.allowed_edge_types)
            .finish()
    }
}

struct Frame {
    node: NodeId,
    edges: Vec<(NodeId, String)>,
    next_edge: usize,
}

/// Runs three-color DFS from every still-white node, with an explicit
/// `(node, iterator)` frame stack to bound stack depth on deep graphs.
fn dfs_cycles(store: &LpgStore) -> Vec<Cycle> {
    let mut color: FxHashMap<NodeId, Color> = FxHashMap::default();
    let mut parent: FxHashMap<NodeId, NodeId> = FxHashMap::default();
    let mut cycles = Vec::new();

    for root in store.all_node_ids() {
        if color.get(&root).copied().unwrap_or(Color::White) != Color::White {
            continue;
        }
        let mut stack = vec![Frame {
            node: root,
            edges: store.get_outgoing_edges(root).into_iter().map(|e| (e.dst, e.edge_type)).collect(),
            next_edge: 0,
        }];
        color.insert(root, Color::Gray);

        while let Some(frame) = stack.last_mut() {
            if frame.next_edge >= frame.edges.len() {
                color.insert(frame.node, Color::Black);
                stack.pop();
                continue;
            }
            let (next, _) = frame.edges[frame.next_edge].clone();
            frame.next_edge += 1;
            let next_node = frame.node;

            match color.get(&next).copied().unwrap_or(Color::White) {
                Color::White => {
                    parent.insert(next, next_node);
                    color.insert(next, Color::Gray);
                    stack.push(Frame {
                        node: next,
                        edges: store.get_outgoing_edges(next).into_iter().map(|e| (e.dst, e.edge_type)).collect(),
                        next_edge: 0,
                    });
                }
                Color::Gray => {
                    // Back edge next_node -> next: walk parents from next_node to next.
                    let mut nodes = vec![next];
                    let mut cursor = next_node;
                    while cursor != next {
                        nodes.push(cursor);
                        match parent.get(&cursor) {
                            Some(&p) => cursor = p,
                            None => break,
                        }
                    }
                    nodes.reverse();
                    cycles.push(Cycle { nodes });
                }
                Color::Black => {}
            }
        }
    }
    cycles
}

/// Detects every cycle reachable via three-color DFS, including self-loops
/// (cycles of length 1).
#[must_use]
pub fn detect_cycles(store: &LpgStore) -> Vec<Cycle> {
    dfs_cycles(store)
}

/// Short-circuits on the first back edge.
#[must_use]
pub fn has_cycle(store: &LpgStore) -> bool {
    !dfs_cycles(store).is_empty()
}

/// Filters [`detect_cycles`]'s output by length bounds, a per-node
/// predicate (every node on the cycle must satisfy it), and allowed edge
/// types.
#[must_use]
pub fn detect_cycles_with_options(store: &LpgStore, options: &CycleOptions<'_>) -> Vec<Cycle> {
    let allowed_types: Option<FxHashSet<&str>> =
        options.allowed_edge_types.map(|types| types.iter().copied().collect());

    detect_cycles(store)
        .into_iter()
        .filter(|cycle| {
            if let Some(min) = options.min_length {
                if cycle.nodes.len() < min {
                    return false;
                }
            }
            if let Some(max) = options.max_length {
                if cycle.nodes.len() > max {
                    return false;
                }
            }
            if let Some(predicate) = options.node_predicate {
                if !cycle.nodes.iter().all(|&n| predicate(n)) {
                    return false;
                }
            }
            if let Some(types) = &allowed_types {
                for window in cycle.nodes.windows(2) {
                    let edges = store.get_outgoing_edges(window[0]);
                    let ok = edges.iter().any(|e| e.dst == window[1] && types.contains(e.edge_type.as_str()));
                    if !ok {
                        return false;
                    }
                }
            }
            true
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(store: &LpgStore) -> NodeId {
        store.create_node(&[], std::iter::empty::<(&str, &str)>()).unwrap().id
    }

    #[test]
    fn no_cycle_in_a_chain() {
        let store = LpgStore::new();
        let a = node(&store);
        let b = node(&store);
        store.create_edge(a, b, "E", std::iter::empty::<(&str, &str)>(), 1.0).unwrap();
        assert!(!has_cycle(&store));
        assert!(detect_cycles(&store).is_empty());
    }

    #[test]
    fn self_loop_is_a_cycle_of_length_one() {
        let store = LpgStore::new();
        let a = node(&store);
        store.create_edge(a, a, "E", std::iter::empty::<(&str, &str)>(), 1.0).unwrap();
        let cycles = detect_cycles(&store);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].nodes, vec![a]);
    }

    #[test]
    fn detects_simple_back_edge_cycle() {
        let store = LpgStore::new();
        let a = node(&store);
        let b = node(&store);
        let c = node(&store);
        store.create_edge(a, b, "E", std::iter::empty::<(&str, &str)>(), 1.0).unwrap();
        store.create_edge(b, c, "E", std::iter::empty::<(&str, &str)>(), 1.0).unwrap();
        store.create_edge(c, a, "E", std::iter::empty::<(&str, &str)>(), 1.0).unwrap();
        assert!(has_cycle(&store));
        let cycles = detect_cycles(&store);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].nodes.len(), 3);
    }

    #[test]
    fn options_filter_by_length() {
        let store = LpgStore::new();
        let a = node(&store);
        store.create_edge(a, a, "E", std::iter::empty::<(&str, &str)>(), 1.0).unwrap();
        let options = CycleOptions { min_length: Some(2), ..Default::default() };
        assert!(detect_cycles_with_options(&store, &options).is_empty());
    }
}
