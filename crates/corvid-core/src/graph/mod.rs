//! The labeled-property-graph model.

pub mod lpg;
pub mod record;

/// The direction of a traversal or adjacency lookup relative to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Follow edges where the node is the source.
    Outgoing,
    /// Follow edges where the node is the target.
    Incoming,
    /// Follow edges in either direction.
    Both,
}
