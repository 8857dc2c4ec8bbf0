//! Directed, weighted transitions between two nodes.

use std::fmt;

/// Position of an edge in its chain's edge arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(pub(crate) usize);

impl EdgeId {
    /// Raw index into [`Chain::edges`](crate::model::Chain::edges).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// A transition from one node to another.
///
/// Endpoints are fixed at construction. Only the probability may change,
/// and only through [`Chain::normalise_probabilities`](crate::model::Chain::normalise_probabilities).
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    id: EdgeId,
    from: usize,
    to: usize,
    pub(crate) probability: f64,
    is_loop: bool,
}

impl Edge {
    pub(crate) const fn new(id: EdgeId, from: usize, to: usize, probability: f64) -> Self {
        Self {
            id,
            from,
            to,
            probability,
            is_loop: from == to,
        }
    }

    #[must_use]
    pub const fn id(&self) -> EdgeId {
        self.id
    }

    /// Index of the source node.
    #[must_use]
    pub const fn from_node(&self) -> usize {
        self.from
    }

    /// Index of the target node.
    #[must_use]
    pub const fn to_node(&self) -> usize {
        self.to
    }

    #[must_use]
    pub const fn probability(&self) -> f64 {
        self.probability
    }

    /// `true` when the edge starts and ends on the same node.
    #[must_use]
    pub const fn is_loop(&self) -> bool {
        self.is_loop
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.from, self.to, self.probability)
    }
}
