//! Chain states.

use super::edge::EdgeId;

/// A state in a Markov chain.
///
/// `edges_out` and `edges_in` list edge ids in creation order. `depth` is
/// a derived layout value: `None` until a layout pass assigns it, and reset
/// to `None` whenever the owning chain changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    index: usize,
    label: Option<String>,
    pub(crate) edges_out: Vec<EdgeId>,
    pub(crate) edges_in: Vec<EdgeId>,
    pub(crate) depth: Option<usize>,
}

impl Node {
    pub(crate) const fn new(index: usize, label: Option<String>) -> Self {
        Self {
            index,
            label,
            edges_out: Vec::new(),
            edges_in: Vec::new(),
            depth: None,
        }
    }

    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Outgoing edge ids in insertion order.
    #[must_use]
    pub fn edges_out(&self) -> &[EdgeId] {
        &self.edges_out
    }

    /// Incoming edge ids in insertion order.
    #[must_use]
    pub fn edges_in(&self) -> &[EdgeId] {
        &self.edges_in
    }

    /// Layout depth from the most recent layout pass, if still valid.
    #[must_use]
    pub const fn depth(&self) -> Option<usize> {
        self.depth
    }

    /// A node is absorbing when it has no outgoing edges.
    #[must_use]
    pub fn is_absorbing(&self) -> bool {
        self.edges_out.is_empty()
    }
}
