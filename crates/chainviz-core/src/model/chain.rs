//! The chain container: node and edge arenas plus construction.

use tracing::trace;

use super::edge::{Edge, EdgeId};
use super::node::Node;
use crate::error::{ChainError, Result};

/// One `(from, to, probability)` triple for bulk edge insertion.
///
/// Converts from `(usize, usize)` with probability 1 and from
/// `(usize, usize, f64)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeSpec {
    pub from: usize,
    pub to: usize,
    pub probability: f64,
}

impl EdgeSpec {
    #[must_use]
    pub const fn new(from: usize, to: usize, probability: f64) -> Self {
        Self {
            from,
            to,
            probability,
        }
    }
}

impl From<(usize, usize)> for EdgeSpec {
    fn from((from, to): (usize, usize)) -> Self {
        Self::new(from, to, 1.0)
    }
}

impl From<(usize, usize, f64)> for EdgeSpec {
    fn from((from, to, probability): (usize, usize, f64)) -> Self {
        Self::new(from, to, probability)
    }
}

/// A discrete-time, finite-state Markov chain.
///
/// Nodes are indexed `0..node_count()` in creation order. Edges are kept in
/// insertion order and parallel edges between the same ordered pair are
/// stored separately.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Chain {
    pub(crate) nodes: Vec<Node>,
    pub(crate) edges: Vec<Edge>,
    /// `true` while node depths hold a layout result.
    pub(crate) depths_assigned: bool,
}

impl Chain {
    /// Create an empty chain.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a chain with `n` unlabelled nodes and no edges.
    #[must_use]
    pub fn with_nodes(n: usize) -> Self {
        let mut chain = Self::new();
        chain.add_nodes(n);
        chain
    }

    /// Create a chain from an edge list, creating nodes `0..=max index`.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::InvalidProbability`] if any probability is
    /// negative or non-finite, or [`ChainError::NodeIndexOutOfRange`] if an
    /// index is `usize::MAX` (no node count can hold it).
    pub fn from_edges<I, E>(edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = E>,
        E: Into<EdgeSpec>,
    {
        let specs: Vec<EdgeSpec> = edges.into_iter().map(Into::into).collect();
        let node_count = specs.iter().try_fold(0, |count: usize, spec| {
            let highest = spec.from.max(spec.to);
            highest
                .checked_add(1)
                .map(|needed| count.max(needed))
                .ok_or(ChainError::NodeIndexOutOfRange {
                    index: highest,
                    node_count: 0,
                })
        })?;

        let mut chain = Self::with_nodes(node_count);
        chain.add_edges(specs)?;
        Ok(chain)
    }

    /// Append an unlabelled node and return its index.
    pub fn add_node(&mut self) -> usize {
        self.invalidate_depths();
        self.push_node(None)
    }

    /// Append a labelled node and return its index.
    pub fn add_labeled_node(&mut self, label: impl Into<String>) -> usize {
        self.invalidate_depths();
        self.push_node(Some(label.into()))
    }

    /// Append `n` unlabelled nodes.
    pub fn add_nodes(&mut self, n: usize) {
        self.invalidate_depths();
        self.nodes.reserve(n);
        for _ in 0..n {
            self.push_node(None);
        }
    }

    fn push_node(&mut self, label: Option<String>) -> usize {
        let index = self.nodes.len();
        self.nodes.push(Node::new(index, label));
        index
    }

    /// Add an edge `from -> to` and register it with both endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::NodeIndexOutOfRange`] if either endpoint does
    /// not exist, or [`ChainError::InvalidProbability`] if `probability` is
    /// negative or non-finite. The chain is unchanged on error.
    pub fn add_edge(&mut self, from: usize, to: usize, probability: f64) -> Result<EdgeId> {
        let node_count = self.nodes.len();
        for index in [from, to] {
            if index >= node_count {
                return Err(ChainError::NodeIndexOutOfRange { index, node_count });
            }
        }
        if !probability.is_finite() || probability < 0.0 {
            return Err(ChainError::InvalidProbability {
                from,
                to,
                probability,
            });
        }

        self.invalidate_depths();
        let id = EdgeId(self.edges.len());
        self.edges.push(Edge::new(id, from, to, probability));
        self.nodes[from].edges_out.push(id);
        self.nodes[to].edges_in.push(id);
        trace!(%id, from, to, probability, "edge added");
        Ok(id)
    }

    /// Add every edge in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Propagates the first error from [`Chain::add_edge`]. Edges before the
    /// failing one remain in the chain.
    pub fn add_edges<I, E>(&mut self, edges: I) -> Result<()>
    where
        I: IntoIterator<Item = E>,
        E: Into<EdgeSpec>,
    {
        for spec in edges {
            let spec = spec.into();
            self.add_edge(spec.from, spec.to, spec.probability)?;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[must_use]
    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    #[must_use]
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(id.0)
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Outgoing edges of `index` in insertion order. Empty for unknown nodes.
    pub fn outgoing(&self, index: usize) -> impl Iterator<Item = &Edge> + '_ {
        self.adjacent(index, Node::edges_out)
    }

    /// Incoming edges of `index` in insertion order. Empty for unknown nodes.
    pub fn incoming(&self, index: usize) -> impl Iterator<Item = &Edge> + '_ {
        self.adjacent(index, Node::edges_in)
    }

    fn adjacent<'a>(
        &'a self,
        index: usize,
        select: fn(&Node) -> &[EdgeId],
    ) -> impl Iterator<Item = &'a Edge> + 'a {
        self.nodes
            .get(index)
            .map(select)
            .into_iter()
            .flatten()
            .map(|id| &self.edges[id.0])
    }

    /// `true` if any outgoing edge of `from` targets `to`.
    ///
    /// Renderers use this to bend one of a pair of opposing edges.
    #[must_use]
    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        self.outgoing(from).any(|edge| edge.to_node() == to)
    }

    // -----------------------------------------------------------------------
    // Derived layout state
    // -----------------------------------------------------------------------

    /// Current depth of every node, or `None` if the layout pass has not
    /// run since the last change.
    #[must_use]
    pub fn depths(&self) -> Option<Vec<usize>> {
        self.nodes.iter().map(Node::depth).collect()
    }

    pub(crate) fn invalidate_depths(&mut self) {
        if !self.depths_assigned {
            return;
        }
        for node in &mut self.nodes {
            node.depth = None;
        }
        self.depths_assigned = false;
    }
}
