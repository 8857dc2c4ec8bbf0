//! Structural queries: connectivity, absorption, probability sums.
//!
//! # Connectivity
//!
//! [`Chain::is_connected`] asks whether the *underlying undirected* graph is
//! connected. Edge direction is ignored: a breadth-first search from node 0
//! follows both outgoing and incoming edges. A visited set stops cycles and
//! self-loops from being re-expanded.
//!
//! # Absorption
//!
//! A node with no outgoing edges is absorbing. A chain is absorbing when at
//! least one such node exists.

#![allow(clippy::float_cmp)]

use std::collections::VecDeque;

use tracing::debug;

use crate::error::{ChainError, PropertyViolation, Result};
use crate::model::{Chain, Edge, Node};

/// Tolerance used by [`Chain::probabilities_sum_to_one`].
pub const PROBABILITY_SUM_TOLERANCE: f64 = 1e-8;

impl Chain {
    /// `true` when the undirected graph underlying the chain is connected.
    ///
    /// An empty chain is connected.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        let n = self.node_count();
        if n == 0 {
            return true;
        }

        let mut visited = vec![false; n];
        let mut queue = VecDeque::from([0]);
        visited[0] = true;
        let mut seen = 1;

        while let Some(current) = queue.pop_front() {
            let neighbours = self
                .outgoing(current)
                .map(Edge::to_node)
                .chain(self.incoming(current).map(Edge::from_node));
            for next in neighbours {
                if !visited[next] {
                    visited[next] = true;
                    seen += 1;
                    queue.push_back(next);
                }
            }
        }

        debug!(visited = seen, nodes = n, "connectivity search finished");
        seen == n
    }

    /// `true` when at least one node has no outgoing edges.
    #[must_use]
    pub fn is_absorbing(&self) -> bool {
        self.nodes.iter().any(Node::is_absorbing)
    }

    /// Indices of absorbing nodes in index order.
    #[must_use]
    pub fn absorbing_nodes(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .filter(|node| node.is_absorbing())
            .map(Node::index)
            .collect()
    }

    /// Indices of transient (non-absorbing) nodes in index order.
    #[must_use]
    pub fn transient_nodes(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .filter(|node| !node.is_absorbing())
            .map(Node::index)
            .collect()
    }

    /// Check the preconditions shared by the fundamental-matrix and layout
    /// computations.
    ///
    /// # Errors
    ///
    /// Returns [`PropertyViolation::NotAbsorbing`] first if no absorbing
    /// node exists, then [`PropertyViolation::Disjoint`] if the chain is not
    /// connected.
    pub fn check_absorbing_chain(&self) -> Result<()> {
        if !self.is_absorbing() {
            return Err(PropertyViolation::NotAbsorbing.into());
        }
        if !self.is_connected() {
            return Err(PropertyViolation::Disjoint.into());
        }
        Ok(())
    }

    /// `true` if the outgoing probabilities of `index` sum to 1 within
    /// [`PROBABILITY_SUM_TOLERANCE`].
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::NodeIndexOutOfRange`] for an unknown node.
    pub fn probabilities_sum_to_one(&self, index: usize) -> Result<bool> {
        let sum = self.outgoing_sum(index)?;
        Ok((sum - 1.0).abs() <= PROBABILITY_SUM_TOLERANCE)
    }

    /// Rescale the outgoing probabilities of `index` so they sum to 1.
    ///
    /// Leaves the probabilities untouched when the node has no outgoing
    /// edges or their sum is zero.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::NodeIndexOutOfRange`] for an unknown node.
    pub fn normalise_probabilities(&mut self, index: usize) -> Result<()> {
        let sum = self.outgoing_sum(index)?;
        if sum == 0.0 {
            debug!(node = index, "zero outgoing probability, not normalising");
            return Ok(());
        }

        self.invalidate_depths();
        let ids = self.nodes[index].edges_out.clone();
        for id in ids {
            self.edges[id.index()].probability /= sum;
        }
        Ok(())
    }

    fn outgoing_sum(&self, index: usize) -> Result<f64> {
        if index >= self.node_count() {
            return Err(ChainError::NodeIndexOutOfRange {
                index,
                node_count: self.node_count(),
            });
        }
        Ok(self.outgoing(index).map(Edge::probability).sum())
    }
}
