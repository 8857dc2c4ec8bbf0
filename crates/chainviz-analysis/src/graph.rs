//! Petgraph view of a chain and summary statistics.
//!
//! # Statistics Provided
//!
//! - **node_count** / **edge_count**: sizes of the chain (parallel edges
//!   counted separately).
//! - **loop_count**: edges whose source and target coincide.
//! - **absorbing_count** / **transient_count**: nodes without / with
//!   outgoing edges.
//! - **weakly_connected_component_count**: components of the underlying
//!   undirected graph. A connected chain has exactly one (zero when empty).
//! - **scc_count**: strongly connected components.
//! - **cycle_count**: SCCs with more than one member. Self-loops are
//!   reported by `loop_count` instead.

use petgraph::algo::{connected_components, tarjan_scc};
use petgraph::graph::{DiGraph, NodeIndex};
use tracing::instrument;

use chainviz_core::Chain;

/// Build a petgraph `DiGraph` mirroring `chain`.
///
/// Node weights are chain indices and `NodeIndex::new(i)` is node `i`. Edge
/// weights are probabilities; parallel edges are kept in insertion order.
#[must_use]
pub fn to_digraph(chain: &Chain) -> DiGraph<usize, f64> {
    let mut graph = DiGraph::with_capacity(chain.node_count(), chain.edge_count());
    for node in chain.nodes() {
        graph.add_node(node.index());
    }
    for edge in chain.edges() {
        graph.add_edge(
            NodeIndex::new(edge.from_node()),
            NodeIndex::new(edge.to_node()),
            edge.probability(),
        );
    }
    graph
}

/// Summary statistics for a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub loop_count: usize,
    pub absorbing_count: usize,
    pub transient_count: usize,
    pub weakly_connected_component_count: usize,
    pub scc_count: usize,
    pub cycle_count: usize,
}

impl ChainStats {
    /// Compute statistics for `chain`.
    #[must_use]
    #[instrument(skip(chain))]
    pub fn from_chain(chain: &Chain) -> Self {
        let graph = to_digraph(chain);
        let sccs = tarjan_scc(&graph);
        let absorbing_count = chain.nodes().iter().filter(|n| n.is_absorbing()).count();

        Self {
            node_count: chain.node_count(),
            edge_count: chain.edge_count(),
            loop_count: chain.edges().iter().filter(|e| e.is_loop()).count(),
            absorbing_count,
            transient_count: chain.node_count() - absorbing_count,
            weakly_connected_component_count: connected_components(&graph),
            scc_count: sccs.len(),
            cycle_count: sccs.iter().filter(|scc| scc.len() > 1).count(),
        }
    }

    /// `true` when the chain satisfies the fundamental-matrix preconditions.
    #[must_use]
    pub const fn is_absorbing_chain(&self) -> bool {
        self.absorbing_count > 0 && self.weakly_connected_component_count == 1
    }
}
