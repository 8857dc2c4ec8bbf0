//! Layered layout: depth assignment, descendant sets and positions.
//!
//! # Overview
//!
//! Markov chains routinely contain back-edges and self-loops, so a plain
//! topological sort cannot order them. Depths are assigned by repeatedly
//! *closing* one open node:
//!
//! 1. Scan open nodes in index order and pick the first whose non-loop
//!    incoming edges all come from closed nodes. Its depth is 0 without such
//!    edges, else `1 + max(depth of those sources)`.
//! 2. If no open node qualifies, the open nodes only reach each other
//!    through cycles. Pick the open node with the smallest index and place it
//!    one layer below every closed node (depth 0 if nothing is closed yet).
//!
//! Step 2 guarantees termination and gives a deterministic result on cycles.
//!
//! # Descendants
//!
//! A node's descendant set holds every node reachable through non-loop edges
//! that strictly increase depth. Layers are processed from deepest to
//! shallowest so each child's set is final before its parents read it.
//!
//! # Positions
//!
//! The horizontal coordinate is `depth / max_depth` in `[0, 1]` (0 when the
//! chain has a single layer). Vertical placement is left to the renderer;
//! [`NodePosition::slot`] gives the node's rank within its layer.

#![allow(clippy::cast_precision_loss)]

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::{debug, instrument, trace};

use crate::error::Result;
use crate::model::{Chain, Edge};

/// Where one node sits in the layered layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodePosition {
    /// Chain index of the node.
    pub index: usize,
    /// Assigned layer.
    pub depth: usize,
    /// Rank of the node within its layer, in index order.
    pub slot: usize,
    /// Normalised horizontal coordinate: `depth / max_depth`.
    pub x: f64,
}

/// Full result of a layout pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainLayout {
    /// Number of layers (`max_depth + 1`).
    pub layer_count: usize,
    /// Node indices per layer, each in index order.
    pub layers: Vec<Vec<usize>>,
    /// Forward descendant set of every node, indexed by node.
    pub descendants: Vec<BTreeSet<usize>>,
    /// Position of every node, indexed by node.
    pub positions: Vec<NodePosition>,
}

impl ChainLayout {
    /// Deepest layer index.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.layer_count.saturating_sub(1)
    }
}

impl Chain {
    /// Recompute every node's depth and store it on the nodes.
    ///
    /// Returns the depths indexed by node.
    ///
    /// # Errors
    ///
    /// Fails with a [`PropertyViolation`](crate::error::PropertyViolation)
    /// if the chain is not absorbing or not connected. Stored depths are left
    /// cleared in that case.
    #[instrument(skip(self), fields(nodes = self.node_count()))]
    pub fn assign_depths(&mut self) -> Result<Vec<usize>> {
        self.invalidate_depths();
        self.check_absorbing_chain()?;

        let depths = compute_depths(self);
        for (node, &depth) in self.nodes.iter_mut().zip(&depths) {
            node.depth = Some(depth);
        }
        self.depths_assigned = true;
        Ok(depths)
    }
}

fn compute_depths(chain: &Chain) -> Vec<usize> {
    let n = chain.node_count();
    let mut depths: Vec<Option<usize>> = vec![None; n];
    let mut deepest_closed: Option<usize> = None;

    while let Some(first_open) = depths.iter().position(Option::is_none) {
        let ready = (first_open..n).find(|&i| {
            depths[i].is_none()
                && non_loop_incoming(chain, i).all(|edge| depths[edge.from_node()].is_some())
        });

        let (index, depth) = if let Some(i) = ready {
            let depth = non_loop_incoming(chain, i)
                .filter_map(|edge| depths[edge.from_node()])
                .max()
                .map_or(0, |d| d + 1);
            trace!(node = i, depth, "closed from predecessors");
            (i, depth)
        } else {
            let depth = deepest_closed.map_or(0, |d| d + 1);
            debug!(node = first_open, depth, "no open node has closed predecessors, breaking cycle");
            (first_open, depth)
        };

        depths[index] = Some(depth);
        deepest_closed = Some(deepest_closed.map_or(depth, |d| d.max(depth)));
    }

    depths.into_iter().flatten().collect()
}

fn non_loop_incoming(chain: &Chain, index: usize) -> impl Iterator<Item = &Edge> + '_ {
    chain.incoming(index).filter(|edge| !edge.is_loop())
}

/// Group node indices by depth. Layer `d` lists the nodes at depth `d` in
/// index order; empty input gives no layers.
#[must_use]
pub fn group_layers(depths: &[usize]) -> Vec<Vec<usize>> {
    let Some(&max_depth) = depths.iter().max() else {
        return Vec::new();
    };
    let mut layers = vec![Vec::new(); max_depth + 1];
    for (index, &depth) in depths.iter().enumerate() {
        layers[depth].push(index);
    }
    layers
}

/// Forward descendant set of every node.
///
/// `depths` and `layers` must come from the same depth assignment of
/// `chain`.
#[must_use]
pub fn descendants(chain: &Chain, depths: &[usize], layers: &[Vec<usize>]) -> Vec<BTreeSet<usize>> {
    let mut sets = vec![BTreeSet::new(); chain.node_count()];

    for layer in layers.iter().rev() {
        for &index in layer {
            let mut set = BTreeSet::new();
            for edge in chain.outgoing(index) {
                let child = edge.to_node();
                if edge.is_loop() || depths[child] <= depths[index] {
                    continue;
                }
                set.insert(child);
                set.extend(sets[child].iter().copied());
            }
            sets[index] = set;
        }
    }

    sets
}

/// Run the depth pass and derive layers, descendants and positions.
///
/// # Errors
///
/// Same preconditions as [`Chain::assign_depths`].
#[instrument(skip(chain), fields(nodes = chain.node_count(), edges = chain.edge_count()))]
pub fn layout(chain: &mut Chain) -> Result<ChainLayout> {
    let depths = chain.assign_depths()?;
    let layers = group_layers(&depths);
    let descendants = descendants(chain, &depths, &layers);
    let max_depth = layers.len().saturating_sub(1);

    let mut positions: Vec<NodePosition> = Vec::with_capacity(depths.len());
    let mut slots = vec![0; depths.len()];
    for layer in &layers {
        for (slot, &index) in layer.iter().enumerate() {
            slots[index] = slot;
        }
    }
    for (index, &depth) in depths.iter().enumerate() {
        let x = if max_depth == 0 {
            0.0
        } else {
            depth as f64 / max_depth as f64
        };
        positions.push(NodePosition {
            index,
            depth,
            slot: slots[index],
            x,
        });
    }

    debug!(layers = layers.len(), "layout computed");
    Ok(ChainLayout {
        layer_count: layers.len(),
        layers,
        descendants,
        positions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ChainError, PropertyViolation};

    fn chain(edges: &[(usize, usize)]) -> Chain {
        Chain::from_edges(edges.iter().copied()).expect("valid edges")
    }

    fn set(items: &[usize]) -> BTreeSet<usize> {
        items.iter().copied().collect()
    }

    #[test]
    fn strict_path_depths() {
        let mut c = chain(&[(0, 1), (1, 2), (2, 3)]);
        assert_eq!(c.assign_depths().expect("valid chain"), vec![0, 1, 2, 3]);
        assert_eq!(c.depths(), Some(vec![0, 1, 2, 3]));
    }

    #[test]
    fn self_loop_is_ignored() {
        let mut c = chain(&[(0, 1), (1, 2), (2, 2)]);
        assert_eq!(c.assign_depths().expect("valid chain"), vec![0, 1, 2]);

        let mut c = chain(&[(0, 0), (0, 1)]);
        assert_eq!(c.assign_depths().expect("valid chain"), vec![0, 1]);
    }

    #[test]
    fn diamond_takes_longest_predecessor() {
        let mut c = chain(&[(0, 1), (0, 2), (1, 3), (2, 3), (1, 2)]);
        assert_eq!(c.assign_depths().expect("valid chain"), vec![0, 1, 2, 3]);
    }

    #[test]
    fn cycle_tie_break_uses_smallest_open_index() {
        // 0 <-> 1, 0 <-> 3, 1 -> 2, 3 -> 4, 2 -> 5, 4 -> 5, 4 -> 4
        let mut c = Chain::from_edges([
            (0, 1, 1.0 / 3.0),
            (1, 0, 4.0 / 5.0),
            (1, 2, 1.0 / 5.0),
            (0, 3, 2.0 / 3.0),
            (3, 0, 2.0 / 5.0),
            (3, 4, 3.0 / 5.0),
            (2, 5, 1.0),
            (4, 5, 1.0 / 3.0),
            (4, 4, 2.0 / 3.0),
        ])
        .expect("valid edges");
        assert_eq!(
            c.assign_depths().expect("valid chain"),
            vec![0, 1, 2, 1, 2, 3]
        );
    }

    #[test]
    fn tie_break_places_below_all_closed_nodes() {
        // 0 -> 1 -> 2, and the cycle 3 <-> 4 entered from 2, exiting to 5.
        // 3 waits on 4 and 4 waits on 3, so 3 breaks the tie at 1 + max(0, 1, 2).
        let mut c = chain(&[(0, 1), (1, 2), (2, 3), (3, 4), (4, 3), (4, 5), (0, 5)]);
        assert_eq!(
            c.assign_depths().expect("valid chain"),
            vec![0, 1, 2, 3, 4, 5]
        );
    }

    #[test]
    fn precondition_failures_clear_depths() {
        let mut c = chain(&[(0, 1)]);
        c.assign_depths().expect("valid chain");
        c.add_edge(1, 0, 1.0).expect("in range");
        assert_eq!(c.depths(), None);
        assert_eq!(
            c.assign_depths(),
            Err(ChainError::Property(PropertyViolation::NotAbsorbing))
        );

        let mut c = chain(&[(0, 1), (2, 3)]);
        assert_eq!(
            c.assign_depths(),
            Err(ChainError::Property(PropertyViolation::Disjoint))
        );
        assert_eq!(c.depths(), None);
    }

    #[test]
    fn mutation_invalidates_depths() {
        let mut c = Chain::from_edges([(0, 1, 2.0)]).expect("valid");
        c.assign_depths().expect("valid chain");
        assert!(c.depths().is_some());
        c.normalise_probabilities(0).expect("in range");
        assert_eq!(c.depths(), None);

        c.assign_depths().expect("valid chain");
        c.add_node();
        assert_eq!(c.depths(), None);
    }

    #[test]
    fn group_layers_by_depth() {
        assert_eq!(
            group_layers(&[0, 1, 1, 2, 0]),
            vec![vec![0, 4], vec![1, 2], vec![3]]
        );
        assert!(group_layers(&[]).is_empty());
    }

    #[test]
    fn descendants_follow_forward_edges_only() {
        let mut c = chain(&[(0, 1), (1, 0), (1, 2), (2, 2), (0, 3)]);
        let depths = c.assign_depths().expect("valid chain");
        assert_eq!(depths, vec![0, 1, 2, 1]);
        let layers = group_layers(&depths);
        let sets = descendants(&c, &depths, &layers);
        assert_eq!(sets[0], set(&[1, 2, 3]));
        assert_eq!(sets[1], set(&[2]));
        assert_eq!(sets[2], set(&[]));
        assert_eq!(sets[3], set(&[]));
    }

    #[test]
    fn layout_positions_are_normalised() {
        let mut c = chain(&[(0, 1), (0, 2), (1, 3), (2, 3)]);
        let result = layout(&mut c).expect("valid chain");
        assert_eq!(result.layer_count, 3);
        assert_eq!(result.max_depth(), 2);
        assert_eq!(result.layers, vec![vec![0], vec![1, 2], vec![3]]);

        let xs: Vec<f64> = result.positions.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 0.5, 0.5, 1.0]);
        let slots: Vec<usize> = result.positions.iter().map(|p| p.slot).collect();
        assert_eq!(slots, vec![0, 0, 1, 0]);
    }

    #[test]
    fn single_layer_positions_are_zero() {
        let mut c = Chain::with_nodes(1);
        let result = layout(&mut c).expect("single absorbing node");
        assert_eq!(result.layer_count, 1);
        assert_eq!(result.positions[0].x, 0.0);
    }

    #[test]
    fn empty_chain_is_not_absorbing() {
        let mut c = Chain::new();
        assert!(layout(&mut c).is_err());
    }
}
