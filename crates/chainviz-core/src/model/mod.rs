//! Arena-backed graph model for discrete-time Markov chains.
//!
//! Nodes and edges live in two append-only vectors owned by [`Chain`]. A node
//! is addressed by its position in the node vector; an edge by its
//! [`EdgeId`]. Adjacency lists on each node store edge ids, so the
//! bidirectional node/edge references never form ownership cycles.

pub mod chain;
pub mod edge;
pub mod node;

pub use chain::{Chain, EdgeSpec};
pub use edge::{Edge, EdgeId};
pub use node::Node;
