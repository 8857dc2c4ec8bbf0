#![forbid(unsafe_code)]
//! chainviz-core library.
//!
//! Graph model for discrete-time, finite-state Markov chains, structural
//! queries over it, and the layered layout consumed by renderers.
//!
//! # Conventions
//!
//! - **Errors**: fallible operations return [`error::Result`] with a
//!   [`ChainError`].
//! - **Logging**: Use `tracing` macros (`debug!`, `trace!`, ...). No
//!   subscriber is installed here.
//!
//! ```rust
//! use chainviz_core::Chain;
//!
//! let mut chain = Chain::from_edges([(0, 1, 0.5), (0, 2, 0.5)]).unwrap();
//! assert!(chain.is_absorbing());
//! assert_eq!(chain.assign_depths().unwrap(), vec![0, 1, 1]);
//! ```

pub mod error;
pub mod layout;
pub mod model;
pub mod structure;

pub use error::{ChainError, ErrorCode, PropertyViolation};
pub use layout::{ChainLayout, NodePosition, layout};
pub use model::{Chain, Edge, EdgeId, EdgeSpec, Node};
