//! Transition matrices and the fundamental matrix of an absorbing chain.
//!
//! # Overview
//!
//! Order the transient states by node index and let `Q` be the transition
//! matrix restricted to transient-to-transient moves. The fundamental matrix
//!
//! ```text
//! N = (I - Q)^-1
//! ```
//!
//! holds in `N[i][j]` the expected number of visits to transient state `j`
//! when starting from transient state `i`, before absorption. Row sums of `N`
//! give the expected number of steps before absorption.
//!
//! `N` is computed by LU decomposition with partial pivoting and an exact
//! inverse, never by iterating powers of `Q`.
//!
//! # Parallel edges
//!
//! When several edges join the same ordered pair, the one inserted last
//! determines the matrix entry.

use nalgebra::{DMatrix, DVector};
use tracing::{debug, instrument, warn};

use chainviz_core::error::{ChainError, Result};
use chainviz_core::Chain;

use crate::config::NumericConfig;

/// Dense `n x n` transition matrix, `m[(i, j)]` = probability of `i -> j`.
///
/// Entries without an edge are zero. An empty chain gives a `0 x 0` matrix.
#[must_use]
pub fn transition_matrix(chain: &Chain) -> DMatrix<f64> {
    let n = chain.node_count();
    let mut matrix = DMatrix::zeros(n, n);
    for edge in chain.edges() {
        matrix[(edge.from_node(), edge.to_node())] = edge.probability();
    }
    matrix
}

/// The fundamental matrix together with the transient states it indexes.
#[derive(Debug, Clone, PartialEq)]
pub struct FundamentalMatrix {
    transient: Vec<usize>,
    matrix: DMatrix<f64>,
}

impl FundamentalMatrix {
    /// Chain indices of the transient states; row/column `k` of the matrix
    /// belongs to `transient_states()[k]`.
    #[must_use]
    pub fn transient_states(&self) -> &[usize] {
        &self.transient
    }

    /// `N = (I - Q)^-1`, indexed by transient position.
    #[must_use]
    pub const fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    #[must_use]
    pub fn into_matrix(self) -> DMatrix<f64> {
        self.matrix
    }

    /// Number of transient states.
    #[must_use]
    pub fn len(&self) -> usize {
        self.transient.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transient.is_empty()
    }

    /// Position of chain node `index` among the transient states.
    #[must_use]
    pub fn position(&self, index: usize) -> Option<usize> {
        self.transient.binary_search(&index).ok()
    }

    /// Expected visits to node `to` starting from node `from`, both given as
    /// chain indices. `None` if either node is absorbing or unknown.
    #[must_use]
    pub fn expected_visits(&self, from: usize, to: usize) -> Option<f64> {
        Some(self.matrix[(self.position(from)?, self.position(to)?)])
    }

    /// Expected steps before absorption from each transient state: `N * 1`.
    #[must_use]
    pub fn steps_before_absorption(&self) -> DVector<f64> {
        let ones = DVector::from_element(self.matrix.ncols(), 1.0);
        &self.matrix * ones
    }
}

/// Compute the fundamental matrix with default numeric settings.
///
/// # Errors
///
/// See [`expected_steps_with`].
pub fn expected_steps(chain: &Chain) -> Result<FundamentalMatrix> {
    expected_steps_with(chain, &NumericConfig::default())
}

/// Compute the fundamental matrix `N = (I - Q)^-1`.
///
/// # Errors
///
/// - [`ChainError::Property`] if the chain is not absorbing or not
///   connected. Checked before any matrix work.
/// - [`ChainError::SingularMatrix`] if an LU pivot of `I - Q` is within
///   `config.pivot_epsilon` of zero or the inverse is not finite.
#[instrument(skip(chain, config), fields(nodes = chain.node_count()))]
pub fn expected_steps_with(chain: &Chain, config: &NumericConfig) -> Result<FundamentalMatrix> {
    chain.check_absorbing_chain()?;

    let transient = chain.transient_nodes();
    let t = transient.len();
    debug!(transient = t, absorbing = chain.node_count() - t, "building Q");

    if t == 0 {
        return Ok(FundamentalMatrix {
            transient,
            matrix: DMatrix::zeros(0, 0),
        });
    }

    let p = transition_matrix(chain);
    let q = DMatrix::from_fn(t, t, |r, c| p[(transient[r], transient[c])]);
    let i_minus_q = DMatrix::identity(t, t) - q;

    let lu = i_minus_q.lu();
    let min_pivot = lu
        .u()
        .diagonal()
        .iter()
        .fold(f64::INFINITY, |acc, pivot| acc.min(pivot.abs()));
    if min_pivot <= config.pivot_epsilon {
        warn!(size = t, min_pivot, "I - Q is singular");
        return Err(ChainError::SingularMatrix { size: t });
    }

    let matrix = lu
        .try_inverse()
        .filter(|inverse| inverse.iter().all(|v| v.is_finite()))
        .ok_or_else(|| {
            warn!(size = t, "I - Q could not be inverted");
            ChainError::SingularMatrix { size: t }
        })?;

    Ok(FundamentalMatrix { transient, matrix })
}

/// Expected steps before absorption from each transient state.
///
/// # Errors
///
/// Same as [`expected_steps`].
pub fn expected_steps_before_absorption(chain: &Chain) -> Result<DVector<f64>> {
    Ok(expected_steps(chain)?.steps_before_absorption())
}
