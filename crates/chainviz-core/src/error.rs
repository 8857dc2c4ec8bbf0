//! Error types for chain construction and analysis.
//!
//! Every failure is a [`ChainError`]. Structural precondition failures carry a
//! [`PropertyViolation`] so callers can branch on "not absorbing" versus
//! "disjoint" without matching on message text. Each variant also maps to a
//! stable [`ErrorCode`] for log lines and machine consumers.

use std::fmt;

/// Result alias used across the chainviz crates.
pub type Result<T> = std::result::Result<T, ChainError>;

/// The structural property a chain failed to satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyViolation {
    /// No node without outgoing edges exists.
    NotAbsorbing,
    /// The underlying undirected graph has more than one component.
    Disjoint,
}

impl PropertyViolation {
    /// Human-readable reason for the violation.
    #[must_use]
    pub const fn reason(self) -> &'static str {
        match self {
            Self::NotAbsorbing => "chain is not absorbing",
            Self::Disjoint => "chain is disjoint",
        }
    }
}

impl fmt::Display for PropertyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.reason())
    }
}

/// Errors produced while building or analysing a chain.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ChainError {
    /// An edge endpoint does not name an existing node.
    #[error("node index {index} out of range: chain has {node_count} nodes")]
    NodeIndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of nodes at the time of the call.
        node_count: usize,
    },

    /// An edge probability is negative, NaN or infinite.
    #[error("invalid probability {probability} on edge {from} -> {to}")]
    InvalidProbability {
        /// Source node index.
        from: usize,
        /// Target node index.
        to: usize,
        /// The rejected value.
        probability: f64,
    },

    /// The chain does not satisfy a structural precondition.
    #[error("chain property error: {0}")]
    Property(PropertyViolation),

    /// `I - Q` could not be inverted.
    #[error("singular matrix: (I - Q) of size {size} has no inverse")]
    SingularMatrix {
        /// Number of transient states (rows of `Q`).
        size: usize,
    },
}

impl ChainError {
    /// Stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::NodeIndexOutOfRange { .. } => ErrorCode::NodeIndexOutOfRange,
            Self::InvalidProbability { .. } => ErrorCode::InvalidProbability,
            Self::Property(PropertyViolation::NotAbsorbing) => ErrorCode::NotAbsorbing,
            Self::Property(PropertyViolation::Disjoint) => ErrorCode::Disjoint,
            Self::SingularMatrix { .. } => ErrorCode::SingularMatrix,
        }
    }

    /// The violated property, if this is a structural precondition failure.
    #[must_use]
    pub const fn property(&self) -> Option<PropertyViolation> {
        match self {
            Self::Property(violation) => Some(*violation),
            _ => None,
        }
    }
}

impl From<PropertyViolation> for ChainError {
    fn from(violation: PropertyViolation) -> Self {
        Self::Property(violation)
    }
}

/// Machine-readable error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NodeIndexOutOfRange,
    InvalidProbability,
    NotAbsorbing,
    Disjoint,
    SingularMatrix,
}

impl ErrorCode {
    /// Stable code identifier (`E####`).
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NodeIndexOutOfRange => "E1001",
            Self::InvalidProbability => "E1002",
            Self::NotAbsorbing => "E2001",
            Self::Disjoint => "E2002",
            Self::SingularMatrix => "E3001",
        }
    }

    /// Short summary for logs.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NodeIndexOutOfRange => "Node index out of range",
            Self::InvalidProbability => "Invalid edge probability",
            Self::NotAbsorbing => "Chain has no absorbing state",
            Self::Disjoint => "Chain is not connected",
            Self::SingularMatrix => "Fundamental matrix is singular",
        }
    }

    /// Optional remediation hint.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NodeIndexOutOfRange => Some("Add the node before adding edges that reference it."),
            Self::InvalidProbability => Some("Use a finite, non-negative probability."),
            Self::NotAbsorbing => Some("Add a state with no outgoing edges."),
            Self::Disjoint => Some("Link the separate components with at least one edge."),
            Self::SingularMatrix => {
                Some("Check that every transient state can reach an absorbing state.")
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
