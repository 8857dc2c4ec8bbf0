#![forbid(unsafe_code)]
//! chainviz-analysis library.
//!
//! Numeric and graph-level analysis on top of [`chainviz_core::Chain`]:
//!
//! - [`fundamental`]: transition matrix, fundamental matrix `(I - Q)^-1`,
//!   expected steps before absorption.
//! - [`graph`]: petgraph view of a chain and summary statistics.
//! - [`fraction`]: render matrices as bounded-denominator fractions.
//! - [`config`]: TOML-backed analysis settings.
//!
//! # Conventions
//!
//! - **Errors**: chain analysis returns [`chainviz_core::error::Result`];
//!   configuration loading returns `anyhow::Result`.
//! - **Logging**: Use `tracing` macros.

pub mod config;
pub mod fraction;
pub mod fundamental;
pub mod graph;

pub use config::{AnalysisConfig, DisplayConfig, NumericConfig, load_config};
pub use fraction::{Fraction, format_matrix, limit_denominator};
pub use fundamental::{
    FundamentalMatrix, expected_steps, expected_steps_before_absorption, expected_steps_with,
    transition_matrix,
};
pub use graph::{ChainStats, to_digraph};
