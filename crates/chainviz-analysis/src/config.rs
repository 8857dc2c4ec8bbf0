//! Analysis settings loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) yields
//! [`AnalysisConfig::default`].
//!
//! ```toml
//! [numeric]
//! pivot_epsilon = 1e-12
//!
//! [display]
//! max_denominator = 1000000
//! ```

use std::path::Path;

use anyhow::{Context, Result, ensure};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub numeric: NumericConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericConfig {
    /// LU pivots with magnitude at or below this mark `I - Q` as singular.
    #[serde(default = "default_pivot_epsilon")]
    pub pivot_epsilon: f64,
}

impl Default for NumericConfig {
    fn default() -> Self {
        Self {
            pivot_epsilon: default_pivot_epsilon(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Largest denominator used when rendering values as fractions.
    #[serde(default = "default_max_denominator")]
    pub max_denominator: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_denominator: default_max_denominator(),
        }
    }
}

impl AnalysisConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// Fails on malformed TOML or values rejected by [`Self::validate`].
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse analysis config")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the analysis cannot work with.
    ///
    /// # Errors
    ///
    /// Fails when `pivot_epsilon` is negative or non-finite, or when
    /// `max_denominator` is zero.
    pub fn validate(&self) -> Result<()> {
        let eps = self.numeric.pivot_epsilon;
        ensure!(
            eps.is_finite() && eps >= 0.0,
            "numeric.pivot_epsilon must be finite and >= 0, got {eps}"
        );
        ensure!(
            self.display.max_denominator >= 1,
            "display.max_denominator must be at least 1"
        );
        Ok(())
    }
}

/// Load settings from `path`, falling back to defaults when it does not exist.
///
/// # Errors
///
/// Fails when the file exists but cannot be read, parsed or validated.
pub fn load_config(path: &Path) -> Result<AnalysisConfig> {
    if !path.exists() {
        return Ok(AnalysisConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    AnalysisConfig::from_toml_str(&content).with_context(|| format!("Invalid {}", path.display()))
}

const fn default_pivot_epsilon() -> f64 {
    1e-12
}

const fn default_max_denominator() -> u64 {
    1_000_000
}
