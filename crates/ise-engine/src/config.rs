//! Tunable parameters for decomposition and the year aggregations.
//!
//! All structs deserialize with per-field defaults, so a partial
//! `ise.toml` section only overrides what it names.

use ise_core::error::{ensure_range, IseError, Result};
use serde::{Deserialize, Serialize};

/// Decomposition engine parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Maximum hops in a propagated chain (1 = direct only).
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Chains whose running strength falls below this stop propagating.
    #[serde(default = "default_min_path_strength")]
    pub min_path_strength: f64,
    /// Minimum strength for a multi-hop route to count as a critical path.
    #[serde(default = "default_critical_path_threshold")]
    pub critical_path_threshold: f64,
    /// Routes kept per exporter/importer pair.
    #[serde(default = "default_max_paths_per_pair")]
    pub max_paths_per_pair: usize,
    /// Indirect-only relations below this total are not emitted.
    #[serde(default = "default_min_dependency")]
    pub min_dependency: f64,
}

/// Critical relation detector parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriticalConfig {
    #[serde(default = "default_critical_threshold")]
    pub threshold: f64,
    /// Only emit relations with fewer than three alternative routes.
    #[serde(default = "default_strict")]
    pub strict: bool,
}

/// Industry explorer parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExplorerConfig {
    /// Suppliers kept per (importer, industry).
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Suppliers below this total dependency are not listed.
    #[serde(default)]
    pub min_dependency: f64,
}

/// Bilateral risk table parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BilateralConfig {
    /// Relations at or below this total are not listed.
    #[serde(default = "default_bilateral_min")]
    pub min_dependency: f64,
    /// Relations below this total get criticality 0.
    #[serde(default = "default_critical_threshold")]
    pub critical_threshold: f64,
}

/// Top-dependencies table parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependenciesConfig {
    /// Rows kept per dependent country.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

/// Everything the year aggregation needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregationConfig {
    #[serde(default)]
    pub critical: CriticalConfig,
    #[serde(default)]
    pub explorer: ExplorerConfig,
    #[serde(default)]
    pub bilateral: BilateralConfig,
    #[serde(default)]
    pub dependencies: DependenciesConfig,
}

// Default value functions
fn default_max_depth() -> usize { 4 }
fn default_min_path_strength() -> f64 { 1e-4 }
fn default_critical_path_threshold() -> f64 { 0.01 }
fn default_max_paths_per_pair() -> usize { 10 }
fn default_min_dependency() -> f64 { 1e-4 }
fn default_critical_threshold() -> f64 { 0.7 }
fn default_strict() -> bool { true }
fn default_top_k() -> usize { 20 }
fn default_bilateral_min() -> f64 { 0.05 }
fn default_top_n() -> usize { 15 }

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            min_path_strength: default_min_path_strength(),
            critical_path_threshold: default_critical_path_threshold(),
            max_paths_per_pair: default_max_paths_per_pair(),
            min_dependency: default_min_dependency(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(IseError::invalid_config("engine.max_depth", "0", "must be at least 1"));
        }
        if self.max_paths_per_pair == 0 {
            return Err(IseError::invalid_config(
                "engine.max_paths_per_pair",
                "0",
                "must be at least 1",
            ));
        }
        ensure_range("engine.min_path_strength", self.min_path_strength, 0.0, 1.0)?;
        ensure_range("engine.critical_path_threshold", self.critical_path_threshold, 0.0, 1.0)?;
        ensure_range("engine.min_dependency", self.min_dependency, 0.0, 1.0)?;
        Ok(())
    }
}

impl Default for CriticalConfig {
    fn default() -> Self {
        Self::strict()
    }
}

impl CriticalConfig {
    /// Dependency >= 0.7 with fewer than three alternative routes.
    pub fn strict() -> Self {
        Self {
            threshold: 0.7,
            strict: true,
        }
    }

    /// Dependency >= 0.5, any number of routes.
    pub fn broad() -> Self {
        Self {
            threshold: 0.5,
            strict: false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        ensure_range("critical.threshold", self.threshold, 0.0, 1.0)
    }
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            min_dependency: 0.0,
        }
    }
}

impl Default for BilateralConfig {
    fn default() -> Self {
        Self {
            min_dependency: default_bilateral_min(),
            critical_threshold: default_critical_threshold(),
        }
    }
}

impl Default for DependenciesConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
        }
    }
}

impl AggregationConfig {
    pub fn validate(&self) -> Result<()> {
        self.critical.validate()?;
        if self.explorer.top_k == 0 {
            return Err(IseError::invalid_config("explorer.top_k", "0", "must be at least 1"));
        }
        ensure_range("explorer.min_dependency", self.explorer.min_dependency, 0.0, 1.0)?;
        ensure_range("bilateral.min_dependency", self.bilateral.min_dependency, 0.0, 1.0)?;
        ensure_range(
            "bilateral.critical_threshold",
            self.bilateral.critical_threshold,
            0.0,
            1.0,
        )?;
        if self.dependencies.top_n == 0 {
            return Err(IseError::invalid_config("dependencies.top_n", "0", "must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(EngineConfig::default().validate().is_ok());
        assert!(AggregationConfig::default().validate().is_ok());
    }

    #[test]
    fn presets() {
        assert_eq!(CriticalConfig::strict().threshold, 0.7);
        assert!(CriticalConfig::strict().strict);
        assert_eq!(CriticalConfig::broad().threshold, 0.5);
        assert!(!CriticalConfig::broad().strict);
    }

    #[test]
    fn rejects_bad_values() {
        let config = EngineConfig {
            max_depth: 0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());

        let config = EngineConfig {
            critical_path_threshold: 2.0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());

        let mut agg = AggregationConfig::default();
        agg.explorer.top_k = 0;
        assert!(agg.validate().is_err());
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"max_depth": 3}"#).unwrap();
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.max_paths_per_pair, 10);
    }
}
