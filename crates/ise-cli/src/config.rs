//! Configuration management for the ISE CLI.

use anyhow::{Context, Result};
use ise::prelude::{
    AggregationConfig, ArtifactStore, BilateralConfig, CriticalConfig, DependenciesConfig,
    EngineConfig, ExplorerConfig, IndustryCatalog,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILE: &str = "ise.toml";

/// Project configuration (`ise.toml`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub critical: CriticalConfig,
    #[serde(default)]
    pub explorer: ExplorerConfig,
    #[serde(default)]
    pub bilateral: BilateralConfig,
    #[serde(default)]
    pub dependencies: DependenciesConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding `trade_<year>.csv`.
    #[serde(default = "default_input_dir")]
    pub input_dir: PathBuf,
    /// Directory receiving the per-year artifacts.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// `industry_id,industry_name` CSV. Optional.
    #[serde(default = "default_catalog")]
    pub catalog: PathBuf,
}

// Default value functions
fn default_input_dir() -> PathBuf { PathBuf::from("data") }
fn default_output_dir() -> PathBuf { PathBuf::from("output") }
fn default_catalog() -> PathBuf { PathBuf::from("data/industries.csv") }

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_dir: default_input_dir(),
            output_dir: default_output_dir(),
            catalog: default_catalog(),
        }
    }
}

impl Config {
    /// Load config from ise.toml in the current or parent directories.
    pub fn load() -> Result<Self> {
        let start = std::env::current_dir()?;
        match find_config_file(&start) {
            Some(path) => {
                debug!("Using config {}", path.display());
                Self::load_from(&path)
            }
            None => {
                debug!("No {} found, using defaults", CONFIG_FILE);
                Ok(Config::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid config: {}", path.display()))?;
        Ok(config)
    }

    /// Save config to the specified path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> ise::prelude::Result<()> {
        self.engine.validate()?;
        self.aggregation().validate()
    }

    pub fn aggregation(&self) -> AggregationConfig {
        AggregationConfig {
            critical: self.critical.clone(),
            explorer: self.explorer.clone(),
            bilateral: self.bilateral.clone(),
            dependencies: self.dependencies.clone(),
        }
    }

    pub fn store(&self) -> ArtifactStore {
        ArtifactStore::new(&self.paths.output_dir)
    }

    /// The industry catalog, or an empty one when the file is absent.
    pub fn catalog(&self) -> Result<IndustryCatalog> {
        if !self.paths.catalog.exists() {
            return Ok(IndustryCatalog::default());
        }
        IndustryCatalog::load(&self.paths.catalog)
            .with_context(|| format!("Failed to load catalog: {}", self.paths.catalog.display()))
    }
}

/// Find ise.toml in `start` or its parent directories.
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let mut config = Config::default();
        config.engine.max_depth = 3;
        config.critical = CriticalConfig::broad();
        config.save(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[engine]\nmax_depth = 2\n\n[paths]\noutput_dir = \"out\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.engine.max_depth, 2);
        assert_eq!(config.engine.max_paths_per_pair, 10);
        assert_eq!(config.critical, CriticalConfig::strict());
        assert_eq!(config.paths.output_dir, PathBuf::from("out"));
        assert_eq!(config.paths.input_dir, PathBuf::from("data"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[critical]\nthreshold = 1.5\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn finds_config_in_parent() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        Config::default().save(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(find_config_file(&nested), Some(dir.path().join(CONFIG_FILE)));
    }
}
