//! ISE Engine Prelude: convenient imports for common usage.
//!
//! ```rust
//! use ise_engine::prelude::*;
//! ```

// Re-export configuration
pub use crate::config::{
    EngineConfig, CriticalConfig, ExplorerConfig,
    BilateralConfig, DependenciesConfig, AggregationConfig,
};

// Re-export the engine
pub use crate::decompose::DecompositionEngine;
pub use crate::concentration::{concentration, Concentration};

// Re-export aggregators
pub use crate::hubs::score_hubs;
pub use crate::critical::detect_critical;
pub use crate::profiles::{build_profiles, build_profiles_from};
pub use crate::explorer::{build_explorer, explore_industry, ExplorerEntry, ExplorerIndex};
pub use crate::bilateral::{bilateral_risk, top_dependencies, BilateralRisk, TopDependency};
pub use crate::aggregate::{aggregate_year, YearTables};
pub use crate::evolution::{Evolution, EvolutionPoint, CriticalCount};

// Re-export persistence and batch running
pub use crate::artifacts::{ArtifactStore, Manifest};
pub use crate::batch::{trade_file, BatchRunner, YearRun};

// Re-export SQLite export when feature is enabled
#[cfg(feature = "sqlite")]
pub use crate::sqlite_store::export_year;

// Re-export from core
pub use ise_core::prelude::*;
