//! # ISE
//!
//! Economic security index: how much each country depends on each other
//! country, industry by industry, once re-exports through third countries
//! are taken into account.
//!
//! ## Quick Start
//!
//! ```rust
//! use ise::prelude::*;
//!
//! // One industry: A and C supply B, and A also supplies C
//! let edges = vec![
//!     TradeEdge::new("A", "B", 100.0),
//!     TradeEdge::new("C", "B", 50.0),
//!     TradeEdge::new("A", "C", 30.0),
//! ];
//!
//! let engine = DecompositionEngine::new(EngineConfig::default()).unwrap();
//! let result = engine.decompose_edges(&IndustryId::new("C26"), &edges).unwrap();
//!
//! let ab = result.dependency(&CountryCode::new("A"), &CountryCode::new("B")).unwrap();
//! assert!(ab.total > ab.direct);
//!
//! // Aggregate the year and query it
//! let mut year = YearResults::new(2022);
//! year.industries.insert(IndustryId::new("C26"), result);
//! let tables = aggregate_year(&year, &AggregationConfig::default());
//! assert_eq!(tables.hubs[0].country, CountryCode::new("C"));
//!
//! let table = DependencyTable::from_year(&year);
//! let for_b = table.filter(&Filter::new().dependent("B"));
//! assert_eq!(for_b.len(), 2);
//! ```
//!
//! ## Architecture
//!
//! - [`ise_core`] - Data model, trade graph, CSV input, industry catalog, errors
//! - [`ise_engine`] - Decomposition engine, aggregators, batch runner, artifacts
//! - [`ise_query`] - Filters, grouped aggregates and statistics for dashboards
//!
//! ## Batch processing
//!
//! ```rust,ignore
//! use ise::prelude::*;
//! use std::path::Path;
//!
//! let runner = BatchRunner::new(EngineConfig::default(), AggregationConfig::default())?;
//! let store = ArtifactStore::new("output");
//! let run = runner.run_year(2022, Path::new("data"), &store)?;
//! println!("{} critical relations", run.tables.critical.len());
//! ```

// Re-export all subcrates
pub use ise_core as core;
pub use ise_engine as engine;
pub use ise_query as query;

/// Prelude module for convenient imports.
///
/// ```rust
/// use ise::prelude::*;
/// ```
pub mod prelude {
    pub use ise_engine::prelude::*;
    pub use ise_query::prelude::*;
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
