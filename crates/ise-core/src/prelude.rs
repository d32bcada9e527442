//! ISE Core Prelude: convenient imports for common usage.
//!
//! ```rust
//! use ise_core::prelude::*;
//! ```

// Re-export commonly used types
pub use crate::types::{
    CountryCode, IndustryId,
    TradeEdge, DependencyRecord, CriticalPath,
    EngineResult, YearResults, SkippedIndustry,
    HubRecord, CriticalLink, CountryProfile,
    pair_key, criticality,
};

// Re-export the trade graph
pub use crate::graph::{TradeGraph, ShareTable};

// Re-export the catalog and input readers
pub use crate::catalog::IndustryCatalog;
pub use crate::input::{read_trade_table, TradeTable};

// Re-export error types
pub use crate::error::{IseError, Result};
