//! # ISE Query
//!
//! Analytic queries over flat dependency tables, the interface dashboards
//! use to slice engine output:
//!
//! - filter by year, country (either role), industry, dependency range, chain length
//! - grouped aggregates (mean, sum, count) by any key columns
//! - top-N rows by a numeric column within groups
//! - distinct values for populating filters
//! - summary, per-country and per-year statistics
//!
//! ```rust
//! use ise_query::prelude::*;
//!
//! let table = DependencyTable::new();
//! let rows = table.filter(&Filter::new().country("ESP").min_dependency(0.5));
//! assert!(rows.is_empty());
//! ```

pub mod column;
pub mod error;
pub mod filter;
pub mod stats;
pub mod table;
pub mod prelude;
