//! # ISE Core
//!
//! Core types for the economic security index.
//!
//! This crate defines the data model shared by the decomposition engine,
//! the aggregators and the query layer:
//!
//! - **TradeGraph**: directed exporter -> importer trade graph per industry
//! - **DependencyRecord**: direct, indirect and total dependency of an importer on an exporter
//! - **CriticalPath**: one multi-hop route carrying indirect dependency
//! - **EngineResult**: everything the engine computes for one industry
//! - **IndustryCatalog**: read-only industry id -> name lookup
//!
//! ## Quick Start
//!
//! ```rust
//! use ise_core::prelude::*;
//!
//! let edges = vec![
//!     TradeEdge::new("CHN", "ESP", 100.0),
//!     TradeEdge::new("DEU", "ESP", 50.0),
//! ];
//! let graph = TradeGraph::from_edges(&edges).unwrap();
//! assert_eq!(graph.inbound_total(&CountryCode::new("ESP")), 150.0);
//! ```

pub mod types;
pub mod graph;
pub mod catalog;
pub mod input;
pub mod error;
pub mod prelude;
