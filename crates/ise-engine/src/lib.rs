//! # ISE Engine
//!
//! Dependency decomposition and the yearly aggregations built on it.
//!
//! The engine turns one industry's trade graph into direct, indirect and
//! total dependencies plus the critical routes behind them. The
//! aggregators then read a whole year of engine output (never mutating
//! it) and derive the hub ranking, critical relations, country profiles,
//! bilateral risk, top dependencies and the industry explorer.

pub mod config;
pub mod decompose;
pub mod concentration;
pub mod hubs;
pub mod critical;
pub mod profiles;
pub mod explorer;
pub mod bilateral;
pub mod aggregate;
pub mod evolution;
pub mod artifacts;
pub mod batch;
#[cfg(feature = "sqlite")]
pub mod sqlite_store;
pub mod prelude;
