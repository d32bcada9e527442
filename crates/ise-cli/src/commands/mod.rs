//! CLI command implementations.

pub mod init;
pub mod process;
pub mod hubs;
pub mod critical;
pub mod profile;
pub mod explore;
pub mod stats;
pub mod evolution;

use anyhow::{bail, Result};
use colored::Colorize;
use ise::engine::artifacts::RESULTS;
use ise::prelude::{ArtifactStore, YearResults, YearTables};

fn ensure_processed(store: &ArtifactStore, year: i32) -> Result<()> {
    if !store.path(RESULTS, year).exists() {
        bail!(
            "Year {} not processed. Run {} first.",
            year,
            format!("ise process {}", year).cyan()
        );
    }
    Ok(())
}

/// Derived tables of a processed year.
pub fn load_tables(store: &ArtifactStore, year: i32) -> Result<YearTables> {
    ensure_processed(store, year)?;
    Ok(store.load_tables(year)?)
}

/// Engine results of a processed year.
pub fn load_results(store: &ArtifactStore, year: i32) -> Result<YearResults> {
    ensure_processed(store, year)?;
    Ok(store.load_results(year)?)
}

fn bar(value: f64, width: usize) -> String {
    let filled = (value.clamp(0.0, 1.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}
