//! Show critical relations.

use anyhow::Result;
use colored::Colorize;
use ise::prelude::*;

use super::{load_results, load_tables};
use crate::config::Config;

pub fn run(year: i32, broad: bool, top: usize) -> Result<()> {
    let config = Config::load()?;
    let store = config.store();
    let catalog = config.catalog()?;

    let (preset, mut links) = if broad {
        let results = load_results(&store, year)?;
        ("broad", detect_critical(&results, &CriticalConfig::broad()))
    } else {
        ("configured", load_tables(&store, year)?.critical)
    };
    links.sort_by(|a, b| {
        b.criticality
            .total_cmp(&a.criticality)
            .then_with(|| b.total.total_cmp(&a.total))
    });

    println!(
        "{} {} critical relations in {} ({} preset)",
        "→".blue(),
        links.len().to_string().cyan(),
        year,
        preset
    );
    println!();

    for link in links.iter().take(top) {
        println!(
            "  {} {} {} {} {}",
            link.exporter.as_str().white().bold(),
            "→".blue(),
            link.importer.as_str().white().bold(),
            catalog.display_name(&link.industry).dimmed(),
            format!(
                "dep {:.3} (hidden {:.0}%), {} alt. routes, criticality {:.2}",
                link.total,
                link.hidden_risk_factor * 100.0,
                link.alternative_paths,
                link.criticality
            )
        );
    }

    Ok(())
}
