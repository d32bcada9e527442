//! Industry explorer: ranked suppliers of a country.

use anyhow::{bail, Result};
use colored::Colorize;
use ise::prelude::*;

use super::{bar, load_tables};
use crate::config::Config;

pub fn run(year: i32, country: &str, industry: Option<&str>) -> Result<()> {
    let config = Config::load()?;
    let catalog = config.catalog()?;
    let tables = load_tables(&config.store(), year)?;
    let importer = CountryCode::new(country.to_uppercase());

    let industries: Vec<IndustryId> = match industry {
        Some(id) => vec![IndustryId::new(id)],
        None => tables.explorer.industries_of(&importer).into_iter().cloned().collect(),
    };
    if industries.is_empty() {
        bail!("No suppliers recorded for {} in {}", importer, year);
    }

    for id in &industries {
        let entries = tables.explorer.lookup(&importer, id).unwrap_or_default();
        let Some(sector) = entries.first() else {
            println!("{} {} has no suppliers in {}", "•".yellow(), importer, id);
            continue;
        };
        println!(
            "{} {} {} {}",
            "→".blue(),
            id.as_str().white().bold(),
            catalog.display_name(id),
            format!(
                "(HHI {:.3}, {:.1} effective suppliers)",
                sector.hhi_sector, sector.eff_suppliers_sector
            )
            .dimmed()
        );

        let shown = if industry.is_some() { entries.len() } else { 3 };
        for (i, entry) in entries.iter().take(shown).enumerate() {
            let rank = format!("{}.", i + 1);
            let route = if entry.top_intermediary.is_empty() {
                String::new()
            } else {
                let hops: Vec<&str> = entry.top_intermediary.iter().map(|c| c.as_str()).collect();
                format!(" via {} ({:.3})", hops.join(" → "), entry.path_strength)
            };
            println!(
                "  {:>4} {:<5} {} {:.3} {}{}",
                rank.blue(),
                entry.exporter.as_str().white().bold(),
                bar(entry.dep_total, 20).green(),
                entry.dep_total,
                format!("direct {:.3} / indirect {:.3}", entry.dep_direct, entry.dep_indirect).dimmed(),
                route.cyan()
            );
        }
        println!();
    }

    Ok(())
}
