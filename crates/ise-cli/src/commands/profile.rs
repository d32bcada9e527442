//! Show a country profile.

use anyhow::{bail, Result};
use colored::Colorize;
use ise::prelude::*;

use super::{load_results, load_tables};
use crate::config::Config;

pub fn run(year: i32, country: &str) -> Result<()> {
    let config = Config::load()?;
    let store = config.store();
    let catalog = config.catalog()?;
    let code = CountryCode::new(country.to_uppercase());

    let tables = load_tables(&store, year)?;
    let Some(profile) = tables.profiles.iter().find(|p| p.country == code) else {
        bail!("{} does not appear in {}", code, year);
    };
    let stats = country_statistics(&DependencyTable::from_year(&load_results(&store, year)?), &code);

    println!(
        "{} {} ({})",
        "Country profile".white().bold(),
        code.as_str().cyan().bold(),
        year
    );
    println!("{}", "═".repeat(40).dimmed());
    println!();

    println!("{}", "As importer".blue().bold());
    println!(
        "  Vulnerability:     {:.4} (rank {} of {})",
        profile.vulnerability,
        profile.global_rank.to_string().cyan(),
        tables.profiles.len()
    );
    println!("  Indirect share:    {:.1}%", profile.indirect_share * 100.0);
    println!("  Eff. suppliers:    {:.2}", profile.num_suppliers_effective);
    println!("  Relations:         {}", stats.dependencies_count);
    println!("  Above 0.8:         {}", stats.critical_dependencies.to_string().red());
    println!(
        "  Main suppliers:    {}",
        join(&stats.main_suppliers)
    );
    println!();

    println!("{}", "As exporter".blue().bold());
    println!("  Importance:        {:.4}", profile.importance);
    println!("  Relations:         {}", stats.supplies_count);
    println!("  Main clients:      {}", join(&stats.main_clients));
    println!();

    let critical: Vec<&CriticalLink> = tables
        .critical
        .iter()
        .filter(|l| l.importer == code)
        .collect();
    if !critical.is_empty() {
        println!("{}", "Critical dependencies".blue().bold());
        for link in critical {
            println!(
                "  {} {} {}",
                link.exporter.as_str().white().bold(),
                catalog.display_name(&link.industry).dimmed(),
                format!("{:.3}", link.total).red()
            );
        }
        println!();
    }

    println!("{}", "═".repeat(40).dimmed());
    Ok(())
}

fn join(countries: &[CountryCode]) -> String {
    if countries.is_empty() {
        return "-".to_string();
    }
    countries
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
