//! Dependency statistics across processed years.

use anyhow::{bail, Result};
use colored::Colorize;
use ise::prelude::*;

use super::load_results;
use crate::config::Config;

pub fn run(year: Option<i32>, country: Option<&str>) -> Result<()> {
    let config = Config::load()?;
    let store = config.store();

    let years = match year {
        Some(y) => vec![y],
        None => store.available_years()?,
    };
    if years.is_empty() {
        bail!("No processed years. Run {} first.", "ise process <year>".cyan());
    }

    let mut table = DependencyTable::new();
    for y in &years {
        table.push_year(&load_results(&store, *y)?);
    }

    match country {
        Some(code) => print_country(&table, &CountryCode::new(code.to_uppercase())),
        None => print_summary(&table),
    }
}

fn print_summary(table: &DependencyTable) -> Result<()> {
    let summary = summary_statistics(table)?;

    println!("{}", "ISE Dependency Statistics".white().bold());
    println!("{}", "═".repeat(40).dimmed());
    println!();

    println!("{}", "Coverage".blue().bold());
    println!("  Records:           {}", summary.total_records.to_string().cyan());
    println!(
        "  Years:             {}",
        summary
            .years
            .iter()
            .map(|y| y.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!("  Dependent:         {}", summary.countries_dependent);
    println!("  Suppliers:         {}", summary.countries_supplier);
    println!("  Industries:        {}", summary.industries);
    println!();

    println!("{}", "Dependency".blue().bold());
    println!("  Mean:              {:.4}", summary.avg_dependency);
    println!("  Median:            {:.4}", summary.median_dependency);
    println!(
        "  Range:             {:.4} - {:.4}",
        summary.min_dependency, summary.max_dependency
    );
    println!(
        "  Above 0.8:         {}",
        summary.critical_dependencies.to_string().red()
    );
    println!("  Total trade:       {:.0}", summary.total_trade_value);
    println!();

    let temporal = aggregate_temporal(table);
    if temporal.len() > 1 {
        println!("{}", "By year".blue().bold());
        for row in temporal {
            println!(
                "  {}  mean {:.4}  std {:.4}  n {}  chain {:.2}",
                row.year.to_string().white().bold(),
                row.dependency_value_mean,
                row.dependency_value_std,
                row.dependency_value_count,
                row.longitud_optima_mean
            );
        }
        println!();
    }

    println!("{}", "═".repeat(40).dimmed());
    Ok(())
}

fn print_country(table: &DependencyTable, country: &CountryCode) -> Result<()> {
    let stats = country_statistics(table, country);
    if stats.dependencies_count == 0 && stats.supplies_count == 0 {
        bail!("{} does not appear in the processed years", country);
    }

    println!("{} {}", "Statistics for".white().bold(), country.as_str().cyan().bold());
    println!("{}", "═".repeat(40).dimmed());
    println!("  Dependencies:      {}", stats.dependencies_count);
    println!("  Supplies:          {}", stats.supplies_count);
    println!("  Mean dependency:   {:.4}", stats.avg_dependency_as_dependent);
    println!("  Above 0.8:         {}", stats.critical_dependencies.to_string().red());
    println!("  Industries (dep):  {}", stats.industries_dependent);
    println!("  Industries (sup):  {}", stats.industries_supplier);

    let worst = critical_dependencies(
        &table.filter(&Filter::new().dependent(country.as_str())),
        0.8,
        Some(5),
    );
    if !worst.is_empty() {
        println!();
        println!("{}", "Strongest dependencies".blue().bold());
        for row in worst.iter() {
            println!(
                "  {} {} {} {}",
                row.year,
                row.supplier_country.as_str().white().bold(),
                row.industry,
                format!("{:.3}", row.dependency_value).red()
            );
        }
    }
    Ok(())
}
