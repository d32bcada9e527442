//! Process years: decompose, aggregate, write artifacts.

use anyhow::{bail, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use ise::prelude::*;
use rayon::prelude::*;
use tracing::info;

use crate::config::Config;

pub fn run(years: &[i32]) -> Result<()> {
    let config = Config::load()?;
    let runner = BatchRunner::new(config.engine.clone(), config.aggregation())?;
    let store = config.store();
    let years = unique_years(years);

    println!(
        "{} Processing {} year(s) from {}...",
        "→".blue(),
        years.len().to_string().cyan(),
        config.paths.input_dir.display()
    );

    let pb = ProgressBar::new(years.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut outcomes: Vec<(i32, ise::prelude::Result<YearRun>)> = years
        .par_iter()
        .map(|&year| {
            let outcome = runner.run_year(year, &config.paths.input_dir, &store);
            pb.inc(1);
            (year, outcome)
        })
        .collect();
    pb.finish_and_clear();
    outcomes.sort_by_key(|(year, _)| *year);
    info!(years = outcomes.len(), "Batch finished");

    let mut failed = 0;
    for (year, outcome) in &outcomes {
        match outcome {
            Ok(run) => {
                println!(
                    "  {} {}: {} industries, {} records, {} critical relations",
                    "✓".green(),
                    year.to_string().white().bold(),
                    run.results.industries.len(),
                    run.manifest.dependency_records,
                    run.tables.critical.len().to_string().cyan()
                );
                for skipped in &run.results.skipped {
                    println!(
                        "    {} skipped {}: {}",
                        "•".yellow(),
                        skipped.industry,
                        skipped.reason.dimmed()
                    );
                }
            }
            Err(e) => {
                failed += 1;
                println!("  {} {}: {}", "✗".red(), year, e);
            }
        }
    }

    println!();
    if failed == outcomes.len() {
        bail!("No year could be processed");
    }
    println!(
        "{} Artifacts written to {}",
        "✓".green().bold(),
        store.root().display()
    );
    Ok(())
}

/// Sorted years without repeats, so no two workers write the same artifacts.
fn unique_years(years: &[i32]) -> Vec<i32> {
    let mut years = years.to_vec();
    years.sort_unstable();
    years.dedup();
    years
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_years_run_once() {
        assert_eq!(unique_years(&[2022, 2020, 2022, 2021, 2020]), vec![2020, 2021, 2022]);
        assert!(unique_years(&[]).is_empty());
    }
}
