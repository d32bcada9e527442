//! Evolution of profiles and critical counts over processed years.

use anyhow::{bail, Result};
use colored::Colorize;
use ise::prelude::*;

use super::{load_results, load_tables};
use crate::config::Config;

pub fn run(country: Option<&str>) -> Result<()> {
    let config = Config::load()?;
    let store = config.store();
    let years = store.available_years()?;
    if years.is_empty() {
        bail!("No processed years. Run {} first.", "ise process <year>".cyan());
    }

    let mut evolution = Evolution::default();
    let mut latest_leader = None;
    for year in &years {
        let results = load_results(&store, *year)?;
        let tables = load_tables(&store, *year)?;
        latest_leader = tables.profiles.first().map(|p| p.country.clone());
        evolution.add_year(&results, &tables.profiles);
    }

    println!("{}", "Relations with dependency >= 0.7".blue().bold());
    for count in &evolution.critical_counts {
        println!(
            "  {}  {}",
            count.year.to_string().white().bold(),
            count.count.to_string().cyan()
        );
    }
    println!();

    let code = match country {
        Some(c) => CountryCode::new(c.to_uppercase()),
        None => match latest_leader {
            Some(c) => c,
            None => return Ok(()),
        },
    };
    let Some(series) = evolution.series(&code) else {
        bail!("{} does not appear in any processed year", code);
    };

    println!("{} {}", "Evolution of".blue().bold(), code.as_str().cyan().bold());
    for point in series {
        println!(
            "  {}  vulnerability {:.4}  importance {:.4}  rank {}",
            point.year.to_string().white().bold(),
            point.vulnerability,
            point.importance,
            point.global_rank
        );
    }

    Ok(())
}
