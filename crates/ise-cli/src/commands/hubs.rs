//! Show the intermediary hub ranking.

use anyhow::Result;
use colored::Colorize;

use super::{bar, load_tables};
use crate::config::Config;

pub fn run(year: i32, top: usize) -> Result<()> {
    let config = Config::load()?;
    let tables = load_tables(&config.store(), year)?;

    if tables.hubs.is_empty() {
        println!("{} No intermediaries recorded in {}", "•".yellow(), year);
        return Ok(());
    }

    println!(
        "{} Top {} intermediary hubs in {}:",
        "→".blue(),
        top.min(tables.hubs.len()).to_string().cyan(),
        year
    );
    println!();

    for hub in tables.hubs.iter().take(top) {
        let rank = format!("{}.", hub.global_rank);
        println!(
            "  {:>4} {:<5} {} {:.3} {}",
            rank.blue(),
            hub.country.as_str().white().bold(),
            bar(hub.global_score, 20).green(),
            hub.global_score,
            format!(
                "(freq {}, strength {:.3})",
                hub.frequency_total, hub.strength_total
            )
            .dimmed()
        );
    }

    Ok(())
}
