//! Initialize a new ISE project.

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::{Config, CONFIG_FILE};

pub fn run(path: Option<String>) -> Result<()> {
    let base_path = match path {
        Some(p) => PathBuf::from(p),
        None => std::env::current_dir()?,
    };

    println!("{} Initializing ISE project...", "→".blue());

    let config = Config::default();
    for dir in [&config.paths.input_dir, &config.paths.output_dir] {
        let dir = base_path.join(dir);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        println!("  {} Created {}", "✓".green(), dir.display());
    }

    let config_path = base_path.join(CONFIG_FILE);
    if !config_path.exists() {
        config.save(&config_path)?;
        println!("  {} Created {}", "✓".green(), config_path.display());
    } else {
        println!("  {} {} already exists", "•".yellow(), config_path.display());
    }

    println!();
    println!("{} ISE project initialized!", "✓".green().bold());
    println!();
    println!("Next steps:");
    println!(
        "  {} put trade_<year>.csv (industry,exporter,importer,trade_value) in {}",
        "1.".blue(),
        config.paths.input_dir.display()
    );
    println!("  {} ise process <year>", "2.".blue());
    println!("  {} ise hubs <year>", "3.".blue());

    Ok(())
}
