//! ISE CLI - Command-line interface for the economic security index.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ise")]
#[command(author, version, about = "ISE - Economic security index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new ISE project
    Init {
        /// Project directory (default: current directory)
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Decompose and aggregate one or more years
    Process {
        /// Years to process
        #[arg(required = true)]
        years: Vec<i32>,
    },

    /// Show the intermediary hub ranking
    Hubs {
        year: i32,

        /// Number of hubs to show
        #[arg(short, long, default_value = "10")]
        top: usize,
    },

    /// Show critical relations
    Critical {
        year: i32,

        /// Use the broad preset (dependency >= 0.5, any redundancy)
        #[arg(long)]
        broad: bool,

        /// Number of relations to show
        #[arg(short, long, default_value = "20")]
        top: usize,
    },

    /// Show a country profile
    Profile {
        year: i32,
        /// Country code, e.g. ESP
        country: String,
    },

    /// Ranked suppliers of a country
    Explore {
        year: i32,
        /// Importing country code
        country: String,

        /// Restrict to one industry
        #[arg(short, long)]
        industry: Option<String>,
    },

    /// Dependency statistics across processed years
    Stats {
        /// Restrict to one year
        #[arg(short, long)]
        year: Option<i32>,

        /// Show figures for one country
        #[arg(short, long)]
        country: Option<String>,
    },

    /// Evolution of profiles and critical counts over processed years
    Evolution {
        /// Country to show (default: the most vulnerable in the last year)
        #[arg(short, long)]
        country: Option<String>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Init { path } => commands::init::run(path),
        Commands::Process { years } => commands::process::run(&years),
        Commands::Hubs { year, top } => commands::hubs::run(year, top),
        Commands::Critical { year, broad, top } => commands::critical::run(year, broad, top),
        Commands::Profile { year, country } => commands::profile::run(year, &country),
        Commands::Explore {
            year,
            country,
            industry,
        } => commands::explore::run(year, &country, industry.as_deref()),
        Commands::Stats { year, country } => commands::stats::run(year, country.as_deref()),
        Commands::Evolution { country } => commands::evolution::run(country.as_deref()),
    }
}
