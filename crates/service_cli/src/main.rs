//! Viability CLI - Command Line Operations for Facility Analysis
//!
//! This is the operational entry point for the facility viability and
//! valuation engine.
//!
//! # Commands
//!
//! - `viability analyze` - Run a full analysis on a JSON document from stdin
//! - `viability markets` - List the built-in market profiles
//! - `viability check` - Run a self-check on a canned scenario
//!
//! Output is JSON on stdout; exit status is 0 on success and 1 when the
//! input document is structurally invalid.

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod error;

pub use error::{CliError, Result};

/// Facility viability and valuation engine CLI
#[derive(Parser)]
#[command(name = "viability")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse a JSON input document read from stdin
    Analyze {
        /// Run the sensitivity analysis
        #[arg(long)]
        sensitivity: bool,

        /// Run the Monte Carlo simulation
        #[arg(long)]
        monte_carlo: bool,

        /// Monte Carlo iteration count
        #[arg(short, long)]
        iterations: Option<usize>,

        /// Monte Carlo seed for reproducible runs
        #[arg(short, long)]
        seed: Option<u64>,

        /// Projection horizon in years
        #[arg(short, long)]
        years: Option<usize>,

        /// Path to a toml file with KPI target overrides
        #[arg(short, long)]
        kpi_config: Option<String>,
    },

    /// List the built-in market profiles
    Markets,

    /// Check the engine against a canned scenario
    Check,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    match cli.command {
        Commands::Analyze {
            sensitivity,
            monte_carlo,
            iterations,
            seed,
            years,
            kpi_config,
        } => commands::analyze::run(
            sensitivity,
            monte_carlo,
            iterations,
            seed,
            years,
            kpi_config.as_deref(),
        )?,
        Commands::Markets => commands::markets::run()?,
        Commands::Check => commands::check::run()?,
    }

    Ok(())
}
