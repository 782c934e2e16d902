//! Analyze command implementation
//!
//! Reads a JSON input document from stdin, runs the pipeline and writes
//! the result set to stdout as pretty-printed JSON. Command-line flags
//! override the corresponding fields of the document's `options` block.

use std::io::Read;
use tracing::info;
use viability_model::kpi::KpiTargets;
use viability_pipeline::{compute, EngineInput};

use crate::Result;

/// Run the analyze command.
pub fn run(
    sensitivity: bool,
    monte_carlo: bool,
    iterations: Option<usize>,
    seed: Option<u64>,
    years: Option<usize>,
    kpi_config: Option<&str>,
) -> Result<()> {
    let mut raw = String::new();
    std::io::stdin().read_to_string(&mut raw)?;
    let mut input: EngineInput = serde_json::from_str(&raw)?;

    if sensitivity {
        input.options.sensitivity = true;
    }
    if monte_carlo {
        input.options.monte_carlo = true;
    }
    if iterations.is_some() {
        input.options.iterations = iterations;
    }
    if seed.is_some() {
        input.options.seed = seed;
    }
    if years.is_some() {
        input.options.years = years;
    }
    if let Some(path) = kpi_config {
        let targets: KpiTargets = toml::from_str(&std::fs::read_to_string(path)?)?;
        input.options.kpi_targets = Some(targets);
    }

    info!(
        club = input.club.name.as_deref().unwrap_or("(unnamed)"),
        fields = input.club.num_fields,
        "analysing input document"
    );

    let output = compute(&input)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
