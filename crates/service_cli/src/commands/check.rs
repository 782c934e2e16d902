//! Check command implementation
//!
//! Runs the pipeline against a canned two-field scenario and reports
//! the headline numbers. A failure here means the build is unusable,
//! not that the scenario is unviable.

use serde_json::json;
use tracing::info;
use viability_pipeline::{compute, EngineInput};

use crate::Result;

/// Run the check command.
pub fn run() -> Result<()> {
    info!("Running engine self-check...");

    let input: EngineInput = serde_json::from_value(json!({
        "market": "Brasil",
        "club": { "name": "Self-check FC", "numFields": 2, "members": 100 },
        "revenues": { "categories": { "fieldRental": 35000, "membership": 15000 } },
        "costs": { "categories": { "personnel": 18000, "facilities": 9000 } },
        "options": { "monteCarlo": true, "iterations": 1000, "seed": 1 }
    }))?;

    let output = compute(&input)?;

    info!("  Market: {}", output.market.name);
    info!("  Investment: {:.0}", output.investment.total);
    info!("  NPV: {:.0}", output.viability.npv);
    match output.viability.irr {
        Some(irr) => info!("  IRR: {:.2}%", irr * 100.0),
        None => info!("  IRR: did not converge"),
    }
    if let Some(mc) = &output.monte_carlo {
        info!(
            "  Monte Carlo: {} iterations, mean NPV {:.0}",
            mc.iterations, mc.statistics.mean
        );
    }

    println!("ok");
    Ok(())
}
