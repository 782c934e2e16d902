//! Markets command implementation
//!
//! Prints the built-in market profiles as a JSON array.

use viability_core::market::MarketAssumptions;

use crate::Result;

/// Run the markets command.
pub fn run() -> Result<()> {
    let profiles: Vec<MarketAssumptions> = MarketAssumptions::builtin_names()
        .iter()
        .filter_map(|name| MarketAssumptions::builtin(name))
        .collect();

    println!("{}", serde_json::to_string_pretty(&profiles)?);
    Ok(())
}
