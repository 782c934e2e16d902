//! The analysis input document and its validation.

use serde::{Deserialize, Serialize};
use viability_core::market::MarketAssumptions;
use viability_model::aggregate::{CostModel, RevenueModel};
use viability_model::kpi::KpiTargets;
use viability_model::valuation::DEFAULT_TERMINAL_GROWTH;
use viability_risk::monte_carlo::MAX_ITERATIONS;

use crate::error::EngineError;

/// Market selection: a built-in profile name or a full inline profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarketSpec {
    /// A built-in profile name (`"Brasil"`, `"Europa"`, ...). Unknown
    /// names fall back to the Brazil profile.
    Name(String),
    /// A complete inline market profile.
    Profile(Box<MarketAssumptions>),
}

impl Default for MarketSpec {
    fn default() -> Self {
        Self::Name("Brasil".to_string())
    }
}

impl MarketSpec {
    /// Resolve to concrete market assumptions. Unknown names fall back
    /// to the Brazil profile.
    pub fn resolve(&self) -> MarketAssumptions {
        match self {
            Self::Name(name) => MarketAssumptions::builtin(name).unwrap_or_else(|| {
                tracing::warn!(market = %name, "unknown market name, using the Brazil profile");
                MarketAssumptions::brazil()
            }),
            Self::Profile(profile) => (**profile).clone(),
        }
    }
}

/// The club being analysed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubProfile {
    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Number of playing fields; drives the investment sizing.
    pub num_fields: u32,
    /// Current member count.
    #[serde(default)]
    pub members: u32,
}

/// Optional analysis toggles and overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOptions {
    /// Run the sensitivity analysis.
    #[serde(default)]
    pub sensitivity: bool,
    /// Run the Monte Carlo simulation.
    #[serde(default)]
    pub monte_carlo: bool,
    /// Monte Carlo iteration count override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iterations: Option<usize>,
    /// Monte Carlo seed for reproducible runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Projection horizon override in years.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years: Option<usize>,
    /// Sensitivity sweep range override (fraction, e.g. 0.2 for ±20 %).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_range: Option<f64>,
    /// Terminal growth rate override for the DCF perpetuity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal_growth_rate: Option<f64>,
    /// KPI target/benchmark overrides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kpi_targets: Option<KpiTargets>,
}

/// The complete analysis input document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineInput {
    /// Market selection.
    #[serde(default)]
    pub market: MarketSpec,
    /// Club under analysis.
    pub club: ClubProfile,
    /// Monthly revenue model.
    #[serde(default)]
    pub revenues: RevenueModel,
    /// Monthly cost model.
    #[serde(default)]
    pub costs: CostModel,
    /// Analysis toggles and overrides.
    #[serde(default)]
    pub options: AnalysisOptions,
}

fn check_rate(name: &str, value: f64) -> Result<(), EngineError> {
    if !value.is_finite() || value < 0.0 {
        return Err(EngineError::InvalidInput(format!(
            "{name} must be a finite non-negative number, got {value}"
        )));
    }
    Ok(())
}

impl EngineInput {
    /// The terminal growth rate in effect for this input.
    pub fn terminal_growth_rate(&self) -> f64 {
        self.options
            .terminal_growth_rate
            .unwrap_or(DEFAULT_TERMINAL_GROWTH)
    }

    /// Validate the document. Violations name the offending field.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.club.num_fields == 0 {
            return Err(EngineError::InvalidInput(
                "club.numFields must be positive".to_string(),
            ));
        }

        let market = self.market.resolve();
        check_rate("market.corporateTax", market.corporate_tax)?;
        check_rate("market.inflationRate", market.inflation_rate)?;
        check_rate("market.growthPotential", market.growth_potential)?;
        check_rate("market.discountRate", market.discount_rate)?;

        let terminal = self.terminal_growth_rate();
        check_rate("options.terminalGrowthRate", terminal)?;
        if market.discount_rate <= terminal {
            return Err(EngineError::InvalidInput(format!(
                "market.discountRate ({}) must exceed the terminal growth rate ({terminal})",
                market.discount_rate
            )));
        }

        if let Some(iterations) = self.options.iterations {
            if iterations == 0 || iterations > MAX_ITERATIONS {
                return Err(EngineError::InvalidInput(format!(
                    "options.iterations must be in [1, {MAX_ITERATIONS}], got {iterations}"
                )));
            }
        }

        if let Some(range) = self.options.change_range {
            if !range.is_finite() || range <= 0.0 || range >= 1.0 {
                return Err(EngineError::InvalidInput(format!(
                    "options.changeRange must be in (0, 1), got {range}"
                )));
            }
        }

        for (label, model) in [("revenues", &self.revenues), ("costs", &self.costs)] {
            for field in &model.custom_fields {
                if !field.value.is_finite() {
                    return Err(EngineError::InvalidInput(format!(
                        "{label}.customFields[{}].value must be finite",
                        field.id
                    )));
                }
            }
        }

        Ok(())
    }
}
