//! Initial investment requirement sizing.
//!
//! Unit costs come from a market-keyed table with the same Brazil
//! fallback policy as the tax module. Construction and equipment scale
//! linearly with the number of fields; facility setup, working capital
//! and licensing are fixed per deployment.

use serde::{Deserialize, Serialize};
use viability_core::market::{Jurisdiction, MarketAssumptions};

/// Per-jurisdiction unit costs.
#[derive(Debug, Clone, Copy, PartialEq)]
struct UnitCosts {
    field_construction: f64,
    equipment: f64,
    facility_setup: f64,
    working_capital: f64,
    licensing: f64,
}

const BRAZIL_COSTS: UnitCosts = UnitCosts {
    field_construction: 120_000.0,
    equipment: 25_000.0,
    facility_setup: 80_000.0,
    working_capital: 50_000.0,
    licensing: 15_000.0,
};

const EUROPE_COSTS: UnitCosts = UnitCosts {
    field_construction: 75_000.0,
    equipment: 18_000.0,
    facility_setup: 55_000.0,
    working_capital: 35_000.0,
    licensing: 12_000.0,
};

const GULF_COSTS: UnitCosts = UnitCosts {
    field_construction: 180_000.0,
    equipment: 35_000.0,
    facility_setup: 120_000.0,
    working_capital: 80_000.0,
    licensing: 25_000.0,
};

fn unit_costs(jurisdiction: Jurisdiction) -> UnitCosts {
    match jurisdiction {
        Jurisdiction::Brazil => BRAZIL_COSTS,
        Jurisdiction::Europe => EUROPE_COSTS,
        Jurisdiction::Gulf => GULF_COSTS,
    }
}

/// Sized initial capital requirement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentBreakdown {
    /// Field construction, linear in field count.
    pub construction: f64,
    /// Equipment, linear in field count.
    pub equipment: f64,
    /// Facility setup, fixed per deployment.
    pub facility_setup: f64,
    /// Working-capital reserve, fixed per deployment.
    pub working_capital: f64,
    /// Licensing and permits, fixed per deployment.
    pub licensing: f64,
    /// Sum of all components.
    pub total: f64,
}

/// Size the initial investment for `num_fields` fields in the given market.
///
/// Unknown market names resolve to the Brazil cost table.
///
/// # Examples
///
/// ```
/// use viability_core::market::MarketAssumptions;
/// use viability_model::investment::compute_investment;
///
/// let inv = compute_investment(&MarketAssumptions::brazil(), 2);
/// // 2 × (120000 + 25000) + 80000 + 50000 + 15000
/// assert_eq!(inv.total, 435_000.0);
/// ```
pub fn compute_investment(market: &MarketAssumptions, num_fields: u32) -> InvestmentBreakdown {
    let costs = unit_costs(market.jurisdiction());
    let fields = f64::from(num_fields);

    let construction = costs.field_construction * fields;
    let equipment = costs.equipment * fields;
    let facility_setup = costs.facility_setup;
    let working_capital = costs.working_capital;
    let licensing = costs.licensing;

    InvestmentBreakdown {
        construction,
        equipment,
        facility_setup,
        working_capital,
        licensing,
        total: construction + equipment + facility_setup + working_capital + licensing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_brazil_two_fields_reference_scenario() {
        let inv = compute_investment(&MarketAssumptions::brazil(), 2);
        assert_relative_eq!(inv.construction, 240_000.0);
        assert_relative_eq!(inv.equipment, 50_000.0);
        assert_relative_eq!(inv.facility_setup, 80_000.0);
        assert_relative_eq!(inv.working_capital, 50_000.0);
        assert_relative_eq!(inv.licensing, 15_000.0);
        assert_relative_eq!(inv.total, 435_000.0);
    }

    #[test]
    fn test_unknown_market_matches_brazil() {
        let mut market = MarketAssumptions::brazil();
        market.name = "Mercado Desconhecido".to_string();
        assert_eq!(
            compute_investment(&market, 3),
            compute_investment(&MarketAssumptions::brazil(), 3)
        );
    }

    #[test]
    fn test_zero_fields_leaves_fixed_components() {
        let inv = compute_investment(&MarketAssumptions::europe(), 0);
        assert_eq!(inv.construction, 0.0);
        assert_eq!(inv.equipment, 0.0);
        assert_relative_eq!(inv.total, 55_000.0 + 35_000.0 + 12_000.0);
    }

    #[test]
    fn test_gulf_premium_costs() {
        let inv = compute_investment(&MarketAssumptions::gulf(), 1);
        assert_relative_eq!(inv.total, 180_000.0 + 35_000.0 + 120_000.0 + 80_000.0 + 25_000.0);
    }

    proptest! {
        // Per-field components are linear in field count; the fixed
        // components do not move.
        #[test]
        fn prop_linear_in_field_count(n in 0u32..500) {
            let market = MarketAssumptions::brazil();
            let base = compute_investment(&market, 1);
            let scaled = compute_investment(&market, n);

            prop_assert!((scaled.construction - base.construction * f64::from(n)).abs() < 1e-6);
            prop_assert!((scaled.equipment - base.equipment * f64::from(n)).abs() < 1e-6);
            prop_assert_eq!(scaled.facility_setup, base.facility_setup);
            prop_assert_eq!(scaled.working_capital, base.working_capital);
            prop_assert_eq!(scaled.licensing, base.licensing);
        }

        #[test]
        fn prop_total_is_component_sum(n in 0u32..500) {
            let inv = compute_investment(&MarketAssumptions::gulf(), n);
            let sum = inv.construction + inv.equipment + inv.facility_setup
                + inv.working_capital + inv.licensing;
            prop_assert!((inv.total - sum).abs() < 1e-6);
        }
    }
}
