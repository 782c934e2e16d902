//! Flat scenario maps and the cash-flow generator they drive.
//!
//! The risk layer works on a reduced representation of the business: a
//! string-keyed map of scalars. That keeps perturbation generic — Monte
//! Carlo and sensitivity sweeps multiply entries without knowing what
//! they mean — while the generator below gives the map its cash-flow
//! semantics.

use std::collections::BTreeMap;

/// Projection horizon in years.
pub const KEY_YEARS: &str = "years";
/// Year-0 capital outlay (positive number).
pub const KEY_INITIAL_INVESTMENT: &str = "initialInvestment";
/// Year-1 annual revenue.
pub const KEY_ANNUAL_REVENUE: &str = "annualRevenue";
/// Year-1 annual operating costs.
pub const KEY_ANNUAL_COSTS: &str = "annualCosts";
/// Annual revenue growth rate.
pub const KEY_GROWTH_RATE: &str = "growthRate";
/// Discount rate used by downstream NPV evaluation.
pub const KEY_DISCOUNT_RATE: &str = "discountRate";

/// Default horizon when [`KEY_YEARS`] is absent.
pub const DEFAULT_YEARS: f64 = 12.0;
/// Default growth rate when [`KEY_GROWTH_RATE`] is absent.
pub const DEFAULT_GROWTH_RATE: f64 = 0.05;
/// Default discount rate when [`KEY_DISCOUNT_RATE`] is absent.
pub const DEFAULT_DISCOUNT_RATE: f64 = 0.10;

/// Cost growth runs at this fraction of revenue growth: part of the
/// cost base is fixed.
pub const COST_GROWTH_FRACTION: f64 = 0.8;

/// A flat scenario: recognised keys above, absent keys take defaults.
pub type Scenario = BTreeMap<String, f64>;

/// Fetch a scenario entry or its default.
pub fn scenario_value(scenario: &Scenario, key: &str, default: f64) -> f64 {
    scenario.get(key).copied().unwrap_or(default)
}

/// Generate the cash-flow series for a scenario.
///
/// Index 0 is the negated initial investment; years `1..=years` hold
/// `revenue − costs` where revenue compounds at the growth rate and
/// costs at [`COST_GROWTH_FRACTION`] of it, both anchored at year 1.
/// The result always has `years + 1` entries.
pub fn generate_cash_flows(scenario: &Scenario) -> Vec<f64> {
    let years = scenario_value(scenario, KEY_YEARS, DEFAULT_YEARS).max(0.0) as usize;
    let initial_investment = scenario_value(scenario, KEY_INITIAL_INVESTMENT, 0.0);
    let annual_revenue = scenario_value(scenario, KEY_ANNUAL_REVENUE, 0.0);
    let annual_costs = scenario_value(scenario, KEY_ANNUAL_COSTS, 0.0);
    let growth_rate = scenario_value(scenario, KEY_GROWTH_RATE, DEFAULT_GROWTH_RATE);

    let mut cash_flows = Vec::with_capacity(years + 1);
    cash_flows.push(-initial_investment);

    for year in 1..=years {
        let exponent = (year - 1) as i32;
        let revenue = annual_revenue * (1.0 + growth_rate).powi(exponent);
        let costs = annual_costs * (1.0 + growth_rate * COST_GROWTH_FRACTION).powi(exponent);
        cash_flows.push(revenue - costs);
    }

    cash_flows
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn scenario(entries: &[(&str, f64)]) -> Scenario {
        entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn test_series_shape_and_year_zero() {
        let s = scenario(&[
            (KEY_YEARS, 5.0),
            (KEY_INITIAL_INVESTMENT, 400_000.0),
            (KEY_ANNUAL_REVENUE, 100_000.0),
            (KEY_ANNUAL_COSTS, 60_000.0),
        ]);
        let flows = generate_cash_flows(&s);
        assert_eq!(flows.len(), 6);
        assert_relative_eq!(flows[0], -400_000.0);
        // Year 1 is anchored at the base amounts.
        assert_relative_eq!(flows[1], 40_000.0);
    }

    #[test]
    fn test_costs_grow_slower_than_revenue() {
        let s = scenario(&[
            (KEY_YEARS, 3.0),
            (KEY_ANNUAL_REVENUE, 100_000.0),
            (KEY_ANNUAL_COSTS, 100_000.0),
            (KEY_GROWTH_RATE, 0.10),
        ]);
        let flows = generate_cash_flows(&s);
        // Equal bases, so the margin opens up purely from the growth gap.
        assert_relative_eq!(flows[1], 0.0);
        let year3 = 100_000.0 * 1.10_f64.powi(2) - 100_000.0 * 1.08_f64.powi(2);
        assert_relative_eq!(flows[3], year3, epsilon = 1e-9);
        assert!(flows[2] > flows[1]);
        assert!(flows[3] > flows[2]);
    }

    #[test]
    fn test_defaults_apply_for_absent_keys() {
        let s = scenario(&[(KEY_ANNUAL_REVENUE, 50_000.0)]);
        let flows = generate_cash_flows(&s);
        assert_eq!(flows.len(), DEFAULT_YEARS as usize + 1);
        assert_eq!(flows[0], 0.0);
        assert_relative_eq!(
            flows[2],
            50_000.0 * (1.0 + DEFAULT_GROWTH_RATE),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_empty_scenario_is_all_defaults() {
        let flows = generate_cash_flows(&Scenario::new());
        assert_eq!(flows.len(), 13);
        assert!(flows.iter().all(|&f| f == 0.0));
    }
}
