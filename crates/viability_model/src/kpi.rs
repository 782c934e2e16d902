//! Strategic KPI synthesis.
//!
//! Five KPI groups are published per analysis: financial, operational,
//! customer, growth and sustainability. Values that can be derived from
//! the model (margins, revenue per field, staff productivity, occupancy,
//! asset returns) are computed; the rest are domain baselines a facility
//! operator calibrates over time. Targets and benchmarks come from a
//! [`KpiTargets`] table with built-in defaults, overridable per key via
//! a toml document.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use viability_core::market::MarketAssumptions;

use crate::investment::InvestmentBreakdown;
use crate::projection::Projection;

/// Direction in which a KPI is expected to move when the business is
/// healthy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// Higher is better.
    Up,
    /// Lower is better.
    Down,
    /// Expected to hold steady.
    Stable,
}

/// One published KPI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiRecord {
    /// Display name.
    pub name: String,
    /// Current value; fractions for percentage KPIs.
    pub value: f64,
    /// Display unit, e.g. `"%"`, `"x"` or `"months"`.
    pub unit: String,
    /// Healthy direction of movement.
    pub trend: Trend,
    /// Management target.
    pub target: f64,
    /// Industry benchmark.
    pub benchmark: f64,
}

/// Target/benchmark pair for one KPI key.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KpiTarget {
    /// Management target.
    pub target: f64,
    /// Industry benchmark.
    pub benchmark: f64,
}

/// Per-key target overrides. Keys not present fall back to the built-in
/// defaults, so a toml override file only needs to name the KPIs it
/// changes:
///
/// ```toml
/// [profitMargin]
/// target = 0.25
/// benchmark = 0.18
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KpiTargets(pub BTreeMap<String, KpiTarget>);

impl KpiTargets {
    /// Resolve the target pair for `key`, falling back to the built-in
    /// default table.
    pub fn resolve(&self, key: &str) -> KpiTarget {
        self.0.get(key).copied().unwrap_or_else(|| builtin_target(key))
    }
}

/// Built-in target/benchmark defaults, keyed by KPI identifier.
fn builtin_target(key: &str) -> KpiTarget {
    let (target, benchmark) = match key {
        "revenueGrowthRate" => (0.15, 0.12),
        "profitMargin" => (0.20, 0.15),
        "cashFlowMargin" => (0.18, 0.12),
        "returnOnAssets" => (0.25, 0.20),
        "returnOnEquity" => (0.30, 0.25),
        "debtToEquityRatio" => (0.30, 0.50),
        "breakEvenPoint" => (18.0, 24.0),
        "fieldUtilizationRate" => (0.75, 0.65),
        "averageRevenuePerField" => (15_000.0, 12_000.0),
        "membershipRetentionRate" => (0.90, 0.80),
        "staffProductivity" => (3.0, 2.5),
        "maintenanceCostRatio" => (0.08, 0.12),
        "energyEfficiency" => (0.80, 0.70),
        "customerSatisfactionScore" => (9.0, 8.0),
        "netPromoterScore" => (70.0, 50.0),
        "averageCustomerLifetime" => (30.0, 18.0),
        "membershipGrowthRate" => (0.12, 0.08),
        "churnRate" => (0.03, 0.08),
        "averageRevenuePerCustomer" => (2_000.0, 1_500.0),
        "membershipGrowth" => (0.20, 0.10),
        "revenueGrowth" => (0.20, 0.12),
        "marketExpansion" => (0.10, 0.03),
        "facilityExpansion" => (1.0, 0.0),
        "sustainableEnergyEfficiency" => (0.85, 0.70),
        "waterUsage" => (120.0, 180.0),
        "wasteReduction" => (0.50, 0.20),
        "carbonFootprint" => (6.0, 12.0),
        _ => (0.0, 0.0),
    };
    KpiTarget { target, benchmark }
}

/// The five published KPI groups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategicKpiSet {
    /// Margins, returns and break-even.
    pub financial: Vec<KpiRecord>,
    /// Facility utilisation and efficiency.
    pub operational: Vec<KpiRecord>,
    /// Member satisfaction and value.
    pub customer: Vec<KpiRecord>,
    /// Expansion indicators.
    pub growth: Vec<KpiRecord>,
    /// Resource-usage indicators.
    pub sustainability: Vec<KpiRecord>,
}

/// Baseline values a facility operator calibrates over time; they are
/// not derivable from the financial model.
mod baseline {
    pub const RETURN_ON_EQUITY: f64 = 0.30;
    pub const DEBT_TO_EQUITY: f64 = 0.40;
    pub const MEMBERSHIP_RETENTION: f64 = 0.85;
    pub const ENERGY_EFFICIENCY: f64 = 0.75;
    pub const CUSTOMER_SATISFACTION: f64 = 8.5;
    pub const NET_PROMOTER_SCORE: f64 = 65.0;
    pub const CUSTOMER_LIFETIME_MONTHS: f64 = 24.0;
    pub const MEMBERSHIP_GROWTH_MONTHLY: f64 = 0.10;
    pub const CHURN_MONTHLY: f64 = 0.05;
    pub const MEMBERSHIP_GROWTH_ANNUAL: f64 = 0.15;
    pub const MARKET_EXPANSION: f64 = 0.05;
    pub const SUSTAINABLE_ENERGY_EFFICIENCY: f64 = 0.78;
    pub const WATER_USAGE_M3_PER_FIELD: f64 = 150.0;
    pub const WASTE_REDUCTION: f64 = 0.30;
    pub const CARBON_FOOTPRINT_TONNES: f64 = 8.5;
    /// Floor applied to the member count so per-customer averages stay
    /// meaningful for pre-launch clubs.
    pub const MIN_MEMBER_BASE: f64 = 100.0;
}

fn guarded(numerator: f64, denominator: f64) -> f64 {
    if denominator != 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// First projection year whose accumulated cash flow is non-negative,
/// expressed in months; the default baseline when never reached.
fn break_even_months(projections: &[Projection]) -> f64 {
    projections
        .iter()
        .position(|p| p.cash_flow.accumulated >= 0.0)
        .map(|i| i as f64 * 12.0)
        .unwrap_or(builtin_target("breakEvenPoint").target)
}

/// Synthesize the strategic KPI set from the model outputs.
///
/// # Arguments
///
/// * `annual_revenue` / `annual_costs` — year-0 annual totals.
/// * `projections` — the generated projection horizon.
/// * `investment` — sized initial investment (asset base for returns).
/// * `market` — assumptions supplying occupancy, growth and cost factors.
/// * `num_fields` — number of playing fields.
/// * `members` — current member count; floored internally.
/// * `targets` — target/benchmark table, usually `&KpiTargets::default()`.
pub fn synthesize_kpis(
    annual_revenue: f64,
    annual_costs: f64,
    projections: &[Projection],
    investment: &InvestmentBreakdown,
    market: &MarketAssumptions,
    num_fields: u32,
    members: u32,
    targets: &KpiTargets,
) -> StrategicKpiSet {
    let record = |key: &str, name: &str, value: f64, unit: &str, trend: Trend| {
        let t = targets.resolve(key);
        KpiRecord {
            name: name.to_string(),
            value,
            unit: unit.to_string(),
            trend,
            target: t.target,
            benchmark: t.benchmark,
        }
    };

    let net_profit = projections
        .first()
        .map(|p| p.metrics.net_profit)
        .unwrap_or(annual_revenue - annual_costs);
    let profit_margin = guarded(net_profit, annual_revenue);
    let fields = f64::from(num_fields.max(1));
    let member_base = f64::from(members).max(baseline::MIN_MEMBER_BASE);
    let personnel_costs = annual_costs * market.salary_burden;

    let financial = vec![
        record(
            "revenueGrowthRate",
            "Revenue growth rate",
            market.growth_potential,
            "%",
            Trend::Up,
        ),
        record("profitMargin", "Profit margin", profit_margin, "%", Trend::Up),
        // Cash conversion runs slightly below accounting profit.
        record(
            "cashFlowMargin",
            "Cash flow margin",
            profit_margin * 0.9,
            "%",
            Trend::Up,
        ),
        record(
            "returnOnAssets",
            "Return on assets",
            guarded(net_profit, investment.total),
            "%",
            Trend::Up,
        ),
        record(
            "returnOnEquity",
            "Return on equity",
            baseline::RETURN_ON_EQUITY,
            "%",
            Trend::Up,
        ),
        record(
            "debtToEquityRatio",
            "Debt to equity",
            baseline::DEBT_TO_EQUITY,
            "x",
            Trend::Down,
        ),
        record(
            "breakEvenPoint",
            "Break-even point",
            break_even_months(projections),
            "months",
            Trend::Down,
        ),
    ];

    let operational = vec![
        record(
            "fieldUtilizationRate",
            "Field utilisation rate",
            market.expected_occupancy,
            "%",
            Trend::Up,
        ),
        record(
            "averageRevenuePerField",
            "Average revenue per field",
            annual_revenue / fields / 12.0,
            "/month",
            Trend::Up,
        ),
        record(
            "membershipRetentionRate",
            "Membership retention rate",
            baseline::MEMBERSHIP_RETENTION,
            "%",
            Trend::Up,
        ),
        record(
            "staffProductivity",
            "Staff productivity",
            guarded(annual_revenue, personnel_costs),
            "x",
            Trend::Up,
        ),
        record(
            "maintenanceCostRatio",
            "Maintenance cost ratio",
            guarded(annual_costs * market.maintenance_factor, annual_revenue),
            "%",
            Trend::Down,
        ),
        record(
            "energyEfficiency",
            "Energy efficiency",
            baseline::ENERGY_EFFICIENCY,
            "%",
            Trend::Up,
        ),
    ];

    let customer = vec![
        record(
            "customerSatisfactionScore",
            "Customer satisfaction",
            baseline::CUSTOMER_SATISFACTION,
            "/10",
            Trend::Up,
        ),
        record(
            "netPromoterScore",
            "Net promoter score",
            baseline::NET_PROMOTER_SCORE,
            "points",
            Trend::Up,
        ),
        record(
            "averageCustomerLifetime",
            "Average customer lifetime",
            baseline::CUSTOMER_LIFETIME_MONTHS,
            "months",
            Trend::Up,
        ),
        record(
            "membershipGrowthRate",
            "Membership growth rate",
            baseline::MEMBERSHIP_GROWTH_MONTHLY,
            "%/month",
            Trend::Up,
        ),
        record("churnRate", "Churn rate", baseline::CHURN_MONTHLY, "%/month", Trend::Down),
        record(
            "averageRevenuePerCustomer",
            "Average revenue per customer",
            annual_revenue / member_base,
            "/year",
            Trend::Up,
        ),
    ];

    let growth = vec![
        record(
            "membershipGrowth",
            "Membership growth",
            baseline::MEMBERSHIP_GROWTH_ANNUAL,
            "%",
            Trend::Up,
        ),
        record(
            "revenueGrowth",
            "Revenue growth",
            market.growth_potential,
            "%",
            Trend::Up,
        ),
        record(
            "marketExpansion",
            "Market expansion",
            baseline::MARKET_EXPANSION,
            "%",
            Trend::Up,
        ),
        record(
            "facilityExpansion",
            "Facility expansion",
            0.0,
            "new fields",
            Trend::Stable,
        ),
    ];

    let sustainability = vec![
        record(
            "sustainableEnergyEfficiency",
            "Energy efficiency",
            baseline::SUSTAINABLE_ENERGY_EFFICIENCY,
            "%",
            Trend::Up,
        ),
        record(
            "waterUsage",
            "Water usage",
            baseline::WATER_USAGE_M3_PER_FIELD,
            "m³/field/month",
            Trend::Down,
        ),
        record(
            "wasteReduction",
            "Waste reduction",
            baseline::WASTE_REDUCTION,
            "%",
            Trend::Up,
        ),
        record(
            "carbonFootprint",
            "Carbon footprint",
            baseline::CARBON_FOOTPRINT_TONNES,
            "tCO2/year",
            Trend::Down,
        ),
    ];

    StrategicKpiSet {
        financial,
        operational,
        customer,
        growth,
        sustainability,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::investment::compute_investment;
    use crate::projection::project;
    use approx::assert_relative_eq;

    fn synthesized() -> StrategicKpiSet {
        let market = MarketAssumptions::brazil();
        let investment = compute_investment(&market, 2);
        let projections = project(600_000.0, 300_000.0, &market, &investment, 12);
        synthesize_kpis(
            600_000.0,
            300_000.0,
            &projections,
            &investment,
            &market,
            2,
            150,
            &KpiTargets::default(),
        )
    }

    fn find<'a>(records: &'a [KpiRecord], name: &str) -> &'a KpiRecord {
        records
            .iter()
            .find(|r| r.name == name)
            .unwrap_or_else(|| panic!("missing KPI {name}"))
    }

    #[test]
    fn test_five_groups_are_populated() {
        let set = synthesized();
        assert_eq!(set.financial.len(), 7);
        assert_eq!(set.operational.len(), 6);
        assert_eq!(set.customer.len(), 6);
        assert_eq!(set.growth.len(), 4);
        assert_eq!(set.sustainability.len(), 4);
    }

    #[test]
    fn test_derived_values() {
        let market = MarketAssumptions::brazil();
        let set = synthesized();

        let growth = find(&set.financial, "Revenue growth rate");
        assert_relative_eq!(growth.value, market.growth_potential);

        let per_field = find(&set.operational, "Average revenue per field");
        assert_relative_eq!(per_field.value, 600_000.0 / 2.0 / 12.0);

        let utilisation = find(&set.operational, "Field utilisation rate");
        assert_relative_eq!(utilisation.value, market.expected_occupancy);

        let per_customer = find(&set.customer, "Average revenue per customer");
        assert_relative_eq!(per_customer.value, 600_000.0 / 150.0);
    }

    #[test]
    fn test_member_floor_applies_below_minimum() {
        let market = MarketAssumptions::brazil();
        let investment = compute_investment(&market, 2);
        let projections = project(600_000.0, 300_000.0, &market, &investment, 12);
        let set = synthesize_kpis(
            600_000.0,
            300_000.0,
            &projections,
            &investment,
            &market,
            2,
            0,
            &KpiTargets::default(),
        );
        let per_customer = find(&set.customer, "Average revenue per customer");
        assert_relative_eq!(per_customer.value, 600_000.0 / 100.0);
    }

    #[test]
    fn test_zero_revenue_never_yields_nan() {
        let market = MarketAssumptions::brazil();
        let investment = compute_investment(&market, 1);
        let projections = project(0.0, 0.0, &market, &investment, 12);
        let set = synthesize_kpis(
            0.0,
            0.0,
            &projections,
            &investment,
            &market,
            1,
            0,
            &KpiTargets::default(),
        );

        for group in [
            &set.financial,
            &set.operational,
            &set.customer,
            &set.growth,
            &set.sustainability,
        ] {
            for r in group.iter() {
                assert!(r.value.is_finite(), "{} produced non-finite value", r.name);
            }
        }
    }

    #[test]
    fn test_default_targets_match_builtin_table() {
        let set = synthesized();
        let margin = find(&set.financial, "Profit margin");
        assert_relative_eq!(margin.target, 0.20);
        assert_relative_eq!(margin.benchmark, 0.15);
    }

    #[test]
    fn test_toml_override_falls_back_per_key() {
        let overrides: KpiTargets = toml::from_str(
            r#"
            [profitMargin]
            target = 0.25
            benchmark = 0.18
            "#,
        )
        .unwrap();

        let margin = overrides.resolve("profitMargin");
        assert_relative_eq!(margin.target, 0.25);
        assert_relative_eq!(margin.benchmark, 0.18);

        // Keys absent from the document keep the built-in defaults.
        let churn = overrides.resolve("churnRate");
        assert_relative_eq!(churn.target, 0.03);
        assert_relative_eq!(churn.benchmark, 0.08);
    }

    #[test]
    fn test_trend_serialises_lowercase() {
        let json = serde_json::to_string(&Trend::Down).unwrap();
        assert_eq!(json, "\"down\"");
    }
}
