//! Multi-year financial projection generator.
//!
//! Revenues compound at the market growth potential, costs at the
//! inflation rate. Taxes per year come from the full jurisdiction
//! breakdown applied to that year's revenue and EBITDA. The year-0
//! record carries the initial investment outflow; `accumulated` is a
//! scan over the finished sequence rather than in-place mutation.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use viability_core::market::MarketAssumptions;

use crate::investment::InvestmentBreakdown;
use crate::tax::{compute_tax_burden, TaxBurden};

/// Default projection horizon in years.
pub const DEFAULT_HORIZON_YEARS: usize = 12;

/// Cash movements for one projection year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CashFlowRecord {
    /// Operating cash flow (net profit for the year).
    pub operational: f64,
    /// Investment outflow; the full initial investment in year 0, zero
    /// afterwards.
    pub investment: f64,
    /// Financing flow. Always zero in the current model, kept so the
    /// record shape survives a debt-financed variant.
    pub financing: f64,
    /// Sum of the three flows.
    pub net: f64,
    /// Running sum of `net` up to and including this year.
    pub accumulated: f64,
}

/// Profitability metrics for one projection year.
///
/// Margins are fractions of revenue, 0 when revenue is zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearMetrics {
    /// Revenue minus operating costs.
    pub ebitda: f64,
    /// Earnings before interest and taxes. No depreciation schedule is
    /// applied inside the projection, so this equals EBITDA.
    pub ebit: f64,
    /// EBITDA minus the year's total tax burden.
    pub net_profit: f64,
    /// `(revenue − costs) / revenue`.
    pub gross_margin: f64,
    /// `net_profit / revenue`.
    pub net_margin: f64,
    /// `ebitda / revenue`.
    pub ebitda_margin: f64,
}

/// One projected year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Projection {
    /// Calendar year (current year + offset).
    pub year: i32,
    /// Projected annual revenue.
    pub revenue: f64,
    /// Projected annual operating costs.
    pub costs: f64,
    /// Jurisdiction tax breakdown for this year.
    pub taxes: TaxBurden,
    /// Cash movements.
    pub cash_flow: CashFlowRecord,
    /// Profitability metrics.
    pub metrics: YearMetrics,
}

fn ratio(numerator: f64, revenue: f64) -> f64 {
    if revenue != 0.0 {
        numerator / revenue
    } else {
        0.0
    }
}

/// Generate `years` projection records (12 when zero is passed).
///
/// Year `i` revenue is `base_annual_revenue × (1 + growth)^i`; costs
/// compound at the inflation rate. The investment total lands as a
/// negative flow in year 0 only.
///
/// # Arguments
///
/// * `base_annual_revenue` — year-0 annual revenue.
/// * `base_annual_costs` — year-0 annual operating costs.
/// * `market` — assumptions supplying growth, inflation and the tax
///   schema.
/// * `investment` — sized initial investment, expensed in year 0.
/// * `years` — horizon length; 0 selects [`DEFAULT_HORIZON_YEARS`].
pub fn project(
    base_annual_revenue: f64,
    base_annual_costs: f64,
    market: &MarketAssumptions,
    investment: &InvestmentBreakdown,
    years: usize,
) -> Vec<Projection> {
    let horizon = if years == 0 { DEFAULT_HORIZON_YEARS } else { years };
    let current_year = chrono::Utc::now().year();
    let growth = market.growth_potential;
    let inflation = market.inflation_rate;

    let mut projections: Vec<Projection> = (0..horizon)
        .map(|i| {
            let revenue = base_annual_revenue * (1.0 + growth).powi(i as i32);
            let costs = base_annual_costs * (1.0 + inflation).powi(i as i32);
            let ebitda = revenue - costs;
            let taxes = compute_tax_burden(revenue, ebitda, market);
            let net_profit = ebitda - taxes.total;

            let investment_flow = if i == 0 { -investment.total } else { 0.0 };
            let net = net_profit + investment_flow;

            Projection {
                year: current_year + i as i32,
                revenue,
                costs,
                metrics: YearMetrics {
                    ebitda,
                    ebit: ebitda,
                    net_profit,
                    gross_margin: ratio(revenue - costs, revenue),
                    net_margin: ratio(net_profit, revenue),
                    ebitda_margin: ratio(ebitda, revenue),
                },
                taxes,
                cash_flow: CashFlowRecord {
                    operational: net_profit,
                    investment: investment_flow,
                    financing: 0.0,
                    net,
                    accumulated: 0.0,
                },
            }
        })
        .collect();

    let mut running = 0.0;
    for record in &mut projections {
        running += record.cash_flow.net;
        record.cash_flow.accumulated = running;
    }

    projections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::investment::compute_investment;
    use approx::assert_relative_eq;

    fn sample() -> (MarketAssumptions, InvestmentBreakdown) {
        let market = MarketAssumptions::brazil();
        let investment = compute_investment(&market, 2);
        (market, investment)
    }

    #[test]
    fn test_horizon_length_and_default() {
        let (market, inv) = sample();
        assert_eq!(project(600_000.0, 300_000.0, &market, &inv, 5).len(), 5);
        assert_eq!(
            project(600_000.0, 300_000.0, &market, &inv, 0).len(),
            DEFAULT_HORIZON_YEARS
        );
    }

    #[test]
    fn test_calendar_years_are_consecutive() {
        let (market, inv) = sample();
        let projections = project(600_000.0, 300_000.0, &market, &inv, 3);
        let first = chrono::Utc::now().year();
        let years: Vec<i32> = projections.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![first, first + 1, first + 2]);
    }

    #[test]
    fn test_revenue_and_costs_compound_independently() {
        let (market, inv) = sample();
        let projections = project(100_000.0, 50_000.0, &market, &inv, 4);

        for (i, p) in projections.iter().enumerate() {
            let expected_revenue = 100_000.0 * (1.0 + market.growth_potential).powi(i as i32);
            let expected_costs = 50_000.0 * (1.0 + market.inflation_rate).powi(i as i32);
            assert_relative_eq!(p.revenue, expected_revenue, epsilon = 1e-9);
            assert_relative_eq!(p.costs, expected_costs, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_investment_lands_in_year_zero_only() {
        let (market, inv) = sample();
        let projections = project(600_000.0, 300_000.0, &market, &inv, 4);

        assert_relative_eq!(projections[0].cash_flow.investment, -inv.total);
        for p in &projections[1..] {
            assert_eq!(p.cash_flow.investment, 0.0);
        }
    }

    #[test]
    fn test_taxes_use_full_breakdown_per_year() {
        let (market, inv) = sample();
        let projections = project(600_000.0, 300_000.0, &market, &inv, 3);

        for p in &projections {
            let expected = compute_tax_burden(p.revenue, p.metrics.ebitda, &market);
            assert_eq!(p.taxes, expected);
            assert_relative_eq!(p.metrics.net_profit, p.metrics.ebitda - expected.total);
        }
    }

    #[test]
    fn test_loss_year_skips_profit_taxes() {
        let (market, inv) = sample();
        // Costs exceed revenue, so EBITDA is negative throughout.
        let projections = project(100_000.0, 200_000.0, &market, &inv, 2);

        for p in &projections {
            assert!(p.metrics.ebitda < 0.0);
            assert_eq!(p.taxes.component("irpj"), 0.0);
            assert_eq!(p.taxes.component("csll"), 0.0);
            assert!(p.taxes.component("simplesNacional") > 0.0);
        }
    }

    #[test]
    fn test_accumulated_is_running_sum_of_net() {
        let (market, inv) = sample();
        let projections = project(600_000.0, 300_000.0, &market, &inv, 6);

        let mut running = 0.0;
        for p in &projections {
            running += p.cash_flow.net;
            assert_relative_eq!(p.cash_flow.accumulated, running, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_zero_revenue_yields_zero_margins_never_nan() {
        let (market, inv) = sample();
        let projections = project(0.0, 10_000.0, &market, &inv, 2);

        for p in &projections {
            assert_eq!(p.metrics.gross_margin, 0.0);
            assert_eq!(p.metrics.net_margin, 0.0);
            assert_eq!(p.metrics.ebitda_margin, 0.0);
            assert!(p.cash_flow.accumulated.is_finite());
        }
    }

    #[test]
    fn test_margins_are_revenue_fractions() {
        let (market, inv) = sample();
        let p = &project(600_000.0, 300_000.0, &market, &inv, 1)[0];

        assert_relative_eq!(p.metrics.gross_margin, (p.revenue - p.costs) / p.revenue);
        assert_relative_eq!(p.metrics.ebitda_margin, p.metrics.ebitda / p.revenue);
        assert_relative_eq!(p.metrics.net_margin, p.metrics.net_profit / p.revenue);
    }
}
