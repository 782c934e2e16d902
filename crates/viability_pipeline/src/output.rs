//! The published analysis result set.

use serde::{Deserialize, Serialize};
use viability_core::market::MarketAssumptions;
use viability_model::aggregate::CategoryTotals;
use viability_model::investment::InvestmentBreakdown;
use viability_model::kpi::StrategicKpiSet;
use viability_model::projection::Projection;
use viability_model::tax::TaxBurden;
use viability_model::valuation::ViabilityMetrics;
use viability_risk::monte_carlo::MonteCarloAnalysis;
use viability_risk::sensitivity::SensitivityAnalysis;

/// Outcome of one growth preset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetOutcome {
    /// Growth rate assumed by this preset.
    pub growth_rate: f64,
    /// Net present value under the preset.
    pub npv: f64,
    /// Internal rate of return; `None` when the solve did not converge.
    pub irr: Option<f64>,
    /// Payback period in years; `None` when never reached.
    pub payback: Option<f64>,
}

/// Three canned growth scenarios around the market assumption.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioPresets {
    /// Half the assumed growth.
    pub pessimistic: PresetOutcome,
    /// The assumed growth.
    pub realistic: PresetOutcome,
    /// One and a half times the assumed growth.
    pub optimistic: PresetOutcome,
}

/// Everything one analysis run publishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineOutput {
    /// Resolved market assumptions the run used.
    pub market: MarketAssumptions,
    /// Aggregated monthly revenue model.
    pub revenue_summary: CategoryTotals,
    /// Aggregated monthly cost model.
    pub cost_summary: CategoryTotals,
    /// Annual tax burden at the base revenue/EBITDA.
    pub tax_summary: TaxBurden,
    /// Sized initial investment.
    pub investment: InvestmentBreakdown,
    /// Multi-year projections.
    pub projections: Vec<Projection>,
    /// NPV, IRR, payback, ROI, break-even and DCF valuation.
    pub viability: ViabilityMetrics,
    /// Strategic KPI groups.
    pub strategic_kpis: StrategicKpiSet,
    /// Pessimistic / realistic / optimistic growth outcomes.
    pub scenarios: ScenarioPresets,
    /// Sensitivity analysis, present when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensitivity: Option<SensitivityAnalysis>,
    /// Monte Carlo analysis, present when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monte_carlo: Option<MonteCarloAnalysis>,
}
