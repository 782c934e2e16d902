//! The synchronous analysis pipeline.
//!
//! Stages run in strict dependency order: validate, aggregate, tax,
//! investment, projections, valuation, KPIs, presets, then the optional
//! risk analyses. The cancellation flag is polled between stages and
//! inside the Monte Carlo loop; a cancelled run returns
//! [`EngineError::Superseded`] without publishing anything.

use std::collections::BTreeMap;
use tracing::{debug, info};
use viability_model::aggregate::aggregate;
use viability_model::investment::compute_investment;
use viability_model::kpi::synthesize_kpis;
use viability_model::projection::project;
use viability_model::tax::compute_tax_burden;
use viability_model::valuation::{irr, npv, payback_period, viability_metrics};
use viability_risk::monte_carlo::{run_monte_carlo, MonteCarloConfig};
use viability_risk::scenario::{
    generate_cash_flows, Scenario, KEY_ANNUAL_COSTS, KEY_ANNUAL_REVENUE, KEY_DISCOUNT_RATE,
    KEY_GROWTH_RATE, KEY_INITIAL_INVESTMENT, KEY_YEARS,
};
use viability_risk::sensitivity::{sensitivity_analysis, DEFAULT_CHANGE_RANGE};

use crate::error::EngineError;
use crate::input::EngineInput;
use crate::output::{EngineOutput, PresetOutcome, ScenarioPresets};

/// Growth multipliers for the pessimistic / realistic / optimistic presets.
const PRESET_GROWTH_FACTORS: [f64; 3] = [0.5, 1.0, 1.5];

/// Run the full pipeline without a cancellation source.
pub fn compute(input: &EngineInput) -> Result<EngineOutput, EngineError> {
    compute_with_cancel(input, &|| false)
}

fn preset_outcome(base: &Scenario, growth_rate: f64, discount_rate: f64) -> PresetOutcome {
    let mut scenario = base.clone();
    scenario.insert(KEY_GROWTH_RATE.to_string(), growth_rate);
    let flows = generate_cash_flows(&scenario);
    PresetOutcome {
        growth_rate,
        npv: npv(&flows, discount_rate),
        irr: irr(&flows),
        payback: payback_period(&flows),
    }
}

/// Run the full pipeline, aborting with [`EngineError::Superseded`]
/// when `cancelled` reports true.
pub fn compute_with_cancel(
    input: &EngineInput,
    cancelled: &(impl Fn() -> bool + Sync),
) -> Result<EngineOutput, EngineError> {
    input.validate()?;
    let market = input.market.resolve();
    info!(market = %market.name, fields = input.club.num_fields, "starting analysis");

    let check = || -> Result<(), EngineError> {
        if cancelled() {
            Err(EngineError::Superseded)
        } else {
            Ok(())
        }
    };

    let revenue_summary = aggregate(&input.revenues);
    let cost_summary = aggregate(&input.costs);
    let annual_revenue = revenue_summary.annual();
    let annual_costs = cost_summary.annual();

    let tax_summary =
        compute_tax_burden(annual_revenue, annual_revenue - annual_costs, &market);
    let investment = compute_investment(&market, input.club.num_fields);
    check()?;

    let years = input.options.years.unwrap_or(0);
    let projections = project(annual_revenue, annual_costs, &market, &investment, years);

    // The valuation series carries the investment exactly once, at
    // index 0; operating years contribute their net profit.
    let mut valuation_flows = Vec::with_capacity(projections.len() + 1);
    valuation_flows.push(-investment.total);
    valuation_flows.extend(projections.iter().map(|p| p.metrics.net_profit));

    let viability = viability_metrics(
        &valuation_flows,
        market.discount_rate,
        input.terminal_growth_rate(),
    );
    check()?;

    let kpi_targets = input.options.kpi_targets.clone().unwrap_or_default();
    let strategic_kpis = synthesize_kpis(
        annual_revenue,
        annual_costs,
        &projections,
        &investment,
        &market,
        input.club.num_fields,
        input.club.members,
        &kpi_targets,
    );

    let base_scenario: Scenario = [
        (KEY_YEARS, projections.len() as f64),
        (KEY_INITIAL_INVESTMENT, investment.total),
        (KEY_ANNUAL_REVENUE, annual_revenue),
        (KEY_ANNUAL_COSTS, annual_costs),
        (KEY_GROWTH_RATE, market.growth_potential),
        (KEY_DISCOUNT_RATE, market.discount_rate),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), *v))
    .collect();

    let [pessimistic, realistic, optimistic] = PRESET_GROWTH_FACTORS.map(|factor| {
        preset_outcome(
            &base_scenario,
            market.growth_potential * factor,
            market.discount_rate,
        )
    });
    check()?;

    let change_range = input.options.change_range.unwrap_or(DEFAULT_CHANGE_RANGE);
    let risk_variables: BTreeMap<String, f64> = [
        KEY_ANNUAL_REVENUE,
        KEY_ANNUAL_COSTS,
        KEY_GROWTH_RATE,
        KEY_INITIAL_INVESTMENT,
    ]
    .iter()
    .map(|k| (k.to_string(), base_scenario[*k]))
    .collect();

    let sensitivity = if input.options.sensitivity {
        debug!(change_range, "running sensitivity analysis");
        Some(sensitivity_analysis(
            &base_scenario,
            &risk_variables,
            change_range,
        ))
    } else {
        None
    };
    check()?;

    let monte_carlo = if input.options.monte_carlo {
        let mut builder = MonteCarloConfig::builder();
        if let Some(iterations) = input.options.iterations {
            builder = builder.iterations(iterations);
        }
        if let Some(seed) = input.options.seed {
            builder = builder.seed(seed);
        }
        let config = builder
            .build()
            .map_err(|e| EngineError::InvalidInput(e.to_string()))?;

        let uncertainties: BTreeMap<String, f64> = risk_variables
            .keys()
            .map(|k| (k.clone(), change_range))
            .collect();

        match run_monte_carlo(&base_scenario, &uncertainties, &config, cancelled) {
            Some(analysis) => Some(analysis),
            None => return Err(EngineError::Superseded),
        }
    } else {
        None
    };
    check()?;

    info!(npv = viability.npv, "analysis complete");
    Ok(EngineOutput {
        market,
        revenue_summary,
        cost_summary,
        tax_summary,
        investment,
        projections,
        viability,
        strategic_kpis,
        scenarios: ScenarioPresets {
            pessimistic,
            realistic,
            optimistic,
        },
        sensitivity,
        monte_carlo,
    })
}
