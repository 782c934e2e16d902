//! Univariate sensitivity analysis: per-variable sweeps, tornado
//! ranking, spider series.
//!
//! One variable moves at a time while the rest of the scenario stays at
//! base. NPV is always evaluated at the base discount rate, so the
//! discount rate itself is not a sweep variable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use viability_model::valuation::npv;

use crate::scenario::{
    generate_cash_flows, scenario_value, Scenario, DEFAULT_DISCOUNT_RATE, KEY_DISCOUNT_RATE,
};

/// Default symmetric sweep range (±20 %).
pub const DEFAULT_CHANGE_RANGE: f64 = 0.20;
/// Absolute step between sweep points.
pub const STEP: f64 = 0.05;
/// Relative changes evaluated for the spider series, in percent.
pub const SPIDER_CHANGES: [f64; 5] = [-20.0, -10.0, 0.0, 10.0, 20.0];

/// One evaluated point of a variable sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensitivityPoint {
    /// Swept variable.
    pub variable: String,
    /// Relative change applied, in percent.
    pub change_percent: f64,
    /// Variable value after the change.
    pub new_value: f64,
    /// NPV of the modified scenario.
    pub npv: f64,
}

/// Tornado-chart entry for one variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TornadoEntry {
    /// Swept variable.
    pub variable: String,
    /// NPV delta at the low end of the range.
    pub low_impact: f64,
    /// NPV delta at the high end of the range.
    pub high_impact: f64,
    /// Absolute NPV spread between the two ends.
    pub swing: f64,
}

/// Spider-chart series for one variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpiderSeries {
    /// Swept variable.
    pub variable: String,
    /// Base case reference level, always 100.
    pub base_case: f64,
    /// Percentage NPV change at each of [`SPIDER_CHANGES`].
    pub response: Vec<f64>,
}

/// Full sensitivity result set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensitivityAnalysis {
    /// Every evaluated sweep point, grouped by variable in map order.
    pub points: Vec<SensitivityPoint>,
    /// Tornado entries, sorted descending by swing.
    pub tornado: Vec<TornadoEntry>,
    /// Spider series, one per variable.
    pub spider: Vec<SpiderSeries>,
}

fn npv_with(base: &Scenario, variable: &str, value: f64, discount_rate: f64) -> f64 {
    let mut modified = base.clone();
    modified.insert(variable.to_string(), value);
    npv(&generate_cash_flows(&modified), discount_rate)
}

/// Sweep each variable across ±`change_range` and derive the tornado
/// and spider series.
///
/// `variables` maps variable names to their base values; `change_range`
/// of 0 selects [`DEFAULT_CHANGE_RANGE`]. Sweep points sit at exact
/// multiples of [`STEP`]. Spider responses are percentage NPV changes
/// relative to the base scenario, zero when the base NPV is zero.
pub fn sensitivity_analysis(
    base: &Scenario,
    variables: &BTreeMap<String, f64>,
    change_range: f64,
) -> SensitivityAnalysis {
    let range = if change_range > 0.0 {
        change_range
    } else {
        DEFAULT_CHANGE_RANGE
    };
    let discount_rate = scenario_value(base, KEY_DISCOUNT_RATE, DEFAULT_DISCOUNT_RATE);
    let base_npv = npv(&generate_cash_flows(base), discount_rate);

    let steps = (range / STEP).round() as i32;

    let mut points = Vec::new();
    for (variable, &base_value) in variables {
        for k in -steps..=steps {
            // Scale the step to percent before multiplying by k, so the
            // points land on exact multiples of 5 rather than picking up
            // the rounding of k * 0.05.
            let change_percent = f64::from(k) * (STEP * 100.0);
            let new_value = base_value * (1.0 + change_percent / 100.0);
            points.push(SensitivityPoint {
                variable: variable.clone(),
                change_percent,
                new_value,
                npv: npv_with(base, variable, new_value, discount_rate),
            });
        }
    }

    let mut tornado: Vec<TornadoEntry> = variables
        .iter()
        .map(|(variable, &base_value)| {
            let npv_low = npv_with(base, variable, base_value * (1.0 - range), discount_rate);
            let npv_high = npv_with(base, variable, base_value * (1.0 + range), discount_rate);
            TornadoEntry {
                variable: variable.clone(),
                low_impact: npv_low - base_npv,
                high_impact: npv_high - base_npv,
                swing: (npv_high - npv_low).abs(),
            }
        })
        .collect();
    tornado.sort_by(|a, b| b.swing.total_cmp(&a.swing));

    let spider = variables
        .iter()
        .map(|(variable, &base_value)| {
            let response = SPIDER_CHANGES
                .iter()
                .map(|&change| {
                    let new_value = base_value * (1.0 + change / 100.0);
                    let point_npv = npv_with(base, variable, new_value, discount_rate);
                    if base_npv != 0.0 {
                        ((point_npv / base_npv) - 1.0) * 100.0
                    } else {
                        0.0
                    }
                })
                .collect();
            SpiderSeries {
                variable: variable.clone(),
                base_case: 100.0,
                response,
            }
        })
        .collect();

    SensitivityAnalysis {
        points,
        tornado,
        spider,
    }
}
