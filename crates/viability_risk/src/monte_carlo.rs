//! Monte Carlo simulation over scenario maps.
//!
//! Each iteration perturbs every scenario entry by a normally
//! distributed factor (mean 1, stddev = that entry's uncertainty),
//! regenerates the cash-flow series and records NPV, IRR and payback.
//! Iterations are independent, so the run is rayon-parallel, and each
//! iteration derives its RNG from the configured seed plus its index,
//! making results reproducible regardless of thread count.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use viability_core::stats;
use viability_model::valuation::{irr, npv, payback_period};

use crate::scenario::{
    generate_cash_flows, scenario_value, Scenario, DEFAULT_DISCOUNT_RATE, KEY_DISCOUNT_RATE,
};

/// Iteration count used when the caller does not specify one.
pub const DEFAULT_ITERATIONS: usize = 10_000;
/// Hard iteration cap.
pub const MAX_ITERATIONS: usize = 1_000_000;
/// Uncertainty applied to scenario entries absent from the uncertainty map.
pub const DEFAULT_UNCERTAINTY: f64 = 0.1;
/// Lower clamp on the perturbation factor; rules out sign flips and
/// extreme left-tail draws.
pub const FACTOR_FLOOR: f64 = 0.1;

/// Configuration error for the Monte Carlo engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Iteration count outside `[1, MAX_ITERATIONS]`.
    #[error("invalid iteration count {0}: must be in range [1, {MAX_ITERATIONS}]")]
    InvalidIterationCount(usize),
}

/// Immutable Monte Carlo run configuration.
///
/// Use [`MonteCarloConfig::builder`] to construct instances.
///
/// # Examples
///
/// ```
/// use viability_risk::MonteCarloConfig;
///
/// let config = MonteCarloConfig::builder()
///     .iterations(5_000)
///     .seed(42)
///     .build()
///     .expect("valid configuration");
///
/// assert_eq!(config.iterations(), 5_000);
/// assert_eq!(config.seed(), Some(42));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonteCarloConfig {
    iterations: usize,
    seed: Option<u64>,
}

impl MonteCarloConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> MonteCarloConfigBuilder {
        MonteCarloConfigBuilder::default()
    }

    /// Number of iterations to run.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Seed for reproducible runs; `None` draws from entropy.
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 || self.iterations > MAX_ITERATIONS {
            return Err(ConfigError::InvalidIterationCount(self.iterations));
        }
        Ok(())
    }
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            seed: None,
        }
    }
}

/// Builder for [`MonteCarloConfig`].
#[derive(Debug, Clone, Default)]
pub struct MonteCarloConfigBuilder {
    iterations: Option<usize>,
    seed: Option<u64>,
}

impl MonteCarloConfigBuilder {
    /// Sets the iteration count, in `[1, MAX_ITERATIONS]`.
    pub fn iterations(mut self, iterations: usize) -> Self {
        self.iterations = Some(iterations);
        self
    }

    /// Sets the seed for reproducibility.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the iteration count is out of range.
    pub fn build(self) -> Result<MonteCarloConfig, ConfigError> {
        let config = MonteCarloConfig {
            iterations: self.iterations.unwrap_or(DEFAULT_ITERATIONS),
            seed: self.seed,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Outcome of a single simulated scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McIteration {
    /// 1-based iteration number.
    pub iteration: usize,
    /// Net present value of the simulated series.
    pub npv: f64,
    /// Internal rate of return; `None` when the solve did not converge.
    pub irr: Option<f64>,
    /// Payback period in years; `None` when never reached.
    pub payback: Option<f64>,
}

/// Percentiles of the simulated NPV distribution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Percentiles {
    /// 5th percentile.
    pub p5: f64,
    /// 25th percentile.
    pub p25: f64,
    /// 75th percentile.
    pub p75: f64,
    /// 95th percentile.
    pub p95: f64,
}

/// Summary statistics of the simulated NPV distribution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McStatistics {
    /// Arithmetic mean.
    pub mean: f64,
    /// Median of the ascending sort.
    pub median: f64,
    /// Population standard deviation.
    pub standard_deviation: f64,
    /// Distribution percentiles.
    pub percentiles: Percentiles,
}

/// Full Monte Carlo result set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonteCarloAnalysis {
    /// Number of iterations run.
    pub iterations: usize,
    /// Per-iteration outcomes, in iteration order.
    pub results: Vec<McIteration>,
    /// NPV distribution statistics.
    pub statistics: McStatistics,
}

/// One standard normal deviate via the Box-Muller transform.
fn normal_factor(rng: &mut StdRng, mean: f64, std_dev: f64) -> f64 {
    // Guard u1 away from zero so ln() stays finite.
    let u1: f64 = rng.gen::<f64>().max(f64::MIN_POSITIVE);
    let u2: f64 = rng.gen();
    let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    mean + z * std_dev
}

fn simulate_iteration(
    base: &Scenario,
    uncertainties: &BTreeMap<String, f64>,
    rng: &mut StdRng,
) -> Scenario {
    base.iter()
        .map(|(key, &value)| {
            let uncertainty = uncertainties.get(key).copied().unwrap_or(DEFAULT_UNCERTAINTY);
            let factor = normal_factor(rng, 1.0, uncertainty).max(FACTOR_FLOOR);
            (key.clone(), value * factor)
        })
        .collect()
}

/// Run the simulation.
///
/// Every entry of `base` is perturbed each iteration; entries absent
/// from `uncertainties` use [`DEFAULT_UNCERTAINTY`]. An uncertainty of
/// zero pins that entry to its base value.
///
/// Returns `None` when `cancelled` reports true before the run
/// completes; partial results are discarded. `cancelled` is polled once
/// per iteration.
pub fn run_monte_carlo(
    base: &Scenario,
    uncertainties: &BTreeMap<String, f64>,
    config: &MonteCarloConfig,
    cancelled: &(impl Fn() -> bool + Sync),
) -> Option<MonteCarloAnalysis> {
    let iterations = config.iterations();
    tracing::debug!(iterations, seed = ?config.seed(), "starting monte carlo run");

    let results: Option<Vec<McIteration>> = (0..iterations)
        .into_par_iter()
        .map(|i| {
            if cancelled() {
                return None;
            }

            let mut rng = match config.seed() {
                Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(i as u64)),
                None => StdRng::from_entropy(),
            };

            let scenario = simulate_iteration(base, uncertainties, &mut rng);
            let cash_flows = generate_cash_flows(&scenario);
            let discount_rate =
                scenario_value(&scenario, KEY_DISCOUNT_RATE, DEFAULT_DISCOUNT_RATE);

            Some(McIteration {
                iteration: i + 1,
                npv: npv(&cash_flows, discount_rate),
                irr: irr(&cash_flows),
                payback: payback_period(&cash_flows),
            })
        })
        .collect();

    let results = match results {
        Some(results) => results,
        None => {
            tracing::debug!("monte carlo run cancelled");
            return None;
        }
    };

    let mut npvs: Vec<f64> = results.iter().map(|r| r.npv).collect();
    npvs.sort_by(|a, b| a.total_cmp(b));

    let statistics = McStatistics {
        mean: stats::mean(&npvs),
        median: stats::median_sorted(&npvs),
        standard_deviation: stats::population_std_dev(&npvs),
        percentiles: Percentiles {
            p5: stats::percentile_sorted(&npvs, 0.05),
            p25: stats::percentile_sorted(&npvs, 0.25),
            p75: stats::percentile_sorted(&npvs, 0.75),
            p95: stats::percentile_sorted(&npvs, 0.95),
        },
    };

    Some(MonteCarloAnalysis {
        iterations,
        results,
        statistics,
    })
}
