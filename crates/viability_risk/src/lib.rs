//! # viability_risk: Stochastic Risk Layer
//!
//! Monte Carlo simulation and univariate sensitivity analysis over the
//! deterministic cash-flow model:
//!
//! - `scenario` — the flat scenario map and its cash-flow generator
//! - `monte_carlo` — builder-configured, rayon-parallel, cancellable
//!   simulation with NPV distribution statistics
//! - `sensitivity` — per-variable sweeps plus tornado and spider series
//!
//! Simulations are deterministic under a fixed seed regardless of the
//! rayon thread count, and abort cooperatively when the caller's
//! generation counter moves on.

pub mod monte_carlo;
pub mod scenario;
pub mod sensitivity;

pub use monte_carlo::{
    run_monte_carlo, ConfigError, McIteration, McStatistics, MonteCarloAnalysis, MonteCarloConfig,
    MonteCarloConfigBuilder, Percentiles,
};
pub use scenario::{generate_cash_flows, Scenario};
pub use sensitivity::{
    sensitivity_analysis, SensitivityAnalysis, SensitivityPoint, SpiderSeries, TornadoEntry,
};
