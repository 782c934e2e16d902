//! # viability_pipeline: Analysis Orchestration
//!
//! Ties the deterministic model and the risk layer together:
//!
//! - `input` — the JSON input document and its validation
//! - `output` — the published result set and scenario presets
//! - `compute` — the synchronous `compute(input) -> output` pipeline
//! - `orchestrator` — debounced background recomputation with
//!   supersession and atomic replace-on-success publishing
//! - `error` — [`EngineError`]
//!
//! `compute` is pure: same input, same output (up to Monte Carlo
//! seeding). All interactivity concerns live in the orchestrator.

pub mod compute;
pub mod error;
pub mod input;
pub mod orchestrator;
pub mod output;

pub use compute::{compute, compute_with_cancel};
pub use error::EngineError;
pub use input::{AnalysisOptions, ClubProfile, EngineInput, MarketSpec};
pub use orchestrator::Orchestrator;
pub use output::{EngineOutput, PresetOutcome, ScenarioPresets};
