//! # viability_core: Foundation for the Facility Viability Engine
//!
//! ## Layer 1 (Foundation) Role
//!
//! viability_core is the bottom layer of the workspace, providing:
//! - Root-finding for internal-rate-of-return computation (`solver`)
//! - Descriptive statistics for simulation output (`stats`)
//! - Jurisdiction registry and built-in market profiles (`market`)
//! - Error types: `SolverError` (`error`)
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on other viability_* crates, with minimal
//! external dependencies:
//! - num-traits: Traits for generic numerical computation
//! - serde: Serialisation of market profiles
//! - tracing: Jurisdiction fallback diagnostics
//!
//! ## Usage Examples
//!
//! ```rust
//! use viability_core::market::{Jurisdiction, MarketAssumptions};
//! use viability_core::stats;
//!
//! let market = MarketAssumptions::brazil();
//! assert_eq!(market.jurisdiction(), Jurisdiction::Brazil);
//!
//! let mean = stats::mean(&[1.0, 2.0, 3.0]);
//! assert!((mean - 2.0).abs() < 1e-12);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod error;
pub mod market;
pub mod solver;
pub mod stats;

pub use error::SolverError;
pub use market::{Jurisdiction, MarketAssumptions};
pub use solver::{NewtonRaphsonSolver, SolverConfig};
