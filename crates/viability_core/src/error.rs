//! Error types for structured error handling.
//!
//! This module provides:
//! - `SolverError`: Errors from the root-finding solver
//!
//! Domain sentinels (IRR non-convergence, payback never reached) are
//! deliberately *not* errors; higher layers express them as `Option`.

use thiserror::Error;

/// Root-finding solver errors.
///
/// Provides structured error handling for solver operations with
/// descriptive context for each failure mode.
///
/// # Variants
/// - `MaxIterationsExceeded`: Solver failed to converge within iteration limit
/// - `DerivativeNearZero`: Derivative too small for Newton-Raphson
/// - `NumericalInstability`: General numerical instability
///
/// # Examples
/// ```
/// use viability_core::error::SolverError;
///
/// let err = SolverError::MaxIterationsExceeded { iterations: 1000 };
/// assert!(format!("{}", err).contains("1000 iterations"));
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// Solver failed to converge within maximum iterations.
    #[error("Failed to converge after {iterations} iterations")]
    MaxIterationsExceeded {
        /// Number of iterations attempted
        iterations: usize,
    },

    /// Derivative near zero (division by zero risk in Newton-Raphson).
    #[error("Derivative near zero at x = {x}")]
    DerivativeNearZero {
        /// The x value where the derivative vanished
        x: f64,
    },

    /// Numerical instability during computation.
    #[error("Numerical instability: {0}")]
    NumericalInstability(String),
}
