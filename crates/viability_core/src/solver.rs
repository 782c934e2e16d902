//! Newton-Raphson root-finding solver.
//!
//! Used by the valuation layer to solve `NPV(r) = 0` for the internal
//! rate of return, but written generically over any differentiable
//! scalar function.

use crate::error::SolverError;
use num_traits::Float;

/// Solver configuration with tolerance and iteration budget.
///
/// # Examples
///
/// ```
/// use viability_core::solver::SolverConfig;
///
/// let config: SolverConfig<f64> = SolverConfig::default();
/// assert_eq!(config.max_iterations, 1000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig<T: Float> {
    /// Convergence tolerance on `|f(x)|`.
    pub tolerance: T,
    /// Maximum number of Newton iterations.
    pub max_iterations: usize,
}

impl<T: Float> SolverConfig<T> {
    /// Create a new configuration.
    pub fn new(tolerance: T, max_iterations: usize) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }
}

impl<T: Float> Default for SolverConfig<T> {
    fn default() -> Self {
        Self {
            tolerance: T::from(1e-6).unwrap(),
            max_iterations: 1000,
        }
    }
}

/// Newton-Raphson root finder.
///
/// Uses Newton's method: `x_{n+1} = x_n - f(x_n) / f'(x_n)` for fast
/// quadratic convergence on smooth functions.
///
/// # Convergence
///
/// Newton-Raphson converges quadratically near a root, but may fail if:
/// - The derivative is near zero
/// - The initial guess is far from the root
/// - The function has discontinuities
///
/// A final convergence check runs after the iteration budget is spent,
/// so a root reached on the very last update is still reported.
///
/// # Example
///
/// ```
/// use viability_core::solver::{NewtonRaphsonSolver, SolverConfig};
///
/// // Solve x² - 2 = 0 (find √2)
/// let solver = NewtonRaphsonSolver::new(SolverConfig::default());
///
/// let f = |x: f64| x * x - 2.0;
/// let f_prime = |x: f64| 2.0 * x;
///
/// let root = solver.find_root(f, f_prime, 1.0).unwrap();
/// assert!((root - std::f64::consts::SQRT_2).abs() < 1e-6);
/// ```
#[derive(Debug, Clone)]
pub struct NewtonRaphsonSolver<T: Float> {
    config: SolverConfig<T>,
}

impl<T: Float> NewtonRaphsonSolver<T> {
    /// Create a new solver with the given configuration.
    pub fn new(config: SolverConfig<T>) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: SolverConfig::default(),
        }
    }

    /// Find a root of `f` using explicit derivative `f_prime`.
    ///
    /// # Arguments
    ///
    /// * `f` - Function to find a root of
    /// * `f_prime` - Derivative of `f`
    /// * `x0` - Initial guess
    ///
    /// # Returns
    ///
    /// * `Ok(x)` - Root where `|f(x)| < tolerance`
    /// * `Err(SolverError::MaxIterationsExceeded)` - Failed to converge
    /// * `Err(SolverError::DerivativeNearZero)` - Derivative too small
    /// * `Err(SolverError::NumericalInstability)` - Iterate became non-finite
    pub fn find_root<F, G>(&self, f: F, f_prime: G, x0: T) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
        G: Fn(T) -> T,
    {
        let mut x = x0;
        let epsilon = T::from(1e-30).unwrap();

        for _iteration in 0..self.config.max_iterations {
            let f_val = f(x);

            if f_val.abs() < self.config.tolerance {
                return Ok(x);
            }

            let f_prime_val = f_prime(x);

            if f_prime_val.abs() < epsilon {
                return Err(SolverError::DerivativeNearZero {
                    x: x.to_f64().unwrap_or(f64::NAN),
                });
            }

            x = x - f_val / f_prime_val;

            if !x.is_finite() {
                return Err(SolverError::NumericalInstability(
                    "Newton iteration produced non-finite value".to_string(),
                ));
            }
        }

        // The last update is not re-checked inside the loop.
        if f(x).abs() < self.config.tolerance {
            return Ok(x);
        }

        Err(SolverError::MaxIterationsExceeded {
            iterations: self.config.max_iterations,
        })
    }

    /// Returns a reference to the solver configuration.
    pub fn config(&self) -> &SolverConfig<T> {
        &self.config
    }
}
