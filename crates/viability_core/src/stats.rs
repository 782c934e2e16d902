//! Descriptive statistics for simulation output.
//!
//! Small, allocation-free helpers used by the risk layer to aggregate
//! Monte Carlo distributions. All functions return 0.0 on empty input
//! rather than NaN, matching the engine-wide divide-by-zero policy.

/// Arithmetic mean. Returns 0.0 for an empty slice.
///
/// # Examples
///
/// ```
/// let m = viability_core::stats::mean(&[1.0, 2.0, 3.0, 4.0]);
/// assert!((m - 2.5).abs() < 1e-12);
/// ```
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation. Returns 0.0 for an empty slice.
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Median of an ascending-sorted slice, taken as `values[n / 2]`.
///
/// The caller is responsible for sorting; the risk layer sorts its NPV
/// distribution once and reads the median and all percentiles from it.
pub fn median_sorted(sorted: &[f64]) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    sorted[sorted.len() / 2]
}

/// Percentile of an ascending-sorted slice at `p` in `[0, 1]`.
///
/// Uses the index rule `floor(n × p)`, clamped to the last element.
///
/// # Examples
///
/// ```
/// let sorted: Vec<f64> = (0..100).map(f64::from).collect();
/// assert_eq!(viability_core::stats::percentile_sorted(&sorted, 0.95), 95.0);
/// ```
pub fn percentile_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((sorted.len() as f64 * p).floor() as usize).min(sorted.len() - 1);
    sorted[idx]
}
