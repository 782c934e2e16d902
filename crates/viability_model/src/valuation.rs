//! Valuation core: NPV, IRR, payback, ROI, DCF enterprise value.
//!
//! All functions operate on a cash-flow series where index 0 is the
//! (negative) initial investment and indices 1..N are net operating
//! cash flows for years 1..N. Non-convergence and never-reached
//! conditions are sentinels (`None`), not errors; callers branch on
//! them before formatting.

use serde::{Deserialize, Serialize};
use viability_core::solver::{NewtonRaphsonSolver, SolverConfig};

/// Initial guess for the IRR Newton iteration.
pub const IRR_INITIAL_GUESS: f64 = 0.10;
/// Convergence tolerance on `|NPV|` for the IRR solve.
pub const IRR_TOLERANCE: f64 = 1e-6;
/// Iteration budget for the IRR solve.
pub const IRR_MAX_ITERATIONS: usize = 1000;
/// Default terminal growth rate for the DCF perpetuity.
pub const DEFAULT_TERMINAL_GROWTH: f64 = 0.02;

/// Net present value of `cash_flows` at `rate`.
///
/// `NPV(flows, rate) = Σ flows[i] / (1 + rate)^i`. At `rate == 0` this
/// is the plain sum of the flows.
///
/// # Examples
///
/// ```
/// use viability_model::valuation::npv;
///
/// assert_eq!(npv(&[-100.0, 60.0, 60.0, 60.0], 0.0), 80.0);
/// ```
pub fn npv(cash_flows: &[f64], rate: f64) -> f64 {
    cash_flows
        .iter()
        .enumerate()
        .map(|(i, cf)| cf / (1.0 + rate).powi(i as i32))
        .sum()
}

/// Derivative of NPV with respect to the rate:
/// `Σ −i·flows[i] / (1 + r)^(i+1)`.
fn npv_derivative(cash_flows: &[f64], rate: f64) -> f64 {
    cash_flows
        .iter()
        .enumerate()
        .map(|(i, cf)| -(i as f64) * cf / (1.0 + rate).powi(i as i32 + 1))
        .sum()
}

/// Internal rate of return via Newton-Raphson on `NPV(r) = 0`.
///
/// Starts at [`IRR_INITIAL_GUESS`], converges when `|NPV| <`
/// [`IRR_TOLERANCE`]. Returns `None` on non-convergence, including a
/// vanished derivative at any iterate; never panics or raises.
///
/// # Examples
///
/// ```
/// use viability_model::valuation::{irr, npv};
///
/// let flows = [-100.0, 50.0, 50.0, 50.0, 50.0];
/// let rate = irr(&flows).unwrap();
/// assert!((rate - 0.3490).abs() < 1e-3);
/// assert!(npv(&flows, rate).abs() < 1e-6);
/// ```
pub fn irr(cash_flows: &[f64]) -> Option<f64> {
    let solver = NewtonRaphsonSolver::new(SolverConfig::new(IRR_TOLERANCE, IRR_MAX_ITERATIONS));
    solver
        .find_root(
            |r| npv(cash_flows, r),
            |r| npv_derivative(cash_flows, r),
            IRR_INITIAL_GUESS,
        )
        .ok()
}

/// Payback period in years, linearly interpolated inside the crossing year.
///
/// Walks the cumulative sum; at the first index where it turns
/// non-negative, returns `index + |previous cumulative| / flows[index]`.
/// Returns `None` when the cumulative sum never turns non-negative
/// within the series. The interpolation is skipped (the bare index is
/// returned) when the crossing year's flow is not positive, so a
/// degenerate all-zero series yields 0 rather than NaN.
pub fn payback_period(cash_flows: &[f64]) -> Option<f64> {
    let mut cumulative = 0.0;

    for (i, &cf) in cash_flows.iter().enumerate() {
        cumulative += cf;
        if cumulative >= 0.0 {
            let previous = cumulative - cf;
            if cf > 0.0 {
                return Some(i as f64 + previous.abs() / cf);
            }
            return Some(i as f64);
        }
    }

    None
}

/// Return on investment: `(final_sum − initial) / initial`.
///
/// Returns 0.0 when `initial` is zero (divide-by-zero guard).
pub fn roi(initial_investment: f64, final_value: f64) -> f64 {
    if initial_investment == 0.0 {
        return 0.0;
    }
    (final_value - initial_investment) / initial_investment
}

/// First year index at which cumulative cash flow (including the year-0
/// investment) turns non-negative; 0 when never reached within the
/// horizon.
pub fn break_even_point(cash_flows: &[f64]) -> usize {
    let mut cumulative = 0.0;
    for (i, &cf) in cash_flows.iter().enumerate() {
        cumulative += cf;
        if cumulative >= 0.0 {
            return i;
        }
    }
    0
}

/// Discounted-cash-flow valuation result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DcfValuation {
    /// Present value of the explicit flows (indices 1..).
    pub pv_explicit: f64,
    /// Present value of the terminal perpetuity.
    pub pv_terminal: f64,
    /// Explicit PV plus terminal PV.
    pub enterprise_value: f64,
}

/// DCF enterprise valuation with a perpetuity-growth terminal value.
///
/// The explicit present value discounts `cash_flows[1..]` by their
/// index; the terminal value grows the last flow by
/// `terminal_growth_rate` and capitalises it at
/// `discount_rate − terminal_growth_rate`, discounted back by
/// `len − 1` periods.
///
/// # Precondition
///
/// `discount_rate > terminal_growth_rate`. The function does not guard
/// this: capping or clamping here would silently hide a modelling
/// error, so the caller validates before invoking.
pub fn dcf_valuation(
    cash_flows: &[f64],
    terminal_growth_rate: f64,
    discount_rate: f64,
) -> DcfValuation {
    let pv_explicit: f64 = cash_flows
        .iter()
        .enumerate()
        .skip(1)
        .map(|(i, cf)| cf / (1.0 + discount_rate).powi(i as i32))
        .sum();

    let pv_terminal = if cash_flows.len() > 1 {
        let last = cash_flows[cash_flows.len() - 1];
        let terminal_cf = last * (1.0 + terminal_growth_rate);
        let terminal_value = terminal_cf / (discount_rate - terminal_growth_rate);
        terminal_value / (1.0 + discount_rate).powi(cash_flows.len() as i32 - 1)
    } else {
        0.0
    };

    DcfValuation {
        pv_explicit,
        pv_terminal,
        enterprise_value: pv_explicit + pv_terminal,
    }
}

/// Combined viability metrics for one cash-flow series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViabilityMetrics {
    /// Net present value at the market discount rate.
    pub npv: f64,
    /// Internal rate of return; `None` when the solve did not converge.
    pub irr: Option<f64>,
    /// Return on investment over the full horizon.
    pub roi: f64,
    /// Interpolated payback period in years; `None` when never reached.
    pub payback_period: Option<f64>,
    /// First break-even year index; 0 when not reached within the horizon.
    pub break_even_point: usize,
    /// DCF enterprise value.
    pub enterprise_value: f64,
    /// Present value of the terminal perpetuity.
    pub terminal_value: f64,
}

/// Compute the full viability metric set for a cash-flow series.
///
/// # Precondition
///
/// `discount_rate > terminal_growth_rate` (see [`dcf_valuation`]).
pub fn viability_metrics(
    cash_flows: &[f64],
    discount_rate: f64,
    terminal_growth_rate: f64,
) -> ViabilityMetrics {
    let initial = cash_flows.first().copied().unwrap_or(0.0).abs();
    let final_sum: f64 = cash_flows.iter().skip(1).sum();
    let dcf = dcf_valuation(cash_flows, terminal_growth_rate, discount_rate);

    ViabilityMetrics {
        npv: npv(cash_flows, discount_rate),
        irr: irr(cash_flows),
        roi: roi(initial, final_sum),
        payback_period: payback_period(cash_flows),
        break_even_point: break_even_point(cash_flows),
        enterprise_value: dcf.enterprise_value,
        terminal_value: dcf.pv_terminal,
    }
}

/// Depreciation schedule shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepreciationMethod {
    /// Equal annual charge over the useful life.
    StraightLine,
    /// Double-declining balance: `2 / useful_life` of the current value.
    DecliningBalance,
}

/// First-year depreciation charge for an asset. Returns 0.0 for a zero
/// useful life.
pub fn annual_depreciation(asset_value: f64, useful_life_years: f64, method: DepreciationMethod) -> f64 {
    if useful_life_years == 0.0 {
        return 0.0;
    }
    match method {
        DepreciationMethod::StraightLine => asset_value / useful_life_years,
        DepreciationMethod::DecliningBalance => asset_value * (2.0 / useful_life_years),
    }
}

/// Constant monthly loan payment (PMT) for `principal` at `annual_rate`
/// over `years`. A zero rate degenerates to straight amortisation.
pub fn loan_payment(principal: f64, annual_rate: f64, years: u32) -> f64 {
    let monthly_rate = annual_rate / 12.0;
    let num_payments = f64::from(years) * 12.0;

    if num_payments == 0.0 {
        return 0.0;
    }
    if monthly_rate == 0.0 {
        return principal / num_payments;
    }

    let factor = (1.0 + monthly_rate).powf(num_payments);
    principal * (monthly_rate * factor) / (factor - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_npv_at_zero_rate_is_plain_sum() {
        assert_relative_eq!(npv(&[-100.0, 60.0, 60.0, 60.0], 0.0), 80.0);
    }

    #[test]
    fn test_npv_discounts_by_index() {
        // -100 + 110/1.1 = 0
        assert_relative_eq!(npv(&[-100.0, 110.0], 0.10), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_irr_reference_scenario() {
        // -100 followed by four 50s roots at ~34.90 %; the residual
        // check is the governing property, the literal pins the root.
        let flows = [-100.0, 50.0, 50.0, 50.0, 50.0];
        let rate = irr(&flows).expect("should converge");
        assert!((rate - 0.3490).abs() < 1e-3, "IRR = {rate}");
        assert!(npv(&flows, rate).abs() < IRR_TOLERANCE);
    }

    #[test]
    fn test_irr_residual_within_tolerance() {
        let flows = [-250.0, 100.0, 100.0, 100.0];
        if let Some(rate) = irr(&flows) {
            assert!(npv(&flows, rate).abs() < IRR_TOLERANCE);
        } else {
            panic!("expected convergence for a well-behaved series");
        }
    }

    #[test]
    fn test_irr_non_convergence_is_sentinel() {
        // All-positive flows have no root: NPV > 0 for every r > -1.
        assert_eq!(irr(&[100.0, 50.0, 50.0]), None);
    }

    #[test]
    fn test_irr_zero_derivative_is_sentinel() {
        // A single flow has a constant NPV, so the derivative is zero.
        assert_eq!(irr(&[-100.0]), None);
    }

    #[test]
    fn test_payback_interpolates_within_crossing_year() {
        // Cumulative: -100, -40, +20 → crossing in year 2,
        // interpolated at 2 + 40/60.
        let payback = payback_period(&[-100.0, 60.0, 60.0, 60.0]).unwrap();
        assert_relative_eq!(payback, 2.0 + 40.0 / 60.0, epsilon = 1e-12);
    }

    #[test]
    fn test_payback_never_reached_is_sentinel() {
        assert_eq!(payback_period(&[-100.0, 10.0, 10.0]), None);
    }

    #[test]
    fn test_payback_all_zero_series_is_zero_not_nan() {
        let payback = payback_period(&[0.0, 0.0, 0.0]).unwrap();
        assert_eq!(payback, 0.0);
    }

    #[test]
    fn test_roi() {
        assert_relative_eq!(roi(100.0, 180.0), 0.8);
        assert_eq!(roi(0.0, 500.0), 0.0);
    }

    #[test]
    fn test_break_even_point() {
        assert_eq!(break_even_point(&[-100.0, 60.0, 60.0]), 2);
        // Never reached within the horizon reports 0.
        assert_eq!(break_even_point(&[-100.0, 10.0]), 0);
    }

    #[test]
    fn test_dcf_valuation_explicit_and_terminal() {
        let flows = [-100.0, 50.0, 50.0];
        let dcf = dcf_valuation(&flows, 0.02, 0.10);

        let expected_explicit = 50.0 / 1.10 + 50.0 / 1.10_f64.powi(2);
        assert_relative_eq!(dcf.pv_explicit, expected_explicit, epsilon = 1e-9);

        let terminal_value = 50.0 * 1.02 / (0.10 - 0.02);
        let expected_terminal = terminal_value / 1.10_f64.powi(2);
        assert_relative_eq!(dcf.pv_terminal, expected_terminal, epsilon = 1e-9);
        assert_relative_eq!(
            dcf.enterprise_value,
            dcf.pv_explicit + dcf.pv_terminal,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_dcf_single_flow_has_no_terminal() {
        let dcf = dcf_valuation(&[-100.0], 0.02, 0.10);
        assert_eq!(dcf.pv_terminal, 0.0);
        assert_eq!(dcf.enterprise_value, 0.0);
    }

    #[test]
    fn test_viability_metrics_composition() {
        let flows = [-100.0, 50.0, 50.0, 50.0, 50.0];
        let metrics = viability_metrics(&flows, 0.10, 0.02);

        assert_relative_eq!(metrics.npv, npv(&flows, 0.10), epsilon = 1e-12);
        assert!(metrics.irr.is_some());
        assert_relative_eq!(metrics.roi, (200.0 - 100.0) / 100.0);
        assert_eq!(metrics.break_even_point, 2);
        assert!(metrics.enterprise_value > 0.0);
    }

    #[test]
    fn test_viability_metrics_sentinels_serialize_as_null() {
        let metrics = viability_metrics(&[-100.0, 1.0], 0.10, 0.02);
        let json = serde_json::to_value(&metrics).unwrap();
        assert!(json["irr"].is_null());
        assert!(json["paybackPeriod"].is_null());
    }

    #[test]
    fn test_depreciation_methods() {
        assert_relative_eq!(
            annual_depreciation(100_000.0, 10.0, DepreciationMethod::StraightLine),
            10_000.0
        );
        assert_relative_eq!(
            annual_depreciation(100_000.0, 10.0, DepreciationMethod::DecliningBalance),
            20_000.0
        );
        assert_eq!(
            annual_depreciation(100_000.0, 0.0, DepreciationMethod::StraightLine),
            0.0
        );
    }

    #[test]
    fn test_loan_payment() {
        // Zero rate amortises linearly.
        assert_relative_eq!(loan_payment(120_000.0, 0.0, 10), 1_000.0);
        // Positive rate costs more than linear amortisation.
        let pmt = loan_payment(120_000.0, 0.06, 10);
        assert!(pmt > 1_000.0);
        assert!(pmt < 2_000.0);
    }

    proptest! {
        // NPV at rate zero equals the plain sum for any series.
        #[test]
        fn prop_npv_zero_rate_is_sum(flows in proptest::collection::vec(-1e6f64..1e6, 1..20)) {
            let sum: f64 = flows.iter().sum();
            let tolerance = 1e-9 * (1.0 + sum.abs());
            prop_assert!((npv(&flows, 0.0) - sum).abs() < tolerance);
        }

        // When IRR converges, the NPV residual at that rate is within
        // tolerance.
        #[test]
        fn prop_irr_residual(initial in 50.0f64..500.0, inflow in 10.0f64..400.0) {
            let flows = [-initial, inflow, inflow, inflow];
            if let Some(rate) = irr(&flows) {
                prop_assert!(npv(&flows, rate).abs() < IRR_TOLERANCE);
            }
        }

        // Payback is monotonically non-decreasing in the magnitude of the
        // initial investment when subsequent flows are fixed and positive.
        #[test]
        fn prop_payback_monotone_in_investment(
            smaller in 10.0f64..200.0,
            extra in 0.0f64..100.0,
        ) {
            let inflows = [40.0, 40.0, 40.0, 40.0, 40.0, 40.0, 40.0, 40.0];
            let mut flows_small = vec![-smaller];
            flows_small.extend_from_slice(&inflows);
            let mut flows_large = vec![-(smaller + extra)];
            flows_large.extend_from_slice(&inflows);

            let p_small = payback_period(&flows_small);
            let p_large = payback_period(&flows_large);
            if let (Some(a), Some(b)) = (p_small, p_large) {
                prop_assert!(b >= a - 1e-12);
            }
        }
    }
}
