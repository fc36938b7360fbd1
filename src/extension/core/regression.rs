//! Regression core: OLS slope and the log-space correlation measure.
//!
//! Purpose
//! -------
//! Implement the two concurrent-period regression quantities of Bulletin
//! 17C chapter 8: the ordinary-least-squares slope β̂ (eq. 8-10) of the
//! short record on the long record, and the implied correlation ρ̂
//! (eq. 8-9) that both effective-length formulas consume.
//!
//! Key behaviors
//! -------------
//! - [`ols_slope`] accumulates Σ(xᵢ − x̄)(yᵢ − ȳ) and Σ(xᵢ − x̄)² in one
//!   pass and fails with [`MoveError::DegenerateRegression`] when the long
//!   record is constant over the concurrent window.
//! - [`log_correlation`] forms ρ̂ = β̂ · s_x / s_y. It is deliberately NOT
//!   clipped to [−1, 1]: pathological inputs can push it outside that range
//!   (or to NaN/∞ when the short record is constant), and the value is
//!   reported as a diagnostic rather than raised as an error — downstream
//!   effective-length arithmetic tolerates it and ends in an undefined
//!   variant where it matters.
//!
//! Conventions
//! -----------
//! - `x` is the concurrent long record, `y` the concurrent short record,
//!   both in log10 space and of equal length n1 ≥ 2 (enforced upstream by
//!   alignment).
//! - Means are passed in rather than recomputed; callers already hold them
//!   from [`AlignedPair`].
//!
//! [`AlignedPair`]: crate::extension::core::align::AlignedPair

use crate::extension::errors::{MoveError, MoveResult};
use ndarray::ArrayView1;

/// Ordinary-least-squares slope of `y` on `x` (Bulletin 17C eq. 8-10).
///
/// Parameters
/// ----------
/// - `x`: `ArrayView1<f64>`
///   Concurrent long-record values in log space.
/// - `y`: `ArrayView1<f64>`
///   Concurrent short-record values in log space; same length as `x`.
/// - `xbar1`, `ybar1`: `f64`
///   Sample means of `x` and `y`.
///
/// Returns
/// -------
/// `MoveResult<f64>`
///   - `Ok(beta_hat)` with β̂ = Σ(xᵢ − x̄)(yᵢ − ȳ) / Σ(xᵢ − x̄)².
///   - `Err(MoveError::DegenerateRegression)` when Σ(xᵢ − x̄)² == 0, i.e.
///     every concurrent long value is identical.
///
/// Panics
/// ------
/// - Debug-asserts equal lengths; alignment guarantees this.
pub fn ols_slope(
    x: ArrayView1<'_, f64>, y: ArrayView1<'_, f64>, xbar1: f64, ybar1: f64,
) -> MoveResult<f64> {
    debug_assert_eq!(x.len(), y.len());

    let mut top = 0.0;
    let mut bottom = 0.0;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        top += (xi - xbar1) * (yi - ybar1);
        bottom += (xi - xbar1).powi(2);
    }

    if bottom == 0.0 {
        return Err(MoveError::DegenerateRegression);
    }
    Ok(top / bottom)
}

/// Implied log-space correlation ρ̂ = β̂ · s_x / s_y (Bulletin 17C eq. 8-9).
///
/// Not clipped to [−1, 1]; see the module docs for the diagnostic-only
/// policy on out-of-range and non-finite values.
#[inline]
pub fn log_correlation(beta_hat: f64, s_sq_x1: f64, s_sq_y1: f64) -> f64 {
    beta_hat * (s_sq_x1.sqrt() / s_sq_y1.sqrt())
}
