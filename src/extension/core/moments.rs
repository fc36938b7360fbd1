//! Sample moments in log space.
//!
//! Purpose
//! -------
//! Provide the mean and unbiased sample variance used by every MOVE
//! statistic, with the degenerate-length policy Bulletin 17C record
//! extension relies on: the variance of a length-1 window is defined to be
//! zero (so short extension windows surface as undefined variants through a
//! zero denominator downstream, rather than dividing by zero here).
//!
//! Conventions
//! -----------
//! - Inputs are log10-transformed flow vectors; these helpers are agnostic
//!   to that but every caller in this crate passes log-space values.
//! - Variance uses the unbiased (n − 1) denominator throughout.
//! - Empty input is a caller bug, not a data condition: public entry points
//!   guard window sizes before calling in here.

use ndarray::ArrayView1;

/// Arithmetic mean of a sequence.
///
/// Parameters
/// ----------
/// - `values`: `ArrayView1<f64>`
///   Input sequence. Must be non-empty; callers guard this.
///
/// Returns
/// -------
/// `f64`
///   The sample mean.
///
/// Panics
/// ------
/// - Does not panic, but returns NaN for empty input (0/0). Public entry
///   points never pass an empty view.
#[inline]
pub fn mean(values: ArrayView1<'_, f64>) -> f64 {
    values.sum() / values.len() as f64
}

/// Unbiased sample variance with the record-extension degenerate policy.
///
/// Parameters
/// ----------
/// - `values`: `ArrayView1<f64>`
///   Input sequence. Must be non-empty.
///
/// Returns
/// -------
/// `f64`
///   `Σ(vᵢ − v̄)² / (n − 1)` for n ≥ 2, and exactly `0.0` for n == 1.
///
/// Panics
/// ------
/// - Panics (assert) on empty input; a window of length zero is a logic
///   error that public entry points rule out before calling.
#[inline]
pub fn variance(values: ArrayView1<'_, f64>) -> f64 {
    assert!(!values.is_empty(), "variance of an empty sequence is undefined");
    let n = values.len();
    if n == 1 {
        return 0.0;
    }
    let center = mean(values);
    values.iter().map(|&v| (v - center).powi(2)).sum::<f64>() / (n - 1) as f64
}
