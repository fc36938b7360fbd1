//! Time alignment of a short record against a long reference record.
//!
//! Purpose
//! -------
//! Partition a long-record gage into the period it shares with a short
//! record (the concurrent period, which drives the regression) and the
//! period only it observed (the additional period, available for
//! borrowing), and carry the log-space value vectors and sample means every
//! MOVE statistic starts from.
//!
//! Key behaviors
//! -------------
//! - [`AlignedPair::new`] intersects and differences the two key sets in
//!   one pass over the long record, preserving the long record's
//!   chronological order in both partitions.
//! - Values are log10-transformed here, once; everything downstream works
//!   in log space until the record composer converts back.
//! - The concurrent sample size is checked against the minimum any variance
//!   needs (n1 ≥ 2); method-specific preconditions (MOVE.3's n1 > 8,
//!   n2 ≥ 2) are enforced by the estimators themselves.
//!
//! Invariants & assumptions
//! ------------------------
//! - Both inputs are validated [`StationSeries`] values, so keys are
//!   strictly increasing and unique; alignment never re-checks ordering.
//! - `concurrent_keys` and `additional_keys` partition the long record's
//!   key set; `n1 + n2 == long.len()`.
//! - `xbar2` is a NaN sentinel when the additional period is empty
//!   (`n2 == 0`); MOVE.1 then produces an empty extension and MOVE.3
//!   refuses to run.
//!
//! Conventions
//! -----------
//! - `y`/`ybar1` refer to the short record, `x`/`xbar1`/`xbar2` to the
//!   long record, matching Bulletin 17C notation.
//! - Alignment is a pure function of its inputs; no side effects.
//!
//! Testing notes
//! -------------
//! - Unit tests cover partitioning, order preservation, log-space values,
//!   cached means, the n1 < 2 error, and the empty-additional sentinel.
use crate::extension::core::data::{StationSeries, TimeKey};
use crate::extension::core::moments::mean;
use crate::extension::errors::{MoveError, MoveResult};
use ndarray::Array1;
use std::collections::HashMap;

/// `AlignedPair` — concurrent / additional partition of a station pair.
///
/// Purpose
/// -------
/// Hold everything the MOVE estimators derive directly from alignment: the
/// partitioned key sets, the log-space value vectors for each partition,
/// their sizes, and the three sample means of Bulletin 17C eqs. 8-1…8-3.
///
/// Fields
/// ------
/// - `concurrent_keys`: keys present in both records, in long-record order.
/// - `additional_keys`: keys only the long record observed, chronological.
/// - `con_short_log` / `con_long_log`: log10 values over the concurrent
///   keys, index-aligned with `concurrent_keys`.
/// - `additional_log`: log10 long-record values over `additional_keys`.
/// - `n1` / `n2`: concurrent and additional sample sizes.
/// - `ybar1` / `xbar1` / `xbar2`: log-space means of the concurrent short,
///   concurrent long, and additional long values (`xbar2` is NaN when
///   `n2 == 0`).
///
/// Invariants
/// ----------
/// - `n1 == concurrent_keys.len() == con_short_log.len()
///   == con_long_log.len()` and `n1 ≥ 2`.
/// - `n2 == additional_keys.len() == additional_log.len()`.
///
/// Notes
/// -----
/// - Immutable once constructed; estimators compute from it but never
///   mutate it, which is what makes `calculate()` idempotent.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedPair {
    /// Keys present in both records, order-preserved from the long record.
    pub concurrent_keys: Vec<TimeKey>,
    /// Long-record keys absent from the short record, chronological.
    pub additional_keys: Vec<TimeKey>,
    /// Log10 short-record values over the concurrent keys.
    pub con_short_log: Array1<f64>,
    /// Log10 long-record values over the concurrent keys.
    pub con_long_log: Array1<f64>,
    /// Log10 long-record values over the additional keys.
    pub additional_log: Array1<f64>,
    /// Concurrent sample size.
    pub n1: usize,
    /// Additional (borrowable) sample size.
    pub n2: usize,
    /// Mean of `con_short_log`.
    pub ybar1: f64,
    /// Mean of `con_long_log`.
    pub xbar1: f64,
    /// Mean of `additional_log`; NaN when `n2 == 0`.
    pub xbar2: f64,
}

impl AlignedPair {
    /// Align a short record against a long reference record.
    ///
    /// Parameters
    /// ----------
    /// - `short`: `&StationSeries`
    ///   The record to be extended.
    /// - `long`: `&StationSeries`
    ///   The reference record whose additional years may be borrowed.
    ///
    /// Returns
    /// -------
    /// `MoveResult<AlignedPair>`
    ///   - `Ok(pair)` with the partition, log-space vectors, and means.
    ///   - `Err(MoveError::InsufficientOverlap { n1, required: 2 })` when
    ///     fewer than two keys are shared — no concurrent variance exists
    ///     below that.
    ///
    /// Panics
    /// ------
    /// - Never panics; both inputs are already validated containers.
    ///
    /// Notes
    /// -----
    /// - Runs in O(short.len() + long.len()) using a key→log-flow map over
    ///   the short record.
    /// - Two series keyed in different kinds (water years vs dates) share
    ///   no keys and fail here with `InsufficientOverlap`.
    pub fn new(short: &StationSeries, long: &StationSeries) -> MoveResult<Self> {
        let short_log = short.log_flows();
        let short_by_key: HashMap<TimeKey, f64> =
            short.keys.iter().copied().zip(short_log.iter().copied()).collect();

        let long_log = long.log_flows();
        let mut concurrent_keys = Vec::new();
        let mut additional_keys = Vec::new();
        let mut con_short = Vec::new();
        let mut con_long = Vec::new();
        let mut additional = Vec::new();

        for (key, &x) in long.keys.iter().zip(long_log.iter()) {
            match short_by_key.get(key) {
                Some(&y) => {
                    concurrent_keys.push(*key);
                    con_short.push(y);
                    con_long.push(x);
                }
                None => {
                    additional_keys.push(*key);
                    additional.push(x);
                }
            }
        }

        let n1 = concurrent_keys.len();
        let n2 = additional_keys.len();
        if n1 < 2 {
            return Err(MoveError::InsufficientOverlap { n1, required: 2 });
        }

        let con_short_log = Array1::from(con_short);
        let con_long_log = Array1::from(con_long);
        let additional_log = Array1::from(additional);

        let ybar1 = mean(con_short_log.view());
        let xbar1 = mean(con_long_log.view());
        let xbar2 = if n2 == 0 { f64::NAN } else { mean(additional_log.view()) };

        Ok(AlignedPair {
            concurrent_keys,
            additional_keys,
            con_short_log,
            con_long_log,
            additional_log,
            n1,
            n2,
            ybar1,
            xbar1,
            xbar2,
        })
    }
}
