//! Station data containers for MOVE record extension.
//!
//! Purpose
//! -------
//! Provide small, validated containers for gaged streamflow series and their
//! time keys. This module centralizes input validation for raw station data
//! and standardizes how observation times are represented.
//!
//! Key behaviors
//! -------------
//! - [`TimeKey`] represents an observation time as either an integer water
//!   year or a calendar date, with a total order and hashing so series can
//!   be intersected by key.
//! - [`StationSeries`] enforces the data invariants every downstream
//!   statistic relies on (non-empty, finite, strictly positive flows, and
//!   strictly increasing homogeneous keys).
//!
//! Invariants & assumptions
//! ------------------------
//! - Flows must be **strictly positive** and **finite** (they are
//!   log10-transformed before any statistic is computed).
//! - Time keys must be **strictly increasing** — no duplicates — and all of
//!   one kind within a series.
//! - The series must be non-empty at construction time.
//!
//! Conventions
//! -----------
//! - Indexing is 0-based; the oldest observation sits at index 0.
//! - Water years are plain `i32` labels; daily records use
//!   [`chrono::NaiveDate`].
//! - This module does **not** transform flows; [`StationSeries::log_flows`]
//!   produces the log-space view on demand and leaves the raw values
//!   untouched.
//!
//! Downstream usage
//! ----------------
//! - Construct [`StationSeries`] at the boundary where raw gage data enters
//!   the extension stack; alignment ([`AlignedPair`]) and the MOVE models
//!   rely on its invariants without re-validating.
//! - Use [`StationSeries::from_water_years`] / [`from_dates`] for the two
//!   common key kinds instead of building [`TimeKey`] vectors by hand.
//!
//! [`AlignedPair`]: crate::extension::core::align::AlignedPair
//! [`from_dates`]: StationSeries::from_dates
//!
//! Testing notes
//! -------------
//! - Unit tests cover construction behavior for `StationSeries::new` (happy
//!   path, empty series, length mismatch, non-finite and non-positive flows,
//!   unsorted / duplicate keys, and mixed key kinds) plus the log-space
//!   transform.
use crate::extension::errors::{MoveError, MoveResult};
use chrono::{Datelike, NaiveDate};
use ndarray::Array1;

/// `TimeKey` — observation time of a single flow value.
///
/// Purpose
/// -------
/// Label one observation with either an integer water year (annual peak
/// records, the MOVE.3 use case) or a calendar date (daily records, the
/// MOVE.1 use case). Keys are `Copy`, totally ordered, and hashable so
/// series can be intersected and differenced cheaply.
///
/// Invariants
/// ----------
/// - A single series must not mix the two kinds; [`StationSeries::new`]
///   rejects mixed series with [`MoveError::MixedKeyKinds`].
/// - Ordering across kinds is the derived enum order and is never relied
///   upon: cross-kind pairs simply share no keys.
///
/// Notes
/// -----
/// - [`TimeKey::year`] gives the year component for either kind, which is
///   what year-labelled output surfaces (e.g. the Python bindings) report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeKey {
    /// Integer water-year label (e.g. 1975).
    WaterYear(i32),
    /// Calendar date of a daily observation.
    Date(NaiveDate),
}

impl TimeKey {
    /// Year component of the key: the water year itself, or the calendar
    /// year of a dated observation.
    pub fn year(&self) -> i32 {
        match self {
            TimeKey::WaterYear(year) => *year,
            TimeKey::Date(date) => date.year(),
        }
    }
}

impl std::fmt::Display for TimeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeKey::WaterYear(year) => write!(f, "{year}"),
            TimeKey::Date(date) => write!(f, "{date}"),
        }
    }
}

/// `StationSeries` — validated flow series for one gage.
///
/// Purpose
/// -------
/// Represent a single station's ordered (time key, discharge) record with
/// the invariants the MOVE estimators rely on checked once, at
/// construction.
///
/// Key behaviors
/// -------------
/// - Stores flows as an `ndarray::Array1<f64>` alongside a parallel
///   [`TimeKey`] vector.
/// - Enforces non-emptiness, equal lengths, finiteness, strict positivity,
///   strictly increasing keys, and key-kind homogeneity via
///   [`StationSeries::new`].
/// - Produces the log10-transformed flow vector on demand via
///   [`log_flows`](StationSeries::log_flows).
///
/// Fields
/// ------
/// - `keys`: `Vec<TimeKey>`
///   Observation times; strictly increasing, one kind only.
/// - `flows`: `Array1<f64>`
///   Observed discharge in physical units; finite and strictly positive.
///
/// Invariants
/// ----------
/// - `keys.len() == flows.len() > 0`.
/// - `keys[i] < keys[i + 1]` for all valid `i`.
/// - All entries of `flows` are finite and strictly greater than zero.
///
/// Performance
/// -----------
/// - Validation is a single O(n) scan; after construction this type is a
///   plain container with no hidden allocations.
///
/// Notes
/// -----
/// - Downstream code (alignment, moments, regression) assumes these
///   invariants and never re-validates basic properties.
#[derive(Debug, Clone, PartialEq)]
pub struct StationSeries {
    /// Observation times; strictly increasing, homogeneous in kind.
    pub keys: Vec<TimeKey>,
    /// Observed discharge (must be finite and > 0).
    pub flows: Array1<f64>,
}

impl StationSeries {
    /// Construct a validated [`StationSeries`] from raw keys and flows.
    ///
    /// Parameters
    /// ----------
    /// - `keys`: `Vec<TimeKey>`
    ///   Observation times. Must be strictly increasing, free of
    ///   duplicates, and all of one kind.
    /// - `flows`: `Array1<f64>`
    ///   Discharge values in physical units. Must be non-empty, finite, and
    ///   strictly positive, with one value per key.
    ///
    /// Returns
    /// -------
    /// `MoveResult<StationSeries>`
    ///   - `Ok(StationSeries)` if all invariants are satisfied.
    ///   - `Err(MoveError)` if validation fails.
    ///
    /// Errors
    /// ------
    /// - `MoveError::EmptySeries`
    ///   Returned when `keys` is empty.
    /// - `MoveError::LengthMismatch { keys, flows }`
    ///   Returned when the two sequences differ in length.
    /// - `MoveError::NonFiniteFlow { index, value }`
    ///   Returned for the first NaN/±∞ flow.
    /// - `MoveError::NonPositiveFlow { index, value }`
    ///   Returned for the first flow ≤ 0.
    /// - `MoveError::MixedKeyKinds { index }`
    ///   Returned for the first key whose kind differs from `keys[0]`.
    /// - `MoveError::NonIncreasingKeys { index }`
    ///   Returned for the first key not strictly greater than its
    ///   predecessor.
    ///
    /// Panics
    /// ------
    /// - Never panics. All invalid inputs are reported via `MoveError`.
    ///
    /// Notes
    /// -----
    /// - Validation stops at the first offending element, matching the
    ///   error payloads above.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use ndarray::array;
    /// # use rust_streamflow::extension::core::data::{StationSeries, TimeKey};
    /// #
    /// let keys = vec![TimeKey::WaterYear(1950), TimeKey::WaterYear(1951)];
    /// let series = StationSeries::new(keys, array![120.0, 98.5]).unwrap();
    /// assert_eq!(series.len(), 2);
    /// ```
    pub fn new(keys: Vec<TimeKey>, flows: Array1<f64>) -> MoveResult<Self> {
        if keys.is_empty() {
            return Err(MoveError::EmptySeries);
        }
        if keys.len() != flows.len() {
            return Err(MoveError::LengthMismatch { keys: keys.len(), flows: flows.len() });
        }

        for (index, &value) in flows.iter().enumerate() {
            if !value.is_finite() {
                return Err(MoveError::NonFiniteFlow { index, value });
            }
            if value <= 0.0 {
                return Err(MoveError::NonPositiveFlow { index, value });
            }
        }

        let first_kind = std::mem::discriminant(&keys[0]);
        for index in 1..keys.len() {
            if std::mem::discriminant(&keys[index]) != first_kind {
                return Err(MoveError::MixedKeyKinds { index });
            }
            if keys[index] <= keys[index - 1] {
                return Err(MoveError::NonIncreasingKeys { index });
            }
        }

        Ok(StationSeries { keys, flows })
    }

    /// Construct a water-year series from parallel year and flow vectors.
    ///
    /// Convenience wrapper over [`StationSeries::new`]; see it for the
    /// validation rules and error variants.
    pub fn from_water_years(years: Vec<i32>, flows: Vec<f64>) -> MoveResult<Self> {
        let keys = years.into_iter().map(TimeKey::WaterYear).collect();
        StationSeries::new(keys, Array1::from(flows))
    }

    /// Construct a daily series from parallel date and flow vectors.
    ///
    /// Convenience wrapper over [`StationSeries::new`]; see it for the
    /// validation rules and error variants.
    pub fn from_dates(dates: Vec<NaiveDate>, flows: Vec<f64>) -> MoveResult<Self> {
        let keys = dates.into_iter().map(TimeKey::Date).collect();
        StationSeries::new(keys, Array1::from(flows))
    }

    /// Number of observations in the series.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the series is empty. Always `false` for a constructed
    /// series; provided for the conventional `len`/`is_empty` pairing.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Base-10 logarithm of every flow value.
    ///
    /// All MOVE statistics operate in this space; strict positivity of the
    /// raw flows (enforced at construction) keeps every entry finite.
    pub fn log_flows(&self) -> Array1<f64> {
        self.flows.mapv(f64::log10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Construction behavior of `StationSeries::new` and the convenience
    //   constructors.
    // - Enforcement of invariants:
    //   * non-empty series with matching lengths,
    //   * finite, strictly positive flows,
    //   * strictly increasing keys of a single kind.
    // - The log10 transform.
    //
    // They intentionally DO NOT cover:
    // - Alignment of two series; that lives in `core::align`.
    // -------------------------------------------------------------------------

    fn water_years(years: &[i32]) -> Vec<TimeKey> {
        years.iter().map(|&y| TimeKey::WaterYear(y)).collect()
    }

    #[test]
    // Purpose
    // -------
    // Verify that `StationSeries::new` succeeds on a valid series and
    // preserves keys and flows exactly.
    //
    // Given
    // -----
    // - Three strictly increasing water-year keys.
    // - Three finite, strictly positive flows.
    //
    // Expect
    // ------
    // - `Ok(series)` with the input keys and flows unchanged.
    fn station_series_new_returns_ok_for_valid_input() {
        let keys = water_years(&[1950, 1951, 1952]);
        let flows = array![120.0, 98.5, 210.0];

        let series = StationSeries::new(keys.clone(), flows.clone()).unwrap();

        assert_eq!(series.keys, keys);
        assert_eq!(series.flows, flows);
        assert_eq!(series.len(), 3);
    }

    #[test]
    // Purpose
    // -------
    // Ensure an empty series is rejected.
    //
    // Given
    // -----
    // - No keys and no flows.
    //
    // Expect
    // ------
    // - `Err(MoveError::EmptySeries)`.
    fn station_series_new_returns_error_for_empty_series() {
        let result = StationSeries::new(Vec::new(), array![]);

        assert_eq!(result.unwrap_err(), MoveError::EmptySeries);
    }

    #[test]
    // Purpose
    // -------
    // Ensure mismatched key/flow lengths are rejected with both lengths in
    // the payload.
    //
    // Given
    // -----
    // - Two keys but three flows.
    //
    // Expect
    // ------
    // - `Err(MoveError::LengthMismatch { keys: 2, flows: 3 })`.
    fn station_series_new_returns_error_for_length_mismatch() {
        let keys = water_years(&[1950, 1951]);

        let result = StationSeries::new(keys, array![1.0, 2.0, 3.0]);

        assert_eq!(result.unwrap_err(), MoveError::LengthMismatch { keys: 2, flows: 3 });
    }

    #[test]
    // Purpose
    // -------
    // Ensure non-finite flows are rejected with the first offending index.
    //
    // Given
    // -----
    // - A NaN at index 1.
    //
    // Expect
    // ------
    // - `Err(MoveError::NonFiniteFlow { index: 1, .. })`.
    fn station_series_new_returns_error_for_non_finite_flow() {
        let keys = water_years(&[1950, 1951, 1952]);

        let result = StationSeries::new(keys, array![1.0, f64::NAN, 3.0]);

        match result {
            Err(MoveError::NonFiniteFlow { index, value }) => {
                assert_eq!(index, 1);
                assert!(value.is_nan());
            }
            other => panic!("expected NonFiniteFlow, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure zero and negative flows are rejected; log10 would be
    // undefined for them.
    //
    // Given
    // -----
    // - A zero flow at index 1 (before a negative one at index 2).
    //
    // Expect
    // ------
    // - `Err(MoveError::NonPositiveFlow { index: 1, value: 0.0 })`.
    fn station_series_new_returns_error_for_non_positive_flow() {
        let keys = water_years(&[1950, 1951, 1952]);

        let result = StationSeries::new(keys, array![1.0, 0.0, -1.0]);

        assert_eq!(result.unwrap_err(), MoveError::NonPositiveFlow { index: 1, value: 0.0 });
    }

    #[test]
    // Purpose
    // -------
    // Ensure duplicate and out-of-order keys are rejected with the first
    // offending index.
    //
    // Given
    // -----
    // - Keys 1950, 1952, 1952 (duplicate at index 2).
    // - Keys 1950, 1949, 1951 (regression at index 1).
    //
    // Expect
    // ------
    // - `Err(MoveError::NonIncreasingKeys)` with the matching index.
    fn station_series_new_returns_error_for_non_increasing_keys() {
        let duplicate = StationSeries::new(water_years(&[1950, 1952, 1952]), array![1.0, 2.0, 3.0]);
        assert_eq!(duplicate.unwrap_err(), MoveError::NonIncreasingKeys { index: 2 });

        let unsorted = StationSeries::new(water_years(&[1950, 1949, 1951]), array![1.0, 2.0, 3.0]);
        assert_eq!(unsorted.unwrap_err(), MoveError::NonIncreasingKeys { index: 1 });
    }

    #[test]
    // Purpose
    // -------
    // Ensure a series mixing water-year and date keys is rejected.
    //
    // Given
    // -----
    // - A water-year key followed by a calendar-date key.
    //
    // Expect
    // ------
    // - `Err(MoveError::MixedKeyKinds { index: 1 })`.
    fn station_series_new_returns_error_for_mixed_key_kinds() {
        let keys = vec![
            TimeKey::WaterYear(1950),
            TimeKey::Date(NaiveDate::from_ymd_opt(1951, 10, 1).unwrap()),
        ];

        let result = StationSeries::new(keys, array![1.0, 2.0]);

        assert_eq!(result.unwrap_err(), MoveError::MixedKeyKinds { index: 1 });
    }

    #[test]
    // Purpose
    // -------
    // Verify the log-space transform and the `year` accessor used by
    // year-labelled output surfaces.
    //
    // Given
    // -----
    // - Flows that are exact powers of ten.
    // - One water-year key and one date key.
    //
    // Expect
    // ------
    // - `log_flows` returns the exponents.
    // - `year` returns the water year / calendar year respectively.
    fn station_series_log_flows_and_year_accessor() {
        let series =
            StationSeries::from_water_years(vec![1950, 1951, 1952], vec![10.0, 100.0, 1000.0])
                .unwrap();

        let logs = series.log_flows();

        for (log, expected) in logs.iter().zip([1.0, 2.0, 3.0]) {
            assert!((log - expected).abs() < 1e-12, "log10 mismatch: {log} vs {expected}");
        }

        assert_eq!(TimeKey::WaterYear(1987).year(), 1987);
        let date = NaiveDate::from_ymd_opt(1964, 6, 15).unwrap();
        assert_eq!(TimeKey::Date(date).year(), 1964);
    }
}
