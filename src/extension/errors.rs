//! Errors for MOVE record extension (series validation, alignment,
//! sample-size preconditions, regression degeneracy, and model lifecycle).
//!
//! This module defines the crate error type, [`MoveError`], and the result
//! alias [`MoveResult`] used across the Python-facing API and the internal
//! Rust core. The enum implements `Display`/`Error` and converts to `PyErr`
//! when the `python-bindings` feature is enabled.
//!
//! ## Conventions
//! - **Indices are 0-based** and refer to positions in the offending input
//!   series.
//! - Flows must be **strictly positive and finite**; time keys must be
//!   strictly increasing with no duplicates and homogeneous in kind.
//! - A MOVE.3 variant whose slope-variance `b²` is non-positive or infinite
//!   is **not** an error: it is reported as an undefined variant on the
//!   outcome (`b == None`), isolated from its sibling variants.

#[cfg(feature = "python-bindings")]
use pyo3::{PyErr, exceptions::PyValueError};

/// Crate-wide result alias for record-extension operations that may produce
/// [`MoveError`].
pub type MoveResult<T> = Result<T, MoveError>;

/// Unified error type for MOVE.1 / MOVE.3 record extension.
///
/// Covers station-series validation, alignment preconditions, regression
/// degeneracy, estimator lifecycle misuse, and record-composition input
/// mismatches. Implements `Display`/`Error` and converts to a Python
/// `ValueError` at PyO3 boundaries.
#[derive(Debug, Clone, PartialEq)]
pub enum MoveError {
    // ---- Series construction / alignment ----
    /// Series is empty.
    EmptySeries,

    /// Key and flow sequences have different lengths.
    LengthMismatch { keys: usize, flows: usize },

    /// A flow value is NaN/±inf.
    NonFiniteFlow { index: usize, value: f64 },

    /// A flow value is ≤ 0 (discharge must be strictly positive).
    NonPositiveFlow { index: usize, value: f64 },

    /// Time keys are not strictly increasing (duplicate or out of order).
    NonIncreasingKeys { index: usize },

    /// A series mixes water-year and calendar-date keys.
    MixedKeyKinds { index: usize },

    // ---- Sample-size preconditions ----
    /// The concurrent period is too short for the requested method.
    InsufficientOverlap { n1: usize, required: usize },

    /// The additional period is too short for the requested method.
    InsufficientAdditional { n2: usize, required: usize },

    // ---- Regression ----
    /// All concurrent long-record values are identical, so the OLS slope
    /// denominator is zero and no slope is defined.
    DegenerateRegression,

    // ---- Model lifecycle ----
    /// Results were requested before `calculate()` ran.
    NotCalculated,

    // ---- Record composition ----
    /// A values/keys segment pair has mismatched lengths.
    SegmentLengthMismatch { values: usize, keys: usize },
}

impl std::error::Error for MoveError {}

impl std::fmt::Display for MoveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Series construction / alignment ----
            MoveError::EmptySeries => {
                write!(f, "Station series is empty.")
            }
            MoveError::LengthMismatch { keys, flows } => {
                write!(f, "Series has {keys} time keys but {flows} flow values.")
            }
            MoveError::NonFiniteFlow { index, value } => {
                write!(f, "Flow at index {index} is non-finite: {value}")
            }
            MoveError::NonPositiveFlow { index, value } => {
                write!(f, "Flow at index {index} is non-positive: {value}. Discharge must be > 0.")
            }
            MoveError::NonIncreasingKeys { index } => {
                write!(
                    f,
                    "Time key at index {index} is not greater than its predecessor; keys must be \
                     strictly increasing with no duplicates."
                )
            }
            MoveError::MixedKeyKinds { index } => {
                write!(
                    f,
                    "Time key at index {index} differs in kind from the first key; a series must \
                     use only water years or only calendar dates."
                )
            }
            // ---- Sample-size preconditions ----
            MoveError::InsufficientOverlap { n1, required } => {
                write!(
                    f,
                    "Concurrent period has {n1} observations; at least {required} are required."
                )
            }
            MoveError::InsufficientAdditional { n2, required } => {
                write!(
                    f,
                    "Additional period has {n2} observations; at least {required} are required."
                )
            }
            // ---- Regression ----
            MoveError::DegenerateRegression => {
                write!(
                    f,
                    "Concurrent long-record values have zero variance; the regression slope is \
                     undefined."
                )
            }
            // ---- Model lifecycle ----
            MoveError::NotCalculated => {
                write!(f, "Model has not been calculated yet; call calculate() first.")
            }
            // ---- Record composition ----
            MoveError::SegmentLengthMismatch { values, keys } => {
                write!(f, "Segment has {values} flow values but {keys} time keys.")
            }
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<MoveError> for PyErr {
    fn from(err: MoveError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
