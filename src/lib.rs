//! rust_streamflow — streamflow record extension with Python bindings.
//!
//! Purpose
//! -------
//! Serve as the crate root for Rust callers and as the PyO3 bridge that
//! exposes the MOVE.1 / MOVE.3 record-extension engine to Python via the
//! `_rust_streamflow` extension module. When the `python-bindings` feature
//! is enabled, this module defines the Python-facing classes and the
//! `record_extension` submodule used by the `rust_streamflow` package.
//!
//! Key behaviors
//! -------------
//! - Re-export the core Rust module ([`extension`]) as the public crate
//!   surface.
//! - Define `#[pyclass]` wrappers ([`Move1`], [`Move3`], [`Move3Variant`])
//!   and the `#[pymodule]` initializer for the `_rust_streamflow`
//!   extension.
//! - Register the `record_extension` submodule under `rust_streamflow` so
//!   dot-notation imports work as expected.
//!
//! Invariants & assumptions
//! ------------------------
//! - All numerical work is implemented in [`extension`]; this file performs
//!   only FFI glue, input conversion, and error mapping.
//! - The Python-visible classes mirror the invariants of their Rust
//!   counterparts: construction aligns and validates, `calculate()`
//!   populates results, result getters raise `ValueError` before that.
//! - The Python surface is water-year keyed; calendar-date records are a
//!   Rust-API concern ([`TimeKey::Date`](extension::TimeKey)).
//!
//! Downstream usage
//! ----------------
//! - Native Rust code should depend directly on [`extension`] (or its
//!   prelude) and can ignore the PyO3 items guarded by `python-bindings`.
//! - The Python packaging layer imports `_rust_streamflow` and wraps its
//!   classes in user-facing Python APIs.
//!
//! Testing notes
//! -------------
//! - Core numerical behavior is covered by unit tests in [`extension`] and
//!   by the integration suite; binding smoke tests (construct, calculate,
//!   read properties) live at the Python level.

pub mod extension;
pub mod utils;

#[cfg(feature = "python-bindings")]
use pyo3::prelude::*;

#[cfg(feature = "python-bindings")]
use crate::{
    extension::models::{
        move1::Move1Model,
        move3::{ExtensionVariant, Move3Model, VariantKind},
    },
    utils::{build_station_series, years_of},
};

/// Move1 — Python-facing wrapper for the MOVE.1 estimator.
///
/// Purpose
/// -------
/// Expose [`Move1Model`] to Python callers: construct from water-year and
/// flow arrays, `calculate()`, then read the transfer parameters,
/// diagnostics, and extension/observed segments as properties.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `Move1(short_years, short_flows, long_years, long_flows, round_output=True)`:
/// - `short_years` / `long_years`: 1-D integer array-likes of strictly
///   increasing water years.
/// - `short_flows` / `long_flows`: matching 1-D float64 array-likes of
///   strictly positive discharge.
/// - `round_output`: round physical-unit output to integer flows.
///
/// Invariants
/// ----------
/// - `inner` is always a well-formed, aligned [`Move1Model`]; invalid
///   series or an overlap below two years raise `ValueError` at
///   construction.
/// - Result properties raise `ValueError` until `calculate()` has run.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_streamflow.record_extension")]
pub struct Move1 {
    /// Underlying Rust MOVE.1 model.
    pub inner: Move1Model,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl Move1 {
    #[new]
    #[pyo3(
        signature = (short_years, short_flows, long_years, long_flows, round_output = true),
        text_signature = "(short_years, short_flows, long_years, long_flows, /, round_output=True)"
    )]
    pub fn new<'py>(
        py: Python<'py>, short_years: &Bound<'py, PyAny>, short_flows: &Bound<'py, PyAny>,
        long_years: &Bound<'py, PyAny>, long_flows: &Bound<'py, PyAny>, round_output: bool,
    ) -> PyResult<Self> {
        let short = build_station_series(py, short_years, short_flows)?;
        let long = build_station_series(py, long_years, long_flows)?;
        Ok(Move1 { inner: Move1Model::new(&short, &long, round_output)? })
    }

    /// Run the MOVE.1 calculation; idempotent on success.
    pub fn calculate(&mut self) -> PyResult<()> {
        self.inner.calculate()?;
        Ok(())
    }

    /// Concurrent sample size (available before `calculate`).
    #[getter]
    pub fn n1(&self) -> usize {
        self.inner.pair.n1
    }

    /// Additional sample size (available before `calculate`).
    #[getter]
    pub fn n2(&self) -> usize {
        self.inner.pair.n2
    }

    /// Transfer slope √(s²y1 / s²x1).
    #[getter]
    pub fn slope(&self) -> PyResult<f64> {
        Ok(self.inner.results()?.slope)
    }

    /// Transfer intercept ȳ1.
    #[getter]
    pub fn intercept(&self) -> PyResult<f64> {
        Ok(self.inner.results()?.intercept)
    }

    /// OLS slope β̂ (diagnostic).
    #[getter]
    pub fn beta_hat(&self) -> PyResult<f64> {
        Ok(self.inner.results()?.beta_hat)
    }

    /// Implied correlation ρ̂ (diagnostic, unclipped).
    #[getter]
    pub fn p_hat(&self) -> PyResult<f64> {
        Ok(self.inner.results()?.p_hat)
    }

    /// Water years of the transferred segment.
    #[getter]
    pub fn extension_years(&self) -> PyResult<Vec<i32>> {
        Ok(years_of(&self.inner.results()?.extension_keys))
    }

    /// Physical-unit transferred flows.
    #[getter]
    pub fn extension_flows(&self) -> PyResult<Vec<f64>> {
        Ok(self.inner.results()?.extension_flows.clone())
    }

    /// Water years of the observed short record.
    #[getter]
    pub fn observed_years(&self) -> PyResult<Vec<i32>> {
        Ok(years_of(&self.inner.results()?.observed_keys))
    }

    /// Physical-unit observed flows, rounded per the output flag.
    #[getter]
    pub fn observed_flows(&self) -> PyResult<Vec<f64>> {
        Ok(self.inner.results()?.observed_flows.clone())
    }
}

/// Move3Variant — one MOVE.3 extension variant exposed to Python.
///
/// Purpose
/// -------
/// Present a single [`ExtensionVariant`] (mean-based, variance-based, or
/// full-additional) as a read-only value: effective lengths, clamp flag,
/// transfer line, and the extension / extended records. An undefined
/// variant reports `defined == False` and `None` for its slope and record
/// properties.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_streamflow.record_extension")]
pub struct Move3Variant {
    /// Underlying Rust variant value.
    pub inner: ExtensionVariant,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl Move3Variant {
    /// Variant kind: "mean", "variance", or "n2".
    #[getter]
    pub fn kind(&self) -> &'static str {
        match self.inner.kind {
            VariantKind::MeanBased => "mean",
            VariantKind::VarianceBased => "variance",
            VariantKind::FullAdditional => "n2",
        }
    }

    /// Whether this variant produced a usable extension.
    #[getter]
    pub fn defined(&self) -> bool {
        self.inner.is_defined()
    }

    /// Effective extension count actually used (window size).
    #[getter]
    pub fn ne(&self) -> usize {
        self.inner.ne
    }

    /// Effective extension count before clamping.
    #[getter]
    pub fn ne_requested(&self) -> i64 {
        self.inner.ne_requested
    }

    /// Whether the request exceeded the available additional years.
    #[getter]
    pub fn clamped(&self) -> bool {
        self.inner.clamped
    }

    /// Transfer intercept a (NaN when the window is empty).
    #[getter]
    pub fn a(&self) -> f64 {
        self.inner.a
    }

    /// Transfer slope-variance b².
    #[getter]
    pub fn b_sq(&self) -> f64 {
        self.inner.b_sq
    }

    /// Transfer slope b, or None when the variant is undefined.
    #[getter]
    pub fn b(&self) -> Option<f64> {
        self.inner.b
    }

    /// Log-space mean of the extension window.
    #[getter]
    pub fn xe_bar(&self) -> f64 {
        self.inner.xe_bar
    }

    /// Log-space variance of the extension window.
    #[getter]
    pub fn s_sq_xe(&self) -> f64 {
        self.inner.s_sq_xe
    }

    /// Water years of the extension window.
    #[getter]
    pub fn extension_years(&self) -> Vec<i32> {
        years_of(&self.inner.extension_keys)
    }

    /// Physical-unit extension flows, or None when undefined.
    #[getter]
    pub fn extension_flows(&self) -> Option<Vec<f64>> {
        self.inner.extension_flows.clone()
    }

    /// Water years of the composed extended record, or None when
    /// undefined.
    #[getter]
    pub fn extended_years(&self) -> Option<Vec<i32>> {
        self.inner.extended.as_ref().map(|record| years_of(&record.keys))
    }

    /// Physical-unit flows of the composed extended record, or None when
    /// undefined.
    #[getter]
    pub fn extended_flows(&self) -> Option<Vec<f64>> {
        self.inner.extended.as_ref().map(|record| record.flows.clone())
    }
}

/// Move3 — Python-facing wrapper for the MOVE.3 estimator.
///
/// Purpose
/// -------
/// Expose [`Move3Model`] to Python callers: construct from water-year and
/// flow arrays, `calculate()`, then read the shared statistics bundle and
/// the three extension variants.
///
/// Parameters
/// ----------
/// Constructed from Python via
/// `Move3(short_years, short_flows, long_years, long_flows, round_output=True)`;
/// argument conventions match [`Move1`]. MOVE.3 additionally requires a
/// concurrent period longer than 8 years and at least 2 additional years.
///
/// Invariants
/// ----------
/// - `inner` is always a well-formed, aligned [`Move3Model`] satisfying
///   the MOVE.3 sample-size preconditions.
/// - Result properties raise `ValueError` until `calculate()` has run.
#[cfg(feature = "python-bindings")]
#[pyclass(module = "rust_streamflow.record_extension")]
pub struct Move3 {
    /// Underlying Rust MOVE.3 model.
    pub inner: Move3Model,
}

#[cfg(feature = "python-bindings")]
#[pymethods]
impl Move3 {
    #[new]
    #[pyo3(
        signature = (short_years, short_flows, long_years, long_flows, round_output = true),
        text_signature = "(short_years, short_flows, long_years, long_flows, /, round_output=True)"
    )]
    pub fn new<'py>(
        py: Python<'py>, short_years: &Bound<'py, PyAny>, short_flows: &Bound<'py, PyAny>,
        long_years: &Bound<'py, PyAny>, long_flows: &Bound<'py, PyAny>, round_output: bool,
    ) -> PyResult<Self> {
        let short = build_station_series(py, short_years, short_flows)?;
        let long = build_station_series(py, long_years, long_flows)?;
        Ok(Move3 { inner: Move3Model::new(&short, &long, round_output)? })
    }

    /// Run the MOVE.3 calculation; idempotent on success.
    pub fn calculate(&mut self) -> PyResult<()> {
        self.inner.calculate()?;
        Ok(())
    }

    /// Concurrent sample size (available before `calculate`).
    #[getter]
    pub fn n1(&self) -> usize {
        self.inner.pair.n1
    }

    /// Additional sample size (available before `calculate`).
    #[getter]
    pub fn n2(&self) -> usize {
        self.inner.pair.n2
    }

    /// OLS slope β̂.
    #[getter]
    pub fn beta_hat(&self) -> PyResult<f64> {
        Ok(self.inner.results()?.stats.beta_hat)
    }

    /// Implied correlation ρ̂ (unclipped diagnostic).
    #[getter]
    pub fn p_hat(&self) -> PyResult<f64> {
        Ok(self.inner.results()?.stats.p_hat)
    }

    /// Bias-corrected population mean μ̂_y.
    #[getter]
    pub fn mu_hat_y(&self) -> PyResult<f64> {
        Ok(self.inner.results()?.stats.mu_hat_y)
    }

    /// Bias-corrected population variance σ̂²_y.
    #[getter]
    pub fn sigma_hat_y_sq(&self) -> PyResult<f64> {
        Ok(self.inner.results()?.stats.sigma_hat_y_sq)
    }

    /// α² weighting factor.
    #[getter]
    pub fn alpha_sq(&self) -> PyResult<f64> {
        Ok(self.inner.results()?.stats.alpha_sq)
    }

    /// Effective-length polynomial coefficients (A, B, C).
    #[getter]
    pub fn polynomial_coefficients(&self) -> PyResult<(f64, f64, f64)> {
        let stats = &self.inner.results()?.stats;
        Ok((stats.a_coef, stats.b_coef, stats.c_coef))
    }

    /// Water years of the observed short record.
    #[getter]
    pub fn observed_years(&self) -> PyResult<Vec<i32>> {
        Ok(years_of(&self.inner.results()?.observed_keys))
    }

    /// Physical-unit observed flows, rounded per the output flag.
    #[getter]
    pub fn observed_flows(&self) -> PyResult<Vec<f64>> {
        Ok(self.inner.results()?.observed_flows.clone())
    }

    /// The mean-equivalence extension variant.
    pub fn mean_based(&self) -> PyResult<Move3Variant> {
        Ok(Move3Variant { inner: self.inner.results()?.mean_based.clone() })
    }

    /// The variance-equivalence extension variant.
    pub fn variance_based(&self) -> PyResult<Move3Variant> {
        Ok(Move3Variant { inner: self.inner.results()?.variance_based.clone() })
    }

    /// The full-additional ("n2") extension variant.
    pub fn full_additional(&self) -> PyResult<Move3Variant> {
        Ok(Move3Variant { inner: self.inner.results()?.full_additional.clone() })
    }
}

/// _rust_streamflow — PyO3 module initializer for the Python extension.
///
/// Creates the `record_extension` submodule, attaches it to the parent
/// `_rust_streamflow` module, and registers it in `sys.modules` so it is
/// importable via dotted paths from Python. Invoked automatically by
/// Python when importing the compiled extension.
#[cfg(feature = "python-bindings")]
#[pymodule]
fn _rust_streamflow<'py>(_py: Python<'py>, m: &Bound<'py, PyModule>) -> PyResult<()> {
    let record_extension_mod = PyModule::new(_py, "record_extension")?;
    record_extension(_py, m, &record_extension_mod)?;

    // Manually add the submodule into sys.modules to allow for dot notation.
    _py.import("sys")?
        .getattr("modules")?
        .set_item("rust_streamflow.record_extension", record_extension_mod)?;
    Ok(())
}

#[cfg(feature = "python-bindings")]
fn record_extension<'py>(
    _py: Python, rust_streamflow: &Bound<'py, PyModule>, m: &Bound<'py, PyModule>,
) -> PyResult<()> {
    m.add_class::<Move1>()?;
    m.add_class::<Move3>()?;
    m.add_class::<Move3Variant>()?;
    rust_streamflow.add_submodule(m)?;
    Ok(())
}
