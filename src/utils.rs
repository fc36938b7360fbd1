#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::extension::core::data::{StationSeries, TimeKey};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};

#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Extract a water-year vector from a Python sequence or array.
///
/// Accepts integer sequences directly; float inputs (e.g. a float64 numpy
/// array) are accepted only when every entry is integral.
#[cfg(feature = "python-bindings")]
pub fn extract_years<'py>(py: Python<'py>, raw_years: &Bound<'py, PyAny>) -> PyResult<Vec<i32>> {
    if let Ok(years) = raw_years.extract::<Vec<i32>>() {
        return Ok(years);
    }

    let arr = extract_f64_array(py, raw_years)?;
    let slice = arr
        .as_slice()
        .map_err(|_| PyValueError::new_err("years must be a 1-D contiguous array or sequence"))?;
    slice
        .iter()
        .map(|&v| {
            if v.fract() == 0.0 && (i32::MIN as f64..=i32::MAX as f64).contains(&v) {
                Ok(v as i32)
            } else {
                Err(PyValueError::new_err(format!("year value {v} is not an integer water year")))
            }
        })
        .collect()
}

/// Build a validated water-year [`StationSeries`] from Python inputs.
///
/// Series-level invariants (positive finite flows, strictly increasing
/// unique years) are enforced by `StationSeries::new`; violations surface
/// as `ValueError`.
#[cfg(feature = "python-bindings")]
pub fn build_station_series<'py>(
    py: Python<'py>, raw_years: &Bound<'py, PyAny>, raw_flows: &Bound<'py, PyAny>,
) -> PyResult<StationSeries> {
    let years = extract_years(py, raw_years)?;
    let flows_arr = extract_f64_array(py, raw_flows)?;
    let flows = flows_arr.as_slice().map_err(|_| {
        PyValueError::new_err("flows must be a 1-D contiguous float64 array or sequence")
    })?;
    Ok(StationSeries::from_water_years(years, flows.to_vec())?)
}

/// Year labels for a key vector, for year-labelled Python output.
#[cfg(feature = "python-bindings")]
pub fn years_of(keys: &[TimeKey]) -> Vec<i32> {
    keys.iter().map(TimeKey::year).collect()
}
