//! Record composition: back to physical units, extension + observed merge.
//!
//! Purpose
//! -------
//! Close the log-space loop: convert extension values computed as
//! `10^(a + b·(xᵢ − x̄e))` back to physical discharge, apply the optional
//! integer-flow rounding, and concatenate the borrowed segment with the
//! observed short record into one chronologically ordered series.
//!
//! Conventions
//! -----------
//! - Extension segments come first (borrowed years are older than the
//!   observed record), observed values follow — matching the order the
//!   estimators emit.
//! - Composition performs no recomputation and no chronological
//!   re-validation; it only checks that each values/keys pair is
//!   consistent.

use crate::extension::core::data::TimeKey;
use crate::extension::errors::{MoveError, MoveResult};
use ndarray::ArrayView1;

/// `ExtendedRecord` — a composed extension + observed flow series.
///
/// A plain value object: physical-unit flows (optionally integer-rounded)
/// with their time keys, extension segment first. Does not own any model
/// state and is cheap to clone into FFI surfaces.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtendedRecord {
    /// Time keys: extension keys followed by observed keys.
    pub keys: Vec<TimeKey>,
    /// Physical-unit flows, index-aligned with `keys`.
    pub flows: Vec<f64>,
}

impl ExtendedRecord {
    /// Number of observations in the composed record.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the composed record is empty.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Convert log-space values to physical discharge.
///
/// Parameters
/// ----------
/// - `log_values`: `ArrayView1<f64>`
///   Values in log10 space.
/// - `round_output`: `bool`
///   When true, round each `10^v` to the nearest integer flow.
///
/// Returns
/// -------
/// `Vec<f64>`
///   Physical-unit flows, rounded per the flag.
pub fn to_physical(log_values: ArrayView1<'_, f64>, round_output: bool) -> Vec<f64> {
    log_values
        .iter()
        .map(|&v| {
            let flow = 10f64.powf(v);
            if round_output { flow.round() } else { flow }
        })
        .collect()
}

/// Apply the integer-flow rounding policy to already-physical flows.
///
/// Used for the observed short-record segment, which never leaves physical
/// units.
pub fn round_flows(flows: ArrayView1<'_, f64>, round_output: bool) -> Vec<f64> {
    flows.iter().map(|&f| if round_output { f.round() } else { f }).collect()
}

/// Concatenate an extension segment with the observed record.
///
/// Parameters
/// ----------
/// - `extension_flows` / `extension_keys`: the borrowed segment, physical
///   units, oldest first.
/// - `observed_flows` / `observed_keys`: the observed short record.
///
/// Returns
/// -------
/// `MoveResult<ExtendedRecord>`
///   - `Ok(record)` with extension entries followed by observed entries.
///   - `Err(MoveError::SegmentLengthMismatch { .. })` when either segment's
///     values and keys differ in length.
///
/// Notes
/// -----
/// - No other validation is performed here; the estimators guarantee the
///   chronological relationship between the two segments.
pub fn compose(
    extension_flows: &[f64], extension_keys: &[TimeKey], observed_flows: &[f64],
    observed_keys: &[TimeKey],
) -> MoveResult<ExtendedRecord> {
    if extension_flows.len() != extension_keys.len() {
        return Err(MoveError::SegmentLengthMismatch {
            values: extension_flows.len(),
            keys: extension_keys.len(),
        });
    }
    if observed_flows.len() != observed_keys.len() {
        return Err(MoveError::SegmentLengthMismatch {
            values: observed_flows.len(),
            keys: observed_keys.len(),
        });
    }

    let mut keys = Vec::with_capacity(extension_keys.len() + observed_keys.len());
    keys.extend_from_slice(extension_keys);
    keys.extend_from_slice(observed_keys);

    let mut flows = Vec::with_capacity(extension_flows.len() + observed_flows.len());
    flows.extend_from_slice(extension_flows);
    flows.extend_from_slice(observed_flows);

    Ok(ExtendedRecord { keys, flows })
}
