//! extension — MOVE.1 / MOVE.3 streamflow record extension.
//!
//! Purpose
//! -------
//! Provide the complete record-extension stack of USGS Bulletin 17C
//! chapter 8 under one namespace: validated station data and time
//! alignment, log-space moment and regression primitives, the MOVE.1 and
//! MOVE.3 estimators, and record composition, together with the shared
//! error types. This is the surface most consumers (including the Python
//! bindings) should depend on.
//!
//! Key behaviors
//! -------------
//! - Collect the numerical and structural building blocks in [`core`]:
//!   station containers, alignment, moments, regression, composition.
//! - Expose the estimator API in [`models`] via [`Move1Model`] and
//!   [`Move3Model`], each following the Initialized → Calculated
//!   lifecycle with cached, immutable outcomes.
//! - Centralize error types in [`errors`] ([`MoveError`], [`MoveResult`])
//!   so callers see one uniform error surface across the stack.
//! - Re-export the everyday types directly from this module and via
//!   [`prelude`] for ergonomic imports downstream.
//!
//! Invariants & assumptions
//! ------------------------
//! - Flow data are carried in validated [`StationSeries`] instances:
//!   finite, strictly positive, strictly increasing homogeneous keys.
//! - All statistics operate in log10 space; outputs return to physical
//!   units (optionally integer-rounded) only at composition time.
//! - Sample-size preconditions are typed errors at construction: n1 ≥ 2
//!   for any alignment, n1 > 8 and n2 ≥ 2 for MOVE.3.
//! - The stack performs no I/O and no logging; conditions worth surfacing
//!   (undefined variants, clamped windows) are structured outcome fields.
//!
//! Downstream usage
//! ----------------
//! - Typical end-to-end flow:
//!   1. Build two [`StationSeries`] (water-year or calendar-date keyed).
//!   2. Construct [`Move1Model`] or [`Move3Model`] with the
//!      `round_output` flag.
//!   3. Call `calculate()` and read the cached outcome: transfer
//!      parameters and extension segments for MOVE.1; the
//!      [`RegressionStatistics`] bundle plus three [`ExtensionVariant`]s
//!      (each with its composed [`ExtendedRecord`]) for MOVE.3.
//! - Python bindings import from this module and rely on the
//!   `MoveError → PyErr` conversion defined in [`errors`].
//!
//! Testing notes
//! -------------
//! - Unit tests live beside each submodule; the integration suite in
//!   `tests/integration_move_pipeline.rs` exercises full pipelines on
//!   closed-form fixtures.

pub mod core;
pub mod errors;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------
//
// These are the “everyday” types most users need. More specialized items
// (moment helpers, regression primitives) remain under their submodules.

pub use self::core::{AlignedPair, ExtendedRecord, StationSeries, TimeKey};

pub use self::errors::{MoveError, MoveResult};

pub use self::models::{
    ExtensionVariant, Move1Model, Move1Outcome, Move3Model, Move3Outcome, RegressionStatistics,
    VariantKind,
};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_streamflow::extension::prelude::*;
//
// to import the main record-extension surface in a single line.

pub mod prelude {
    pub use super::{
        AlignedPair, ExtendedRecord, ExtensionVariant, Move1Model, Move1Outcome, Move3Model,
        Move3Outcome, MoveError, MoveResult, RegressionStatistics, StationSeries, TimeKey,
        VariantKind,
    };
}
