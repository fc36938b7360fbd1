//! core — shared record-extension data, alignment, and numerics.
//!
//! Purpose
//! -------
//! Collect the building blocks beneath the MOVE.1 / MOVE.3 estimators:
//! validated station containers, time alignment, log-space sample moments,
//! the concurrent-period regression primitives, and record composition.
//! The model layer builds on these and adds nothing numeric of its own
//! beyond the Bulletin 17C closed forms.
//!
//! Key behaviors
//! -------------
//! - Validate raw gage data once, at the boundary ([`StationSeries`],
//!   [`TimeKey`]); everything downstream assumes clean input.
//! - Partition a station pair into concurrent and additional periods and
//!   carry the log-space vectors and means ([`AlignedPair`]).
//! - Provide the exact moment conventions record extension depends on
//!   ([`mean`], [`variance`] with the length-≤-1 degenerate policy).
//! - Compute the OLS slope β̂ and unclipped implied correlation ρ̂
//!   ([`ols_slope`], [`log_correlation`]).
//! - Convert log-space extensions back to physical flows and merge them
//!   with the observed record ([`to_physical`], [`compose`],
//!   [`ExtendedRecord`]).
//!
//! Conventions
//! -----------
//! - All statistics operate on log10-transformed flows; the composer is
//!   the only place values return to physical units.
//! - Indexing is 0-based and chronological: oldest observation first.
//! - This module performs no I/O and no logging; error conditions are
//!   surfaced as [`MoveResult`] values.
//!
//! [`MoveResult`]: crate::extension::errors::MoveResult
//!
//! Testing notes
//! -------------
//! - Each submodule carries unit tests for its own invariants; the
//!   integration suite exercises the full pipeline through the model
//!   layer.

pub mod align;
pub mod compose;
pub mod data;
pub mod moments;
pub mod regression;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::align::AlignedPair;
pub use self::compose::{ExtendedRecord, compose, round_flows, to_physical};
pub use self::data::{StationSeries, TimeKey};
pub use self::moments::{mean, variance};
pub use self::regression::{log_correlation, ols_slope};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_streamflow::extension::core::prelude::*;
//
// to import the main core surface in a single line.

pub mod prelude {
    pub use super::align::AlignedPair;
    pub use super::compose::{ExtendedRecord, compose};
    pub use super::data::{StationSeries, TimeKey};
}
