//! MOVE.1 record extension (Bulletin 17C, single-equation form).
//!
//! MOVE.1 extends a short record by matching first and second moments over
//! the concurrent period: the slope is the ratio of concurrent standard
//! deviations (deliberately *not* the OLS β̂) and the intercept is the
//! concurrent short-record mean. Every additional long-record observation
//! is transferred — MOVE.1 computes no effective record length.
//!
//! Key ideas:
//! - Two states, mirroring the fitted-model pattern used across this crate:
//!   construction aligns the records (**Initialized**), `calculate()`
//!   populates `results` (**Calculated**).
//! - β̂ and ρ̂ are computed purely as diagnostics; the transfer equation
//!   never uses them.
//! - The extension segment and the observed segment are exposed separately;
//!   merging them is the caller's decision (unlike MOVE.3, which publishes
//!   composed records per variant).
use crate::extension::core::{
    align::AlignedPair,
    compose::{round_flows, to_physical},
    data::{StationSeries, TimeKey},
    moments::variance,
    regression::{log_correlation, ols_slope},
};
use crate::extension::errors::{MoveError, MoveResult};
use ndarray::Array1;

/// Outcome of a MOVE.1 calculation.
///
/// A self-contained snapshot: transfer-equation parameters, concurrent
/// diagnostics, and the physical-unit extension and observed segments.
/// Cloned freely into FFI surfaces.
#[derive(Debug, Clone, PartialEq)]
pub struct Move1Outcome {
    /// Transfer slope √(s²y1 / s²x1).
    pub slope: f64,
    /// Transfer intercept ȳ1.
    pub intercept: f64,
    /// OLS slope β̂ over the concurrent period (diagnostic only).
    pub beta_hat: f64,
    /// Implied correlation ρ̂ (diagnostic only; unclipped, may be NaN/±∞
    /// for a constant short record).
    pub p_hat: f64,
    /// Concurrent short-record log-space variance.
    pub s_sq_y1: f64,
    /// Concurrent long-record log-space variance.
    pub s_sq_x1: f64,
    /// Additional long-record log-space variance (0 when n2 ≤ 1).
    pub s_sq_x2: f64,
    /// Keys of the transferred segment (all additional keys).
    pub extension_keys: Vec<TimeKey>,
    /// Physical-unit transferred flows, rounded per the output flag.
    pub extension_flows: Vec<f64>,
    /// Keys of the observed short record.
    pub observed_keys: Vec<TimeKey>,
    /// Physical-unit observed flows, rounded per the output flag.
    pub observed_flows: Vec<f64>,
}

/// MOVE.1 estimator over one aligned station pair.
///
/// Owns its alignment and a copy of the observed short record; `calculate`
/// derives everything else and caches it in `results`. Instances share no
/// mutable state, so independent estimators may run in parallel.
#[derive(Debug, Clone, PartialEq)]
pub struct Move1Model {
    /// Concurrent / additional partition of the station pair.
    pub pair: AlignedPair,
    /// Round physical-unit output to integer flows.
    pub round_output: bool,
    /// Calculation results (populated after `calculate`).
    pub results: Option<Move1Outcome>,
    observed: StationSeries,
}

impl Move1Model {
    /// Construct a MOVE.1 estimator from a short and a long record.
    ///
    /// # Arguments
    /// - `short`: the record to extend.
    /// - `long`: the reference record.
    /// - `round_output`: round physical-unit output to integer flows.
    ///
    /// # Returns
    /// An **Initialized** model: alignment is done (so `pair.n1`,
    /// `pair.n2`, and the concurrent means are available), no statistics
    /// are computed yet.
    ///
    /// # Errors
    /// - Propagates alignment failures, in particular
    ///   [`MoveError::InsufficientOverlap`] when n1 < 2.
    pub fn new(short: &StationSeries, long: &StationSeries, round_output: bool) -> MoveResult<Self> {
        let pair = AlignedPair::new(short, long)?;
        Ok(Move1Model { pair, round_output, results: None, observed: short.clone() })
    }

    /// Run the MOVE.1 calculation and cache the outcome.
    ///
    /// ## Steps
    /// 1. Concurrent variances s²y1, s²x1 (and s²x2 as a diagnostic).
    /// 2. β̂ via OLS (errors on a constant concurrent long record) and
    ///    ρ̂ = β̂·s_x/s_y — diagnostics only.
    /// 3. Transfer parameters: slope = √(s²y1/s²x1), intercept = ȳ1.
    /// 4. Extension flows 10^(intercept + slope·(xᵢ − x̄1)) for **every**
    ///    additional observation, plus the observed segment, both rounded
    ///    per `round_output`.
    ///
    /// ## Returns
    /// A reference to the cached [`Move1Outcome`]. Calling again recomputes
    /// identically from the frozen alignment — the operation is idempotent.
    ///
    /// ## Errors
    /// - [`MoveError::DegenerateRegression`] when the concurrent long
    ///   record is constant (both β̂ and the slope denominator die there);
    ///   nothing partial is stored.
    pub fn calculate(&mut self) -> MoveResult<&Move1Outcome> {
        let pair = &self.pair;

        let s_sq_y1 = variance(pair.con_short_log.view());
        let s_sq_x1 = variance(pair.con_long_log.view());
        let s_sq_x2 =
            if pair.n2 == 0 { 0.0 } else { variance(pair.additional_log.view()) };

        let beta_hat =
            ols_slope(pair.con_long_log.view(), pair.con_short_log.view(), pair.xbar1, pair.ybar1)?;
        let p_hat = log_correlation(beta_hat, s_sq_x1, s_sq_y1);

        let slope = (s_sq_y1 / s_sq_x1).sqrt();
        let intercept = pair.ybar1;

        let extension_log: Array1<f64> =
            pair.additional_log.mapv(|xi| intercept + slope * (xi - pair.xbar1));
        let extension_flows = to_physical(extension_log.view(), self.round_output);
        let observed_flows = round_flows(self.observed.flows.view(), self.round_output);

        self.results = Some(Move1Outcome {
            slope,
            intercept,
            beta_hat,
            p_hat,
            s_sq_y1,
            s_sq_x1,
            s_sq_x2,
            extension_keys: pair.additional_keys.clone(),
            extension_flows,
            observed_keys: self.observed.keys.clone(),
            observed_flows,
        });
        Ok(self.results.as_ref().expect("results were just stored"))
    }

    /// Cached outcome, or [`MoveError::NotCalculated`] before `calculate`.
    pub fn results(&self) -> MoveResult<&Move1Outcome> {
        self.results.as_ref().ok_or(MoveError::NotCalculated)
    }
}
