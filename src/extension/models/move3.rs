//! MOVE.3 record extension (Bulletin 17C, bias-corrected form).
//!
//! MOVE.3 refines MOVE.1 in two ways: it estimates the mean and variance of
//! the *extended* population with the bias corrections of eqs. 8-7/8-8, and
//! it limits how much of the long record may be borrowed through an
//! effective record length `ne` that discounts the additional period for
//! imperfect correlation. Three variants are published side by side — an
//! `ne` from the mean-equivalence formula (eq. 8-18), an `ne` from the
//! variance-equivalence formula (eq. 8-19 with the A/B/C polynomial of
//! eqs. 8-14…8-16), and the full additional period (`ne = n2`) — each with
//! its own transfer line and composed extended record.
//!
//! Key ideas:
//! - Two states, like every model in this crate: construction aligns and
//!   checks the MOVE.3 sample-size preconditions (**Initialized**);
//!   `calculate()` populates `results` (**Calculated**) and is idempotent.
//! - All shared statistics live in one immutable [`RegressionStatistics`]
//!   bundle computed up front; the incremental A1..C7 bookkeeping of the
//!   reference implementation collapses into local intermediates inside
//!   [`RegressionStatistics::compute`].
//! - Variant failure is isolated, not fatal: a non-positive or non-finite
//!   slope-variance `b²` marks that variant undefined (`b == None`, NaN
//!   sentinels) while its siblings stay valid.
//! - Extension windows take the *most recent* `ne` additional years (the
//!   years adjacent to the concurrent period). A requested `ne` beyond the
//!   available `n2` is clamped and reported via the variant's `clamped`
//!   flag; a requested `ne ≤ 0` yields an empty window and an undefined
//!   variant.
use crate::extension::core::{
    align::AlignedPair,
    compose::{ExtendedRecord, compose, round_flows, to_physical},
    data::{StationSeries, TimeKey},
    moments::{mean, variance},
    regression::{log_correlation, ols_slope},
};
use crate::extension::errors::{MoveError, MoveResult};
use ndarray::s;

/// Concurrent-period statistics and bias-corrected population estimates
/// shared by every MOVE.3 variant.
///
/// Purpose
/// -------
/// Hold the full diagnostic bundle of Bulletin 17C eqs. 8-4…8-16 in one
/// immutable value: sample sizes, log-space means and variances, the OLS
/// slope β̂ and implied correlation ρ̂, the bias-corrected population mean
/// μ̂_y and variance σ̂²_y, α², and the effective-length polynomial
/// coefficients A, B, C.
///
/// Invariants
/// ----------
/// - Computed only for `n1 > 8` and `n2 ≥ 2`; every denominator in the
///   closed forms (n1−1…n1−8, n2−1) is then nonzero.
/// - Immutable once computed; variants read from it but never write.
///
/// Notes
/// -----
/// - `p_hat` is deliberately unclipped (see the regression core); a NaN ρ̂
///   from a constant short record flows into NaN effective lengths and
///   ends as undefined variants rather than an error.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressionStatistics {
    /// Concurrent sample size.
    pub n1: usize,
    /// Additional sample size.
    pub n2: usize,
    /// Concurrent short-record log-space mean.
    pub ybar1: f64,
    /// Concurrent long-record log-space mean.
    pub xbar1: f64,
    /// Additional long-record log-space mean.
    pub xbar2: f64,
    /// Concurrent short-record log-space variance (eq. 8-4).
    pub s_sq_y1: f64,
    /// Concurrent long-record log-space variance (eq. 8-5).
    pub s_sq_x1: f64,
    /// Additional long-record log-space variance (eq. 8-6).
    pub s_sq_x2: f64,
    /// α² weighting factor (eq. 8-11).
    pub alpha_sq: f64,
    /// OLS slope β̂ (eq. 8-10).
    pub beta_hat: f64,
    /// Implied correlation ρ̂ (eq. 8-9); unclipped diagnostic.
    pub p_hat: f64,
    /// Bias-corrected population mean μ̂_y (eq. 8-7).
    pub mu_hat_y: f64,
    /// Bias-corrected population variance σ̂²_y (eq. 8-8).
    pub sigma_hat_y_sq: f64,
    /// Effective-length polynomial coefficient A (eq. 8-14).
    pub a_coef: f64,
    /// Effective-length polynomial coefficient B (eq. 8-15).
    pub b_coef: f64,
    /// Effective-length polynomial coefficient C (eq. 8-16).
    pub c_coef: f64,
}

impl RegressionStatistics {
    /// Compute the full statistics bundle from an aligned pair.
    ///
    /// ## Steps
    /// 1. Check the MOVE.3 preconditions: n1 > 8 and n2 ≥ 2.
    /// 2. Concurrent / additional variances (eqs. 8-4…8-6) and α²
    ///    (eq. 8-11).
    /// 3. β̂ (eq. 8-10, errors on a constant concurrent long record) and
    ///    ρ̂ (eq. 8-9).
    /// 4. Bias-corrected μ̂_y (eq. 8-7) and σ̂²_y (eq. 8-8).
    /// 5. A, B, C (eqs. 8-14…8-16) from local intermediates.
    ///
    /// ## Errors
    /// - [`MoveError::InsufficientOverlap`] when n1 ≤ 8.
    /// - [`MoveError::InsufficientAdditional`] when n2 < 2.
    /// - [`MoveError::DegenerateRegression`] from the OLS slope.
    pub fn compute(pair: &AlignedPair) -> MoveResult<Self> {
        if pair.n1 <= 8 {
            return Err(MoveError::InsufficientOverlap { n1: pair.n1, required: 9 });
        }
        if pair.n2 < 2 {
            return Err(MoveError::InsufficientAdditional { n2: pair.n2, required: 2 });
        }

        let s_sq_y1 = variance(pair.con_short_log.view());
        let s_sq_x1 = variance(pair.con_long_log.view());
        let s_sq_x2 = variance(pair.additional_log.view());

        let n1 = pair.n1 as f64;
        let n2 = pair.n2 as f64;

        // Equation 8-11
        let alpha_sq = n2 * (n1 - 4.0) * (n1 - 1.0) / ((n2 - 1.0) * (n1 - 3.0) * (n1 - 2.0));

        let beta_hat =
            ols_slope(pair.con_long_log.view(), pair.con_short_log.view(), pair.xbar1, pair.ybar1)?;
        let p_hat = log_correlation(beta_hat, s_sq_x1, s_sq_y1);

        // Equation 8-7
        let mu_hat_y = pair.ybar1 + n2 / (n1 + n2) * beta_hat * (pair.xbar2 - pair.xbar1);

        // Equation 8-8
        let sigma_hat_y_sq = ((n1 - 1.0) * s_sq_y1
            + (n2 - 1.0) * beta_hat.powi(2) * s_sq_x2
            + (n2 - 1.0) * alpha_sq * (1.0 - p_hat.powi(2)) * s_sq_y1
            + n1 * n2 / (n1 + n2) * beta_hat.powi(2) * (pair.xbar2 - pair.xbar1).powi(2))
            / (n1 + n2 - 1.0);

        let a1 = (n2 + 2.0) * (n1 - 6.0) * (n1 - 8.0) / (n1 - 5.0);
        let a2 = n1 - 4.0;
        let a3 = n1 * n2 * (n1 - 4.0) / ((n1 - 3.0) * (n1 - 2.0));
        let a4 = 2.0 * n2 * (n1 - 4.0) / (n1 - 3.0);
        // Equation 8-14
        let a_coef = a1 + a2 * (a3 - a4 - 4.0);

        let b1 = 6.0 * (n2 + 2.0) * (n1 - 6.0) / (n1 - 5.0);
        let b2 = 2.0 * (n1.powi(2) - n1 - 14.0);
        let b3 = n1 - 4.0;
        let b4 = 2.0 * n2 * (n1 - 5.0) / (n1 - 3.0);
        let b5 = 2.0 * (n1 + 3.0);
        let b6 = 2.0 * n1 * n2 * (n1 - 4.0) / ((n1 - 3.0) * (n1 - 2.0));
        // Equation 8-15
        let b_coef = b1 + b2 + b3 * (b4 - b5 - b6);

        let c1 = 2.0 * (n1 + 1.0);
        let c2 = 3.0 * (n2 + 2.0) / (n1 - 5.0);
        let c3 = (n1 + 1.0) * (2.0 * n1 + n2 - 2.0) * (n1 - 3.0) / (n1 - 1.0);
        let c4 = n1 - 4.0;
        let c5 = 2.0 * n2 / (n1 - 3.0);
        let c6 = 2.0 * (n1 + 1.0);
        let c7 = n1 * n2 * (n1 - 4.0) / ((n1 - 3.0) * (n1 - 2.0));
        // Equation 8-16
        let c_coef = c1 + c2 - c3 + c4 * (c5 + c6 + c7);

        Ok(RegressionStatistics {
            n1: pair.n1,
            n2: pair.n2,
            ybar1: pair.ybar1,
            xbar1: pair.xbar1,
            xbar2: pair.xbar2,
            s_sq_y1,
            s_sq_x1,
            s_sq_x2,
            alpha_sq,
            beta_hat,
            p_hat,
            mu_hat_y,
            sigma_hat_y_sq,
            a_coef,
            b_coef,
            c_coef,
        })
    }

    /// Mean-equivalence effective total record length (eq. 8-18, i.e.
    /// eq. 8-17 divided by 8-12), before rounding. Subtracting n1 gives the
    /// effective extension count.
    pub fn equivalent_length_mean_based(&self) -> f64 {
        let n1 = self.n1 as f64;
        let n2 = self.n2 as f64;
        let p_sq = self.p_hat.powi(2);
        n1 / (1.0 - n2 / (n1 + n2) * (p_sq - (1.0 - p_sq) / (n1 - 3.0)))
    }

    /// Variance-equivalence effective total record length (eq. 8-19),
    /// before rounding.
    pub fn equivalent_length_variance_based(&self) -> f64 {
        let n1 = self.n1 as f64;
        let n2 = self.n2 as f64;
        let p_sq = self.p_hat.powi(2);
        let poly = self.a_coef * p_sq.powi(2) + self.b_coef * p_sq + self.c_coef;
        2.0 / (2.0 / (n1 - 1.0) + n2 / ((n1 + n2 - 1.0).powi(2) * (n1 - 3.0)) * poly) + 1.0
    }
}

/// Which effective-length rule produced an extension variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantKind {
    /// `ne` from the mean-equivalence formula (eq. 8-18).
    MeanBased,
    /// `ne` from the variance-equivalence formula (eq. 8-19).
    VarianceBased,
    /// The entire additional period, `ne = n2`.
    FullAdditional,
}

/// One MOVE.3 extension variant: its window, transfer line, and composed
/// record.
///
/// A variant is *undefined* when its slope-variance `b²` is non-positive or
/// non-finite (including every `ne ≤ 1` window, whose denominator is
/// degenerate): `b`, `extension_flows`, and `extended` are `None` and the
/// dependent scalars hold NaN sentinels. Undefined variants are reported,
/// never raised — sibling variants stay valid.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtensionVariant {
    /// The effective-length rule behind this variant.
    pub kind: VariantKind,
    /// Effective extension count before clamping; may be ≤ 0 or exceed n2.
    pub ne_requested: i64,
    /// Effective extension count actually used (window size), in [0, n2].
    pub ne: usize,
    /// Whether `ne_requested` exceeded the available additional years.
    pub clamped: bool,
    /// Keys of the extension window (most recent `ne` additional keys).
    pub extension_keys: Vec<TimeKey>,
    /// Log-space mean of the window (eq. 8-21); NaN when the window is
    /// empty.
    pub xe_bar: f64,
    /// Log-space variance of the window (eq. 8-22); NaN when the window is
    /// empty, 0 for a singleton window.
    pub s_sq_xe: f64,
    /// Transfer intercept (eq. 8-23); NaN when the window is empty.
    pub a: f64,
    /// Transfer slope-variance (eq. 8-24); NaN/±∞ when degenerate.
    pub b_sq: f64,
    /// Transfer slope √b²; `None` marks the variant undefined.
    pub b: Option<f64>,
    /// Physical-unit extension flows over the window; `None` when
    /// undefined.
    pub extension_flows: Option<Vec<f64>>,
    /// Extension + observed record; `None` when undefined.
    pub extended: Option<ExtendedRecord>,
}

impl ExtensionVariant {
    /// Whether this variant produced a usable extension.
    pub fn is_defined(&self) -> bool {
        self.b.is_some()
    }
}

/// Outcome of a MOVE.3 calculation: the shared statistics bundle, the
/// observed segment, and the three extension variants.
#[derive(Debug, Clone, PartialEq)]
pub struct Move3Outcome {
    /// Shared concurrent-period and bias-corrected statistics.
    pub stats: RegressionStatistics,
    /// Keys of the observed short record.
    pub observed_keys: Vec<TimeKey>,
    /// Physical-unit observed flows, rounded per the output flag.
    pub observed_flows: Vec<f64>,
    /// Mean-equivalence variant.
    pub mean_based: ExtensionVariant,
    /// Variance-equivalence variant.
    pub variance_based: ExtensionVariant,
    /// Full-additional variant.
    pub full_additional: ExtensionVariant,
}

impl Move3Outcome {
    /// The three variants, in mean / variance / full order.
    pub fn variants(&self) -> [&ExtensionVariant; 3] {
        [&self.mean_based, &self.variance_based, &self.full_additional]
    }
}

/// MOVE.3 estimator over one aligned station pair.
///
/// Owns its alignment and a copy of the observed short record; `calculate`
/// derives the statistics bundle and the three variants and caches them in
/// `results`. Instances share no mutable state, so independent estimators
/// may run in parallel.
#[derive(Debug, Clone, PartialEq)]
pub struct Move3Model {
    /// Concurrent / additional partition of the station pair.
    pub pair: AlignedPair,
    /// Round physical-unit output to integer flows.
    pub round_output: bool,
    /// Calculation results (populated after `calculate`).
    pub results: Option<Move3Outcome>,
    observed: StationSeries,
}

impl Move3Model {
    /// Construct a MOVE.3 estimator from a short and a long record.
    ///
    /// # Arguments
    /// - `short`: the record to extend.
    /// - `long`: the reference record.
    /// - `round_output`: round physical-unit output to integer flows.
    ///
    /// # Errors
    /// - Propagates alignment failures.
    /// - [`MoveError::InsufficientOverlap`] when n1 ≤ 8: the A/B/C
    ///   polynomial carries denominators down to n1 − 8.
    /// - [`MoveError::InsufficientAdditional`] when n2 < 2: α² carries an
    ///   (n2 − 1) denominator.
    pub fn new(short: &StationSeries, long: &StationSeries, round_output: bool) -> MoveResult<Self> {
        let pair = AlignedPair::new(short, long)?;
        if pair.n1 <= 8 {
            return Err(MoveError::InsufficientOverlap { n1: pair.n1, required: 9 });
        }
        if pair.n2 < 2 {
            return Err(MoveError::InsufficientAdditional { n2: pair.n2, required: 2 });
        }
        Ok(Move3Model { pair, round_output, results: None, observed: short.clone() })
    }

    /// Run the MOVE.3 calculation and cache the outcome.
    ///
    /// ## Steps
    /// 1. Compute the [`RegressionStatistics`] bundle (aborts the whole
    ///    estimator on regression degeneracy — nothing partial is stored).
    /// 2. Round the observed segment per `round_output`.
    /// 3. Derive each variant's effective extension count: the rounded
    ///    effective totals minus n1 for the mean- and variance-based
    ///    rules, and n2 for the full-additional rule.
    /// 4. Build the three variants independently; undefined variants are
    ///    isolated per-variant, never errors.
    ///
    /// ## Returns
    /// A reference to the cached [`Move3Outcome`]. Calling again recomputes
    /// identically from the frozen alignment — the operation is idempotent.
    pub fn calculate(&mut self) -> MoveResult<&Move3Outcome> {
        let stats = RegressionStatistics::compute(&self.pair)?;

        let observed_keys = self.observed.keys.clone();
        let observed_flows = round_flows(self.observed.flows.view(), self.round_output);

        let n1 = self.pair.n1 as i64;
        // Saturating casts: NaN → 0, ±∞ → i64::{MIN, MAX}; both end in an
        // empty or fully clamped window below.
        let ne_mean_requested = stats.equivalent_length_mean_based().round() as i64 - n1;
        let ne_var_requested = stats.equivalent_length_variance_based().round() as i64 - n1;

        let mean_based = self.build_variant(
            VariantKind::MeanBased,
            ne_mean_requested,
            &stats,
            &observed_flows,
            &observed_keys,
        )?;
        let variance_based = self.build_variant(
            VariantKind::VarianceBased,
            ne_var_requested,
            &stats,
            &observed_flows,
            &observed_keys,
        )?;
        let full_additional = self.build_variant(
            VariantKind::FullAdditional,
            self.pair.n2 as i64,
            &stats,
            &observed_flows,
            &observed_keys,
        )?;

        self.results = Some(Move3Outcome {
            stats,
            observed_keys,
            observed_flows,
            mean_based,
            variance_based,
            full_additional,
        });
        Ok(self.results.as_ref().expect("results were just stored"))
    }

    /// Cached outcome, or [`MoveError::NotCalculated`] before `calculate`.
    pub fn results(&self) -> MoveResult<&Move3Outcome> {
        self.results.as_ref().ok_or(MoveError::NotCalculated)
    }

    /// Build one extension variant from its requested effective extension
    /// count.
    ///
    /// ## Behavior
    /// - Clamps `ne_requested` into [0, n2]; a request beyond n2 sets
    ///   `clamped`.
    /// - Takes the most recent `ne` additional observations as the window
    ///   (years adjacent to the concurrent period take priority).
    /// - Computes the window moments (eqs. 8-21/8-22), intercept
    ///   (eq. 8-23), and slope-variance (eq. 8-24), then the transfer line
    ///   and composed record — or marks the variant undefined when `b²` is
    ///   non-positive or non-finite.
    fn build_variant(
        &self, kind: VariantKind, ne_requested: i64, stats: &RegressionStatistics,
        observed_flows: &[f64], observed_keys: &[TimeKey],
    ) -> MoveResult<ExtensionVariant> {
        let n2 = self.pair.n2;
        let ne = ne_requested.clamp(0, n2 as i64) as usize;
        let clamped = ne_requested > n2 as i64;

        if ne == 0 {
            return Ok(ExtensionVariant {
                kind,
                ne_requested,
                ne,
                clamped,
                extension_keys: Vec::new(),
                xe_bar: f64::NAN,
                s_sq_xe: f64::NAN,
                a: f64::NAN,
                b_sq: f64::NAN,
                b: None,
                extension_flows: None,
                extended: None,
            });
        }

        let start = n2 - ne;
        let window_log = self.pair.additional_log.slice(s![start..]);
        let extension_keys = self.pair.additional_keys[start..].to_vec();

        // Equations 8-21 and 8-22
        let xe_bar = mean(window_log);
        let s_sq_xe = variance(window_log);

        let n1 = stats.n1 as f64;
        let nef = ne as f64;

        // Equation 8-23
        let a = ((n1 + nef) * stats.mu_hat_y - n1 * stats.ybar1) / nef;

        // Equation 8-24; a singleton window leaves the denominator zero and
        // the variant undefined.
        let b_sq_num = (n1 + nef - 1.0) * stats.sigma_hat_y_sq
            - (n1 - 1.0) * stats.s_sq_y1
            - n1 * (stats.ybar1 - stats.mu_hat_y).powi(2)
            - nef * (a - stats.mu_hat_y).powi(2);
        let b_sq_den = (nef - 1.0) * s_sq_xe;
        let b_sq = b_sq_num / b_sq_den;

        if !b_sq.is_finite() || b_sq <= 0.0 {
            return Ok(ExtensionVariant {
                kind,
                ne_requested,
                ne,
                clamped,
                extension_keys,
                xe_bar,
                s_sq_xe,
                a,
                b_sq,
                b: None,
                extension_flows: None,
                extended: None,
            });
        }

        let b = b_sq.sqrt();
        let extension_log = window_log.mapv(|xi| a + b * (xi - xe_bar));
        let extension_flows = to_physical(extension_log.view(), self.round_output);
        let extended = compose(&extension_flows, &extension_keys, observed_flows, observed_keys)?;

        Ok(ExtensionVariant {
            kind,
            ne_requested,
            ne,
            clamped,
            extension_keys,
            xe_bar,
            s_sq_xe,
            a,
            b_sq,
            b: Some(b),
            extension_flows: Some(extension_flows),
            extended: Some(extended),
        })
    }
}
