//! Integration tests for MOVE.1 / MOVE.3 record extension.
//!
//! Purpose
//! -------
//! - Validate the end-to-end pipeline: from validated station series,
//!   through alignment and the estimator models, to composed extended
//!   records in physical units.
//! - Exercise fixtures whose expected values follow in closed form, rather
//!   than toy edge cases only: a perfectly correlated pair (every variant
//!   borrows the full additional period and reproduces the long record)
//!   and an exactly uncorrelated pair (the effective-length variants go
//!   undefined while the full-additional variant survives).
//!
//! Coverage
//! --------
//! - `extension::core`:
//!   - `StationSeries` construction for water-year and calendar-date keys.
//!   - `AlignedPair` partitioning through the models' public surface.
//! - `extension::models::move1::Move1Model`:
//!   - Transfer parameters, diagnostics, whole-additional-set extension,
//!     and caller-side composition.
//! - `extension::models::move3::Move3Model`:
//!   - The statistics bundle, per-variant effective lengths, windows,
//!     transfer lines, composed records, and per-variant isolation of
//!     undefined results.
//!
//! Exclusions
//! ----------
//! - Fine-grained validation of low-level building blocks (moments,
//!   regression primitives, composer length checks) — covered by unit
//!   tests.
//! - Python bindings — exercised by Python-level smoke tests.
use chrono::NaiveDate;
use rust_streamflow::extension::{
    core::compose::compose,
    core::data::{StationSeries, TimeKey},
    errors::MoveError,
    models::move1::Move1Model,
    models::move3::Move3Model,
};

/// Purpose
/// -------
/// Build a water-year series from parallel year / flow slices, panicking
/// on invalid input (treated as a test-authoring error).
fn series(years: &[i32], flows: &[f64]) -> StationSeries {
    StationSeries::from_water_years(years.to_vec(), flows.to_vec())
        .expect("fixture series should be valid")
}

/// Purpose
/// -------
/// Perfectly correlated station pair: the long record spans 1955–1969
/// with flows 10^1 … 10^15, and the short record covers 1960–1969 with
/// flows identical to the long record's.
///
/// Closed form
/// -----------
/// - n1 = 10, n2 = 5, β̂ = ρ̂ = 1.
/// - Both effective total record lengths equal n1 + n2 = 15, so every
///   MOVE.3 variant borrows all five additional years.
/// - Every variant's transfer line is a = x̄2, b = 1, so the extension
///   reproduces the long record's additional flows exactly.
fn perfect_correlation_pair() -> (StationSeries, StationSeries) {
    let long_years: Vec<i32> = (1955..=1969).collect();
    let long_flows: Vec<f64> = (1..=15).map(|k| 10f64.powi(k)).collect();
    let short_years: Vec<i32> = (1960..=1969).collect();
    let short_flows: Vec<f64> = (6..=15).map(|k| 10f64.powi(k)).collect();
    (series(&short_years, &short_flows), series(&long_years, &long_flows))
}

/// Purpose
/// -------
/// Exactly uncorrelated station pair: over the concurrent years
/// 1953–1962 the long record's log values run 1…10 while the short
/// record's form the palindrome [1,2,3,4,5,5,4,3,2,1], whose deviations
/// cancel the covariance term by term. The additional years 1950–1952
/// carry long log values 11, 12, 13.
///
/// Closed form
/// -----------
/// - β̂ = ρ̂ = 0 exactly.
/// - Mean-based effective total: 10/(1 + 3/91) ≈ 9.68 → rounds to 10 →
///   zero extension years (undefined variant). The variance-based total
///   rounds to 10 the same way.
/// - Full-additional variant: ne = 3, a = 3, b² = 45/14.
fn uncorrelated_pair() -> (StationSeries, StationSeries) {
    let long_years: Vec<i32> = (1950..=1962).collect();
    let long_logs = [11, 12, 13, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
    let long_flows: Vec<f64> = long_logs.iter().map(|&k| 10f64.powi(k)).collect();

    let short_years: Vec<i32> = (1953..=1962).collect();
    let short_logs = [1, 2, 3, 4, 5, 5, 4, 3, 2, 1];
    let short_flows: Vec<f64> = short_logs.iter().map(|&k| 10f64.powi(k)).collect();

    (series(&short_years, &short_flows), series(&long_years, &long_flows))
}

#[test]
// Purpose
// -------
// Run MOVE.1 end-to-end on an exact log-integer fixture and compose the
// extended record on the caller side, as the MOVE.1 contract expects.
//
// Given
// -----
// - Concurrent short logs [1, 3, 2] against long logs [2, 4, 3]; two
//   additional long years with logs 5 and 6.
//
// Expect
// ------
// - slope = 1, intercept = 2, β̂ = ρ̂ = 1.
// - Extension flows 10^4 and 10^5 for the two additional years.
// - Caller-side composition yields a chronologically ordered record of
//   extension + observed segments.
fn move1_pipeline_extends_and_composes_exact_fixture() {
    let short = series(&[1953, 1954, 1955], &[10.0, 1000.0, 100.0]);
    let long = series(
        &[1951, 1952, 1953, 1954, 1955],
        &[100000.0, 1000000.0, 100.0, 10000.0, 1000.0],
    );

    let mut model = Move1Model::new(&short, &long, true).expect("alignment should succeed");
    let outcome = model.calculate().expect("calculation should succeed");

    assert!((outcome.slope - 1.0).abs() < 1e-12);
    assert!((outcome.intercept - 2.0).abs() < 1e-12);
    assert!((outcome.beta_hat - 1.0).abs() < 1e-12);
    assert!((outcome.p_hat - 1.0).abs() < 1e-12);

    let extension_years: Vec<i32> = outcome.extension_keys.iter().map(TimeKey::year).collect();
    assert_eq!(extension_years, vec![1951, 1952]);
    assert_eq!(outcome.extension_flows, vec![10000.0, 100000.0]);

    let record = compose(
        &outcome.extension_flows,
        &outcome.extension_keys,
        &outcome.observed_flows,
        &outcome.observed_keys,
    )
    .expect("segments are length-consistent");

    let years: Vec<i32> = record.keys.iter().map(TimeKey::year).collect();
    assert_eq!(years, vec![1951, 1952, 1953, 1954, 1955]);
    assert!(years.windows(2).all(|w| w[0] < w[1]), "composed record is chronological");
    assert_eq!(record.flows, vec![10000.0, 100000.0, 10.0, 1000.0, 100.0]);
}

#[test]
// Purpose
// -------
// Run MOVE.1 on a calendar-date keyed pair, the daily-record use case.
//
// Given
// -----
// - Three concurrent days with short logs [1, 3, 2] against long logs
//   [2, 4, 3], one earlier additional day with long log 5.
//
// Expect
// ------
// - The same transfer arithmetic as the water-year fixture: one
//   extension value of 10^4 keyed to the additional date.
fn move1_pipeline_supports_calendar_date_keys() {
    let day = |d: u32| NaiveDate::from_ymd_opt(1987, 6, d).expect("valid fixture date");
    let short = StationSeries::from_dates(vec![day(2), day(3), day(4)], vec![10.0, 1000.0, 100.0])
        .expect("fixture series should be valid");
    let long = StationSeries::from_dates(
        vec![day(1), day(2), day(3), day(4)],
        vec![100000.0, 100.0, 10000.0, 1000.0],
    )
    .expect("fixture series should be valid");

    let mut model = Move1Model::new(&short, &long, true).expect("alignment should succeed");
    let outcome = model.calculate().expect("calculation should succeed");

    assert!((outcome.slope - 1.0).abs() < 1e-12);
    assert_eq!(outcome.extension_keys, vec![TimeKey::Date(day(1))]);
    assert_eq!(outcome.extension_flows, vec![10000.0]);
}

#[test]
// Purpose
// -------
// Run MOVE.3 end-to-end on the perfectly correlated pair: a fully
// informative long record is borrowed in full by every variant, and the
// composed records splice the reproduced long flows ahead of the observed
// short record.
//
// Given
// -----
// - The perfect-correlation fixture, rounding enabled.
//
// Expect
// ------
// - ρ̂ = 1; every variant defined, unclamped, with ne = n2 = 5 and a
//   window of exactly ne keys.
// - Extension flows reproduce the long record's additional flows.
// - Each extended record is chronological: 1955–1969, extension first.
fn move3_pipeline_borrows_everything_at_perfect_correlation() {
    let (short, long) = perfect_correlation_pair();
    let mut model = Move3Model::new(&short, &long, true).expect("preconditions hold");
    let outcome = model.calculate().expect("calculation should succeed");

    assert!((outcome.stats.p_hat - 1.0).abs() < 1e-12);

    let expected_extension = [10.0, 100.0, 1000.0, 10000.0, 100000.0];
    for variant in outcome.variants() {
        assert!(variant.is_defined(), "{:?} should be defined", variant.kind);
        assert!(!variant.clamped);
        assert_eq!(variant.ne, 5);
        assert_eq!(variant.extension_keys.len(), variant.ne);

        let flows = variant.extension_flows.as_ref().expect("defined variant has flows");
        for (flow, want) in flows.iter().zip(expected_extension) {
            assert!((flow - want).abs() / want < 1e-9, "{:?}: {flow} vs {want}", variant.kind);
        }

        let record = variant.extended.as_ref().expect("defined variant has a record");
        assert_eq!(record.len(), 15);
        let years: Vec<i32> = record.keys.iter().map(TimeKey::year).collect();
        assert_eq!(years, (1955..=1969).collect::<Vec<i32>>());
        assert!(years.windows(2).all(|w| w[0] < w[1]), "extended record is chronological");
    }
}

#[test]
// Purpose
// -------
// Verify per-variant isolation on the exactly uncorrelated pair: both
// effective-length variants come back undefined (an uninformative long
// record earns no borrowed years) while the full-additional variant
// remains defined, per the best-effort policy.
//
// Given
// -----
// - The uncorrelated fixture, rounding disabled.
//
// Expect
// ------
// - β̂ = ρ̂ = 0 exactly.
// - Mean- and variance-based variants: ne = 0, undefined, no records.
// - Full-additional variant: defined with ne = 3, a ≈ 3, b² ≈ 45/14, a
//   mid-window extension flow of 10^3, and a 13-entry extended record.
fn move3_pipeline_isolates_undefined_variants_on_uncorrelated_pair() {
    let (short, long) = uncorrelated_pair();
    let mut model = Move3Model::new(&short, &long, false).expect("preconditions hold");
    let outcome = model.calculate().expect("calculation should succeed");

    assert_eq!(outcome.stats.beta_hat, 0.0);
    assert_eq!(outcome.stats.p_hat, 0.0);

    for variant in [&outcome.mean_based, &outcome.variance_based] {
        assert!(!variant.is_defined(), "{:?} should be undefined", variant.kind);
        assert_eq!(variant.ne, 0, "{:?}: ne = {}", variant.kind, variant.ne);
        assert!(variant.ne_requested <= 0);
        assert!(!variant.clamped);
        assert!(variant.a.is_nan());
        assert_eq!(variant.extension_flows, None);
        assert_eq!(variant.extended, None);
    }

    let full = &outcome.full_additional;
    assert!(full.is_defined());
    assert_eq!(full.ne, 3);
    assert!((full.a - 3.0).abs() < 1e-9, "a = {}", full.a);
    assert!((full.b_sq - 45.0 / 14.0).abs() < 1e-9, "b_sq = {}", full.b_sq);

    let flows = full.extension_flows.as_ref().expect("full variant has flows");
    assert!((flows[1] - 1000.0).abs() / 1000.0 < 1e-9, "mid-window flow = {}", flows[1]);

    let record = full.extended.as_ref().expect("full variant has a record");
    assert_eq!(record.len(), 13);
    let years: Vec<i32> = record.keys.iter().map(TimeKey::year).collect();
    assert_eq!(years, (1950..=1962).collect::<Vec<i32>>());
}

#[test]
// Purpose
// -------
// Verify calculation idempotence through the public surface for both
// estimators: a second `calculate()` reproduces the first outcome
// exactly.
//
// Given
// -----
// - The perfect-correlation fixture for both models (its outcome carries
//   no NaN sentinels, so exact equality is meaningful).
//
// Expect
// ------
// - Identical outcomes across invocations.
fn calculate_is_idempotent_for_both_estimators() {
    let (short, long) = perfect_correlation_pair();

    let mut move1 = Move1Model::new(&short, &long, true).expect("alignment should succeed");
    let first = move1.calculate().expect("calculation should succeed").clone();
    let second = move1.calculate().expect("calculation should succeed").clone();
    assert_eq!(first, second);

    let mut move3 = Move3Model::new(&short, &long, true).expect("preconditions hold");
    let first = move3.calculate().expect("calculation should succeed").clone();
    let second = move3.calculate().expect("calculation should succeed").clone();
    assert_eq!(first, second);
}

#[test]
// Purpose
// -------
// Exercise the fatal error taxonomy through the public surface: invalid
// series construction, insufficient overlap, and MOVE.3 preconditions.
//
// Given
// -----
// - An unsorted year vector, a one-year overlap, and a concurrent period
//   of exactly 8 years.
//
// Expect
// ------
// - NonIncreasingKeys, InsufficientOverlap { required: 2 }, and
//   InsufficientOverlap { required: 9 } respectively.
fn fatal_errors_surface_through_public_api() {
    let unsorted = StationSeries::from_water_years(vec![1950, 1949], vec![1.0, 2.0]);
    assert_eq!(unsorted.unwrap_err(), MoveError::NonIncreasingKeys { index: 1 });

    let long = series(&[1950, 1951, 1952], &[10.0, 20.0, 30.0]);
    let barely = series(&[1952, 1953], &[5.0, 6.0]);
    assert_eq!(
        Move1Model::new(&barely, &long, true).unwrap_err(),
        MoveError::InsufficientOverlap { n1: 1, required: 2 }
    );

    let long_years: Vec<i32> = (1950..=1965).collect();
    let long_flows: Vec<f64> = (1..=16).map(|k| 10f64.powi(k)).collect();
    let long = series(&long_years, &long_flows);
    let short_years: Vec<i32> = (1958..=1965).collect();
    let short_flows: Vec<f64> = (9..=16).map(|k| 10f64.powi(k)).collect();
    let short = series(&short_years, &short_flows);
    assert_eq!(
        Move3Model::new(&short, &long, true).unwrap_err(),
        MoveError::InsufficientOverlap { n1: 8, required: 9 }
    );
}
