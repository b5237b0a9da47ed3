//! Descriptive statistics for return series.
//!
//! Provides mean, standard deviation, covariance and Pearson correlation, plus
//! [`calculate_statistics`] which validates a pair of series and bundles the results.

use crate::types::{DeviationKind, PortfolioStatistics, ReturnSeries};
use crate::{Error, Result};

/// Minimum number of periods for a standard deviation to be defined.
pub const MIN_PERIODS: usize = 2;

/// Deviations below this fraction of the largest magnitude count as zero.
const FLAT_TOLERANCE: f64 = 1e-12;

/// Calculate statistics for two return series.
///
/// # Arguments
///
/// * `s` - Returns of the first security
/// * `t` - Returns of the second security, same length as `s`
/// * `kind` - Sample or population divisor for the deviations
///
/// # Returns
///
/// `PortfolioStatistics`, or `Error::InvalidInput` when the lengths differ or
/// fewer than two periods are supplied.
pub fn calculate_statistics(
    s: &ReturnSeries,
    t: &ReturnSeries,
    kind: DeviationKind,
) -> Result<PortfolioStatistics> {
    validate_pair(s, t)?;

    let stats = PortfolioStatistics {
        mean_s: mean(s.values()),
        mean_t: mean(t.values()),
        std_dev_s: std_dev(s.values(), kind),
        std_dev_t: std_dev(t.values(), kind),
        covariance: covariance(s.values(), t.values(), kind),
        correlation: correlation(s.values(), t.values()),
        deviation: kind,
        periods: s.len(),
    };

    tracing::debug!(
        mean_s = stats.mean_s,
        mean_t = stats.mean_t,
        std_dev_s = stats.std_dev_s,
        std_dev_t = stats.std_dev_t,
        correlation = stats.correlation,
        "computed pair statistics"
    );

    Ok(stats)
}

/// Check that two series can be compared period by period.
pub fn validate_pair(s: &ReturnSeries, t: &ReturnSeries) -> Result<()> {
    if s.len() != t.len() {
        return Err(Error::InvalidInput(format!(
            "{} has {} returns but {} has {}",
            s.name(),
            s.len(),
            t.name(),
            t.len()
        )));
    }

    if s.len() < MIN_PERIODS {
        return Err(Error::InvalidInput(format!(
            "Need at least {} returns per security, got {}",
            MIN_PERIODS,
            s.len()
        )));
    }

    Ok(())
}

/// Arithmetic mean. Returns 0.0 for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Variance with the given divisor convention.
///
/// Returns 0.0 when there are not enough values for the divisor.
pub fn variance(values: &[f64], kind: DeviationKind) -> f64 {
    covariance(values, values, kind)
}

/// Standard deviation with the given divisor convention.
pub fn std_dev(values: &[f64], kind: DeviationKind) -> f64 {
    variance(values, kind).sqrt()
}

/// Covariance of two equally long slices.
///
/// Only the common prefix is used if the lengths differ; callers that need
/// strict checking go through [`validate_pair`] first.
pub fn covariance(a: &[f64], b: &[f64], kind: DeviationKind) -> f64 {
    let n = a.len().min(b.len());
    if n <= kind.ddof() {
        return 0.0;
    }

    let mean_a = mean(&a[..n]);
    let mean_b = mean(&b[..n]);
    let sum: f64 = a
        .iter()
        .zip(b)
        .map(|(x, y)| (x - mean_a) * (y - mean_b))
        .sum();

    sum / (n - kind.ddof()) as f64
}

/// Pearson correlation coefficient.
///
/// The divisor cancels, so the result does not depend on the deviation
/// convention. A series with zero variance has no linear relationship to
/// anything and yields 0.0. The result is clamped to [-1, 1].
pub fn correlation(a: &[f64], b: &[f64]) -> f64 {
    let cov = covariance(a, b, DeviationKind::Population);
    let sd_a = std_dev(a, DeviationKind::Population);
    let sd_b = std_dev(b, DeviationKind::Population);

    if is_flat(a, sd_a) || is_flat(b, sd_b) {
        return 0.0;
    }

    (cov / (sd_a * sd_b)).clamp(-1.0, 1.0)
}

/// Whether a deviation is rounding residue of a constant series.
fn is_flat(values: &[f64], sd: f64) -> bool {
    let scale = values.iter().fold(1.0_f64, |acc, v| acc.max(v.abs()));
    sd <= FLAT_TOLERANCE * scale
}
