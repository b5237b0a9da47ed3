//! Core data types for the diversification calculator.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Ordered returns for one security, as decimals (0.066 for 6.6%).
///
/// Immutable once built: the values are only reachable through a slice.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ReturnSeries {
    /// Display name of the security
    name: String,
    /// Periodic returns, oldest first
    values: Vec<f64>,
}

impl ReturnSeries {
    /// Create a series, rejecting NaN and infinite returns.
    pub fn new(name: &str, values: Vec<f64>) -> Result<Self> {
        if let Some(idx) = values.iter().position(|v| !v.is_finite()) {
            return Err(Error::InvalidInput(format!(
                "{} return #{} is not a finite number",
                name,
                idx + 1
            )));
        }

        Ok(Self {
            name: name.to_string(),
            values,
        })
    }

    /// Create a series from values already known to be finite.
    pub(crate) fn from_finite(name: &str, values: Vec<f64>) -> Self {
        debug_assert!(values.iter().all(|v| v.is_finite()));
        Self {
            name: name.to_string(),
            values,
        }
    }

    /// Create a series from percentages (6.6 becomes 0.066).
    pub fn from_percent(name: &str, percents: &[f64]) -> Result<Self> {
        Self::new(name, percents.iter().map(|p| p / 100.0).collect())
    }

    /// Name of the security.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns in period order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of periods.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series has no periods.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Divisor convention for variance and standard deviation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeviationKind {
    /// Divide by N - 1
    #[default]
    Sample,
    /// Divide by N (the textbook convention)
    Population,
}

impl DeviationKind {
    /// Degrees of freedom subtracted from the period count.
    pub fn ddof(self) -> usize {
        match self {
            DeviationKind::Sample => 1,
            DeviationKind::Population => 0,
        }
    }
}

/// Descriptive statistics for a pair of return series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PortfolioStatistics {
    /// Mean return of S
    pub mean_s: f64,
    /// Mean return of T
    pub mean_t: f64,
    /// Standard deviation of S
    pub std_dev_s: f64,
    /// Standard deviation of T
    pub std_dev_t: f64,
    /// Covariance of S and T (same divisor as the deviations)
    pub covariance: f64,
    /// Pearson correlation, within [-1, 1]
    pub correlation: f64,
    /// Divisor convention used for the deviations
    pub deviation: DeviationKind,
    /// Number of periods in each series
    pub periods: usize,
}

/// A two-security portfolio with `weight` in S and `1 - weight` in T.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeightedPortfolio {
    /// Human-readable label, e.g. "60/40"
    pub label: String,
    /// Weight assigned to S
    pub weight: f64,
    /// Expected return: w * mean(S) + (1 - w) * mean(T)
    pub expected_return: f64,
    /// Portfolio variance
    pub variance: f64,
    /// Portfolio standard deviation
    pub risk: f64,
    /// Whether the point lies on the efficient part of the frontier
    pub efficient: bool,
}

/// Closed-form global minimum-variance mix.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MinimumVariance {
    /// Weight in S, clamped to [0, 1]
    pub weight: f64,
    /// Expected return at that weight
    pub expected_return: f64,
    /// Risk at that weight
    pub risk: f64,
}

/// Risk removed by holding the minimum-risk mix instead of a single security.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DiversificationBenefit {
    /// Lowest risk found on the weight grid
    pub min_portfolio_risk: f64,
    /// std_dev(S) minus the minimum risk
    pub s_risk_reduction: f64,
    /// std_dev(T) minus the minimum risk
    pub t_risk_reduction: f64,
}

/// Complete output of a two-security analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrontierAnalysis {
    /// Name of the first security
    pub security_s: String,
    /// Name of the second security
    pub security_t: String,
    /// Summary statistics
    pub statistics: PortfolioStatistics,
    /// One entry per grid weight, ascending in weight
    pub portfolios: Vec<WeightedPortfolio>,
    /// Grid point with the lowest risk
    pub min_risk: WeightedPortfolio,
    /// Exact minimum-variance mix
    pub minimum_variance: MinimumVariance,
    /// Diversification benefit relative to the single securities
    pub benefit: DiversificationBenefit,
}

impl FrontierAnalysis {
    /// Efficient grid points, ordered by increasing risk.
    pub fn efficient_points(&self) -> Vec<&WeightedPortfolio> {
        let mut points: Vec<&WeightedPortfolio> =
            self.portfolios.iter().filter(|p| p.efficient).collect();
        points.sort_by(|a, b| a.risk.total_cmp(&b.risk));
        points
    }
}

/// API response wrapper for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response.
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_series_from_percent() {
        let series = ReturnSeries::from_percent("S", &[6.6, -9.0]).unwrap();
        assert_eq!(series.name(), "S");
        assert_eq!(series.len(), 2);
        assert_relative_eq!(series.values()[0], 0.066, epsilon = 1e-12);
        assert_relative_eq!(series.values()[1], -0.09, epsilon = 1e-12);
    }

    #[test]
    fn test_series_rejects_non_finite() {
        let result = ReturnSeries::new("T", vec![0.1, f64::NAN, 0.2]);
        match result {
            Err(Error::InvalidInput(msg)) => assert!(msg.contains("#2")),
            other => panic!("expected InvalidInput, got {:?}", other),
        }

        assert!(ReturnSeries::new("T", vec![f64::INFINITY]).is_err());
    }

    #[test]
    fn test_deviation_kind_ddof() {
        assert_eq!(DeviationKind::Sample.ddof(), 1);
        assert_eq!(DeviationKind::Population.ddof(), 0);
        assert_eq!(DeviationKind::default(), DeviationKind::Sample);
    }

    #[test]
    fn test_deviation_kind_serde() {
        let json = serde_json::to_string(&DeviationKind::Population).unwrap();
        assert_eq!(json, "\"population\"");
    }

    #[test]
    fn test_api_response() {
        let response: ApiResponse<String> = ApiResponse::ok("test".to_string());
        assert!(response.ok);
        assert_eq!(response.data, Some("test".to_string()));

        let err_response: ApiResponse<String> = ApiResponse::err("error");
        assert!(!err_response.ok);
        assert_eq!(err_response.error, Some("error".to_string()));
    }
}
