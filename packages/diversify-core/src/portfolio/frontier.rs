//! Risk and return across portfolio weightings.

use super::grid::{weight_label, WeightGrid};
use crate::stats::calculate_statistics;
use crate::types::{
    DeviationKind, DiversificationBenefit, FrontierAnalysis, MinimumVariance, PortfolioStatistics,
    ReturnSeries, WeightedPortfolio,
};
use crate::{Error, Result};

/// Risk differences smaller than this are ties.
const RISK_TOLERANCE: f64 = 1e-12;

/// Run the full two-security analysis.
///
/// # Arguments
///
/// * `s` - Returns of the first security
/// * `t` - Returns of the second security
/// * `grid` - Weights to evaluate (weight is the share held in `s`)
/// * `kind` - Sample or population deviations
///
/// # Returns
///
/// `FrontierAnalysis` with one portfolio per grid weight, the lowest-risk grid
/// point, the exact minimum-variance mix and the diversification benefit.
pub fn analyze(
    s: &ReturnSeries,
    t: &ReturnSeries,
    grid: &WeightGrid,
    kind: DeviationKind,
) -> Result<FrontierAnalysis> {
    let statistics = calculate_statistics(s, t, kind)?;

    let mut portfolios: Vec<WeightedPortfolio> = grid
        .weights()
        .into_iter()
        .map(|w| weighted_portfolio(&statistics, w, weight_label(w, s.name(), t.name())))
        .collect();

    mark_efficient(&mut portfolios);

    // Scan from w = 0 upward; only a strictly lower risk replaces the current best
    let min_risk = portfolios
        .iter()
        .skip(1)
        .fold(portfolios.first(), |best, p| match best {
            Some(b) if p.risk < b.risk - RISK_TOLERANCE => Some(p),
            _ => best,
        })
        .cloned()
        .ok_or_else(|| Error::InvalidInput("Weight grid produced no portfolios".to_string()))?;

    let benefit = DiversificationBenefit {
        min_portfolio_risk: min_risk.risk,
        s_risk_reduction: statistics.std_dev_s - min_risk.risk,
        t_risk_reduction: statistics.std_dev_t - min_risk.risk,
    };

    tracing::debug!(
        points = portfolios.len(),
        min_weight = min_risk.weight,
        min_risk = min_risk.risk,
        "evaluated weight grid"
    );

    Ok(FrontierAnalysis {
        security_s: s.name().to_string(),
        security_t: t.name().to_string(),
        minimum_variance: minimum_variance(&statistics),
        statistics,
        portfolios,
        min_risk,
        benefit,
    })
}

/// Expected return and risk of holding `weight` in S and `1 - weight` in T.
pub fn weighted_portfolio(
    stats: &PortfolioStatistics,
    weight: f64,
    label: impl Into<String>,
) -> WeightedPortfolio {
    let expected_return = weight * stats.mean_s + (1.0 - weight) * stats.mean_t;
    let variance = portfolio_variance(stats, weight);

    WeightedPortfolio {
        label: label.into(),
        weight,
        expected_return,
        variance,
        risk: variance.sqrt(),
        efficient: false,
    }
}

/// Two-asset portfolio variance.
///
/// w²σ_S² + (1-w)²σ_T² + 2w(1-w)σ_Sσ_T·r, floored at zero so that rounding
/// near a perfect hedge never yields a negative variance.
pub fn portfolio_variance(stats: &PortfolioStatistics, weight: f64) -> f64 {
    let w_s = weight;
    let w_t = 1.0 - weight;
    let sd_s = stats.std_dev_s;
    let sd_t = stats.std_dev_t;

    let variance = w_s.powi(2) * sd_s.powi(2)
        + w_t.powi(2) * sd_t.powi(2)
        + 2.0 * w_s * w_t * sd_s * sd_t * stats.correlation;

    variance.max(0.0)
}

/// Closed-form global minimum-variance weight in S, clamped to [0, 1].
///
/// w* = (σ_T² - σ_Sσ_T·r) / (σ_S² + σ_T² - 2σ_Sσ_T·r). When the denominator
/// vanishes every mix carries the same risk and w* = 0.
pub fn minimum_variance(stats: &PortfolioStatistics) -> MinimumVariance {
    let sd_s = stats.std_dev_s;
    let sd_t = stats.std_dev_t;
    let cross = sd_s * sd_t * stats.correlation;

    let denominator = sd_s.powi(2) + sd_t.powi(2) - 2.0 * cross;
    let weight = if denominator <= RISK_TOLERANCE * (sd_s.powi(2) + sd_t.powi(2)).max(1.0) {
        0.0
    } else {
        ((sd_t.powi(2) - cross) / denominator).clamp(0.0, 1.0)
    };

    let point = weighted_portfolio(stats, weight, String::new());
    MinimumVariance {
        weight,
        expected_return: point.expected_return,
        risk: point.risk,
    }
}

/// Flag every portfolio that no other grid point dominates.
///
/// A point is dominated when another offers at least the same return for at
/// most the same risk, and is strictly better on one of the two.
fn mark_efficient(portfolios: &mut [WeightedPortfolio]) {
    let flags: Vec<bool> = portfolios
        .iter()
        .map(|p| {
            !portfolios.iter().any(|q| {
                let no_worse = q.expected_return >= p.expected_return - RISK_TOLERANCE
                    && q.risk <= p.risk + RISK_TOLERANCE;
                let better = q.expected_return > p.expected_return + RISK_TOLERANCE
                    || q.risk < p.risk - RISK_TOLERANCE;
                no_worse && better
            })
        })
        .collect();

    for (portfolio, efficient) in portfolios.iter_mut().zip(flags) {
        portfolio.efficient = efficient;
    }
}
