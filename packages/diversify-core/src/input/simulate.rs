//! Seeded simulation of annual returns.

use super::YEARS;
use crate::types::ReturnSeries;
use crate::{Error, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

/// Parameters of the bivariate normal used to draw returns.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimulationParams {
    /// Number of periods to draw
    pub periods: usize,
    /// Mean return of S
    pub mean_s: f64,
    /// Volatility of S
    pub vol_s: f64,
    /// Mean return of T
    pub mean_t: f64,
    /// Volatility of T
    pub vol_t: f64,
    /// Correlation between the draws, in [-1, 1]
    pub correlation: f64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            periods: YEARS,
            mean_s: 0.08,
            vol_s: 0.15,
            mean_t: 0.06,
            vol_t: 0.10,
            correlation: 0.0,
        }
    }
}

impl SimulationParams {
    fn validate(&self) -> Result<()> {
        if self.periods < crate::stats::MIN_PERIODS {
            return Err(Error::InvalidInput(format!(
                "Simulation needs at least {} periods, got {}",
                crate::stats::MIN_PERIODS,
                self.periods
            )));
        }

        let finite = [self.mean_s, self.vol_s, self.mean_t, self.vol_t, self.correlation]
            .iter()
            .all(|v| v.is_finite());
        if !finite || self.vol_s < 0.0 || self.vol_t < 0.0 {
            return Err(Error::InvalidInput(
                "Simulation means must be finite and volatilities non-negative".to_string(),
            ));
        }

        if !(-1.0..=1.0).contains(&self.correlation) {
            return Err(Error::InvalidInput(format!(
                "Simulation correlation must be in [-1, 1], got {}",
                self.correlation
            )));
        }

        Ok(())
    }
}

/// Draw two return series from a seeded bivariate normal.
///
/// The same `seed` and `params` always produce the same series. Correlation
/// is introduced by mixing two independent standard normals:
/// z_T = r·z_S + sqrt(1 - r²)·z.
pub fn simulate(params: &SimulationParams, seed: u64) -> Result<(ReturnSeries, ReturnSeries)> {
    params.validate()?;

    let mut rng = StdRng::seed_from_u64(seed);
    let mix = (1.0 - params.correlation.powi(2)).sqrt();

    let mut values_s = Vec::with_capacity(params.periods);
    let mut values_t = Vec::with_capacity(params.periods);

    for _ in 0..params.periods {
        let z_s: f64 = rng.sample(StandardNormal);
        let z: f64 = rng.sample(StandardNormal);
        let z_t = params.correlation * z_s + mix * z;

        values_s.push(params.mean_s + params.vol_s * z_s);
        values_t.push(params.mean_t + params.vol_t * z_t);
    }

    tracing::debug!(seed, periods = params.periods, "simulated returns");

    Ok((
        ReturnSeries::new("S", values_s)?,
        ReturnSeries::new("T", values_t)?,
    ))
}
