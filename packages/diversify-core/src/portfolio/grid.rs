//! Weight grid over the [0, 1] interval.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default spacing between grid weights.
pub const DEFAULT_STEP: f64 = 0.1;

/// Spacing of the six-portfolio table (100/0, 80/20, ..., 0/100).
pub const TEXTBOOK_STEP: f64 = 0.2;

/// Largest number of weights a grid may hold (a step of 0.0001).
pub const MAX_POINTS: usize = 10_001;

/// Ratios closer than this to a whole number are treated as whole.
const SNAP_TOLERANCE: f64 = 1e-9;

/// Most decimals shown in the percentage split of a label.
const MAX_LABEL_DECIMALS: usize = 4;

/// Evenly spaced weights from 0 to 1 inclusive.
///
/// Deserialises from a bare step and goes through [`WeightGrid::new`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "f64", into = "f64")]
pub struct WeightGrid {
    step: f64,
}

impl WeightGrid {
    /// Create a grid with the given step, which must lie in (0, 1] and
    /// produce at most [`MAX_POINTS`] weights.
    pub fn new(step: f64) -> Result<Self> {
        if !step.is_finite() || step <= 0.0 || step > 1.0 {
            return Err(Error::InvalidInput(format!(
                "Weight step must be in (0, 1], got {}",
                step
            )));
        }

        if 1.0 / step > (MAX_POINTS - 1) as f64 + SNAP_TOLERANCE {
            return Err(Error::InvalidInput(format!(
                "Weight step {} gives more than {} portfolios",
                step, MAX_POINTS
            )));
        }

        Ok(Self { step })
    }

    /// The six-portfolio grid used by the textbook table.
    pub fn textbook() -> Self {
        Self {
            step: TEXTBOOK_STEP,
        }
    }

    /// Spacing between weights.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Generate the weights in ascending order.
    ///
    /// Each weight is computed as `i * step` rather than by repeated addition,
    /// and the sequence always ends exactly at 1.0, even when the step does not
    /// divide the interval evenly.
    pub fn weights(&self) -> Vec<f64> {
        let ratio = 1.0 / self.step;
        let whole = if (ratio - ratio.round()).abs() < SNAP_TOLERANCE {
            ratio.round()
        } else {
            ratio.floor()
        } as usize;

        let mut weights: Vec<f64> = (0..=whole)
            .map(|i| (i as f64 * self.step).min(1.0))
            .collect();

        match weights.last_mut() {
            Some(last) if (1.0 - *last) < SNAP_TOLERANCE => *last = 1.0,
            _ => weights.push(1.0),
        }

        weights
    }

    /// Number of weights on the grid.
    pub fn len(&self) -> usize {
        self.weights().len()
    }

    /// A grid always holds at least the two endpoints.
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Default for WeightGrid {
    fn default() -> Self {
        Self { step: DEFAULT_STEP }
    }
}

impl TryFrom<f64> for WeightGrid {
    type Error = Error;

    fn try_from(step: f64) -> Result<Self> {
        Self::new(step)
    }
}

impl From<WeightGrid> for f64 {
    fn from(grid: WeightGrid) -> Self {
        grid.step
    }
}

/// Label a weighting the way the textbook table does.
///
/// Only the exact endpoints read "All S (100/0)" and "All T (0/100)".
/// Everything in between is the percentage split, e.g. "60/40", with as many
/// decimals as the weight needs ("0.4/99.6", "50.1/49.9").
pub fn weight_label(weight: f64, name_s: &str, name_t: &str) -> String {
    if weight >= 1.0 {
        return format!("All {} (100/0)", name_s);
    }
    if weight <= 0.0 {
        return format!("All {} (0/100)", name_t);
    }

    let pct_s = weight * 100.0;
    let decimals = (0..MAX_LABEL_DECIMALS)
        .find(|&d| {
            let scaled = pct_s * 10f64.powi(d as i32);
            (scaled - scaled.round()).abs() < 1e-6
        })
        .unwrap_or(MAX_LABEL_DECIMALS);

    format!(
        "{:.*}/{:.*}",
        decimals,
        pct_s,
        decimals,
        100.0 - pct_s
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_grid() {
        let weights = WeightGrid::default().weights();

        assert_eq!(weights.len(), 11);
        assert_eq!(weights[0], 0.0);
        assert_eq!(weights[10], 1.0);
        assert_relative_eq!(weights[3], 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_textbook_grid() {
        let weights = WeightGrid::textbook().weights();
        assert_eq!(weights.len(), 6);
        assert_relative_eq!(weights[4], 0.8, epsilon = 1e-12);
        assert_eq!(weights[5], 1.0);
    }

    #[test]
    fn test_uneven_step_still_ends_at_one() {
        let weights = WeightGrid::new(0.3).unwrap().weights();

        // 0, 0.3, 0.6, 0.9, 1.0
        assert_eq!(weights.len(), 5);
        assert_relative_eq!(weights[3], 0.9, epsilon = 1e-12);
        assert_eq!(weights[4], 1.0);
    }

    #[test]
    fn test_step_of_one() {
        let weights = WeightGrid::new(1.0).unwrap().weights();
        assert_eq!(weights, vec![0.0, 1.0]);
    }

    #[test]
    fn test_fine_grid_has_no_drift() {
        let weights = WeightGrid::new(0.01).unwrap().weights();
        assert_eq!(weights.len(), 101);
        assert_eq!(*weights.last().unwrap(), 1.0);
        assert!(weights.windows(2).all(|w| w[1] > w[0]));
    }

    #[test]
    fn test_invalid_steps() {
        for step in [0.0, -0.1, 1.5, f64::NAN, f64::INFINITY, 1e-300, 1e-9] {
            assert!(
                matches!(WeightGrid::new(step), Err(Error::InvalidInput(_))),
                "step {} should be rejected",
                step
            );
        }
    }

    #[test]
    fn test_weight_labels() {
        assert_eq!(weight_label(1.0, "S", "T"), "All S (100/0)");
        assert_eq!(weight_label(0.0, "S", "T"), "All T (0/100)");
        assert_eq!(weight_label(0.6, "S", "T"), "60/40");
        assert_eq!(weight_label(0.3, "S", "T"), "30/70");
    }

    #[test]
    fn test_tiny_step_rejected_before_generating() {
        let result = WeightGrid::new(1e-300);
        match result {
            Err(Error::InvalidInput(msg)) => assert!(msg.contains("10001")),
            other => panic!("expected InvalidInput, got {:?}", other),
        }

        let finest = WeightGrid::new(1e-4).unwrap();
        assert_eq!(finest.weights().len(), MAX_POINTS);
    }

    #[test]
    fn test_fine_grid_labels() {
        assert_eq!(weight_label(0.004, "S", "T"), "0.4/99.6");
        assert_eq!(weight_label(0.996, "S", "T"), "99.6/0.4");
        assert_ne!(weight_label(0.501, "S", "T"), weight_label(0.504, "S", "T"));
        assert_eq!(weight_label(0.501, "S", "T"), "50.1/49.9");

        let weights = WeightGrid::new(0.001).unwrap().weights();
        let labels: Vec<String> = weights.iter().map(|&w| weight_label(w, "S", "T")).collect();
        let endpoints = labels.iter().filter(|l| l.starts_with("All")).count();
        assert_eq!(endpoints, 2);

        let mut unique = labels.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), labels.len());
    }

    #[test]
    fn test_deserialize_validates_step() {
        let grid: WeightGrid = serde_json::from_str("0.25").unwrap();
        assert_eq!(grid.len(), 5);
        assert_eq!(serde_json::to_string(&grid).unwrap(), "0.25");

        assert!(serde_json::from_str::<WeightGrid>("0.0").is_err());
        assert!(serde_json::from_str::<WeightGrid>("1e-300").is_err());
    }
}
