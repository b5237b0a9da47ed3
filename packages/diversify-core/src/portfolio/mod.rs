//! Two-security portfolio module.
//!
//! Provides the weight grid, per-weight risk and return, and the efficient frontier analysis.

mod frontier;
mod grid;

pub use frontier::{analyze, minimum_variance, portfolio_variance, weighted_portfolio};
pub use grid::{weight_label, WeightGrid, DEFAULT_STEP, MAX_POINTS, TEXTBOOK_STEP};
