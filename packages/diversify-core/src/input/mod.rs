//! Return data sources.
//!
//! - **Sample data**: the Watson & Head (2023) two-security example
//! - **CSV**: user-entered returns, one row per period
//! - **Simulation**: seeded normal draws for experimentation

mod loader;
mod simulate;

pub use loader::{load_csv, read_csv, CsvLayout};
pub use simulate::{simulate, SimulationParams};

use crate::types::ReturnSeries;

/// Number of annual returns in the sample and simulated data sets.
pub const YEARS: usize = 5;

/// Watson & Head (2023) returns for security S, in percent.
pub const SAMPLE_S_PERCENT: [f64; YEARS] = [6.6, 5.6, -9.0, 12.6, 14.0];

/// Watson & Head (2023) returns for security T, in percent.
pub const SAMPLE_T_PERCENT: [f64; YEARS] = [24.5, -5.9, 19.9, -7.8, 14.8];

/// The textbook two-security data set, converted to decimal returns.
///
/// Source: Watson & Head, *Corporate Finance: Principles and Practice* (8th ed.).
pub fn sample_data() -> (ReturnSeries, ReturnSeries) {
    (
        percent_series("S", &SAMPLE_S_PERCENT),
        percent_series("T", &SAMPLE_T_PERCENT),
    )
}

fn percent_series(name: &str, percents: &[f64]) -> ReturnSeries {
    ReturnSeries::from_finite(name, percents.iter().map(|p| p / 100.0).collect())
}
