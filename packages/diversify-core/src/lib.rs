//! Diversify Core - Two-security diversification calculator.
//!
//! This crate reproduces the classic two-asset Modern Portfolio Theory exercise:
//!
//! - **Statistics**: mean, standard deviation, covariance and Pearson correlation
//! - **Portfolio grid**: expected return and risk for each weighting of S and T
//! - **Efficient frontier**: minimum-risk mix and the diversification benefit
//! - **Input**: textbook sample data, CSV files, seeded simulation
//! - **Rendering**: terminal tables, SVG frontier chart, single-page report
//!
//! # Example
//!
//! ```rust
//! use diversify_core::{analyze, sample_data, DeviationKind, WeightGrid};
//!
//! let (s, t) = sample_data();
//! let analysis = analyze(&s, &t, &WeightGrid::default(), DeviationKind::Population).unwrap();
//!
//! println!("Correlation: {:.2}", analysis.statistics.correlation);
//! println!("Lowest risk at w = {:.1}", analysis.min_risk.weight);
//! ```

pub mod config;
pub mod input;
pub mod portfolio;
pub mod render;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use types::{
    ApiResponse, DeviationKind, DiversificationBenefit, FrontierAnalysis, MinimumVariance,
    PortfolioStatistics, ReturnSeries, WeightedPortfolio,
};

// Re-export main functionality
pub use config::AnalysisConfig;
pub use input::{load_csv, sample_data, simulate, SimulationParams};
pub use portfolio::{analyze, minimum_variance, weighted_portfolio, WeightGrid};
pub use stats::{calculate_statistics, correlation, covariance, mean, std_dev};

/// Error types for diversify-core operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Config serialization error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),
}

/// Result type for diversify-core operations.
pub type Result<T> = std::result::Result<T, Error>;
