//! Analysis configuration loaded from TOML.

use crate::input::{CsvLayout, SimulationParams};
use crate::portfolio::{WeightGrid, DEFAULT_STEP};
use crate::types::DeviationKind;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable that overrides the config file location.
pub const CONFIG_ENV: &str = "DIVERSIFY_CONFIG";

/// Settings for an analysis run.
///
/// Every field has a default, so a partial (or missing) file is valid.
///
/// ```toml
/// step = 0.2
/// deviation = "population"
///
/// [csv]
/// column_s = "Equity"
/// column_t = "Bonds"
/// percent = true
///
/// [simulation]
/// mean_s = 0.08
/// vol_s = 0.15
///
/// [output]
/// title = "Equity vs Bonds"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Spacing of the weight grid
    pub step: f64,
    /// Sample or population deviations
    pub deviation: DeviationKind,
    /// CSV column names and units
    pub csv: CsvLayout,
    /// Parameters for simulated data
    pub simulation: SimulationParams,
    /// Output defaults
    pub output: OutputConfig,
}

/// Where and how to write rendered artifacts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Title printed on the report page
    pub title: String,
    /// Default path for the frontier chart
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<PathBuf>,
    /// Default path for the one-page report
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<PathBuf>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            step: DEFAULT_STEP,
            deviation: DeviationKind::default(),
            csv: CsvLayout::default(),
            simulation: SimulationParams::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            title: "Diversification of Risk".to_string(),
            chart: None,
            report: None,
        }
    }
}

impl AnalysisConfig {
    /// Get the default config file path.
    ///
    /// Default path: `<config dir>/diversify/config.toml`
    /// Can be overridden with the `DIVERSIFY_CONFIG` environment variable.
    pub fn default_path() -> PathBuf {
        if let Ok(path) = env::var(CONFIG_ENV) {
            return PathBuf::from(path);
        }

        directories::BaseDirs::new()
            .map(|dirs| dirs.config_dir().join("diversify/config.toml"))
            .unwrap_or_else(|| PathBuf::from("diversify.toml"))
    }

    /// Load the config from a specific path. A missing file yields defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Save the config to a specific path, creating parent directories.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Render the config as TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// The weight grid described by `step`.
    pub fn grid(&self) -> Result<WeightGrid> {
        WeightGrid::new(self.step)
    }
}
