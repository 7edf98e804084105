//! Serializable analysis configuration.
//!
//! `AnalysisConfig::default()` reproduces the fixed trade-flow setup: two
//! datasets (aggregated exports and imports), `log_dollar` as the dependent
//! variable, and the sixteen exchange-rate/GDP/CPI regressors. A TOML file
//! can override any of it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// One input dataset: a display name and the Parquet file it lives in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatasetSpec {
    /// Name used in output filenames, e.g. `Export_Aggregated`.
    pub name: String,
    /// Path to the Parquet file.
    pub path: PathBuf,
}

/// Full configuration for a Hausman analysis run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisConfig {
    /// Datasets to analyse, in order.
    pub datasets: Vec<DatasetSpec>,
    /// Dependent variable column.
    pub dependent: String,
    /// Regressor columns, in formula order (order affects display only).
    pub regressors: Vec<String>,
    /// Directory results are written to (created if absent).
    pub output_dir: PathBuf,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            datasets: vec![
                DatasetSpec {
                    name: "Export_Aggregated".into(),
                    path: "Aggregated_Export.parquet".into(),
                },
                DatasetSpec {
                    name: "Import_Aggregated".into(),
                    path: "Aggregated_Import.parquet".into(),
                },
            ],
            dependent: "log_dollar".into(),
            regressors: DEFAULT_REGRESSORS.iter().map(|s| s.to_string()).collect(),
            output_dir: "results".into(),
        }
    }
}

/// The fixed regressor list of the trade-flow analysis.
pub const DEFAULT_REGRESSORS: [&str; 16] = [
    "log_exchange",
    "log_exchange_official",
    "log_irgdp",
    "log_gdp_iran_lag1",
    "log_gdp_iran_lag2",
    "log_gdp_iran_lag3",
    "log_world_gdp",
    "log_world_gdp_lag1",
    "log_world_gdp_lag2",
    "log_world_gdp_lag3",
    "log_gdp_partner",
    "log_gdp_lag1",
    "log_gdp_lag2",
    "log_gdp_lag3",
    "log_cpi_ir",
    "log_cpi_us",
];

impl AnalysisConfig {
    /// Load a configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse a configuration from a TOML string and validate it.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.datasets.is_empty() {
            return Err(ConfigError::Invalid("no datasets configured".into()));
        }
        if self.regressors.is_empty() {
            return Err(ConfigError::Invalid("no regressors configured".into()));
        }
        if self.regressors.contains(&self.dependent) {
            return Err(ConfigError::Invalid(format!(
                "dependent variable '{}' also appears among the regressors",
                self.dependent
            )));
        }
        Ok(())
    }
}
