//! Hausman test runner — wires together loading, preprocessing,
//! estimation, and export.
//!
//! Two entry points:
//! - `run_hausman_test()`: takes a preprocessed frame, fits both models,
//!   returns the comparison. No I/O.
//! - `run_dataset()`: load → preprocess → test → export for one configured
//!   dataset, returning the written path. Used by the CLI, once per
//!   dataset, sequentially.
//!
//! Everything is fail-fast: the first error aborts that dataset's run and
//! propagates to the caller.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use panellab_core::estimators::{fixed_effects_fit, random_effects_fit};
use panellab_core::frame::{PanelFrame, RawTable};
use panellab_core::hausman::{compare, ModelComparison};
use panellab_core::preprocess::preprocess_panel;
use panellab_core::PanelError;

use crate::config::{AnalysisConfig, DatasetSpec};
use crate::export::save_results;
use crate::loader::{dataset_hash, load_table, LoadError};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("data error: {0}")]
    Load(#[from] LoadError),
    #[error("panel error: {0}")]
    Panel(#[from] PanelError),
    #[error("export error: {0}")]
    Export(#[from] anyhow::Error),
}

/// Result of one Hausman test run.
#[derive(Debug)]
pub struct TestRun {
    /// Dataset display name (drives the output filename).
    pub name: String,
    /// The fitted models and test result.
    pub comparison: ModelComparison,
    /// Provenance of the run.
    pub provenance: RunProvenance,
}

/// Everything needed to recognise what a results file was computed from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunProvenance {
    /// BLAKE3 hash of the raw input table (empty for pre-loaded frames).
    pub dataset_hash: String,
    /// Rows in the raw table before cleaning.
    pub raw_rows: usize,
    /// Rows that survived preprocessing.
    pub panel_rows: usize,
    /// Whether the input was synthetic.
    pub synthetic: bool,
}

/// Fit both models on a cleaned panel and compare them.
///
/// `regressors` drives both the design matrix and the row order of the
/// summary table; order affects display only.
pub fn run_hausman_test(
    frame: &PanelFrame,
    dependent: &str,
    regressors: &[String],
) -> Result<ModelComparison, RunError> {
    let (y, x) = frame.design(dependent, regressors)?;
    let entity_ids = frame.entity_ids();
    let p = regressors.len();

    let fixed = fixed_effects_fit(&entity_ids, &x, &y, p)?;
    let random = random_effects_fit(&entity_ids, &x, &y, p)?;
    let comparison = compare(regressors.to_vec(), fixed, random)?;
    Ok(comparison)
}

/// Run the full pipeline for one configured dataset and write its results.
///
/// Returns the test run and the path of the written CSV.
pub fn run_dataset(
    config: &AnalysisConfig,
    dataset: &DatasetSpec,
) -> Result<(TestRun, PathBuf), RunError> {
    let table = load_table(&dataset.path)?;
    run_loaded_dataset(config, &dataset.name, table, false)
}

/// Run the pipeline on an already-loaded table (real or synthetic).
pub fn run_loaded_dataset(
    config: &AnalysisConfig,
    name: &str,
    table: RawTable,
    synthetic: bool,
) -> Result<(TestRun, PathBuf), RunError> {
    let hash = dataset_hash(&table);
    let raw_rows = table.height();

    let frame = preprocess_panel(table)?;
    let comparison = run_hausman_test(&frame, &config.dependent, &config.regressors)?;

    let path = save_results(&comparison.summary(), &config.output_dir, name)?;

    let run = TestRun {
        name: name.to_string(),
        provenance: RunProvenance {
            dataset_hash: hash,
            raw_rows,
            panel_rows: frame.n_obs(),
            synthetic,
        },
        comparison,
    };
    Ok((run, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::synthetic::{generate_synthetic_table, SyntheticSpec};

    fn small_config(dir: &std::path::Path) -> AnalysisConfig {
        AnalysisConfig {
            datasets: vec![],
            dependent: "log_dollar".into(),
            regressors: vec!["log_exchange".into(), "log_gdp_partner".into()],
            output_dir: dir.to_path_buf(),
        }
    }

    #[test]
    fn hausman_test_on_synthetic_panel() {
        let spec = SyntheticSpec {
            n_entities: 8,
            n_years: 6,
            first_year: 2000,
        };
        let table = generate_synthetic_table(
            "unit",
            "log_dollar",
            &["log_exchange".into(), "log_gdp_partner".into()],
            &spec,
        );
        let frame = preprocess_panel(table).unwrap();
        let cmp = run_hausman_test(
            &frame,
            "log_dollar",
            &["log_exchange".into(), "log_gdp_partner".into()],
        )
        .unwrap();

        assert_eq!(cmp.df, 2);
        assert!(cmp.statistic.is_finite());
        assert!((0.0..=1.0).contains(&cmp.p_value));
        assert_eq!(cmp.fixed.n_obs, 48);
        assert_eq!(cmp.fixed.n_entities, 8);
    }

    #[test]
    fn missing_regressor_column_fails() {
        let spec = SyntheticSpec {
            n_entities: 3,
            n_years: 4,
            first_year: 2000,
        };
        let table =
            generate_synthetic_table("unit", "log_dollar", &["log_exchange".into()], &spec);
        let frame = preprocess_panel(table).unwrap();

        let err = run_hausman_test(&frame, "log_dollar", &["log_cpi_us".into()]).unwrap_err();
        assert!(matches!(err, RunError::Panel(PanelError::MissingColumn(_))));
    }

    #[test]
    fn run_loaded_dataset_writes_results_and_provenance() {
        let dir = tempfile::tempdir().unwrap();
        let config = small_config(dir.path());
        let spec = SyntheticSpec {
            n_entities: 6,
            n_years: 5,
            first_year: 2000,
        };
        let table =
            generate_synthetic_table("Export_Aggregated", &config.dependent, &config.regressors, &spec);

        let (run, path) = run_loaded_dataset(&config, "Export_Aggregated", table, true).unwrap();

        assert!(path.ends_with("Hausman_Test_Results_Export_Aggregated.csv"));
        assert!(path.exists());
        assert_eq!(run.provenance.raw_rows, 30);
        assert_eq!(run.provenance.panel_rows, 30);
        assert!(run.provenance.synthetic);
        assert!(!run.provenance.dataset_hash.is_empty());
    }
}
