//! PanelLab Runner — dataset loading, test orchestration, CSV export.
//!
//! This crate builds on `panellab-core` to provide:
//! - Parquet dataset loading with schema validation and BLAKE3 provenance
//! - TOML analysis configuration (defaulting to the fixed trade-flow setup)
//! - The Hausman test pipeline (load → preprocess → fit → compare → export)
//! - Deterministic synthetic panels for offline/dev use

pub mod config;
pub mod export;
pub mod loader;
pub mod runner;
pub mod synthetic;

pub use config::{AnalysisConfig, ConfigError, DatasetSpec, DEFAULT_REGRESSORS};
pub use export::{save_results, summary_to_csv};
pub use loader::{dataset_hash, load_table, LoadError, REQUIRED_COLUMNS};
pub use runner::{run_dataset, run_hausman_test, run_loaded_dataset, RunError, TestRun};
pub use synthetic::{generate_synthetic_table, SyntheticSpec};
