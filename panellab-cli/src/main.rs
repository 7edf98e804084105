//! PanelLab CLI — Hausman specification tests on trade panel datasets.
//!
//! With no arguments, runs the fixed analysis: `Aggregated_Export.parquet`
//! and `Aggregated_Import.parquet` against the sixteen-regressor trade
//! formula, writing one results CSV per dataset under `results/`.
//!
//! `--config` swaps in a TOML analysis config; `--synthetic` substitutes a
//! deterministic generated panel for any dataset whose file is missing
//! (plumbing checks only — the output is tagged).

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use panellab_runner::config::AnalysisConfig;
use panellab_runner::runner::{run_dataset, run_loaded_dataset, TestRun};
use panellab_runner::synthetic::{generate_synthetic_table, SyntheticSpec};

#[derive(Parser)]
#[command(
    name = "panellab",
    about = "PanelLab — fixed vs. random effects Hausman tests on trade panels"
)]
struct Cli {
    /// Path to a TOML analysis config. Defaults to the fixed trade setup.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory override.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Generate synthetic data for datasets whose input file is missing.
    #[arg(long, default_value_t = false)]
    synthetic: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AnalysisConfig::from_file(path)?,
        None => AnalysisConfig::default(),
    };
    if let Some(dir) = cli.output_dir {
        config.output_dir = dir;
    }

    for dataset in config.datasets.clone() {
        let (run, _path) = if cli.synthetic && !dataset.path.exists() {
            eprintln!(
                "WARNING: '{}' not found, generating synthetic data for {}",
                dataset.path.display(),
                dataset.name
            );
            let table = generate_synthetic_table(
                &dataset.name,
                &config.dependent,
                &config.regressors,
                &SyntheticSpec::default(),
            );
            run_loaded_dataset(&config, &dataset.name, table, true)?
        } else {
            run_dataset(&config, &dataset)?
        };

        print_summary(&run);
        println!(
            "Hausman Test results for {} saved in {}/",
            run.name,
            config.output_dir.display()
        );
    }

    Ok(())
}

fn print_summary(run: &TestRun) {
    let cmp = &run.comparison;
    println!();
    println!("=== {} ===", run.name);
    println!(
        "Observations:      {} ({} raw rows, {} entities)",
        cmp.fixed.n_obs, run.provenance.raw_rows, cmp.fixed.n_entities
    );
    println!("R² (within):       {:.4}", cmp.fixed.r_squared_within);
    println!("R² (RE):           {:.4}", cmp.random.r_squared);
    println!(
        "Hausman statistic: {:.4} (df = {}, p = {:.4})",
        cmp.statistic, cmp.df, cmp.p_value
    );
    let verdict = if cmp.p_value < 0.05 {
        "reject random effects — prefer fixed effects"
    } else {
        "random effects not rejected"
    };
    println!("Verdict:           {verdict}");
    if run.provenance.synthetic {
        println!("WARNING: results based on SYNTHETIC data");
    }
}
