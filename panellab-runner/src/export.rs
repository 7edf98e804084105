//! Comparison table export — CSV artifact generation.
//!
//! One file per test run: `{output_dir}/Hausman_Test_Results_{name}.csv`.
//! The directory is created if absent; an existing file is silently
//! overwritten. The table carries no timestamps, so identical runs produce
//! byte-identical files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use panellab_core::hausman::SummaryTable;

/// Render a summary table as CSV.
pub fn summary_to_csv(table: &SummaryTable) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(&table.headers)?;
    for row in &table.rows {
        wtr.write_record(row)?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Write the results file for a named test run and return its path.
pub fn save_results(table: &SummaryTable, output_dir: &Path, name: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output dir: {}", output_dir.display()))?;

    let path = output_dir.join(format!("Hausman_Test_Results_{name}.csv"));
    let csv = summary_to_csv(table)?;
    std::fs::write(&path, csv)
        .with_context(|| format!("failed to write {}", path.display()))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> SummaryTable {
        SummaryTable {
            headers: vec!["variable".into(), "fe_coef".into(), "re_coef".into()],
            rows: vec![
                vec!["log_exchange".into(), "1.000000".into(), "0.990000".into()],
                vec!["P-value".into(), "0.034000".into(), String::new()],
            ],
        }
    }

    #[test]
    fn csv_has_header_and_rows() {
        let csv = summary_to_csv(&sample_table()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "variable,fe_coef,re_coef");
        assert!(lines[1].starts_with("log_exchange,"));
    }

    #[test]
    fn save_creates_dir_and_expected_filename() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("results");

        let path = save_results(&sample_table(), &out, "Export_Aggregated").unwrap();
        assert_eq!(
            path,
            out.join("Hausman_Test_Results_Export_Aggregated.csv")
        );
        assert!(path.exists());
    }

    #[test]
    fn save_overwrites_silently_and_identically() {
        let dir = tempfile::tempdir().unwrap();
        let table = sample_table();

        let path1 = save_results(&table, dir.path(), "X").unwrap();
        let first = std::fs::read(&path1).unwrap();
        let path2 = save_results(&table, dir.path(), "X").unwrap();
        let second = std::fs::read(&path2).unwrap();

        assert_eq!(path1, path2);
        assert_eq!(first, second);
    }
}
