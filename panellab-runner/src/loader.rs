//! Dataset loading: Parquet file → `RawTable`.
//!
//! Validates the trade-panel schema on load (`country`, `code`, `year`,
//! `log_dollar`, `const` must be present), stringifies `code` whether the
//! file stores it as text or as an integer, and computes a deterministic
//! BLAKE3 hash over the loaded table for provenance checks.

use std::fs;
use std::path::{Path, PathBuf};

use polars::prelude::*;
use thiserror::Error;

use panellab_core::frame::RawTable;

/// Errors from the data loading layer.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open dataset '{path}': {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parquet read error for '{path}': {reason}")]
    Parquet { path: PathBuf, reason: String },

    #[error("dataset is missing required column '{0}'")]
    MissingColumn(String),

    #[error("column '{column}' has an unusable type: {reason}")]
    ColumnType { column: String, reason: String },

    #[error("dataset is empty: {0}")]
    Empty(PathBuf),
}

/// Columns every input dataset must carry.
pub const REQUIRED_COLUMNS: [&str; 5] = ["country", "code", "year", "log_dollar", "const"];

/// Load a Parquet dataset into a `RawTable`.
///
/// All columns other than `country`, `code`, and `year` are cast to f64 and
/// kept in file order (`const` included — preprocessing drops it later).
pub fn load_table(path: &Path) -> Result<RawTable, LoadError> {
    let file = fs::File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let df = ParquetReader::new(file)
        .finish()
        .map_err(|e| LoadError::Parquet {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    if df.height() == 0 {
        return Err(LoadError::Empty(path.to_path_buf()));
    }
    for name in REQUIRED_COLUMNS {
        if df.column(name).is_err() {
            return Err(LoadError::MissingColumn(name.to_string()));
        }
    }

    table_from_dataframe(&df)
}

/// Convert a validated DataFrame into the loader's table shape.
fn table_from_dataframe(df: &DataFrame) -> Result<RawTable, LoadError> {
    let n = df.height();

    let country = string_column(df, "country")?;
    let code = code_column(df, n)?;
    let year = year_column(df)?;

    let mut columns = Vec::new();
    for col in df.get_columns() {
        let name = col.name().as_str();
        if matches!(name, "country" | "code" | "year") {
            continue;
        }
        let values = col
            .cast(&DataType::Float64)
            .map_err(|e| LoadError::ColumnType {
                column: name.to_string(),
                reason: e.to_string(),
            })?;
        let ca = values.f64().map_err(|e| LoadError::ColumnType {
            column: name.to_string(),
            reason: e.to_string(),
        })?;
        // Nulls become NaN so preprocessing drops those rows like any
        // other missing value.
        let v: Vec<f64> = (0..n).map(|i| ca.get(i).unwrap_or(f64::NAN)).collect();
        columns.push((name.to_string(), v));
    }

    Ok(RawTable {
        country,
        code,
        year,
        columns,
    })
}

fn string_column(df: &DataFrame, name: &str) -> Result<Vec<String>, LoadError> {
    let col = df
        .column(name)
        .map_err(|_| LoadError::MissingColumn(name.to_string()))?;
    let ca = col.str().map_err(|e| LoadError::ColumnType {
        column: name.to_string(),
        reason: e.to_string(),
    })?;
    Ok((0..df.height())
        .map(|i| ca.get(i).unwrap_or("").to_string())
        .collect())
}

/// `code` may be stored as text or as an integer; stringify either way.
fn code_column(df: &DataFrame, n: usize) -> Result<Vec<String>, LoadError> {
    let col = df
        .column("code")
        .map_err(|_| LoadError::MissingColumn("code".to_string()))?;

    if let Ok(ca) = col.str() {
        return Ok((0..n).map(|i| ca.get(i).unwrap_or("").to_string()).collect());
    }

    let cast = col
        .cast(&DataType::Int64)
        .map_err(|e| LoadError::ColumnType {
            column: "code".into(),
            reason: e.to_string(),
        })?;
    let ca = cast.i64().map_err(|e| LoadError::ColumnType {
        column: "code".into(),
        reason: e.to_string(),
    })?;
    Ok((0..n)
        .map(|i| ca.get(i).map(|v| v.to_string()).unwrap_or_default())
        .collect())
}

fn year_column(df: &DataFrame) -> Result<Vec<i32>, LoadError> {
    let col = df
        .column("year")
        .map_err(|_| LoadError::MissingColumn("year".to_string()))?;
    let cast = col
        .cast(&DataType::Int32)
        .map_err(|e| LoadError::ColumnType {
            column: "year".into(),
            reason: e.to_string(),
        })?;
    let ca = cast.i32().map_err(|e| LoadError::ColumnType {
        column: "year".into(),
        reason: e.to_string(),
    })?;
    Ok((0..df.height()).map(|i| ca.get(i).unwrap_or(0)).collect())
}

/// Deterministic BLAKE3 hash over a loaded table.
///
/// Covers identifiers and every numeric cell in column order, so two loads
/// of the same file always agree regardless of platform.
pub fn dataset_hash(table: &RawTable) -> String {
    let mut hasher = blake3::Hasher::new();
    for (country, code) in table.country.iter().zip(&table.code) {
        hasher.update(country.as_bytes());
        hasher.update(b"_");
        hasher.update(code.as_bytes());
    }
    for year in &table.year {
        hasher.update(&year.to_le_bytes());
    }
    for (name, values) in &table.columns {
        hasher.update(name.as_bytes());
        for v in values {
            hasher.update(&v.to_le_bytes());
        }
    }
    hasher.finalize().to_hex().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_df(code_as_int: bool) -> DataFrame {
        let code: Column = if code_as_int {
            Column::new("code".into(), vec![10_i64, 10, 20, 20])
        } else {
            Column::new("code".into(), vec!["10", "10", "20", "20"])
        };
        DataFrame::new(vec![
            Column::new("country".into(), vec!["Iran", "Iran", "Iraq", "Iraq"]),
            code,
            Column::new("year".into(), vec![2000_i32, 2001, 2000, 2001]),
            Column::new("log_dollar".into(), vec![1.0, 2.0, 3.0, 4.0]),
            Column::new("log_exchange".into(), vec![0.1, 0.2, 0.3, 0.4]),
            Column::new("const".into(), vec![1.0, 1.0, 1.0, 1.0]),
        ])
        .unwrap()
    }

    fn write_parquet(df: &DataFrame, path: &Path) {
        let file = fs::File::create(path).unwrap();
        ParquetWriter::new(file).finish(&mut df.clone()).unwrap();
    }

    #[test]
    fn loads_table_with_string_code() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.parquet");
        write_parquet(&sample_df(false), &path);

        let table = load_table(&path).unwrap();
        assert_eq!(table.height(), 4);
        assert_eq!(table.country[0], "Iran");
        assert_eq!(table.code[2], "20");
        assert_eq!(table.year, vec![2000, 2001, 2000, 2001]);
        assert_eq!(table.column("log_dollar").unwrap(), &[1.0, 2.0, 3.0, 4.0]);
        assert!(table.column("const").is_some());
    }

    #[test]
    fn integer_code_is_stringified() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.parquet");
        write_parquet(&sample_df(true), &path);

        let table = load_table(&path).unwrap();
        assert_eq!(table.code, vec!["10", "10", "20", "20"]);
    }

    #[test]
    fn missing_required_column_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.parquet");
        let df = sample_df(false).drop("const").unwrap();
        write_parquet(&df, &path);

        let err = load_table(&path).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(c) if c == "const"));
    }

    #[test]
    fn missing_file_errors() {
        assert!(matches!(
            load_table(Path::new("/nonexistent/x.parquet")),
            Err(LoadError::Open { .. })
        ));
    }

    #[test]
    fn dataset_hash_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.parquet");
        write_parquet(&sample_df(false), &path);

        let a = dataset_hash(&load_table(&path).unwrap());
        let b = dataset_hash(&load_table(&path).unwrap());
        assert_eq!(a, b);
        assert!(!a.is_empty());
    }
}
