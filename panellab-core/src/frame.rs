//! Tabular and panel-indexed data types.
//!
//! `RawTable` is the shape a dataset has straight off disk: identifier
//! columns (`country`, `code`, `year`) plus named numeric columns. The
//! loader in `panellab-runner` produces it; `preprocess` consumes it.
//!
//! `PanelFrame` is the cleaned, (entity, year)-indexed panel the estimators
//! operate on. Its constructor enforces the panel invariants: unique index,
//! finite values everywhere, consistent shape.

use std::collections::{HashMap, HashSet};

use crate::error::{PanelError, Result};

/// A flat table as loaded from a columnar file, before panel construction.
///
/// Lengths of `country`, `code`, `year`, and every numeric column must all
/// agree; `preprocess` validates this before doing anything else.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    /// Partner country name, one per row.
    pub country: Vec<String>,
    /// Commodity/classification code, stringified on load.
    pub code: Vec<String>,
    /// Observation year.
    pub year: Vec<i32>,
    /// Named numeric columns (dependent variable, regressors, `const`, ...).
    pub columns: Vec<(String, Vec<f64>)>,
}

impl RawTable {
    /// Number of rows, taken from the `country` column.
    pub fn height(&self) -> usize {
        self.country.len()
    }

    /// Look up a numeric column by name.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    /// Check that all columns have the same length.
    pub(crate) fn validate_shape(&self) -> Result<()> {
        let n = self.country.len();
        if self.code.len() != n || self.year.len() != n {
            return Err(PanelError::Validation(format!(
                "identifier column lengths disagree: country={}, code={}, year={}",
                n,
                self.code.len(),
                self.year.len()
            )));
        }
        for (name, values) in &self.columns {
            if values.len() != n {
                return Err(PanelError::Validation(format!(
                    "column '{name}' has {} rows, expected {n}",
                    values.len()
                )));
            }
        }
        Ok(())
    }
}

/// A cleaned panel: rows indexed by (entity, year), numeric columns only.
///
/// Invariants (enforced by [`PanelFrame::new`]):
/// - (entity, year) pairs are unique
/// - every cell is finite (no NaN, no ±inf)
/// - `values` is row-major with `n_obs() * n_cols()` cells
#[derive(Debug, Clone, PartialEq)]
pub struct PanelFrame {
    entities: Vec<String>,
    years: Vec<i32>,
    names: Vec<String>,
    values: Vec<f64>,
}

impl PanelFrame {
    /// Build a panel frame, validating the panel invariants.
    pub fn new(
        entities: Vec<String>,
        years: Vec<i32>,
        names: Vec<String>,
        values: Vec<f64>,
    ) -> Result<Self> {
        let n = entities.len();
        if years.len() != n {
            return Err(PanelError::Validation(format!(
                "entities ({n}) and years ({}) lengths disagree",
                years.len()
            )));
        }
        if values.len() != n * names.len() {
            return Err(PanelError::Validation(format!(
                "values length ({}) != rows ({n}) * columns ({})",
                values.len(),
                names.len()
            )));
        }
        if let Some(v) = values.iter().find(|v| !v.is_finite()) {
            return Err(PanelError::Validation(format!(
                "non-finite value {v} in panel frame"
            )));
        }

        let mut seen: HashSet<(&str, i32)> = HashSet::with_capacity(n);
        for (entity, &year) in entities.iter().zip(&years) {
            if !seen.insert((entity.as_str(), year)) {
                return Err(PanelError::DuplicateIndex {
                    entity: entity.clone(),
                    year,
                });
            }
        }

        Ok(Self {
            entities,
            years,
            names,
            values,
        })
    }

    /// Number of observations (rows).
    pub fn n_obs(&self) -> usize {
        self.entities.len()
    }

    /// Number of numeric columns.
    pub fn n_cols(&self) -> usize {
        self.names.len()
    }

    /// Entity key per row.
    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    /// Year per row.
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Column names, in storage order.
    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    /// Cell value at (row, column index).
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row * self.names.len() + col]
    }

    /// Extract a column by name as an owned vector.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let j = self.names.iter().position(|n| n == name)?;
        let k = self.names.len();
        Some((0..self.n_obs()).map(|i| self.values[i * k + j]).collect())
    }

    /// Map each row's entity key to a dense integer id (0..n_entities).
    ///
    /// Ids are assigned in order of first appearance, so they are stable for
    /// a given frame. This is the shape the estimators consume.
    pub fn entity_ids(&self) -> Vec<usize> {
        let mut ids: HashMap<&str, usize> = HashMap::new();
        self.entities
            .iter()
            .map(|e| {
                let next = ids.len();
                *ids.entry(e.as_str()).or_insert(next)
            })
            .collect()
    }

    /// Number of distinct entities.
    pub fn n_entities(&self) -> usize {
        self.entities.iter().collect::<HashSet<_>>().len()
    }

    /// Build the regression design: `y` from `dependent`, row-major `x`
    /// over `regressors` in the given order.
    ///
    /// Fails with a missing-column error if any name is absent.
    pub fn design(&self, dependent: &str, regressors: &[String]) -> Result<(Vec<f64>, Vec<f64>)> {
        let k = self.names.len();
        let dep_idx = self
            .names
            .iter()
            .position(|n| n == dependent)
            .ok_or_else(|| PanelError::MissingColumn(dependent.to_string()))?;
        let reg_idx: Vec<usize> = regressors
            .iter()
            .map(|r| {
                self.names
                    .iter()
                    .position(|n| n == r)
                    .ok_or_else(|| PanelError::MissingColumn(r.clone()))
            })
            .collect::<Result<Vec<_>>>()?;

        let n = self.n_obs();
        let mut y = Vec::with_capacity(n);
        let mut x = Vec::with_capacity(n * reg_idx.len());
        for i in 0..n {
            y.push(self.values[i * k + dep_idx]);
            for &j in &reg_idx {
                x.push(self.values[i * k + j]);
            }
        }
        Ok((y, x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> PanelFrame {
        PanelFrame::new(
            vec!["A_1".into(), "A_1".into(), "B_2".into(), "B_2".into()],
            vec![2000, 2001, 2000, 2001],
            vec!["log_dollar".into(), "log_gdp".into()],
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
        )
        .unwrap()
    }

    #[test]
    fn frame_accessors() {
        let f = two_by_two();
        assert_eq!(f.n_obs(), 4);
        assert_eq!(f.n_cols(), 2);
        assert_eq!(f.n_entities(), 2);
        assert_eq!(f.get(1, 1), 4.0);
        assert_eq!(f.column("log_gdp").unwrap(), vec![2.0, 4.0, 6.0, 8.0]);
        assert_eq!(f.entity_ids(), vec![0, 0, 1, 1]);
    }

    #[test]
    fn duplicate_index_rejected() {
        let err = PanelFrame::new(
            vec!["A_1".into(), "A_1".into()],
            vec![2000, 2000],
            vec!["log_dollar".into()],
            vec![1.0, 2.0],
        )
        .unwrap_err();
        assert!(matches!(err, PanelError::DuplicateIndex { .. }));
    }

    #[test]
    fn non_finite_values_rejected() {
        let err = PanelFrame::new(
            vec!["A_1".into()],
            vec![2000],
            vec!["log_dollar".into()],
            vec![f64::INFINITY],
        )
        .unwrap_err();
        assert!(matches!(err, PanelError::Validation(_)));
    }

    #[test]
    fn design_extracts_in_regressor_order() {
        let f = two_by_two();
        let (y, x) = f
            .design("log_dollar", &["log_gdp".to_string()])
            .unwrap();
        assert_eq!(y, vec![1.0, 3.0, 5.0, 7.0]);
        assert_eq!(x, vec![2.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn design_missing_column_errors() {
        let f = two_by_two();
        let err = f.design("log_dollar", &["log_cpi".to_string()]).unwrap_err();
        assert!(matches!(err, PanelError::MissingColumn(c) if c == "log_cpi"));
    }
}
