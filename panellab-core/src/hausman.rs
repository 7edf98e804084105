//! Hausman specification test and model comparison summary.
//!
//! Under the null that the entity effects are uncorrelated with the
//! regressors, both estimators are consistent and the random-effects
//! estimator is efficient; the statistic
//!
//! ```text
//! H = (β_FE − β_RE)' (V_FE − V_RE)⁺ (β_FE − β_RE)
//! ```
//!
//! is asymptotically χ² with k degrees of freedom. A large H rejects the
//! random-effects specification. In finite samples `V_FE − V_RE` need not
//! be positive definite; a negative statistic is reported as computed with
//! p-value 1.0 (the null is not rejected).

use nalgebra::DVector;
use statrs::distribution::{ChiSquared, ContinuousCDF};

use crate::error::{PanelError, Result};
use crate::estimators::{FixedEffectsResult, RandomEffectsResult};

/// Both fitted models plus the Hausman test over their common regressors.
#[derive(Debug, Clone)]
pub struct ModelComparison {
    /// Regressor names, in fit order.
    pub regressors: Vec<String>,
    pub fixed: FixedEffectsResult,
    pub random: RandomEffectsResult,
    /// Hausman statistic H.
    pub statistic: f64,
    /// Degrees of freedom (number of compared coefficients).
    pub df: usize,
    /// Upper-tail χ² probability of H.
    pub p_value: f64,
}

/// Compare a fixed-effects and a random-effects fit of the same design.
pub fn compare(
    regressors: Vec<String>,
    fixed: FixedEffectsResult,
    random: RandomEffectsResult,
) -> Result<ModelComparison> {
    let k = regressors.len();
    if k == 0 {
        return Err(PanelError::Validation("no regressors to compare".into()));
    }
    if fixed.n_regressors != k || random.n_regressors != k {
        return Err(PanelError::Validation(format!(
            "regressor count mismatch: names={k}, fixed={}, random={}",
            fixed.n_regressors, random.n_regressors
        )));
    }

    let d = DVector::from_iterator(
        k,
        fixed
            .coefficients
            .iter()
            .zip(&random.coefficients)
            .map(|(f, r)| f - r),
    );
    let v = &fixed.cov - &random.cov;

    let svd = v.svd(true, true);
    let s_max = svd.singular_values.iter().cloned().fold(0.0_f64, f64::max);
    let tol = s_max * k as f64 * f64::EPSILON;
    let v_pinv = svd
        .pseudo_inverse(tol)
        .map_err(|e| PanelError::Estimation(format!("covariance pseudo-inverse failed: {e}")))?;

    let statistic = (d.transpose() * v_pinv * &d)[(0, 0)];

    let p_value = if statistic > 0.0 {
        let chi2 = ChiSquared::new(k as f64)
            .map_err(|e| PanelError::Estimation(format!("chi-squared({k}): {e}")))?;
        1.0 - chi2.cdf(statistic)
    } else {
        1.0
    };

    Ok(ModelComparison {
        regressors,
        fixed,
        random,
        statistic,
        df: k,
        p_value,
    })
}

/// A flat, renderable comparison table (header row + string cells).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SummaryTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ModelComparison {
    /// Render the comparison as a flat table: one row per regressor
    /// (coefficient and standard error per model, plus the coefficient
    /// difference), followed by fit statistics and the test result.
    pub fn summary(&self) -> SummaryTable {
        let headers = ["variable", "fe_coef", "fe_std_err", "re_coef", "re_std_err", "difference"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let mut rows = Vec::with_capacity(self.regressors.len() + 6);
        for (j, name) in self.regressors.iter().enumerate() {
            let bf = self.fixed.coefficients[j];
            let br = self.random.coefficients[j];
            rows.push(vec![
                name.clone(),
                fmt(bf),
                fmt(self.fixed.std_errors[j]),
                fmt(br),
                fmt(self.random.std_errors[j]),
                fmt(bf - br),
            ]);
        }

        rows.push(stat_row("Observations", self.fixed.n_obs.to_string(), self.random.n_obs.to_string()));
        rows.push(stat_row("Entities", self.fixed.n_entities.to_string(), self.random.n_entities.to_string()));
        rows.push(stat_row("R-squared", fmt(self.fixed.r_squared_within), fmt(self.random.r_squared)));
        rows.push(test_row("Hausman statistic", fmt(self.statistic)));
        rows.push(test_row("Degrees of freedom", self.df.to_string()));
        rows.push(test_row("P-value", fmt(self.p_value)));

        SummaryTable { headers, rows }
    }
}

fn fmt(v: f64) -> String {
    format!("{v:.6}")
}

fn stat_row(label: &str, fe: String, re: String) -> Vec<String> {
    vec![label.to_string(), fe, String::new(), re, String::new(), String::new()]
}

fn test_row(label: &str, value: String) -> Vec<String> {
    vec![
        label.to_string(),
        value,
        String::new(),
        String::new(),
        String::new(),
        String::new(),
    ]
}
