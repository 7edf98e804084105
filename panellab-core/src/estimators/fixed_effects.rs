//! Fixed-effects ("within") panel estimator.
//!
//! Demeans X and y by entity and runs OLS on the demeaned data, absorbing
//! all entity-level intercepts. Covariance is the homoskedastic
//! `σ̂²_e (X̃'X̃)⁺` with degrees of freedom `n − n_entities − rank`.
//!
//! Reference: Wooldridge, *Econometric Analysis of Cross Section and Panel
//! Data*, Ch. 10.

use nalgebra::{DMatrix, DVector};

use super::{group_by_entity, solve_ols, validate_design};
use crate::error::{PanelError, Result};

/// Result of a fixed-effects panel regression.
#[derive(Debug, Clone)]
pub struct FixedEffectsResult {
    /// Coefficient estimates (length p; the intercept is absorbed).
    pub coefficients: Vec<f64>,
    /// Homoskedastic standard errors.
    pub std_errors: Vec<f64>,
    /// Coefficient covariance matrix (p × p).
    pub cov: DMatrix<f64>,
    /// Idiosyncratic error variance estimate σ̂²_e.
    pub sigma2: f64,
    /// R² on the within-transformed data.
    pub r_squared_within: f64,
    /// Residual sum of squares.
    pub rss: f64,
    pub n_obs: usize,
    pub n_entities: usize,
    pub n_regressors: usize,
}

/// Fit a fixed-effects regression of `y` on the row-major design `x`
/// (shape n × p, no intercept column), grouped by `entity_ids`.
pub fn fixed_effects_fit(
    entity_ids: &[usize],
    x: &[f64],
    y: &[f64],
    p: usize,
) -> Result<FixedEffectsResult> {
    validate_design(entity_ids, x, y, p)?;
    let n = y.len();

    let groups = group_by_entity(entity_ids);
    let n_entities = groups.iter().filter(|g| !g.is_empty()).count();

    // Within transformation: subtract entity means from X and y.
    let mut x_dm = vec![0.0_f64; n * p];
    let mut y_dm = vec![0.0_f64; n];
    for rows in &groups {
        if rows.is_empty() {
            continue;
        }
        let t = rows.len() as f64;
        let mut y_mean = 0.0;
        let mut x_mean = vec![0.0_f64; p];
        for &i in rows {
            y_mean += y[i];
            for j in 0..p {
                x_mean[j] += x[i * p + j];
            }
        }
        y_mean /= t;
        for m in &mut x_mean {
            *m /= t;
        }
        for &i in rows {
            y_dm[i] = y[i] - y_mean;
            for j in 0..p {
                x_dm[i * p + j] = x[i * p + j] - x_mean[j];
            }
        }
    }

    let x_mat = DMatrix::from_row_slice(n, p, &x_dm);
    let y_vec = DVector::from_column_slice(&y_dm);
    let fit = solve_ols(&x_mat, &y_vec)?;

    let dof = n as f64 - n_entities as f64 - fit.rank as f64;
    if dof <= 0.0 {
        return Err(PanelError::Estimation(format!(
            "insufficient degrees of freedom: n={n}, entities={n_entities}, rank={}",
            fit.rank
        )));
    }
    let sigma2 = fit.rss / dof;

    let cov = &fit.xtx_pinv * sigma2;
    let std_errors: Vec<f64> = (0..p).map(|j| cov[(j, j)].max(0.0).sqrt()).collect();

    let tss: f64 = y_dm.iter().map(|v| v * v).sum();
    let r_squared_within = if tss > 0.0 { 1.0 - fit.rss / tss } else { 0.0 };

    Ok(FixedEffectsResult {
        coefficients: fit.beta.iter().copied().collect(),
        std_errors,
        cov,
        sigma2,
        r_squared_within,
        rss: fit.rss,
        n_obs: n,
        n_entities,
        n_regressors: p,
    })
}
