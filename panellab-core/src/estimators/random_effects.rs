//! Random-effects (Swamy–Arora) panel estimator.
//!
//! Variance components come from the within and between regressions:
//! `σ̂²_e` from within residuals, `σ̂²_u` from the between residual variance
//! less `σ̂²_e / T̄` (harmonic-mean group size for unbalanced panels,
//! clamped at zero). Each entity is then quasi-demeaned by
//! `θ_i = 1 − sqrt(σ̂²_e / (σ̂²_e + T_i σ̂²_u))` and the transformed data is
//! fit by OLS. With `σ̂²_u = 0` this collapses to pooled OLS.
//!
//! No intercept is fit: the pipeline's formula carries none (the input's
//! `const` column is discarded during preprocessing).

use nalgebra::{DMatrix, DVector};

use super::{group_by_entity, solve_ols, validate_design};
use crate::error::{PanelError, Result};

/// Result of a random-effects panel regression.
#[derive(Debug, Clone)]
pub struct RandomEffectsResult {
    /// Coefficient estimates (length p).
    pub coefficients: Vec<f64>,
    /// Standard errors from the GLS covariance.
    pub std_errors: Vec<f64>,
    /// Coefficient covariance matrix (p × p).
    pub cov: DMatrix<f64>,
    /// Idiosyncratic variance component σ̂²_e.
    pub sigma2_e: f64,
    /// Entity variance component σ̂²_u.
    pub sigma2_u: f64,
    /// R² on the quasi-demeaned data.
    pub r_squared: f64,
    /// Residual sum of squares on the transformed data.
    pub rss: f64,
    pub n_obs: usize,
    pub n_entities: usize,
    pub n_regressors: usize,
}

/// Fit a random-effects regression of `y` on the row-major design `x`
/// (shape n × p, no intercept column), grouped by `entity_ids`.
pub fn random_effects_fit(
    entity_ids: &[usize],
    x: &[f64],
    y: &[f64],
    p: usize,
) -> Result<RandomEffectsResult> {
    validate_design(entity_ids, x, y, p)?;
    let n = y.len();

    let groups: Vec<Vec<usize>> = group_by_entity(entity_ids)
        .into_iter()
        .filter(|g| !g.is_empty())
        .collect();
    let n_entities = groups.len();
    if n_entities < 2 {
        return Err(PanelError::Estimation(
            "random effects require at least two entities".into(),
        ));
    }

    // Entity means of y and X.
    let mut y_means = vec![0.0_f64; n_entities];
    let mut x_means = vec![0.0_f64; n_entities * p];
    for (g, rows) in groups.iter().enumerate() {
        let t = rows.len() as f64;
        for &i in rows {
            y_means[g] += y[i];
            for j in 0..p {
                x_means[g * p + j] += x[i * p + j];
            }
        }
        y_means[g] /= t;
        for j in 0..p {
            x_means[g * p + j] /= t;
        }
    }

    // σ̂²_e from the within regression.
    let sigma2_e = within_variance(&groups, x, y, p, &x_means, &y_means, n, n_entities)?;

    // σ̂²_u from the between regression on entity means.
    let xb = DMatrix::from_row_slice(n_entities, p, &x_means);
    let yb = DVector::from_column_slice(&y_means);
    let between = solve_ols(&xb, &yb)?;
    let df_between = n_entities as f64 - between.rank as f64;
    let sigma2_between = if df_between > 0.0 {
        between.rss / df_between
    } else {
        0.0
    };
    let t_harmonic =
        n_entities as f64 / groups.iter().map(|g| 1.0 / g.len() as f64).sum::<f64>();
    let sigma2_u = (sigma2_between - sigma2_e / t_harmonic).max(0.0);

    // Quasi-demean by entity.
    let mut x_qd = vec![0.0_f64; n * p];
    let mut y_qd = vec![0.0_f64; n];
    for (g, rows) in groups.iter().enumerate() {
        let t = rows.len() as f64;
        let denom = sigma2_e + t * sigma2_u;
        let theta = if denom > 0.0 {
            1.0 - (sigma2_e / denom).sqrt()
        } else {
            0.0
        };
        for &i in rows {
            y_qd[i] = y[i] - theta * y_means[g];
            for j in 0..p {
                x_qd[i * p + j] = x[i * p + j] - theta * x_means[g * p + j];
            }
        }
    }

    let x_mat = DMatrix::from_row_slice(n, p, &x_qd);
    let y_vec = DVector::from_column_slice(&y_qd);
    let fit = solve_ols(&x_mat, &y_vec)?;

    let dof = n as f64 - fit.rank as f64;
    if dof <= 0.0 {
        return Err(PanelError::Estimation(format!(
            "insufficient degrees of freedom: n={n}, rank={}",
            fit.rank
        )));
    }
    let sigma2 = fit.rss / dof;
    let cov = &fit.xtx_pinv * sigma2;
    let std_errors: Vec<f64> = (0..p).map(|j| cov[(j, j)].max(0.0).sqrt()).collect();

    let tss: f64 = y_qd.iter().map(|v| v * v).sum();
    let r_squared = if tss > 0.0 { 1.0 - fit.rss / tss } else { 0.0 };

    Ok(RandomEffectsResult {
        coefficients: fit.beta.iter().copied().collect(),
        std_errors,
        cov,
        sigma2_e,
        sigma2_u,
        r_squared,
        rss: fit.rss,
        n_obs: n,
        n_entities,
        n_regressors: p,
    })
}

/// Idiosyncratic variance from the within (entity-demeaned) regression.
#[allow(clippy::too_many_arguments)]
fn within_variance(
    groups: &[Vec<usize>],
    x: &[f64],
    y: &[f64],
    p: usize,
    x_means: &[f64],
    y_means: &[f64],
    n: usize,
    n_entities: usize,
) -> Result<f64> {
    let mut x_dm = vec![0.0_f64; n * p];
    let mut y_dm = vec![0.0_f64; n];
    for (g, rows) in groups.iter().enumerate() {
        for &i in rows {
            y_dm[i] = y[i] - y_means[g];
            for j in 0..p {
                x_dm[i * p + j] = x[i * p + j] - x_means[g * p + j];
            }
        }
    }
    let x_mat = DMatrix::from_row_slice(n, p, &x_dm);
    let y_vec = DVector::from_column_slice(&y_dm);
    let within = solve_ols(&x_mat, &y_vec)?;

    let dof = n as f64 - n_entities as f64 - within.rank as f64;
    if dof <= 0.0 {
        return Err(PanelError::Estimation(format!(
            "insufficient within degrees of freedom: n={n}, entities={n_entities}, rank={}",
            within.rank
        )));
    }
    Ok(within.rss / dof)
}
