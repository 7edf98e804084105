//! Panel regression estimators.
//!
//! Both estimators solve their normal equations through an SVD
//! pseudo-inverse rather than a plain inverse: exact collinearity among
//! regressors does not abort the fit, the affected coefficients are simply
//! not identified. Only a design with no effective rank at all is an
//! error.

pub mod fixed_effects;
pub mod random_effects;

pub use fixed_effects::{fixed_effects_fit, FixedEffectsResult};
pub use random_effects::{random_effects_fit, RandomEffectsResult};

use nalgebra::{DMatrix, DVector};

use crate::error::{PanelError, Result};

/// Output of a least-squares solve on a prepared design.
pub(crate) struct OlsFit {
    pub beta: DVector<f64>,
    /// Pseudo-inverse of X'X, the bread of every covariance here.
    pub xtx_pinv: DMatrix<f64>,
    pub rss: f64,
    /// Effective rank of X'X at the SVD tolerance.
    pub rank: usize,
}

/// OLS via SVD pseudo-inverse of the normal equations.
///
/// Tolerance is the usual `s_max * max(n, p) * eps`. Errors only when the
/// design has no effective rank (all-zero X, e.g. a panel with one
/// observation per entity after demeaning).
pub(crate) fn solve_ols(x: &DMatrix<f64>, y: &DVector<f64>) -> Result<OlsFit> {
    let (n, p) = x.shape();
    let xtx = x.transpose() * x;
    let xty = x.transpose() * y;

    let svd = xtx.svd(true, true);
    let s_max = svd.singular_values.iter().cloned().fold(0.0_f64, f64::max);
    let tol = s_max * (n.max(p) as f64) * f64::EPSILON;
    let rank = svd.singular_values.iter().filter(|&&s| s > tol).count();
    if rank == 0 {
        return Err(PanelError::Estimation(
            "design matrix has no effective rank (no within variation?)".into(),
        ));
    }

    let xtx_pinv = svd
        .pseudo_inverse(tol)
        .map_err(|e| PanelError::Estimation(format!("pseudo-inverse failed: {e}")))?;

    let beta = &xtx_pinv * xty;
    let resid = y - x * &beta;
    let rss: f64 = resid.iter().map(|r| r * r).sum();

    Ok(OlsFit {
        beta,
        xtx_pinv,
        rss,
        rank,
    })
}

/// Group row indices by dense entity id. Ids must be 0..n_entities.
pub(crate) fn group_by_entity(entity_ids: &[usize]) -> Vec<Vec<usize>> {
    let n_entities = entity_ids.iter().max().map_or(0, |&m| m + 1);
    let mut groups: Vec<Vec<usize>> = vec![Vec::new(); n_entities];
    for (row, &id) in entity_ids.iter().enumerate() {
        groups[id].push(row);
    }
    groups
}

/// Shared argument validation for both estimators.
pub(crate) fn validate_design(
    entity_ids: &[usize],
    x: &[f64],
    y: &[f64],
    p: usize,
) -> Result<()> {
    let n = y.len();
    if n == 0 {
        return Err(PanelError::Validation("y must be non-empty".into()));
    }
    if p == 0 {
        return Err(PanelError::Validation("at least one regressor required".into()));
    }
    if entity_ids.len() != n {
        return Err(PanelError::Validation(format!(
            "entity_ids length ({}) != n ({n})",
            entity_ids.len()
        )));
    }
    if x.len() != n * p {
        return Err(PanelError::Validation(format!(
            "x length ({}) != n*p ({})",
            x.len(),
            n * p
        )));
    }
    Ok(())
}
