//! Deterministic synthetic panel generation.
//!
//! Developer/test mode only: produces a balanced trade panel with a known
//! linear signal, entity effects, and noise, seeded from the dataset name so
//! two generations for the same name are identical. Clearly fake data —
//! results on it are for plumbing checks, not analysis.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use panellab_core::frame::RawTable;

/// Shape of a synthetic panel.
#[derive(Debug, Clone)]
pub struct SyntheticSpec {
    pub n_entities: usize,
    pub n_years: usize,
    pub first_year: i32,
}

impl Default for SyntheticSpec {
    fn default() -> Self {
        Self {
            n_entities: 20,
            n_years: 10,
            first_year: 2000,
        }
    }
}

/// Generate a balanced synthetic panel with the given regressor columns.
///
/// Every regressor gets an independent random walk per entity; the
/// dependent variable is a fixed linear combination of the regressors plus
/// an entity effect and Gaussian-ish noise. A `const` column of ones is
/// included so the table passes the same preprocessing as real data.
pub fn generate_synthetic_table(
    name: &str,
    dependent: &str,
    regressors: &[String],
    spec: &SyntheticSpec,
) -> RawTable {
    // Deterministic seed from the dataset name.
    let seed: [u8; 32] = *blake3::hash(name.as_bytes()).as_bytes();
    let mut rng = StdRng::from_seed(seed);

    let n = spec.n_entities * spec.n_years;
    let k = regressors.len();

    let mut country = Vec::with_capacity(n);
    let mut code = Vec::with_capacity(n);
    let mut year = Vec::with_capacity(n);
    let mut reg_values: Vec<Vec<f64>> = (0..k).map(|_| Vec::with_capacity(n)).collect();
    let mut dep_values = Vec::with_capacity(n);

    // Fixed coefficients, alternating sign so the signal is identifiable.
    let coefs: Vec<f64> = (0..k)
        .map(|j| if j % 2 == 0 { 0.8 } else { -0.5 })
        .collect();

    for e in 0..spec.n_entities {
        let entity_effect: f64 = rng.gen_range(-1.0..1.0);
        let mut levels: Vec<f64> = (0..k).map(|_| rng.gen_range(1.0..5.0)).collect();

        for t in 0..spec.n_years {
            country.push(format!("Partner{e:02}"));
            code.push(format!("{}", 100 + e));
            year.push(spec.first_year + t as i32);

            let mut y = entity_effect + rng.gen_range(-0.2..0.2);
            for (j, level) in levels.iter_mut().enumerate() {
                *level += rng.gen_range(-0.3..0.3);
                reg_values[j].push(*level);
                y += coefs[j] * *level;
            }
            dep_values.push(y);
        }
    }

    let mut columns = Vec::with_capacity(k + 2);
    columns.push((dependent.to_string(), dep_values));
    for (j, reg) in regressors.iter().enumerate() {
        columns.push((reg.clone(), std::mem::take(&mut reg_values[j])));
    }
    columns.push(("const".to_string(), vec![1.0; n]));

    RawTable {
        country,
        code,
        year,
        columns,
    }
}
