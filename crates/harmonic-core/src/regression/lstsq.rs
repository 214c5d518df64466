use nalgebra::{DMatrix, DVector};

use super::SolverConfig;

/// SVD pseudo-inverse of an `n x p` design matrix with `n >= p`.
///
/// Returns `None` when the matrix is underdetermined, numerically rank
/// deficient under `config.rank_tolerance`, or (in strict mode) has a
/// condition number above `config.max_condition_number`.
pub(crate) fn pseudo_inverse(x: DMatrix<f64>, config: &SolverConfig) -> Option<DMatrix<f64>> {
    let (n, p) = x.shape();
    if p == 0 || n < p {
        return None;
    }

    let svd = x.svd(true, true);
    let sigma_max = svd.singular_values.iter().cloned().fold(0.0, f64::max);
    let sigma_min = svd
        .singular_values
        .iter()
        .cloned()
        .fold(f64::INFINITY, f64::min);
    if !sigma_max.is_finite() || sigma_max <= 0.0 {
        return None;
    }

    let eps = config.rank_tolerance * sigma_max;
    let rank = svd.singular_values.iter().filter(|&&s| s > eps).count();
    if rank < p {
        return None;
    }
    if let Some(limit) = config.max_condition_number {
        if sigma_max / sigma_min > limit {
            return None;
        }
    }

    svd.pseudo_inverse(eps).ok()
}

/// Least-squares coefficients for a row-major `n x p` design and response `y`.
pub(crate) fn solve(rows: &[f64], y: &[f64], p: usize, config: &SolverConfig) -> Option<Vec<f64>> {
    let n = y.len();
    let x = DMatrix::from_row_slice(n, p, rows);
    let pinv = pseudo_inverse(x, config)?;
    Some(apply(&pinv, y))
}

/// `pinv * y`, with non-finite results treated as a failed solve by callers.
pub(crate) fn apply(pinv: &DMatrix<f64>, y: &[f64]) -> Vec<f64> {
    let beta = pinv * DVector::from_column_slice(y);
    beta.iter().cloned().collect()
}
