use ndarray::parallel::prelude::*;
use ndarray::{Array2, Array3, ArrayView1, ArrayViewMut1, ArrayViewMut2, Axis};

use crate::consts::PARALLEL_PIXEL_THRESHOLD;

use super::{lstsq, CoefficientImage, DesignInputs, SolverConfig};

/// Solve every pixel independently.
///
/// Parallelizes at the row level for rasters with at least
/// [`PARALLEL_PIXEL_THRESHOLD`] pixels. Each row task writes only its own
/// slice of the output.
pub(super) fn solve(
    inputs: &DesignInputs<'_>,
    shape: (usize, usize),
    config: &SolverConfig,
) -> CoefficientImage {
    let (h, w) = shape;
    let p = inputs.num_coefficients();
    let mut coefficients = Array3::<f64>::from_elem((h, w, p), f64::NAN);
    let mut observations = Array2::<u32>::zeros((h, w));

    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        coefficients
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .zip(observations.axis_iter_mut(Axis(0)).into_par_iter())
            .enumerate()
            .for_each(|(row, (coef_row, obs_row))| {
                solve_row(inputs, row, coef_row, obs_row, config)
            });
    } else {
        coefficients
            .axis_iter_mut(Axis(0))
            .zip(observations.axis_iter_mut(Axis(0)))
            .enumerate()
            .for_each(|(row, (coef_row, obs_row))| {
                solve_row(inputs, row, coef_row, obs_row, config)
            });
    }

    CoefficientImage::new(coefficients, inputs.names().to_vec(), observations)
}

fn solve_row(
    inputs: &DesignInputs<'_>,
    row: usize,
    mut coef_row: ArrayViewMut2<'_, f64>,
    mut obs_row: ArrayViewMut1<'_, u32>,
    config: &SolverConfig,
) {
    let n = inputs.num_frames();
    let p = inputs.num_coefficients();
    let mut x = Vec::with_capacity(n * p);
    let mut y = Vec::with_capacity(n);

    for col in 0..coef_row.nrows() {
        let count = inputs.gather(row, col, &mut x, &mut y);
        obs_row[col] = count as u32;
        if count < p {
            continue;
        }
        if let Some(beta) = lstsq::solve(&x, &y, p, config) {
            if beta.iter().all(|v| v.is_finite()) {
                coef_row.row_mut(col).assign(&ArrayView1::from(&beta[..]));
            }
        }
    }
}
