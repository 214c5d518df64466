use std::collections::HashMap;

use nalgebra::DMatrix;
use ndarray::{Array2, Array3};
use rayon::prelude::*;
use tracing::debug;

use super::{lstsq, CoefficientImage, DesignInputs, SolverConfig};

/// Result for one pixel: linear index, observation count, coefficients.
type PixelFit = (usize, u32, Option<Vec<f64>>);

/// Solve pixels grouped by validity pattern.
///
/// Within a group every pixel uses the same frames. Pixels whose design rows
/// equal the group's first pixel reuse its pseudo-inverse, so a series with
/// spatially constant independents (the harmonic basis) needs one SVD per
/// distinct pattern. Any pixel whose design differs is solved on its own.
pub(super) fn solve(
    inputs: &DesignInputs<'_>,
    shape: (usize, usize),
    config: &SolverConfig,
) -> CoefficientImage {
    let (h, w) = shape;
    let p = inputs.num_coefficients();

    let patterns: Vec<Vec<u64>> = (0..h * w)
        .into_par_iter()
        .map(|idx| inputs.validity_pattern(idx / w, idx % w))
        .collect();

    let mut groups: HashMap<Vec<u64>, Vec<usize>> = HashMap::new();
    for (idx, pattern) in patterns.into_iter().enumerate() {
        groups.entry(pattern).or_default().push(idx);
    }
    let groups: Vec<Vec<usize>> = groups.into_values().collect();
    debug!(patterns = groups.len(), pixels = h * w, "Grouped pixels by validity");

    let fits: Vec<PixelFit> = groups
        .par_iter()
        .flat_map_iter(|pixels| solve_group(inputs, w, pixels, config))
        .collect();

    let mut coefficients = Array3::<f64>::from_elem((h, w, p), f64::NAN);
    let mut observations = Array2::<u32>::zeros((h, w));
    for (idx, count, beta) in fits {
        let (row, col) = (idx / w, idx % w);
        observations[[row, col]] = count;
        if let Some(beta) = beta {
            for (j, b) in beta.into_iter().enumerate() {
                coefficients[[row, col, j]] = b;
            }
        }
    }

    CoefficientImage::new(coefficients, inputs.names().to_vec(), observations)
}

fn solve_group(
    inputs: &DesignInputs<'_>,
    w: usize,
    pixels: &[usize],
    config: &SolverConfig,
) -> Vec<PixelFit> {
    let p = inputs.num_coefficients();
    let mut shared_x = Vec::new();
    let mut shared_y = Vec::new();
    let first = pixels[0];
    let count = inputs.gather(first / w, first % w, &mut shared_x, &mut shared_y);

    if count < p {
        return pixels.iter().map(|&idx| (idx, count as u32, None)).collect();
    }

    let shared_pinv = lstsq::pseudo_inverse(DMatrix::from_row_slice(count, p, &shared_x), config);
    let mut x = Vec::with_capacity(shared_x.len());
    let mut y = Vec::with_capacity(count);

    pixels
        .iter()
        .map(|&idx| {
            inputs.gather(idx / w, idx % w, &mut x, &mut y);
            let beta = if x == shared_x {
                shared_pinv.as_ref().map(|pinv| lstsq::apply(pinv, &y))
            } else {
                lstsq::solve(&x, &y, p, config)
            };
            let beta = beta.filter(|b| b.iter().all(|v| v.is_finite()));
            (idx, count as u32, beta)
        })
        .collect()
}
