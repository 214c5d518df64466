use ndarray::parallel::prelude::*;
use ndarray::{Array2, ArrayViewMut1, Axis};

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::error::Result;
use crate::frame::Series;

/// Per-pixel maximum of a primary band plus the companion band's value at
/// the frame that attained it.
#[derive(Clone, Debug)]
pub struct ExtremaImage {
    pub max: Array2<f64>,
    pub companion_at_max: Array2<f64>,
}

/// Reduce a series to the per-pixel maximum of `primary`, carrying along
/// `companion` from the same frame.
///
/// `NaN` primary values are skipped; a pixel with no valid primary value
/// is `NaN` in both outputs. Ties go to the earliest frame in series order.
pub fn max_with_companion(series: &Series, primary: &str, companion: &str) -> Result<ExtremaImage> {
    let (h, w) = series.common_shape(&[primary.to_string(), companion.to_string()])?;
    let primaries = series
        .iter()
        .map(|f| f.band(primary))
        .collect::<Result<Vec<_>>>()?;
    let companions = series
        .iter()
        .map(|f| f.band(companion))
        .collect::<Result<Vec<_>>>()?;

    let mut max = Array2::<f64>::from_elem((h, w), f64::NAN);
    let mut companion_at_max = Array2::<f64>::from_elem((h, w), f64::NAN);

    if h * w >= PARALLEL_PIXEL_THRESHOLD {
        max.axis_iter_mut(Axis(0))
            .into_par_iter()
            .zip(companion_at_max.axis_iter_mut(Axis(0)).into_par_iter())
            .enumerate()
            .for_each(|(row, (m, c))| reduce_row(&primaries, &companions, row, m, c));
    } else {
        for (row, (m, c)) in max
            .axis_iter_mut(Axis(0))
            .zip(companion_at_max.axis_iter_mut(Axis(0)))
            .enumerate()
        {
            reduce_row(&primaries, &companions, row, m, c);
        }
    }

    Ok(ExtremaImage {
        max,
        companion_at_max,
    })
}

fn reduce_row(
    primaries: &[&Array2<f64>],
    companions: &[&Array2<f64>],
    row: usize,
    mut max_row: ArrayViewMut1<'_, f64>,
    mut comp_row: ArrayViewMut1<'_, f64>,
) {
    for col in 0..max_row.len() {
        let mut best: Option<(usize, f64)> = None;
        for (i, band) in primaries.iter().enumerate() {
            let v = band[[row, col]];
            if v.is_nan() {
                continue;
            }
            match best {
                Some((_, b)) if b >= v => {}
                _ => best = Some((i, v)),
            }
        }
        if let Some((i, v)) = best {
            max_row[col] = v;
            comp_row[col] = companions[i][[row, col]];
        }
    }
}
