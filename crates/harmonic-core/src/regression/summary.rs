use ndarray::{Array2, Axis, Zip};
use serde::{Deserialize, Serialize};

use crate::design::{cos_band, sin_band};

use super::CoefficientImage;

/// Range and mean of one coefficient over the valid pixels.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoefficientStats {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoefficientSummary {
    pub rows: usize,
    pub cols: usize,
    pub valid_pixels: usize,
    pub invalid_pixels: usize,
    pub coefficients: Vec<CoefficientStats>,
}

impl CoefficientSummary {
    pub fn from_image(image: &CoefficientImage) -> Self {
        let (rows, cols) = image.shape();
        let valid_pixels = image.valid_count();
        let coefficients = image
            .names()
            .iter()
            .enumerate()
            .map(|(j, name)| {
                let band = image.coefficients().index_axis(Axis(2), j);
                let (min, max, sum, n) = band.iter().filter(|v| v.is_finite()).fold(
                    (f64::INFINITY, f64::NEG_INFINITY, 0.0, 0usize),
                    |(lo, hi, s, n), &v| (lo.min(v), hi.max(v), s + v, n + 1),
                );
                if n == 0 {
                    CoefficientStats {
                        name: name.clone(),
                        min: f64::NAN,
                        max: f64::NAN,
                        mean: f64::NAN,
                    }
                } else {
                    CoefficientStats {
                        name: name.clone(),
                        min,
                        max,
                        mean: sum / n as f64,
                    }
                }
            })
            .collect();
        Self {
            rows,
            cols,
            valid_pixels,
            invalid_pixels: rows * cols - valid_pixels,
            coefficients,
        }
    }
}

/// Amplitude `√(cos² + sin²)` and phase `atan2(sin, cos)` (radians) of
/// harmonic `i`. `None` if the image has no such harmonic.
pub fn amplitude_phase(image: &CoefficientImage, i: usize) -> Option<(Array2<f64>, Array2<f64>)> {
    let c = image.band(&cos_band(i))?;
    let s = image.band(&sin_band(i))?;
    let mut amplitude = Array2::<f64>::zeros(image.shape());
    let mut phase = Array2::<f64>::zeros(image.shape());
    Zip::from(&mut amplitude)
        .and(&mut phase)
        .and(&c)
        .and(&s)
        .for_each(|a, p, &cv, &sv| {
            *a = cv.hypot(sv);
            *p = sv.atan2(cv);
        });
    Some((amplitude, phase))
}
