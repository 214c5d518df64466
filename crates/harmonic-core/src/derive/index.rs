use ndarray::{Array2, Zip};

use crate::consts::NDVI_BAND;
use crate::error::{HarmonicError, Result};
use crate::frame::Frame;

/// Normalized difference `(A - B) / (A + B)`.
///
/// Pixels where either input is `NaN` or `A + B == 0` come out as `NaN`.
pub fn normalized_difference(frame: &Frame, band_a: &str, band_b: &str) -> Result<Array2<f64>> {
    let a = frame.band(band_a)?;
    let b = frame.band(band_b)?;
    if a.dim() != b.dim() {
        return Err(HarmonicError::ShapeMismatch {
            band: band_b.to_string(),
            frame_index: frame.metadata.frame_index,
            expected: a.dim(),
            actual: b.dim(),
        });
    }

    let mut out = Array2::<f64>::zeros(a.dim());
    Zip::from(&mut out).and(a).and(b).for_each(|o, &x, &y| {
        let sum = x + y;
        *o = if sum == 0.0 || !sum.is_finite() {
            f64::NAN
        } else {
            (x - y) / sum
        };
    });
    Ok(out)
}

/// Append an `NDVI` band computed from `nir` and `red`.
pub fn add_ndvi(frame: &Frame, nir: &str, red: &str) -> Result<Frame> {
    let ndvi = normalized_difference(frame, nir, red)?;
    frame.with_band(NDVI_BAND, ndvi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ndarray::array;

    fn frame() -> Frame {
        Frame::new(Utc::now())
            .insert_band("nir", array![[0.5, 0.0, f64::NAN], [3.0, 1.0, -1.0]])
            .insert_band("red", array![[0.1, 0.0, 0.2], [1.0, 1.0, 1.0]])
    }

    #[test]
    fn ratio_and_invalid_pixels() {
        let nd = normalized_difference(&frame(), "nir", "red").unwrap();
        assert!((nd[[0, 0]] - 0.4 / 0.6).abs() < 1e-12);
        assert!(nd[[0, 1]].is_nan(), "zero denominator must be NaN");
        assert!(nd[[0, 2]].is_nan(), "NaN input must propagate");
        assert!((nd[[1, 0]] - 0.5).abs() < 1e-12);
        assert_eq!(nd[[1, 1]], 0.0);
        assert!(nd[[1, 2]].is_nan(), "a + b == 0 must be NaN, not inf");
        assert!(nd.iter().all(|v| !v.is_infinite()));
    }

    #[test]
    fn missing_band_is_error() {
        let err = normalized_difference(&frame(), "nir", "swir").unwrap_err();
        assert!(matches!(err, HarmonicError::MissingBand { .. }));
    }

    #[test]
    fn add_ndvi_refuses_overwrite() {
        let f = add_ndvi(&frame(), "nir", "red").unwrap();
        assert!(f.has_band(NDVI_BAND));
        assert!(matches!(
            add_ndvi(&f, "nir", "red"),
            Err(HarmonicError::BandExists { .. })
        ));
    }
}
