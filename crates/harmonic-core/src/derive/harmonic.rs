use std::f64::consts::PI;

use crate::consts::TIME_BAND;
use crate::design::{cos_band, sin_band};
use crate::error::{HarmonicError, Result};
use crate::frame::Frame;

/// Append `cos{i}` and `sin{i}` bands for `i` in `1..=order`.
///
/// The angle for harmonic `i` is `t * i * 2π`, with `t` read from the frame's
/// time band. Fails if `t` is missing, if `order` is zero, or if any of the
/// harmonic band names already exist.
pub fn harmonic_bands(frame: &Frame, order: usize) -> Result<Frame> {
    if order < 1 {
        return Err(HarmonicError::InvalidOrder(order));
    }
    let t = frame.band(TIME_BAND)?;

    let mut out = frame.clone();
    for i in 1..=order {
        let omega = i as f64 * 2.0 * PI;
        let radians = t.mapv(|v| v * omega);
        out.push_band(&cos_band(i), radians.mapv(f64::cos))?;
        out.push_band(&sin_band(i), radians.mapv(f64::sin))?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use ndarray::{array, Array2};

    #[test]
    fn quarter_year_angles() {
        let frame = Frame::new(Utc::now()).insert_band(TIME_BAND, array![[0.25, f64::NAN]]);
        let out = harmonic_bands(&frame, 2).unwrap();
        assert!(out.band("cos1").unwrap()[[0, 0]].abs() < 1e-12);
        assert!((out.band("sin1").unwrap()[[0, 0]] - 1.0).abs() < 1e-12);
        assert!((out.band("cos2").unwrap()[[0, 0]] + 1.0).abs() < 1e-12);
        assert!(out.band("sin2").unwrap()[[0, 1]].is_nan());
        assert!(!frame.has_band("cos1"));
    }

    #[test]
    fn missing_time_band() {
        let frame = Frame::new(Utc::now()).insert_band("NDVI", Array2::zeros((1, 1)));
        assert!(matches!(
            harmonic_bands(&frame, 1),
            Err(HarmonicError::MissingBand { .. })
        ));
    }

    #[test]
    fn zero_order_rejected() {
        let frame = Frame::new(Utc::now()).insert_band(TIME_BAND, Array2::zeros((1, 1)));
        assert!(matches!(
            harmonic_bands(&frame, 0),
            Err(HarmonicError::InvalidOrder(0))
        ));
    }
}
