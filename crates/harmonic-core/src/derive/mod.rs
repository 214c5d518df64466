//! Per-frame band derivations.
//!
//! Every function takes a frame by reference and returns a new frame (or a
//! new array); source frames are never modified.

pub mod harmonic;
pub mod index;
pub mod time;

use chrono::{DateTime, Utc};

use crate::consts::{CONSTANT_BAND, NDVI_BAND, TIME_BAND};
use crate::error::Result;
use crate::frame::Frame;

pub use harmonic::harmonic_bands;
pub use index::{add_ndvi, normalized_difference};
pub use time::{add_doy, constant_band, day_of_year, fractional_years_since_epoch, time_band};

/// Add the regression variables to a raw frame: `NDVI` from `nir`/`red`,
/// the fractional-year time band `t` and the `constant` band.
pub fn add_variables(frame: &Frame, nir: &str, red: &str, epoch: DateTime<Utc>) -> Result<Frame> {
    let ndvi = normalized_difference(frame, nir, red)?;
    let shape = ndvi.dim();
    let mut out = frame.clone();
    out.push_band(NDVI_BAND, ndvi)?;
    out.push_band(TIME_BAND, time_band(frame.timestamp, epoch, shape))?;
    out.push_band(CONSTANT_BAND, constant_band(shape))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ndarray::Array2;

    #[test]
    fn add_variables_appends_three_bands() {
        let ts = Utc.with_ymd_and_hms(2019, 7, 2, 12, 0, 0).unwrap();
        let frame = Frame::new(ts)
            .insert_band("B5", Array2::from_elem((2, 3), 0.6))
            .insert_band("B4", Array2::from_elem((2, 3), 0.2));
        let epoch = Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap();

        let out = add_variables(&frame, "B5", "B4", epoch).unwrap();
        assert_eq!(out.bands.len(), 5);
        assert!((out.band(NDVI_BAND).unwrap()[[1, 2]] - 0.5).abs() < 1e-12);
        assert_eq!(out.band(CONSTANT_BAND).unwrap()[[0, 0]], 1.0);
        assert!(out.band(TIME_BAND).unwrap()[[0, 0]] > 49.0);
        // Source frame untouched.
        assert_eq!(frame.bands.len(), 2);
    }
}
