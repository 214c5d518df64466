use chrono::{DateTime, Datelike, Utc};
use ndarray::{Array2, Zip};

use crate::consts::{DOY_BAND, SECONDS_PER_YEAR};
use crate::error::Result;
use crate::frame::Frame;

/// Elapsed time from `epoch` to `timestamp` in Julian years (365.25 days).
///
/// This is the value of the `t` band and the input to every harmonic angle.
/// Timestamps before the epoch yield negative values.
pub fn fractional_years_since_epoch(timestamp: DateTime<Utc>, epoch: DateTime<Utc>) -> f64 {
    let elapsed = timestamp.signed_duration_since(epoch);
    let seconds = elapsed.num_seconds() as f64 + elapsed.subsec_nanos() as f64 * 1e-9;
    seconds / SECONDS_PER_YEAR
}

/// Constant-valued `t` band for a frame acquired at `timestamp`.
pub fn time_band(
    timestamp: DateTime<Utc>,
    epoch: DateTime<Utc>,
    shape: (usize, usize),
) -> Array2<f64> {
    Array2::from_elem(shape, fractional_years_since_epoch(timestamp, epoch))
}

/// Constant-1 intercept band.
pub fn constant_band(shape: (usize, usize)) -> Array2<f64> {
    Array2::from_elem(shape, 1.0)
}

/// Day of year (1-366) of the frame's acquisition, broadcast over the frame
/// and masked to the validity of `reference_band`.
pub fn day_of_year(frame: &Frame, reference_band: &str) -> Result<Array2<f64>> {
    let reference = frame.band(reference_band)?;
    let doy = frame.timestamp.ordinal() as f64;
    let mut out = Array2::<f64>::zeros(reference.dim());
    Zip::from(&mut out).and(reference).for_each(|o, &r| {
        *o = if r.is_nan() { f64::NAN } else { doy };
    });
    Ok(out)
}

/// Append a `DOY` band masked by `reference_band`.
pub fn add_doy(frame: &Frame, reference_band: &str) -> Result<Frame> {
    let doy = day_of_year(frame, reference_band)?;
    frame.with_band(DOY_BAND, doy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use ndarray::array;

    fn epoch() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn one_julian_year_is_one() {
        let ts = epoch() + chrono::Duration::seconds(SECONDS_PER_YEAR as i64);
        assert!((fractional_years_since_epoch(ts, epoch()) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn before_epoch_is_negative() {
        let ts = Utc.with_ymd_and_hms(1969, 7, 2, 0, 0, 0).unwrap();
        let t = fractional_years_since_epoch(ts, epoch());
        assert!(t < 0.0 && t > -1.0);
    }

    #[test]
    fn doy_is_one_based_and_masked() {
        let ts = Utc.with_ymd_and_hms(2020, 12, 31, 10, 0, 0).unwrap();
        let frame = Frame::new(ts).insert_band("B8", array![[1.0, f64::NAN], [2.0, 3.0]]);
        let doy = day_of_year(&frame, "B8").unwrap();
        assert_eq!(doy[[0, 0]], 366.0);
        assert!(doy[[0, 1]].is_nan());
        assert_eq!(doy[[1, 1]], 366.0);

        let jan1 = Frame::new(Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap())
            .insert_band("B8", array![[1.0]]);
        assert_eq!(day_of_year(&jan1, "B8").unwrap()[[0, 0]], 1.0);
    }

    #[test]
    fn doy_requires_reference_band() {
        let frame = Frame::new(epoch()).insert_band("B4", array![[1.0]]);
        assert!(add_doy(&frame, "B8").is_err());
    }
}
