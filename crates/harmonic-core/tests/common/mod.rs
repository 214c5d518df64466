#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use ndarray::Array2;

use harmonic_core::consts::{CONSTANT_BAND, NDVI_BAND, TIME_BAND};
use harmonic_core::derive::{constant_band, time_band};
use harmonic_core::design::{augment, DesignSpec};
use harmonic_core::frame::{Frame, FrameMetadata, Series};

pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1970, 1, 1, 0, 0, 0).unwrap()
}

/// `n` acquisition times, 11 days and a few hours apart, starting in 2016.
pub fn timestamps(n: usize) -> Vec<DateTime<Utc>> {
    let start = Utc.with_ymd_and_hms(2016, 1, 3, 9, 40, 0).unwrap();
    (0..n)
        .map(|i| start + Duration::days(11 * i as i64) + Duration::hours((i % 5) as i64))
        .collect()
}

/// Ground-truth coefficients for pixel `(row, col)`, length `2 + 2 * order`.
pub fn beta_at(order: usize, row: usize, col: usize) -> Vec<f64> {
    let mut beta = vec![0.35 + 0.01 * row as f64, 0.002 - 0.0005 * col as f64];
    for i in 1..=order {
        let k = i as f64;
        beta.push(0.15 / k + 0.005 * row as f64);
        beta.push(-0.08 / k + 0.003 * col as f64);
    }
    beta
}

/// Deterministic pseudo-noise in roughly `[-amplitude, amplitude]`.
pub fn noise(frame: usize, row: usize, col: usize, amplitude: f64) -> f64 {
    let x = (frame as f64 * 12.9898 + row as f64 * 78.233 + col as f64 * 37.719).sin() * 43_758.545;
    (x - x.floor() - 0.5) * 2.0 * amplitude
}

/// A frame carrying `t` and `constant` bands.
pub fn time_frame(ts: DateTime<Utc>, index: usize, shape: (usize, usize)) -> Frame {
    Frame::new(ts)
        .insert_band(TIME_BAND, time_band(ts, epoch(), shape))
        .insert_band(CONSTANT_BAND, constant_band(shape))
        .with_metadata(FrameMetadata {
            frame_index: index,
            cloud_cover: Some(5.0),
            id: None,
        })
}

/// Design-ready series whose `NDVI` band follows `beta_at` exactly, plus
/// optional pseudo-noise.
pub fn synthetic_series(
    order: usize,
    n: usize,
    shape: (usize, usize),
    noise_amplitude: f64,
) -> (Series, DesignSpec) {
    let spec = DesignSpec::new(order, NDVI_BAND).unwrap();
    let frames = timestamps(n)
        .into_iter()
        .enumerate()
        .map(|(i, ts)| {
            let frame = augment(&time_frame(ts, i, shape), &spec).unwrap();
            let mut y = Array2::<f64>::zeros(shape);
            for ((r, c), v) in y.indexed_iter_mut() {
                let beta = beta_at(order, r, c);
                *v = spec
                    .independents()
                    .iter()
                    .zip(&beta)
                    .map(|(name, b)| b * frame.band(name).unwrap()[[r, c]])
                    .sum::<f64>()
                    + noise(i, r, c, noise_amplitude);
            }
            frame.insert_band(NDVI_BAND, y)
        })
        .collect();
    (Series::new(frames), spec)
}

/// Replace one pixel of one band in one frame.
pub fn set_pixel(series: Series, frame: usize, band: &str, row: usize, col: usize, value: f64) -> Series {
    let mut frames = series.into_frames();
    frames[frame].bands.get_mut(band).unwrap()[[row, col]] = value;
    Series::new(frames)
}

/// Write raw digital numbers to a 16-bit TIFF that `load_band` reads back
/// unchanged.
pub fn write_dn_tiff(path: &std::path::Path, data: &Array2<f64>) {
    harmonic_core::io::image_io::save_scaled_tiff(
        &data.view(),
        &harmonic_core::io::image_io::ValueRange::new(0.0, 65535.0),
        path,
    )
    .unwrap();
}
