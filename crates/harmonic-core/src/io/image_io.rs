use std::path::Path;

use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Linear display range used when quantizing a floating-point raster.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Map `v` into `[0, 1]`, clamping outside the range. `NaN` maps to 0.
    pub fn normalize(&self, v: f64) -> f64 {
        let span = self.max - self.min;
        if !v.is_finite() || span <= 0.0 {
            return 0.0;
        }
        ((v - self.min) / span).clamp(0.0, 1.0)
    }

    /// Range spanning the finite values of `data`, or `[0, 1]` if there are none.
    pub fn from_data(data: &ArrayView2<'_, f64>) -> Self {
        let (lo, hi) = data
            .iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if lo.is_finite() && hi.is_finite() {
            Self::new(lo, hi)
        } else {
            Self::new(0.0, 1.0)
        }
    }
}

/// Save a raster as 16-bit grayscale TIFF, `range` mapped to `0..=65535`.
pub fn save_scaled_tiff(data: &ArrayView2<'_, f64>, range: &ValueRange, path: &Path) -> Result<()> {
    let (h, w) = data.dim();

    let mut pixels: Vec<u16> = Vec::with_capacity(h * w);
    for row in 0..h {
        for col in 0..w {
            pixels.push((range.normalize(data[[row, col]]) * 65535.0).round() as u16);
        }
    }

    let img = image::ImageBuffer::<Luma<u16>, Vec<u16>>::from_raw(w as u32, h as u32, pixels)
        .expect("buffer size matches dimensions");
    img.save_with_format(path, ImageFormat::Tiff)?;
    Ok(())
}

/// Save a raster as 8-bit grayscale PNG, `range` mapped to `0..=255`.
pub fn save_scaled_png(data: &ArrayView2<'_, f64>, range: &ValueRange, path: &Path) -> Result<()> {
    let (h, w) = data.dim();

    let mut img = GrayImage::new(w as u32, h as u32);
    for row in 0..h {
        for col in 0..w {
            let val = (range.normalize(data[[row, col]]) * 255.0).round() as u8;
            img.put_pixel(col as u32, row as u32, Luma([val]));
        }
    }

    img.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

/// Save a raster, choosing format from file extension.
pub fn save_scaled(data: &ArrayView2<'_, f64>, range: &ValueRange, path: &Path) -> Result<()> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("png") => save_scaled_png(data, range, path),
        _ => save_scaled_tiff(data, range, path),
    }
}

/// Load a single-band image as raw digital numbers.
///
/// 8- and 16-bit grayscale images keep their stored values; other layouts
/// are converted to 16-bit luminance. Pixels equal to `nodata` become `NaN`.
pub fn load_band(path: &Path, nodata: Option<f64>) -> Result<Array2<f64>> {
    let img = image::open(path)?;
    let (w, h) = (img.width() as usize, img.height() as usize);
    let mut data = Array2::<f64>::zeros((h, w));

    match img {
        DynamicImage::ImageLuma8(gray) => {
            for (x, y, p) in gray.enumerate_pixels() {
                data[[y as usize, x as usize]] = p.0[0] as f64;
            }
        }
        other => {
            let gray = other.to_luma16();
            for (x, y, p) in gray.enumerate_pixels() {
                data[[y as usize, x as usize]] = p.0[0] as f64;
            }
        }
    }

    if let Some(nd) = nodata {
        data.mapv_inplace(|v| if v == nd { f64::NAN } else { v });
    }
    Ok(data)
}
