use std::fs::{self, File};
use std::io::BufWriter;

use tracing::debug;

use crate::chart::write_csv;
use crate::consts::FITTED_BAND;
use crate::error::{HarmonicError, Result};
use crate::io::image_io::{save_scaled_tiff, ValueRange};

use super::config::PipelineConfig;
use super::types::PipelineOutput;

/// Write rasters, chart and summary into `config.output`.
///
/// Layout:
/// - `coefficients/<name>.tif`, each scaled over its own finite value range
///   (the ranges are recorded in `summary.toml`; `[0, 1]` if no pixel is valid)
/// - `observations.tif`, valid observation count per pixel over `0..=frames`
/// - `max_ndvi.tif`, `doy_of_max.tif` when extrema are configured
/// - `chart.csv` when a chart region is configured
pub(super) fn write_outputs(config: &PipelineConfig, output: &PipelineOutput) -> Result<()> {
    let dir = &config.output;
    let coef_dir = dir.join("coefficients");
    fs::create_dir_all(&coef_dir)?;

    for name in output.coefficients.names() {
        let Some(band) = output.coefficients.band(name) else {
            continue;
        };
        let range = ValueRange::from_data(&band);
        let path = coef_dir.join(format!("{name}.tif"));
        debug!(path = %path.display(), "Writing coefficient raster");
        save_scaled_tiff(&band, &range, &path)?;
    }

    let observations = output.coefficients.observations().mapv(|n| n as f64);
    let frames = output.fitted.len().max(1) as f64;
    save_scaled_tiff(
        &observations.view(),
        &ValueRange::new(0.0, frames),
        &dir.join("observations.tif"),
    )?;

    if let (Some(extrema), Some(ec)) = (&output.extrema, &config.extrema) {
        save_scaled_tiff(&extrema.max.view(), &ec.max_range, &dir.join("max_ndvi.tif"))?;
        save_scaled_tiff(
            &extrema.companion_at_max.view(),
            &ec.doy_range,
            &dir.join("doy_of_max.tif"),
        )?;
    }

    if let Some(ref rows) = output.chart {
        let bands = [config.harmonic.dependent.clone(), FITTED_BAND.to_string()];
        let file = File::create(dir.join("chart.csv"))?;
        write_csv(BufWriter::new(file), &bands, rows)?;
    }

    let summary = toml::to_string_pretty(&output.summary)
        .map_err(|e| HarmonicError::Pipeline(format!("cannot serialize summary: {e}")))?;
    fs::write(dir.join("summary.toml"), summary)?;
    Ok(())
}
