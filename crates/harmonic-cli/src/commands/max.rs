use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use harmonic_core::consts::{DOY_BAND, NDVI_BAND};
use harmonic_core::derive::{add_doy, add_ndvi};
use harmonic_core::io::image_io::{save_scaled, ValueRange};
use harmonic_core::io::manifest::load_series;
use harmonic_core::reduce::max_with_companion;
use harmonic_core::select::{filter_date_range, filter_max_cloud_cover};

#[derive(Args)]
pub struct MaxArgs {
    /// Series manifest (TOML)
    pub manifest: PathBuf,

    /// Year to reduce over
    #[arg(long)]
    pub year: i32,

    /// Maximum scene cloud cover in percent
    #[arg(long, default_value = "20")]
    pub max_cloud: f64,

    /// Near-infrared band name
    #[arg(long, default_value = "B5")]
    pub nir: String,

    /// Red band name
    #[arg(long, default_value = "B4")]
    pub red: String,

    /// Band whose validity masks the day of year
    #[arg(long, default_value = "B8")]
    pub reference: String,

    /// Missing-data value in the band files
    #[arg(long)]
    pub nodata: Option<f64>,

    /// Output path for the maximum NDVI raster
    #[arg(long, default_value = "max_ndvi.tif")]
    pub max_output: PathBuf,

    /// Output path for the day-of-year raster
    #[arg(long, default_value = "doy_of_max.tif")]
    pub doy_output: PathBuf,
}

pub fn run(args: &MaxArgs) -> Result<()> {
    let series = load_series(&args.manifest, args.nodata)
        .with_context(|| format!("Failed to load {}", args.manifest.display()))?;

    let start = NaiveDate::from_ymd_opt(args.year, 1, 1).context("Invalid year")?;
    let end = NaiveDate::from_ymd_opt(args.year, 12, 31).context("Invalid year")?;
    let selected = filter_max_cloud_cover(&series, args.max_cloud, false);
    let selected = filter_date_range(&selected, start, end);
    println!(
        "Selected {} of {} frames in {} (cloud cover <= {}%)",
        selected.len(),
        series.len(),
        args.year,
        args.max_cloud
    );

    let derived = selected.try_map(|frame| {
        let with_ndvi = add_ndvi(frame, &args.nir, &args.red)?;
        add_doy(&with_ndvi, &args.reference)
    })?;
    let extrema = max_with_companion(&derived, NDVI_BAND, DOY_BAND)?;

    save_scaled(&extrema.max.view(), &ValueRange::new(0.3, 0.6), &args.max_output)?;
    save_scaled(
        &extrema.companion_at_max.view(),
        &ValueRange::new(100.0, 170.0),
        &args.doy_output,
    )?;
    println!("Saved {}", args.max_output.display());
    println!("Saved {}", args.doy_output.display());
    Ok(())
}
