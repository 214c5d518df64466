use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_HARMONIC_ORDER, DEFAULT_MAX_CLOUD_COVER, DEFAULT_NIR_BAND, DEFAULT_RED_BAND,
    DEFAULT_REFERENCE_BAND, NDVI_BAND,
};
use crate::frame::Region;
use crate::io::image_io::ValueRange;
use crate::regression::SolverConfig;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Series manifest (TOML).
    pub input: PathBuf,
    /// Directory receiving rasters, chart and summary.
    pub output: PathBuf,
    /// Missing-data value in the band files; overrides the manifest.
    #[serde(default)]
    pub nodata: Option<f64>,
    #[serde(default)]
    pub bands: BandConfig,
    #[serde(default)]
    pub selection: SelectionConfig,
    #[serde(default)]
    pub harmonic: HarmonicConfig,
    pub extrema: Option<ExtremaConfig>,
    pub chart: Option<ChartConfig>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("series.toml"),
            output: PathBuf::from("harmonic-out"),
            nodata: None,
            bands: BandConfig::default(),
            selection: SelectionConfig::default(),
            harmonic: HarmonicConfig::default(),
            extrema: None,
            chart: None,
        }
    }
}

/// Source band names.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BandConfig {
    pub nir: String,
    pub red: String,
    /// Band whose validity masks the day-of-year band.
    pub reference: String,
}

impl Default for BandConfig {
    fn default() -> Self {
        Self {
            nir: DEFAULT_NIR_BAND.to_string(),
            red: DEFAULT_RED_BAND.to_string(),
            reference: DEFAULT_REFERENCE_BAND.to_string(),
        }
    }
}

/// Collection-wide filters, applied before anything else.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Upper bound on scene cloud cover in percent.
    pub max_cloud_cover: Option<f64>,
    /// Keep frames that carry no cloud cover value.
    pub keep_unknown_cloud_cover: bool,
    /// Clip every frame to this pixel window.
    pub region: Option<Region>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            max_cloud_cover: Some(DEFAULT_MAX_CLOUD_COVER),
            keep_unknown_cloud_cover: false,
            region: None,
        }
    }
}

/// Inclusive range of acquisition dates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarmonicConfig {
    pub order: usize,
    /// Band the model is fitted to.
    pub dependent: String,
    /// Origin of the fractional-year time band.
    pub epoch: DateTime<Utc>,
    /// Restrict the fit to these dates; all dates when absent.
    pub window: Option<DateWindow>,
    pub solver: SolverConfig,
}

impl Default for HarmonicConfig {
    fn default() -> Self {
        Self {
            order: DEFAULT_HARMONIC_ORDER,
            dependent: NDVI_BAND.to_string(),
            epoch: unix_epoch(),
            window: None,
            solver: SolverConfig::default(),
        }
    }
}

/// Maximum NDVI with its day of year over one date window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExtremaConfig {
    pub window: DateWindow,
    /// Export range for the maximum NDVI raster.
    #[serde(default = "default_max_range")]
    pub max_range: ValueRange,
    /// Export range for the day-of-year raster.
    #[serde(default = "default_doy_range")]
    pub doy_range: ValueRange,
}

impl ExtremaConfig {
    pub fn for_year(year: i32) -> Option<Self> {
        Some(Self {
            window: DateWindow {
                start: NaiveDate::from_ymd_opt(year, 1, 1)?,
                end: NaiveDate::from_ymd_opt(year, 12, 31)?,
            },
            max_range: default_max_range(),
            doy_range: default_doy_range(),
        })
    }
}

/// Observed vs fitted chart over a pixel window.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    pub region: Region,
}

pub fn unix_epoch() -> DateTime<Utc> {
    Utc.timestamp_opt(0, 0).single().unwrap_or_default()
}

fn default_max_range() -> ValueRange {
    ValueRange::new(0.3, 0.6)
}

fn default_doy_range() -> ValueRange {
    ValueRange::new(100.0, 170.0)
}
