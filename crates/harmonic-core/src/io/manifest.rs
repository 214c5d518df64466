//! TOML manifest describing a series of single-band image files.
//!
//! ```toml
//! nodata = 0
//!
//! [[frames]]
//! timestamp = "2019-06-15T10:30:00Z"
//! cloud_cover = 12.5
//! id = "LC08_187027_20190615"
//!
//! [frames.bands]
//! B4 = "20190615/B4.tif"
//! B5 = "20190615/B5.tif"
//! ```
//!
//! Relative band paths are resolved against the manifest's directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{HarmonicError, Result};
use crate::frame::{Frame, FrameMetadata, Series};

use super::image_io::load_band;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// Value marking missing pixels in every band file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodata: Option<f64>,
    #[serde(default)]
    pub frames: Vec<FrameEntry>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FrameEntry {
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cloud_cover: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub bands: BTreeMap<String, PathBuf>,
}

impl Manifest {
    pub fn from_toml(text: &str) -> Result<Self> {
        let manifest: Manifest =
            toml::from_str(text).map_err(|e| HarmonicError::Manifest(e.to_string()))?;
        if let Some(i) = manifest.frames.iter().position(|f| f.bands.is_empty()) {
            return Err(HarmonicError::Manifest(format!("frame {i} lists no bands")));
        }
        Ok(manifest)
    }

    pub fn read(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Load every listed band file into a series. `base_dir` resolves
    /// relative paths; `nodata` overrides the manifest's own value.
    pub fn load(&self, base_dir: &Path, nodata: Option<f64>) -> Result<Series> {
        let nodata = nodata.or(self.nodata);
        let frames = self
            .frames
            .par_iter()
            .enumerate()
            .map(|(i, entry)| entry.load(i, base_dir, nodata))
            .collect::<Result<Vec<_>>>()?;
        Ok(Series::new(frames))
    }
}

impl FrameEntry {
    fn load(&self, frame_index: usize, base_dir: &Path, nodata: Option<f64>) -> Result<Frame> {
        let mut frame = Frame::new(self.timestamp).with_metadata(FrameMetadata {
            frame_index,
            cloud_cover: self.cloud_cover,
            id: self.id.clone(),
        });
        for (name, rel) in &self.bands {
            let path = if rel.is_absolute() {
                rel.clone()
            } else {
                base_dir.join(rel)
            };
            let data = load_band(&path, nodata)?;
            frame.push_band(name, data)?;
        }
        Ok(frame)
    }
}

/// Read a manifest file and load its series.
pub fn load_series(path: &Path, nodata: Option<f64>) -> Result<Series> {
    let manifest = Manifest::read(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let series = manifest.load(base_dir, nodata)?;
    info!(
        frames = series.len(),
        manifest = %path.display(),
        "Loaded series"
    );
    Ok(series)
}
