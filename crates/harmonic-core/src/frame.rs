use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use ndarray::{s, Array2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{HarmonicError, Result};

/// Minimum frame count to map a series with frame-level Rayon parallelism.
const PARALLEL_FRAME_THRESHOLD: usize = 4;

/// A single raster observation.
///
/// Every band is a pixel-aligned `(rows, cols)` array of `f64`. Missing or
/// invalid pixels are `NaN`.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Acquisition time.
    pub timestamp: DateTime<Utc>,
    /// Named bands, all sharing one spatial shape.
    pub bands: BTreeMap<String, Array2<f64>>,
    pub metadata: FrameMetadata,
}

impl Frame {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            bands: BTreeMap::new(),
            metadata: FrameMetadata::default(),
        }
    }

    /// Builder-style band insertion for constructing raw frames.
    ///
    /// Replaces a band of the same name. Derived bands go through
    /// [`Frame::with_band`], which refuses to overwrite.
    pub fn insert_band(mut self, name: impl Into<String>, data: Array2<f64>) -> Self {
        self.bands.insert(name.into(), data);
        self
    }

    pub fn with_metadata(mut self, metadata: FrameMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Look up a band, failing with [`HarmonicError::MissingBand`].
    pub fn band(&self, name: &str) -> Result<&Array2<f64>> {
        self.bands.get(name).ok_or_else(|| HarmonicError::MissingBand {
            band: name.to_string(),
            frame_index: self.metadata.frame_index,
        })
    }

    pub fn has_band(&self, name: &str) -> bool {
        self.bands.contains_key(name)
    }

    /// Spatial shape `(rows, cols)` of the frame, taken from its first band.
    pub fn shape(&self) -> Option<(usize, usize)> {
        self.bands.values().next().map(|b| b.dim())
    }

    /// Return a new frame with `name` appended.
    pub fn with_band(&self, name: &str, data: Array2<f64>) -> Result<Frame> {
        let mut out = self.clone();
        out.push_band(name, data)?;
        Ok(out)
    }

    /// Append a band in place. Only used on frames the caller already owns
    /// as a fresh copy, so the source frame is never altered.
    pub(crate) fn push_band(&mut self, name: &str, data: Array2<f64>) -> Result<()> {
        if self.bands.contains_key(name) {
            return Err(HarmonicError::BandExists {
                band: name.to_string(),
                frame_index: self.metadata.frame_index,
            });
        }
        if let Some(expected) = self.shape() {
            if data.dim() != expected {
                return Err(HarmonicError::ShapeMismatch {
                    band: name.to_string(),
                    frame_index: self.metadata.frame_index,
                    expected,
                    actual: data.dim(),
                });
            }
        }
        self.bands.insert(name.to_string(), data);
        Ok(())
    }

    /// Crop every band to `region`.
    pub fn crop(&self, region: &Region) -> Result<Frame> {
        let Some(shape) = self.shape() else {
            return Ok(self.clone());
        };
        region.validate(shape)?;
        let bands = self
            .bands
            .iter()
            .map(|(name, data)| {
                let view = data.slice(s![
                    region.row..region.row + region.height,
                    region.col..region.col + region.width
                ]);
                (name.clone(), view.to_owned())
            })
            .collect();
        Ok(Frame {
            timestamp: self.timestamp,
            bands,
            metadata: self.metadata.clone(),
        })
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameMetadata {
    /// Position of the frame in its source collection.
    pub frame_index: usize,
    /// Scene cloud cover in percent, when the source reports one.
    pub cloud_cover: Option<f64>,
    /// Scene identifier from the source.
    pub id: Option<String>,
}

/// An ordered sequence of frames.
#[derive(Clone, Debug, Default)]
pub struct Series {
    frames: Vec<Frame>,
}

impl Series {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }

    /// Apply a per-frame transform, producing a new series.
    ///
    /// Frames are processed in parallel for longer series; output order
    /// always matches input order.
    pub fn try_map<F>(&self, f: F) -> Result<Series>
    where
        F: Fn(&Frame) -> Result<Frame> + Sync + Send,
    {
        let frames = if self.frames.len() >= PARALLEL_FRAME_THRESHOLD {
            self.frames.par_iter().map(&f).collect::<Result<Vec<_>>>()?
        } else {
            self.frames.iter().map(&f).collect::<Result<Vec<_>>>()?
        };
        Ok(Series { frames })
    }

    /// Return a copy sorted by acquisition time (stable for equal timestamps).
    pub fn sorted_by_time(&self) -> Series {
        let mut frames = self.frames.clone();
        frames.sort_by_key(|f| f.timestamp);
        Series { frames }
    }

    /// Check that every frame carries `bands` and that they all share one
    /// shape. Returns that shape.
    pub fn common_shape(&self, bands: &[String]) -> Result<(usize, usize)> {
        if self.frames.is_empty() {
            return Err(HarmonicError::EmptySeries);
        }
        let mut expected: Option<(usize, usize)> = None;
        for frame in &self.frames {
            for name in bands {
                let actual = frame.band(name)?.dim();
                match expected {
                    None => expected = Some(actual),
                    Some(e) if e != actual => {
                        return Err(HarmonicError::ShapeMismatch {
                            band: name.clone(),
                            frame_index: frame.metadata.frame_index,
                            expected: e,
                            actual,
                        });
                    }
                    Some(_) => {}
                }
            }
        }
        expected.ok_or_else(|| HarmonicError::Pipeline("no bands requested".into()))
    }
}

impl FromIterator<Frame> for Series {
    fn from_iter<I: IntoIterator<Item = Frame>>(iter: I) -> Self {
        Self {
            frames: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

/// Rectangular pixel window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Region {
    pub row: usize,
    pub col: usize,
    pub height: usize,
    pub width: usize,
}

impl Region {
    pub fn new(row: usize, col: usize, height: usize, width: usize) -> Self {
        Self {
            row,
            col,
            height,
            width,
        }
    }

    /// Fail unless the region is non-empty and lies inside `shape`.
    pub fn validate(&self, shape: (usize, usize)) -> Result<()> {
        let (rows, cols) = shape;
        if self.height == 0
            || self.width == 0
            || self.row + self.height > rows
            || self.col + self.width > cols
        {
            return Err(HarmonicError::InvalidRegion {
                row: self.row,
                col: self.col,
                height: self.height,
                width: self.width,
                rows,
                cols,
            });
        }
        Ok(())
    }
}
