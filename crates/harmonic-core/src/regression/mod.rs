//! Per-pixel ordinary least squares over a raster series.
//!
//! For every pixel the observations from all frames form a small `N x P`
//! system. Observations with a `NaN` in any independent band or in the
//! dependent band are dropped for that pixel only. Pixels left with fewer
//! than `P` observations, or with a rank-deficient design, get `NaN`
//! coefficients; they never fail the whole fit.

mod batched;
pub(crate) mod lstsq;
mod pixelwise;
pub mod summary;

use std::fmt;

use ndarray::{s, Array2, Array3, ArrayView1, ArrayView2, Axis};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::consts::DEFAULT_RANK_TOLERANCE;
use crate::design::DesignSpec;
use crate::error::Result;
use crate::frame::Series;

/// How the per-pixel systems are solved. Both give the same coefficients to
/// floating-point tolerance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveStrategy {
    /// One SVD per pixel, rows processed in parallel.
    #[default]
    Pixelwise,
    /// Pixels sharing a validity pattern and identical design rows reuse one
    /// pseudo-inverse.
    Batched,
}

impl fmt::Display for SolveStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pixelwise => write!(f, "Pixelwise"),
            Self::Batched => write!(f, "Batched"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub strategy: SolveStrategy,
    /// Relative singular value cutoff for the rank test.
    pub rank_tolerance: f64,
    /// Strict mode: reject pixels whose design condition number exceeds this.
    pub max_condition_number: Option<f64>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            strategy: SolveStrategy::Pixelwise,
            rank_tolerance: DEFAULT_RANK_TOLERANCE,
            max_condition_number: None,
        }
    }
}

/// Per-pixel regression coefficients, shape `(rows, cols, P)`.
///
/// Coefficient `j` belongs to independent `names()[j]`. Invalid pixels hold
/// `NaN` in every slot.
#[derive(Clone, Debug)]
pub struct CoefficientImage {
    coefficients: Array3<f64>,
    names: Vec<String>,
    observations: Array2<u32>,
}

impl CoefficientImage {
    pub(crate) fn new(
        coefficients: Array3<f64>,
        names: Vec<String>,
        observations: Array2<u32>,
    ) -> Self {
        Self {
            coefficients,
            names,
            observations,
        }
    }

    /// Spatial shape `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        let (h, w, _) = self.coefficients.dim();
        (h, w)
    }

    pub fn num_coefficients(&self) -> usize {
        self.names.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn coefficients(&self) -> &Array3<f64> {
        &self.coefficients
    }

    /// Number of valid observations that went into each pixel's solve.
    pub fn observations(&self) -> &Array2<u32> {
        &self.observations
    }

    pub fn is_valid(&self, row: usize, col: usize) -> bool {
        self.coefficients[[row, col, 0]].is_finite()
    }

    /// Coefficient vector at a pixel, or `None` if the pixel is invalid.
    pub fn at(&self, row: usize, col: usize) -> Option<ArrayView1<'_, f64>> {
        if self.is_valid(row, col) {
            Some(self.coefficients.slice(s![row, col, ..]))
        } else {
            None
        }
    }

    /// One coefficient as a 2-D image, by independent name.
    pub fn band(&self, name: &str) -> Option<ArrayView2<'_, f64>> {
        let j = self.names.iter().position(|n| n == name)?;
        Some(self.coefficients.slice(s![.., .., j]))
    }

    pub fn valid_count(&self) -> usize {
        self.coefficients
            .index_axis(Axis(2), 0)
            .iter()
            .filter(|v| v.is_finite())
            .count()
    }
}

/// Fit the harmonic model in `spec` at every pixel of `series`.
///
/// Fails only on structural problems: empty series, missing bands or
/// mismatched shapes.
pub fn fit_harmonic(
    series: &Series,
    spec: &DesignSpec,
    config: &SolverConfig,
) -> Result<CoefficientImage> {
    let shape = series.common_shape(&spec.regression_bands())?;
    let inputs = DesignInputs::new(series, spec)?;

    let image = match config.strategy {
        SolveStrategy::Pixelwise => pixelwise::solve(&inputs, shape, config),
        SolveStrategy::Batched => batched::solve(&inputs, shape, config),
    };

    let total = shape.0 * shape.1;
    let valid = image.valid_count();
    info!(
        frames = series.len(),
        coefficients = spec.num_coefficients(),
        strategy = %config.strategy,
        valid,
        invalid = total - valid,
        "Harmonic fit complete"
    );
    Ok(image)
}

/// Borrowed band arrays for one fit, indexed `[frame][independent]`.
pub(crate) struct DesignInputs<'a> {
    columns: Vec<Vec<&'a Array2<f64>>>,
    response: Vec<&'a Array2<f64>>,
    names: Vec<String>,
}

impl<'a> DesignInputs<'a> {
    fn new(series: &'a Series, spec: &DesignSpec) -> Result<Self> {
        let mut columns = Vec::with_capacity(series.len());
        let mut response = Vec::with_capacity(series.len());
        for frame in series {
            let cols = spec
                .independents()
                .iter()
                .map(|name| frame.band(name))
                .collect::<Result<Vec<_>>>()?;
            columns.push(cols);
            response.push(frame.band(spec.dependent())?);
        }
        Ok(Self {
            columns,
            response,
            names: spec.independents().to_vec(),
        })
    }

    pub(crate) fn num_frames(&self) -> usize {
        self.response.len()
    }

    pub(crate) fn num_coefficients(&self) -> usize {
        self.names.len()
    }

    pub(crate) fn names(&self) -> &[String] {
        &self.names
    }

    fn observation_is_valid(&self, frame: usize, row: usize, col: usize) -> bool {
        self.response[frame][[row, col]].is_finite()
            && self.columns[frame]
                .iter()
                .all(|c| c[[row, col]].is_finite())
    }

    /// Collect the valid observations at `(row, col)` into `x` (row-major)
    /// and `y`. Returns the number of valid observations.
    pub(crate) fn gather(&self, row: usize, col: usize, x: &mut Vec<f64>, y: &mut Vec<f64>) -> usize {
        x.clear();
        y.clear();
        for i in 0..self.num_frames() {
            if !self.observation_is_valid(i, row, col) {
                continue;
            }
            x.extend(self.columns[i].iter().map(|c| c[[row, col]]));
            y.push(self.response[i][[row, col]]);
        }
        y.len()
    }

    /// Bitset of the frames with a valid observation at `(row, col)`.
    pub(crate) fn validity_pattern(&self, row: usize, col: usize) -> Vec<u64> {
        let mut bits = vec![0u64; self.num_frames().div_ceil(64)];
        for i in 0..self.num_frames() {
            if self.observation_is_valid(i, row, col) {
                bits[i / 64] |= 1u64 << (i % 64);
            }
        }
        bits
    }
}
