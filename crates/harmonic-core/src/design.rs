use tracing::debug;

use crate::consts::{CONSTANT_BAND, TIME_BAND};
use crate::derive::harmonic_bands;
use crate::error::{HarmonicError, Result};
use crate::frame::{Frame, Series};

pub fn cos_band(i: usize) -> String {
    format!("cos{i}")
}

pub fn sin_band(i: usize) -> String {
    format!("sin{i}")
}

/// Independent variable names for a harmonic model of the given order:
/// `[constant, t, cos1, sin1, ..., cosK, sinK]`.
///
/// Position `j` in this list is coefficient `j` everywhere downstream.
pub fn build_independents(order: usize) -> Result<Vec<String>> {
    if order < 1 {
        return Err(HarmonicError::InvalidOrder(order));
    }
    let mut names = Vec::with_capacity(2 + 2 * order);
    names.push(CONSTANT_BAND.to_string());
    names.push(TIME_BAND.to_string());
    for i in 1..=order {
        names.push(cos_band(i));
        names.push(sin_band(i));
    }
    Ok(names)
}

/// Immutable description of one harmonic regression.
#[derive(Clone, Debug, PartialEq)]
pub struct DesignSpec {
    order: usize,
    dependent: String,
    independents: Vec<String>,
}

impl DesignSpec {
    pub fn new(order: usize, dependent: impl Into<String>) -> Result<Self> {
        Ok(Self {
            order,
            dependent: dependent.into(),
            independents: build_independents(order)?,
        })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn dependent(&self) -> &str {
        &self.dependent
    }

    pub fn independents(&self) -> &[String] {
        &self.independents
    }

    /// Number of coefficients, `2 + 2 * order`.
    pub fn num_coefficients(&self) -> usize {
        self.independents.len()
    }

    /// Every band a fit reads: the independents followed by the dependent.
    pub fn regression_bands(&self) -> Vec<String> {
        let mut bands = self.independents.clone();
        bands.push(self.dependent.clone());
        bands
    }
}

/// Add the harmonic basis bands for `spec` to a frame that already carries
/// `constant` and `t`.
pub fn augment(frame: &Frame, spec: &DesignSpec) -> Result<Frame> {
    frame.band(CONSTANT_BAND)?;
    harmonic_bands(frame, spec.order())
}

/// [`augment`] every frame of a series.
pub fn augment_series(series: &Series, spec: &DesignSpec) -> Result<Series> {
    debug!(
        frames = series.len(),
        order = spec.order(),
        "Adding harmonic basis bands"
    );
    series.try_map(|frame| augment(frame, spec))
}
