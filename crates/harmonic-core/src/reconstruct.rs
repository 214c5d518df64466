use ndarray::{Array2, Axis, Zip};
use tracing::debug;

use crate::consts::FITTED_BAND;
use crate::design::DesignSpec;
use crate::error::{HarmonicError, Result};
use crate::frame::{Frame, Series};
use crate::regression::CoefficientImage;

/// Fitted values for one frame: `Σ_j β[pixel][j] · band_j[pixel]`.
///
/// `NaN` wherever the pixel's coefficients are invalid or any independent
/// band value is `NaN`.
pub fn fitted_values(
    frame: &Frame,
    coefficients: &CoefficientImage,
    spec: &DesignSpec,
) -> Result<Array2<f64>> {
    let shape = coefficients.shape();
    let mut fitted = Array2::<f64>::zeros(shape);

    for (j, name) in spec.independents().iter().enumerate() {
        let band = frame.band(name)?;
        if band.dim() != shape {
            return Err(HarmonicError::ShapeMismatch {
                band: name.clone(),
                frame_index: frame.metadata.frame_index,
                expected: shape,
                actual: band.dim(),
            });
        }
        let beta = coefficients.coefficients().index_axis(Axis(2), j);
        Zip::from(&mut fitted)
            .and(band)
            .and(&beta)
            .for_each(|f, &x, &b| *f += b * x);
    }
    Ok(fitted)
}

/// Append a `fitted` band to every frame of `series`.
pub fn reconstruct(
    series: &Series,
    coefficients: &CoefficientImage,
    spec: &DesignSpec,
) -> Result<Series> {
    if coefficients.names() != spec.independents() {
        return Err(HarmonicError::CoefficientMismatch(format!(
            "coefficients are for {:?}, design expects {:?}",
            coefficients.names(),
            spec.independents()
        )));
    }
    debug!(frames = series.len(), "Reconstructing fitted series");
    series.try_map(|frame| {
        let fitted = fitted_values(frame, coefficients, spec)?;
        frame.with_band(FITTED_BAND, fitted)
    })
}
