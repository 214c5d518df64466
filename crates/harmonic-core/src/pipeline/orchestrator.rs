use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::{info, warn};

use crate::chart::region_mean_series;
use crate::consts::{DOY_BAND, FITTED_BAND, NDVI_BAND};
use crate::derive::{add_doy, add_variables};
use crate::design::{augment_series, DesignSpec};
use crate::error::{HarmonicError, Result};
use crate::frame::Series;
use crate::io::manifest::load_series;
use crate::reconstruct::reconstruct;
use crate::reduce::{max_with_companion, ExtremaImage};
use crate::regression::fit_harmonic;
use crate::regression::summary::CoefficientSummary;
use crate::select::{clip, filter_date_range, filter_max_cloud_cover};

use super::config::{ExtremaConfig, PipelineConfig};
use super::types::{NoOpReporter, PipelineOutput, PipelineStage, ProgressReporter};
use super::writer::write_outputs;

/// Run the full processing pipeline without progress reporting.
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineOutput> {
    let reporter = Arc::new(NoOpReporter);
    run_pipeline_reported(config, reporter)
}

/// Read the manifest, run every stage and write the outputs.
pub fn run_pipeline_reported(
    config: &PipelineConfig,
    reporter: Arc<dyn ProgressReporter>,
) -> Result<PipelineOutput> {
    reporter.begin_stage(PipelineStage::Reading, None);
    let series = load_series(&config.input, config.nodata)?;
    reporter.finish_stage();

    let output = run_series(&series, config, reporter.as_ref())?;

    reporter.begin_stage(PipelineStage::Writing, None);
    write_outputs(config, &output)?;
    reporter.finish_stage();

    info!(output = %config.output.display(), "Pipeline complete");
    Ok(output)
}

/// The in-memory stages of the pipeline: select, derive, extrema, fit,
/// reconstruct and chart. Does no file I/O.
pub fn run_series(
    series: &Series,
    config: &PipelineConfig,
    reporter: &dyn ProgressReporter,
) -> Result<PipelineOutput> {
    reporter.begin_stage(PipelineStage::Selecting, Some(series.len()));
    let selected = match config.selection.max_cloud_cover {
        Some(max) => {
            filter_max_cloud_cover(series, max, config.selection.keep_unknown_cloud_cover)
        }
        None => series.clone(),
    };
    let selected = match config.selection.region {
        Some(ref region) => clip(&selected, region)?,
        None => selected,
    };
    // Charts and the extrema tie-break read frames in acquisition order.
    let selected = selected.sorted_by_time();
    reporter.finish_stage();
    if selected.is_empty() {
        return Err(HarmonicError::EmptySeries);
    }
    info!(
        total = series.len(),
        selected = selected.len(),
        "Frame selection complete"
    );

    reporter.begin_stage(PipelineStage::Deriving, Some(selected.len()));
    let done = AtomicUsize::new(0);
    let bands = &config.bands;
    let derived = selected.try_map(|frame| {
        let out = add_variables(frame, &bands.nir, &bands.red, config.harmonic.epoch)?;
        reporter.advance(done.fetch_add(1, Ordering::Relaxed) + 1);
        Ok(out)
    })?;
    reporter.finish_stage();

    let extrema = match config.extrema {
        Some(ref ec) => {
            reporter.begin_stage(PipelineStage::Extrema, None);
            let image = compute_extrema(&derived, ec, &bands.reference)?;
            reporter.finish_stage();
            Some(image)
        }
        None => None,
    };

    reporter.begin_stage(PipelineStage::Fitting, None);
    let spec = DesignSpec::new(config.harmonic.order, config.harmonic.dependent.as_str())?;
    let fit_input = match config.harmonic.window {
        Some(w) => filter_date_range(&derived, w.start, w.end),
        None => derived,
    };
    let design = augment_series(&fit_input, &spec)?;
    let coefficients = fit_harmonic(&design, &spec, &config.harmonic.solver)?;
    if coefficients.valid_count() == 0 {
        warn!(
            frames = design.len(),
            needed = spec.num_coefficients(),
            "No pixel had enough valid observations for a fit"
        );
    }
    reporter.finish_stage();

    reporter.begin_stage(PipelineStage::Reconstructing, Some(design.len()));
    let fitted = reconstruct(&design, &coefficients, &spec)?;
    reporter.finish_stage();

    let chart = match config.chart {
        Some(ref cc) => {
            reporter.begin_stage(PipelineStage::Charting, Some(fitted.len()));
            let bands = [spec.dependent().to_string(), FITTED_BAND.to_string()];
            let rows = region_mean_series(&fitted, &cc.region, &bands)?;
            reporter.finish_stage();
            Some(rows)
        }
        None => None,
    };

    let summary = CoefficientSummary::from_image(&coefficients);
    Ok(PipelineOutput {
        coefficients,
        fitted,
        summary,
        extrema,
        chart,
    })
}

fn compute_extrema(derived: &Series, config: &ExtremaConfig, reference: &str) -> Result<ExtremaImage> {
    let window = filter_date_range(derived, config.window.start, config.window.end);
    if window.is_empty() {
        return Err(HarmonicError::Pipeline(format!(
            "no frames between {} and {} for the maximum NDVI",
            config.window.start, config.window.end
        )));
    }
    let with_doy = window.try_map(|frame| add_doy(frame, reference))?;
    max_with_companion(&with_doy, NDVI_BAND, DOY_BAND)
}
