use crate::chart::ChartRow;
use crate::frame::Series;
use crate::reduce::ExtremaImage;
use crate::regression::summary::CoefficientSummary;
use crate::regression::CoefficientImage;

/// Pipeline processing stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineStage {
    Reading,
    Selecting,
    Deriving,
    Extrema,
    Fitting,
    Reconstructing,
    Charting,
    Writing,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reading => write!(f, "Reading frames"),
            Self::Selecting => write!(f, "Selecting frames"),
            Self::Deriving => write!(f, "Deriving bands"),
            Self::Extrema => write!(f, "Maximum NDVI"),
            Self::Fitting => write!(f, "Fitting harmonics"),
            Self::Reconstructing => write!(f, "Reconstructing"),
            Self::Charting => write!(f, "Charting"),
            Self::Writing => write!(f, "Writing output"),
        }
    }
}

/// Everything the pipeline produced.
#[derive(Clone, Debug)]
pub struct PipelineOutput {
    pub coefficients: CoefficientImage,
    /// The fitted series: every frame carries a `fitted` band.
    pub fitted: Series,
    pub summary: CoefficientSummary,
    pub extrema: Option<ExtremaImage>,
    pub chart: Option<Vec<ChartRow>>,
}

/// Thread-safe progress reporting for the pipeline.
///
/// Implementors can use this to drive progress bars, logging, or any other
/// UI feedback. All methods have default no-op implementations.
pub trait ProgressReporter: Send + Sync {
    /// A new pipeline stage has started. `total_items` is the number of
    /// work items in this stage (e.g., frame count), if known.
    fn begin_stage(&self, _stage: PipelineStage, _total_items: Option<usize>) {}

    /// One work item within the current stage has completed.
    fn advance(&self, _items_done: usize) {}

    /// The current stage is finished.
    fn finish_stage(&self) {}
}

/// No-op progress reporter, used when `run_pipeline` delegates.
pub(super) struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
