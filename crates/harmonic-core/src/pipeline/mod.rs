pub mod config;
mod orchestrator;
mod types;
mod writer;

pub use orchestrator::{run_pipeline, run_pipeline_reported, run_series};
pub use types::{PipelineOutput, PipelineStage, ProgressReporter};
