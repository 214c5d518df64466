use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, ValueEnum};
use harmonic_core::frame::Region;
use harmonic_core::pipeline::config::{ChartConfig, ExtremaConfig, PipelineConfig};
use harmonic_core::pipeline::run_pipeline_reported;
use harmonic_core::regression::SolveStrategy;

use crate::progress::BarReporter;
use crate::summary::{print_pipeline_summary, print_result_summary};

#[derive(Clone, ValueEnum)]
pub enum StrategyArg {
    Pixelwise,
    Batched,
}

#[derive(Args)]
pub struct RunArgs {
    /// Series manifest (TOML)
    pub manifest: Option<PathBuf>,

    /// Pipeline config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Harmonic order (number of cos/sin pairs)
    #[arg(long, default_value = "3")]
    pub order: usize,

    /// Maximum scene cloud cover in percent
    #[arg(long, default_value = "20")]
    pub max_cloud: f64,

    /// Per-pixel solve strategy
    #[arg(long, value_enum, default_value = "pixelwise")]
    pub strategy: StrategyArg,

    /// Reject pixels whose design condition number exceeds this value
    #[arg(long)]
    pub max_condition: Option<f64>,

    /// Missing-data value in the band files
    #[arg(long)]
    pub nodata: Option<f64>,

    /// Also compute maximum NDVI and its day of year for this year
    #[arg(long)]
    pub extrema_year: Option<i32>,

    /// Export an observed/fitted chart averaged over ROW,COL,HEIGHT,WIDTH
    #[arg(long)]
    pub chart: Option<String>,

    /// Output directory
    #[arg(short, long, default_value = "harmonic-out")]
    pub output: PathBuf,
}

pub fn run(args: &RunArgs) -> Result<()> {
    let config = if let Some(ref config_path) = args.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        toml::from_str(&contents).context("Invalid pipeline config")?
    } else {
        build_config_from_args(args)?
    };

    print_pipeline_summary(&config);

    let reporter = Arc::new(BarReporter::new());
    let output = run_pipeline_reported(&config, reporter)?;

    print_result_summary(&config, &output);
    println!("\nOutput saved to {}", config.output.display());
    Ok(())
}

fn build_config_from_args(args: &RunArgs) -> Result<PipelineConfig> {
    let Some(ref manifest) = args.manifest else {
        bail!("Either a manifest or --config is required");
    };

    let mut config = PipelineConfig {
        input: manifest.clone(),
        output: args.output.clone(),
        nodata: args.nodata,
        ..Default::default()
    };
    config.selection.max_cloud_cover = Some(args.max_cloud);
    config.harmonic.order = args.order;
    config.harmonic.solver.strategy = match args.strategy {
        StrategyArg::Pixelwise => SolveStrategy::Pixelwise,
        StrategyArg::Batched => SolveStrategy::Batched,
    };
    config.harmonic.solver.max_condition_number = args.max_condition;

    if let Some(year) = args.extrema_year {
        config.extrema = Some(ExtremaConfig::for_year(year).context("Invalid extrema year")?);
    }
    if let Some(ref spec) = args.chart {
        config.chart = Some(ChartConfig {
            region: parse_region(spec)?,
        });
    }
    Ok(config)
}

fn parse_region(spec: &str) -> Result<Region> {
    let parts: Vec<usize> = spec
        .split(',')
        .map(|s| s.trim().parse())
        .collect::<std::result::Result<_, _>>()
        .with_context(|| format!("Invalid region '{spec}'"))?;
    match parts.as_slice() {
        &[row, col, height, width] => Ok(Region::new(row, col, height, width)),
        _ => bail!("Region must be ROW,COL,HEIGHT,WIDTH (got '{spec}')"),
    }
}
