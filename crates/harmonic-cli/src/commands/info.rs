use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use harmonic_core::io::manifest::Manifest;
use harmonic_core::select::least_cloudy;

#[derive(Args)]
pub struct InfoArgs {
    /// Series manifest (TOML)
    pub manifest: PathBuf,

    /// Also load the band files and report raster dimensions
    #[arg(long)]
    pub load: bool,
}

pub fn run(args: &InfoArgs) -> Result<()> {
    let manifest = Manifest::read(&args.manifest)
        .with_context(|| format!("Failed to read manifest {}", args.manifest.display()))?;

    println!("Manifest:    {}", args.manifest.display());
    println!("Frames:      {}", manifest.frames.len());
    if let Some(nd) = manifest.nodata {
        println!("No-data:     {}", nd);
    }
    if let (Some(first), Some(last)) = (
        manifest.frames.iter().map(|f| f.timestamp).min(),
        manifest.frames.iter().map(|f| f.timestamp).max(),
    ) {
        println!("Span:        {} .. {}", first.date_naive(), last.date_naive());
    }
    println!();

    for (i, entry) in manifest.frames.iter().enumerate() {
        let cloud = entry
            .cloud_cover
            .map(|c| format!("{c:5.1}%"))
            .unwrap_or_else(|| "    ?".to_string());
        let bands: Vec<&str> = entry.bands.keys().map(String::as_str).collect();
        println!(
            "  {:>4}  {}  cloud {}  {}  [{}]",
            i,
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            cloud,
            entry.id.as_deref().unwrap_or("-"),
            bands.join(", ")
        );
    }

    if args.load {
        let base_dir = args
            .manifest
            .parent()
            .map(PathBuf::from)
            .unwrap_or_default();
        let series = manifest.load(&base_dir, None)?;
        if let Some((rows, cols)) = series.frames().first().and_then(|f| f.shape()) {
            println!();
            println!("Dimensions:  {}x{}", cols, rows);
        }
        if let Some(best) = least_cloudy(&series) {
            println!(
                "Least cloudy: frame {} ({}, {:.1}%)",
                best.metadata.frame_index,
                best.timestamp.date_naive(),
                best.metadata.cloud_cover.unwrap_or_default()
            );
        }
    }

    Ok(())
}
