use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarmonicError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Band '{band}' missing from frame {frame_index}")]
    MissingBand { band: String, frame_index: usize },

    #[error("Band '{band}' already exists in frame {frame_index}")]
    BandExists { band: String, frame_index: usize },

    #[error("Harmonic order must be at least 1 (got {0})")]
    InvalidOrder(usize),

    #[error(
        "Band '{band}' in frame {frame_index} has shape {actual:?}, expected {expected:?}"
    )]
    ShapeMismatch {
        band: String,
        frame_index: usize,
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Coefficient image does not match design: {0}")]
    CoefficientMismatch(String),

    #[error("Region {row},{col} {height}x{width} lies outside a {rows}x{cols} raster")]
    InvalidRegion {
        row: usize,
        col: usize,
        height: usize,
        width: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Invalid manifest: {0}")]
    Manifest(String),

    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Image format error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Empty frame series")]
    EmptySeries,
}

pub type Result<T> = std::result::Result<T, HarmonicError>;
