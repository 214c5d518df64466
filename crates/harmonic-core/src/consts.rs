/// Minimum pixel count (rows*cols) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Length of the Julian year in days, the unit of the `t` band.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Seconds in one Julian year.
pub const SECONDS_PER_YEAR: f64 = DAYS_PER_YEAR * 86_400.0;

/// Singular values below `DEFAULT_RANK_TOLERANCE * sigma_max` count as zero
/// when deciding the numerical rank of a per-pixel design matrix.
pub const DEFAULT_RANK_TOLERANCE: f64 = 1e-10;

/// Name of the constant-1 independent band.
pub const CONSTANT_BAND: &str = "constant";

/// Name of the fractional-year time band.
pub const TIME_BAND: &str = "t";

/// Name of the band added by reconstruction.
pub const FITTED_BAND: &str = "fitted";

/// Name of the normalized difference vegetation index band.
pub const NDVI_BAND: &str = "NDVI";

/// Name of the day-of-year band.
pub const DOY_BAND: &str = "DOY";

/// Default near-infrared band name (Landsat 8 OLI band 5).
pub const DEFAULT_NIR_BAND: &str = "B5";

/// Default red band name (Landsat 8 OLI band 4).
pub const DEFAULT_RED_BAND: &str = "B4";

/// Default reference band whose validity masks the day-of-year band.
pub const DEFAULT_REFERENCE_BAND: &str = "B8";

/// Default cloud cover ceiling (percent) used when filtering a collection.
pub const DEFAULT_MAX_CLOUD_COVER: f64 = 20.0;

/// Default harmonic order.
pub const DEFAULT_HARMONIC_ORDER: usize = 3;
