pub mod extrema;

pub use extrema::{max_with_companion, ExtremaImage};
