//! Region-averaged time series for charting observed against fitted values.

use std::io::Write;

use chrono::{DateTime, Utc};
use ndarray::s;

use crate::error::Result;
use crate::frame::{Region, Series};

/// One point of a chart: a frame's timestamp and the region mean of each
/// requested band.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartRow {
    pub timestamp: DateTime<Utc>,
    /// Means in the order the bands were requested. `NaN` when the region has
    /// no valid pixel for that band.
    pub values: Vec<f64>,
}

/// Mean of each band over `region`, per frame, ignoring `NaN` pixels.
pub fn region_mean_series(series: &Series, region: &Region, bands: &[String]) -> Result<Vec<ChartRow>> {
    let shape = series.common_shape(bands)?;
    region.validate(shape)?;

    series
        .iter()
        .map(|frame| {
            let values = bands
                .iter()
                .map(|name| {
                    let band = frame.band(name)?;
                    let window = band.slice(s![
                        region.row..region.row + region.height,
                        region.col..region.col + region.width
                    ]);
                    let (sum, count) = window
                        .iter()
                        .filter(|v| v.is_finite())
                        .fold((0.0f64, 0usize), |(s, n), &v| (s + v, n + 1));
                    Ok(if count == 0 { f64::NAN } else { sum / count as f64 })
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(ChartRow {
                timestamp: frame.timestamp,
                values,
            })
        })
        .collect()
}

/// Write chart rows as CSV with a `timestamp` column followed by one column
/// per band. `NaN` means are written as empty cells.
pub fn write_csv<W: Write>(out: W, bands: &[String], rows: &[ChartRow]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);

    let mut header = Vec::with_capacity(bands.len() + 1);
    header.push("timestamp");
    header.extend(bands.iter().map(String::as_str));
    writer.write_record(&header)?;

    for row in rows {
        let mut record = Vec::with_capacity(row.values.len() + 1);
        record.push(row.timestamp.to_rfc3339());
        record.extend(row.values.iter().map(|v| {
            if v.is_finite() {
                v.to_string()
            } else {
                String::new()
            }
        }));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}
