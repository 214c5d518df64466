//! Collection filtering: date windows, cloud cover and spatial clipping.

use chrono::NaiveDate;
use tracing::debug;

use crate::error::Result;
use crate::frame::{Frame, Region, Series};

/// Frames acquired on or after `start` and on or before `end` (both dates
/// inclusive, whole UTC days).
pub fn filter_date_range(series: &Series, start: NaiveDate, end: NaiveDate) -> Series {
    let kept: Series = series
        .iter()
        .filter(|f| {
            let day = f.timestamp.date_naive();
            day >= start && day <= end
        })
        .cloned()
        .collect();
    debug!(
        %start,
        %end,
        kept = kept.len(),
        dropped = series.len() - kept.len(),
        "Filtered by date"
    );
    kept
}

/// Frames whose cloud cover is at most `max_cloud_cover` percent.
///
/// Frames without a cloud cover value are kept only when `keep_unknown`.
pub fn filter_max_cloud_cover(series: &Series, max_cloud_cover: f64, keep_unknown: bool) -> Series {
    let kept: Series = series
        .iter()
        .filter(|f| match f.metadata.cloud_cover {
            Some(cc) => cc <= max_cloud_cover,
            None => keep_unknown,
        })
        .cloned()
        .collect();
    debug!(
        max_cloud_cover,
        kept = kept.len(),
        dropped = series.len() - kept.len(),
        "Filtered by cloud cover"
    );
    kept
}

/// The frame with the lowest reported cloud cover. Frames without a value
/// are ignored; the earliest frame wins a tie.
pub fn least_cloudy(series: &Series) -> Option<&Frame> {
    series
        .iter()
        .filter_map(|f| f.metadata.cloud_cover.map(|cc| (cc, f)))
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, f)| f)
}

/// Crop every frame of the series to `region`.
pub fn clip(series: &Series, region: &Region) -> Result<Series> {
    series.try_map(|frame| frame.crop(region))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameMetadata;
    use chrono::{TimeZone, Utc};
    use ndarray::Array2;

    fn frame(y: i32, m: u32, d: u32, cloud: Option<f64>) -> Frame {
        Frame::new(Utc.with_ymd_and_hms(y, m, d, 10, 30, 0).unwrap())
            .insert_band("B4", Array2::zeros((4, 4)))
            .with_metadata(FrameMetadata {
                cloud_cover: cloud,
                ..Default::default()
            })
    }

    fn series() -> Series {
        Series::new(vec![
            frame(2018, 12, 31, Some(5.0)),
            frame(2019, 1, 1, Some(30.0)),
            frame(2019, 6, 15, Some(12.0)),
            frame(2019, 12, 31, None),
            frame(2020, 1, 1, Some(3.0)),
        ])
    }

    #[test]
    fn date_range_is_inclusive() {
        let s = filter_date_range(
            &series(),
            NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2019, 12, 31).unwrap(),
        );
        assert_eq!(s.len(), 3);
    }

    #[test]
    fn cloud_cover_threshold() {
        assert_eq!(filter_max_cloud_cover(&series(), 20.0, false).len(), 3);
        assert_eq!(filter_max_cloud_cover(&series(), 20.0, true).len(), 4);
        assert_eq!(filter_max_cloud_cover(&series(), 3.0, false).len(), 1);
    }

    #[test]
    fn least_cloudy_picks_minimum() {
        let s = series();
        let best = least_cloudy(&s).unwrap();
        assert_eq!(best.metadata.cloud_cover, Some(3.0));
        assert!(least_cloudy(&Series::default()).is_none());
    }

    #[test]
    fn clip_crops_all_bands() {
        let s = clip(&series(), &Region::new(1, 1, 2, 3)).unwrap();
        assert!(s.iter().all(|f| f.shape() == Some((2, 3))));
        assert!(clip(&series(), &Region::new(3, 0, 2, 2)).is_err());
    }
}
