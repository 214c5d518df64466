mod common;

use ndarray::{array, Array2};

use harmonic_core::error::HarmonicError;
use harmonic_core::io::image_io::{load_band, save_scaled, save_scaled_tiff, ValueRange};
use harmonic_core::io::manifest::{load_series, Manifest};

use common::write_dn_tiff;

// ---------------------------------------------------------------------------
// Scaled export
// ---------------------------------------------------------------------------

#[test]
fn test_value_range_normalize_clamps() {
    let r = ValueRange::new(0.3, 0.6);
    assert_eq!(r.normalize(0.3), 0.0);
    assert_eq!(r.normalize(0.9), 1.0);
    assert_eq!(r.normalize(-1.0), 0.0);
    assert_eq!(r.normalize(f64::NAN), 0.0);
    assert!((r.normalize(0.45) - 0.5).abs() < 1e-12);
}

#[test]
fn test_value_range_from_data_ignores_nan() {
    let data = array![[f64::NAN, -0.2], [0.7, 0.1]];
    let r = ValueRange::from_data(&data.view());
    assert_eq!(r, ValueRange::new(-0.2, 0.7));

    let empty = Array2::<f64>::from_elem((2, 2), f64::NAN);
    assert_eq!(ValueRange::from_data(&empty.view()), ValueRange::new(0.0, 1.0));
}

#[test]
fn test_scaled_tiff_roundtrip() {
    let data = array![[0.0, 0.5], [1.0, f64::NAN]];
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scaled.tif");

    save_scaled_tiff(&data.view(), &ValueRange::new(0.0, 1.0), &path).unwrap();
    let loaded = load_band(&path, None).unwrap();

    assert_eq!(loaded.dim(), (2, 2));
    assert_eq!(loaded[[0, 0]], 0.0);
    assert_eq!(loaded[[0, 1]], 32768.0);
    assert_eq!(loaded[[1, 0]], 65535.0);
    assert_eq!(loaded[[1, 1]], 0.0);
}

#[test]
fn test_load_band_masks_nodata() {
    let data = array![[0.0, 812.0, 9000.0]];
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("B4.tif");
    write_dn_tiff(&path, &data);

    let loaded = load_band(&path, Some(0.0)).unwrap();
    assert!(loaded[[0, 0]].is_nan());
    assert_eq!(loaded[[0, 1]], 812.0);
    assert_eq!(loaded[[0, 2]], 9000.0);
}

#[test]
fn test_save_scaled_png_by_extension() {
    let data = Array2::<f64>::from_elem((4, 3), 0.5);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preview.png");

    save_scaled(&data.view(), &ValueRange::new(0.0, 1.0), &path).unwrap();
    let loaded = load_band(&path, None).unwrap();
    assert_eq!(loaded.dim(), (4, 3));
    assert_eq!(loaded[[3, 2]], 128.0);
}

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

const MANIFEST: &str = r#"
nodata = 0

[[frames]]
timestamp = "2019-06-15T10:30:00Z"
cloud_cover = 12.5
id = "scene-a"

[frames.bands]
B4 = "a/B4.tif"
B5 = "a/B5.tif"

[[frames]]
timestamp = "2019-07-01T10:30:00Z"

[frames.bands]
B4 = "b/B4.tif"
B5 = "b/B5.tif"
"#;

#[test]
fn test_manifest_parses() {
    let manifest = Manifest::from_toml(MANIFEST).unwrap();
    assert_eq!(manifest.nodata, Some(0.0));
    assert_eq!(manifest.frames.len(), 2);
    assert_eq!(manifest.frames[0].cloud_cover, Some(12.5));
    assert_eq!(manifest.frames[0].id.as_deref(), Some("scene-a"));
    assert_eq!(manifest.frames[1].cloud_cover, None);
    assert_eq!(manifest.frames[1].bands.len(), 2);
}

#[test]
fn test_manifest_without_bands_is_rejected() {
    let text = r#"
[[frames]]
timestamp = "2019-06-15T10:30:00Z"
bands = {}
"#;
    assert!(matches!(Manifest::from_toml(text), Err(HarmonicError::Manifest(_))));
    assert!(matches!(Manifest::from_toml("frames = 3"), Err(HarmonicError::Manifest(_))));
}

#[test]
fn test_load_series_from_manifest() {
    let dir = tempfile::tempdir().unwrap();
    for (sub, red, nir) in [("a", 1000.0, 3000.0), ("b", 1200.0, 2500.0)] {
        std::fs::create_dir_all(dir.path().join(sub)).unwrap();
        write_dn_tiff(
            &dir.path().join(sub).join("B4.tif"),
            &array![[red, 0.0], [red, red]],
        );
        write_dn_tiff(
            &dir.path().join(sub).join("B5.tif"),
            &array![[nir, nir], [nir, nir]],
        );
    }
    let path = dir.path().join("series.toml");
    std::fs::write(&path, MANIFEST).unwrap();

    let series = load_series(&path, None).unwrap();
    assert_eq!(series.len(), 2);

    let first = &series.frames()[0];
    assert_eq!(first.metadata.frame_index, 0);
    assert_eq!(first.metadata.cloud_cover, Some(12.5));
    assert_eq!(first.band("B5").unwrap()[[0, 0]], 3000.0);
    assert!(first.band("B4").unwrap()[[0, 1]].is_nan());

    let second = &series.frames()[1];
    assert_eq!(second.metadata.frame_index, 1);
    assert_eq!(second.band("B4").unwrap()[[1, 1]], 1200.0);

    // An explicit nodata overrides the manifest's.
    let raw = load_series(&path, Some(-1.0)).unwrap();
    assert_eq!(raw.frames()[0].band("B4").unwrap()[[0, 1]], 0.0);
}

#[test]
fn test_load_series_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("series.toml");
    std::fs::write(&path, MANIFEST).unwrap();
    assert!(load_series(&path, None).is_err());
}
