mod common;

use chrono::{TimeZone, Utc};
use ndarray::array;

use harmonic_core::consts::{CONSTANT_BAND, NDVI_BAND, TIME_BAND};
use harmonic_core::derive::add_variables;
use harmonic_core::design::{augment, augment_series, build_independents, DesignSpec};
use harmonic_core::error::HarmonicError;
use harmonic_core::frame::{Frame, Series};

use common::{epoch, time_frame, timestamps};

// ---------------------------------------------------------------------------
// Band layout
// ---------------------------------------------------------------------------

#[test]
fn test_independents_order_three() {
    assert_eq!(
        build_independents(3).unwrap(),
        vec!["constant", "t", "cos1", "sin1", "cos2", "sin2", "cos3", "sin3"]
    );
}

#[test]
fn test_build_is_idempotent() {
    for order in 1..=5 {
        assert_eq!(build_independents(order).unwrap(), build_independents(order).unwrap());
        let a = DesignSpec::new(order, NDVI_BAND).unwrap();
        let b = DesignSpec::new(order, NDVI_BAND).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.num_coefficients(), 2 + 2 * order);
    }
}

#[test]
fn test_order_zero_rejected() {
    assert!(matches!(build_independents(0), Err(HarmonicError::InvalidOrder(0))));
    assert!(matches!(
        DesignSpec::new(0, NDVI_BAND),
        Err(HarmonicError::InvalidOrder(0))
    ));
}

// ---------------------------------------------------------------------------
// Augmenting frames
// ---------------------------------------------------------------------------

#[test]
fn test_augment_adds_every_independent() {
    let spec = DesignSpec::new(2, NDVI_BAND).unwrap();
    let frame = time_frame(timestamps(1)[0], 0, (3, 2));
    let out = augment(&frame, &spec).unwrap();
    for name in spec.independents() {
        assert_eq!(out.band(name).unwrap().dim(), (3, 2), "band {name}");
    }
    assert!(!frame.has_band("cos1"));
}

#[test]
fn test_augment_requires_constant_band() {
    let spec = DesignSpec::new(1, NDVI_BAND).unwrap();
    let ts = Utc.with_ymd_and_hms(2018, 2, 1, 0, 0, 0).unwrap();
    let frame = Frame::new(ts).insert_band(TIME_BAND, array![[48.1]]);
    match augment(&frame, &spec) {
        Err(HarmonicError::MissingBand { band, .. }) => assert_eq!(band, CONSTANT_BAND),
        other => panic!("expected MissingBand, got {other:?}"),
    }
}

#[test]
fn test_augment_twice_is_an_error() {
    let spec = DesignSpec::new(1, NDVI_BAND).unwrap();
    let frame = augment(&time_frame(timestamps(1)[0], 0, (1, 1)), &spec).unwrap();
    assert!(matches!(
        augment(&frame, &spec),
        Err(HarmonicError::BandExists { .. })
    ));
}

#[test]
fn test_augment_series_after_add_variables() {
    let spec = DesignSpec::new(3, NDVI_BAND).unwrap();
    let raw: Series = timestamps(5)
        .into_iter()
        .map(|ts| {
            Frame::new(ts)
                .insert_band("B5", array![[2000.0, 3000.0]])
                .insert_band("B4", array![[1000.0, 1000.0]])
        })
        .collect();
    let derived = raw
        .try_map(|f| add_variables(f, "B5", "B4", epoch()))
        .unwrap();
    let design = augment_series(&derived, &spec).unwrap();

    assert_eq!(design.len(), 5);
    let shape = design.common_shape(&spec.regression_bands()).unwrap();
    assert_eq!(shape, (1, 2));
    for (frame, ts) in design.iter().zip(timestamps(5)) {
        assert_eq!(frame.timestamp, ts);
    }
}
