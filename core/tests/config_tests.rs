//! Loading generator parameters from RON config.
//!
//! ```bash
//! cargo test -p trinity-core --features serde --test config_tests
//! ```

#![cfg(feature = "serde")]

use trinity_core::math::Vec3;
use trinity_core::mesh::TetrahedronParams;
use trinity_core::scatter::{DirectedPoint, DirectedScatter, ScatterParams};

#[test]
fn scatter_params_from_ron() {
    let params: ScatterParams = ron::from_str("(marker: (height: 0.5, level: 2))").unwrap();
    assert_eq!(params.marker, TetrahedronParams::new(0.5, 2));

    let scatter = DirectedScatter::new(params).unwrap();
    assert_eq!(scatter.faces_per_instance(), 64);
}

#[test]
fn missing_fields_use_defaults() {
    let params: ScatterParams = ron::from_str("()").unwrap();
    assert_eq!(params, ScatterParams::default());

    let marker: TetrahedronParams = ron::from_str("(level: 3)").unwrap();
    assert_eq!(marker, TetrahedronParams::new(1.0, 3));
}

#[test]
fn invalid_config_is_rejected_on_build() {
    let params: ScatterParams = ron::from_str("(marker: (height: -2.0))").unwrap();
    assert!(DirectedScatter::new(params).is_err());
}

#[test]
fn directed_points_round_trip() {
    let points = vec![
        DirectedPoint::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 1.0, 0.0), 0.25),
        DirectedPoint::new(Vec3::new(-1.0, 0.5, 0.0), Vec3::zeros(), 0.75),
    ];
    let text = ron::to_string(&points).unwrap();
    let parsed: Vec<DirectedPoint> = ron::from_str(&text).unwrap();
    assert_eq!(parsed, points);
}
