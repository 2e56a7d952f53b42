// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A mark model driven through its public surface.

use std::f64::consts::PI;

use glyphscope_property::{
    AngleUnits, ColumnDataSource, ColumnSource, HasProps, HasPropsExt, PropertyDef, PropertyError,
    PropertyKey, PropertyKind, PropertySpec, PropertyStore, PropertyTable, SpatialUnits, Stack,
};

struct Slice {
    props: PropertyStore,
    x: PropertyKey<f64>,
    radius: PropertyKey<f64>,
    angle: PropertyKey<f64>,
}

impl Slice {
    fn new() -> Self {
        let mut table = PropertyTable::new();
        let x = table.define("x", PropertyDef::field(PropertyKind::Coordinate, "x"));
        let radius = table.define("radius", PropertyDef::value(PropertyKind::Distance, 1.0));
        let angle = table.define("angle", PropertyDef::field(PropertyKind::Angle, "angle"));
        Self {
            props: table.instantiate(),
            x,
            radius,
            angle,
        }
    }
}

impl HasProps for Slice {
    fn properties(&self) -> &PropertyStore {
        &self.props
    }

    fn properties_mut(&mut self) -> &mut PropertyStore {
        &mut self.props
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-12
}

#[test]
fn angles_are_negated_radians() {
    let mut slice = Slice::new();
    let source = ColumnDataSource::new()
        .with_column("x", vec![0.0, 1.0])
        .with_column("angle", vec![90.0, 180.0]);
    slice
        .set_spec(
            "angle",
            PropertySpec::<f64>::field("angle").with_units(AngleUnits::Deg),
        )
        .expect("degrees are valid angle units");
    let angles = slice.props.get(slice.angle).array(&source);
    assert!(close(angles[0], -PI / 2.0), "got {}", angles[0]);
    assert!(close(angles[1], -PI), "got {}", angles[1]);
}

#[test]
fn missing_columns_degrade_to_nan() {
    let slice = Slice::new();
    let source = ColumnDataSource::new().with_column("y", vec![1.0, 2.0, 3.0]);
    let xs = slice.props.get(slice.x).array(&source);
    assert_eq!(xs.len(), 3, "one value per source row");
    assert!(xs.iter().all(|v| v.is_nan()), "no column, no values");
}

#[test]
fn literals_broadcast_and_read_back() {
    let mut slice = Slice::new();
    let source = ColumnDataSource::new().with_column("x", vec![0.0; 4]);
    assert_eq!(&*slice.props.get(slice.radius).array(&source), &[1.0; 4]);

    slice
        .set_spec("radius", PropertySpec::value(2.5).with_units(SpatialUnits::Screen))
        .expect("screen units are valid for distances");
    assert_eq!(slice.get_value::<f64>("radius"), Ok(2.5));
    assert_eq!(slice.props.get(slice.radius).spatial_units(), SpatialUnits::Screen);

    let err = slice.get_value::<f64>("x");
    assert!(matches!(err, Err(PropertyError::InvalidSpec { .. })), "x is field bound");
}

#[test]
fn source_edits_invalidate_cached_arrays() {
    let slice = Slice::new();
    let mut source = ColumnDataSource::new().with_column("x", vec![1.0, 2.0]);
    let before = slice.props.get(slice.x).array(&source);
    let generation = source.generation();

    assert!(source.patch("x", 1, 5.0), "row 1 exists");
    assert_ne!(source.generation(), generation, "patch bumps the generation");
    let after = slice.props.get(slice.x).array(&source);
    assert_eq!(&*before, &[1.0, 2.0]);
    assert_eq!(&*after, &[1.0, 5.0]);
}

#[test]
fn expressions_compute_over_the_source() {
    let mut slice = Slice::new();
    let source = ColumnDataSource::new()
        .with_column("a", vec![1.0, 2.0])
        .with_column("b", vec![10.0, 20.0]);
    slice
        .set_spec("x", PropertySpec::<f64>::expr(Stack::new(["a", "b"])))
        .expect("coordinates accept expressions");
    assert_eq!(&*slice.props.get(slice.x).array(&source), &[11.0, 22.0]);
}
