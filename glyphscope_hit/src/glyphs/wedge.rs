// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wedges, annular wedges and annuli.
//!
//! Angle properties are materialized negated, in screen convention. The
//! sectors built here negate them back and compare against the negated
//! pointer angle, so both sides of the comparison use the data convention.

use alloc::vec::Vec;
use core::fmt;

use glyphscope_index::SpatialIndex;
use glyphscope_property::{
    ColumnSource, Direction, HasProps, PropertyDef, PropertyKey, PropertyKind, PropertyStore,
    PropertyTable,
};
use glyphscope_selection::{GlyphId, Selection};
use kurbo::Point;

use super::radial::{Radial, Radius, RadiusDimension, centers_in_poly, centers_in_rect};
use crate::geometry::{PointGeometry, PolyGeometry, RectGeometry};
use crate::glyph::{Glyph, HitContext, XyData, column, rows};
use crate::mapper::CoordinateMapper;
use crate::precise::{AnnularSector, PreciseHitTest};

/// Start and end angles as materialized, i.e. negated radians.
#[derive(Clone, Debug, Default)]
struct Angles {
    start: Vec<f64>,
    end: Vec<f64>,
}

impl Angles {
    fn get(&self, i: usize) -> (f64, f64) {
        (
            self.start.get(i).copied().unwrap_or(f64::NAN),
            self.end.get(i).copied().unwrap_or(f64::NAN),
        )
    }
}

/// Rows whose sector contains the pointer. Without angles every sector is a
/// full ring.
fn sector_hits(
    data: &Radial,
    angles: Option<&Angles>,
    direction: Direction,
    geometry: &PointGeometry,
    ctx: &HitContext<'_>,
) -> Vec<usize> {
    let pointer = ctx.data_point(geometry.sx, geometry.sy);
    data.point_candidates(geometry, ctx)
        .into_iter()
        .filter(|&i| {
            let sector = match angles {
                Some(angles) => {
                    let (start, end) = angles.get(i);
                    AnnularSector {
                        center: Point::ZERO,
                        inner_radius: data.sinner(i),
                        outer_radius: data.souter(i),
                        start_angle: -start,
                        end_angle: -end,
                        anticlock: direction.is_anticlock(),
                    }
                }
                None => AnnularSector::annulus(Point::ZERO, data.sinner(i), data.souter(i)),
            };
            let pt = data.local(i, geometry, pointer, ctx);
            sector.hit_test_local(pt, ctx.params).is_some()
        })
        .collect()
}

macro_rules! sector_glyph_impls {
    ($ty:ident) => {
        model_impls!($ty);

        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($ty))
                    .field("id", &self.id)
                    .field("rows", &self.data.xy.len())
                    .finish_non_exhaustive()
            }
        }
    };
}

#[derive(Clone, Copy, Debug)]
struct WedgeKeys {
    x: PropertyKey<f64>,
    y: PropertyKey<f64>,
    radius: PropertyKey<f64>,
    start_angle: PropertyKey<f64>,
    end_angle: PropertyKey<f64>,
}

/// Pie slices.
pub struct Wedge {
    id: GlyphId,
    props: PropertyStore,
    keys: WedgeKeys,
    direction: Direction,
    data: Radial,
    angles: Angles,
}

impl Wedge {
    /// Creates a wedge glyph reading columns `x`, `y`, `radius`,
    /// `start_angle` and `end_angle`.
    #[must_use]
    pub fn new() -> Self {
        let mut table = PropertyTable::new();
        let keys = WedgeKeys {
            x: table.define("x", PropertyDef::field(PropertyKind::Coordinate, "x")),
            y: table.define("y", PropertyDef::field(PropertyKind::Coordinate, "y")),
            radius: table.define("radius", PropertyDef::field(PropertyKind::Distance, "radius")),
            start_angle: table.define(
                "start_angle",
                PropertyDef::field(PropertyKind::Angle, "start_angle"),
            ),
            end_angle: table.define(
                "end_angle",
                PropertyDef::field(PropertyKind::Angle, "end_angle"),
            ),
        };
        Self {
            id: GlyphId::next(),
            props: table.instantiate(),
            keys,
            direction: Direction::default(),
            data: Radial::default(),
            angles: Angles::default(),
        }
    }

    /// Sets the direction from start to end angle.
    #[must_use]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Direction from start to end angle.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }
}

sector_glyph_impls!(Wedge);

impl Glyph for Wedge {
    fn id(&self) -> GlyphId {
        self.id
    }

    fn kind_name(&self) -> &'static str {
        "wedge"
    }

    fn set_data(&mut self, source: &dyn ColumnSource, rows: &[usize]) {
        let k = self.keys;
        let xy = XyData::new(
            column(&self.props, k.x, source, rows),
            column(&self.props, k.y, source, rows),
        );
        let units = self.props.get(k.radius).spatial_units();
        let radius = Radius::new(column(&self.props, k.radius, source, rows), units);
        self.data = Radial::new(xy, radius, None);
        self.angles = Angles {
            start: column(&self.props, k.start_angle, source, rows),
            end: column(&self.props, k.end_angle, source, rows),
        };
    }

    fn map_data(&mut self, x: &dyn CoordinateMapper, y: &dyn CoordinateMapper) {
        self.data.map(x, y, RadiusDimension::X);
    }

    fn index(&self) -> &SpatialIndex {
        &self.data.index
    }

    fn hit_point(&self, geometry: &PointGeometry, ctx: &HitContext<'_>) -> Option<Selection> {
        Some(rows(sector_hits(
            &self.data,
            Some(&self.angles),
            self.direction,
            geometry,
            ctx,
        )))
    }

    fn hit_rect(&self, geometry: &RectGeometry, ctx: &HitContext<'_>) -> Option<Selection> {
        Some(rows(centers_in_rect(&self.data.xy, &self.data.index, geometry, ctx)))
    }

    fn hit_poly(&self, geometry: &PolyGeometry, ctx: &HitContext<'_>) -> Option<Selection> {
        Some(rows(centers_in_poly(&self.data.xy, &self.data.index, geometry, ctx)))
    }
}

#[derive(Clone, Copy, Debug)]
struct AnnularWedgeKeys {
    x: PropertyKey<f64>,
    y: PropertyKey<f64>,
    inner_radius: PropertyKey<f64>,
    outer_radius: PropertyKey<f64>,
    start_angle: PropertyKey<f64>,
    end_angle: PropertyKey<f64>,
}

/// Ring sectors.
pub struct AnnularWedge {
    id: GlyphId,
    props: PropertyStore,
    keys: AnnularWedgeKeys,
    direction: Direction,
    data: Radial,
    angles: Angles,
}

impl AnnularWedge {
    /// Creates an annular wedge glyph reading columns `x`, `y`,
    /// `inner_radius`, `outer_radius`, `start_angle` and `end_angle`.
    #[must_use]
    pub fn new() -> Self {
        let mut table = PropertyTable::new();
        let keys = AnnularWedgeKeys {
            x: table.define("x", PropertyDef::field(PropertyKind::Coordinate, "x")),
            y: table.define("y", PropertyDef::field(PropertyKind::Coordinate, "y")),
            inner_radius: table.define(
                "inner_radius",
                PropertyDef::field(PropertyKind::Distance, "inner_radius"),
            ),
            outer_radius: table.define(
                "outer_radius",
                PropertyDef::field(PropertyKind::Distance, "outer_radius"),
            ),
            start_angle: table.define(
                "start_angle",
                PropertyDef::field(PropertyKind::Angle, "start_angle"),
            ),
            end_angle: table.define(
                "end_angle",
                PropertyDef::field(PropertyKind::Angle, "end_angle"),
            ),
        };
        Self {
            id: GlyphId::next(),
            props: table.instantiate(),
            keys,
            direction: Direction::default(),
            data: Radial::default(),
            angles: Angles::default(),
        }
    }

    /// Sets the direction from start to end angle.
    #[must_use]
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }
}

sector_glyph_impls!(AnnularWedge);

impl Glyph for AnnularWedge {
    fn id(&self) -> GlyphId {
        self.id
    }

    fn kind_name(&self) -> &'static str {
        "annular_wedge"
    }

    fn set_data(&mut self, source: &dyn ColumnSource, rows: &[usize]) {
        let k = self.keys;
        let xy = XyData::new(
            column(&self.props, k.x, source, rows),
            column(&self.props, k.y, source, rows),
        );
        let outer = Radius::new(
            column(&self.props, k.outer_radius, source, rows),
            self.props.get(k.outer_radius).spatial_units(),
        );
        let inner = Radius::new(
            column(&self.props, k.inner_radius, source, rows),
            self.props.get(k.inner_radius).spatial_units(),
        );
        self.data = Radial::new(xy, outer, Some(inner));
        self.angles = Angles {
            start: column(&self.props, k.start_angle, source, rows),
            end: column(&self.props, k.end_angle, source, rows),
        };
    }

    fn map_data(&mut self, x: &dyn CoordinateMapper, y: &dyn CoordinateMapper) {
        self.data.map(x, y, RadiusDimension::X);
    }

    fn index(&self) -> &SpatialIndex {
        &self.data.index
    }

    fn hit_point(&self, geometry: &PointGeometry, ctx: &HitContext<'_>) -> Option<Selection> {
        Some(rows(sector_hits(
            &self.data,
            Some(&self.angles),
            self.direction,
            geometry,
            ctx,
        )))
    }

    fn hit_rect(&self, geometry: &RectGeometry, ctx: &HitContext<'_>) -> Option<Selection> {
        Some(rows(centers_in_rect(&self.data.xy, &self.data.index, geometry, ctx)))
    }

    fn hit_poly(&self, geometry: &PolyGeometry, ctx: &HitContext<'_>) -> Option<Selection> {
        Some(rows(centers_in_poly(&self.data.xy, &self.data.index, geometry, ctx)))
    }
}

#[derive(Clone, Copy, Debug)]
struct AnnulusKeys {
    x: PropertyKey<f64>,
    y: PropertyKey<f64>,
    inner_radius: PropertyKey<f64>,
    outer_radius: PropertyKey<f64>,
}

/// Full rings.
pub struct Annulus {
    id: GlyphId,
    props: PropertyStore,
    keys: AnnulusKeys,
    data: Radial,
}

impl Annulus {
    /// Creates an annulus glyph reading columns `x`, `y`, `inner_radius` and
    /// `outer_radius`.
    #[must_use]
    pub fn new() -> Self {
        let mut table = PropertyTable::new();
        let keys = AnnulusKeys {
            x: table.define("x", PropertyDef::field(PropertyKind::Coordinate, "x")),
            y: table.define("y", PropertyDef::field(PropertyKind::Coordinate, "y")),
            inner_radius: table.define(
                "inner_radius",
                PropertyDef::field(PropertyKind::Distance, "inner_radius"),
            ),
            outer_radius: table.define(
                "outer_radius",
                PropertyDef::field(PropertyKind::Distance, "outer_radius"),
            ),
        };
        Self {
            id: GlyphId::next(),
            props: table.instantiate(),
            keys,
            data: Radial::default(),
        }
    }
}

sector_glyph_impls!(Annulus);

impl Glyph for Annulus {
    fn id(&self) -> GlyphId {
        self.id
    }

    fn kind_name(&self) -> &'static str {
        "annulus"
    }

    fn set_data(&mut self, source: &dyn ColumnSource, rows: &[usize]) {
        let k = self.keys;
        let xy = XyData::new(
            column(&self.props, k.x, source, rows),
            column(&self.props, k.y, source, rows),
        );
        let outer = Radius::new(
            column(&self.props, k.outer_radius, source, rows),
            self.props.get(k.outer_radius).spatial_units(),
        );
        let inner = Radius::new(
            column(&self.props, k.inner_radius, source, rows),
            self.props.get(k.inner_radius).spatial_units(),
        );
        self.data = Radial::new(xy, outer, Some(inner));
    }

    fn map_data(&mut self, x: &dyn CoordinateMapper, y: &dyn CoordinateMapper) {
        self.data.map(x, y, RadiusDimension::X);
    }

    fn index(&self) -> &SpatialIndex {
        &self.data.index
    }

    fn hit_point(&self, geometry: &PointGeometry, ctx: &HitContext<'_>) -> Option<Selection> {
        Some(rows(sector_hits(
            &self.data,
            None,
            Direction::Anticlock,
            geometry,
            ctx,
        )))
    }

    fn hit_rect(&self, geometry: &RectGeometry, ctx: &HitContext<'_>) -> Option<Selection> {
        Some(rows(centers_in_rect(&self.data.xy, &self.data.index, geometry, ctx)))
    }

    fn hit_poly(&self, geometry: &PolyGeometry, ctx: &HitContext<'_>) -> Option<Selection> {
        Some(rows(centers_in_poly(&self.data.xy, &self.data.index, geometry, ctx)))
    }
}
