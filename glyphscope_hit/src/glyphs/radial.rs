// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Circles and fixed-size markers.

use alloc::vec::Vec;
use core::fmt;

use glyphscope_index::{Aabb2D, SpatialIndex};
use glyphscope_property::{
    ColumnSource, HasProps, PropertyDef, PropertyKey, PropertyKind, PropertyStore, PropertyTable,
    SpatialUnits,
};
use glyphscope_selection::{GlyphId, Selection};
use kurbo::Point;

use crate::geometry::{PointGeometry, PolyGeometry, RectGeometry, SpanDirection, SpanGeometry};
use crate::glyph::{Glyph, HitContext, XyData, column, max_finite, rows};
use crate::mapper::{CoordinateMapper, SpanAnchor, sdist};
use crate::math::point_in_poly;
use crate::precise::{Disk, PreciseHitTest};

/// Axis along which a data-space radius is measured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RadiusDimension {
    /// Horizontal screen length.
    #[default]
    X,
    /// Vertical screen length.
    Y,
    /// The longer of the two.
    Max,
    /// The shorter of the two.
    Min,
}

/// A per-row radius and its screen projection.
#[derive(Clone, Debug, Default)]
pub(crate) struct Radius {
    values: Vec<f64>,
    units: SpatialUnits,
    screen: Vec<f64>,
}

impl Radius {
    pub(crate) fn new(values: Vec<f64>, units: SpatialUnits) -> Self {
        Self {
            values,
            units,
            screen: Vec::new(),
        }
    }

    fn map(
        &mut self,
        xy: &XyData,
        x: &dyn CoordinateMapper,
        y: &dyn CoordinateMapper,
        dimension: RadiusDimension,
    ) {
        if self.units == SpatialUnits::Screen {
            self.screen.clone_from(&self.values);
            return;
        }
        let along_x = || sdist(x, &xy.x, &self.values, SpanAnchor::Edge);
        let along_y = || sdist(y, &xy.y, &self.values, SpanAnchor::Edge);
        self.screen = match dimension {
            RadiusDimension::X => along_x(),
            RadiusDimension::Y => along_y(),
            RadiusDimension::Max => zip_with(&along_x(), &along_y(), f64::max),
            RadiusDimension::Min => zip_with(&along_x(), &along_y(), f64::min),
        };
    }

    fn screen(&self, i: usize) -> f64 {
        self.screen.get(i).copied().unwrap_or(f64::NAN)
    }
}

fn zip_with(a: &[f64], b: &[f64], f: fn(f64, f64) -> f64) -> Vec<f64> {
    a.iter().zip(b).map(|(&a, &b)| f(a, b)).collect()
}

/// Centers, an outer and an optional inner radius, and their index.
///
/// The index holds centers only. Point and span queries grow the query by the
/// largest screen radius before asking it.
#[derive(Debug, Default)]
pub(crate) struct Radial {
    pub(crate) xy: XyData,
    outer: Radius,
    inner: Option<Radius>,
    max_souter: f64,
    pub(crate) index: SpatialIndex,
}

impl Radial {
    pub(crate) fn new(xy: XyData, outer: Radius, inner: Option<Radius>) -> Self {
        let index = xy.index();
        Self {
            xy,
            outer,
            inner,
            max_souter: 0.0,
            index,
        }
    }

    pub(crate) fn map(
        &mut self,
        x: &dyn CoordinateMapper,
        y: &dyn CoordinateMapper,
        dimension: RadiusDimension,
    ) {
        self.xy.map(x, y);
        self.outer.map(&self.xy, x, y, dimension);
        if let Some(inner) = &mut self.inner {
            inner.map(&self.xy, x, y, dimension);
        }
        self.max_souter = max_finite(&self.outer.screen);
    }

    /// Outer screen radius of a row.
    pub(crate) fn souter(&self, i: usize) -> f64 {
        self.outer.screen(i)
    }

    /// Inner screen radius of a row; zero without an inner radius.
    pub(crate) fn sinner(&self, i: usize) -> f64 {
        self.inner.as_ref().map_or(0.0, |r| r.screen(i))
    }

    /// The query point relative to a row's center, in pixels.
    ///
    /// Data-space radii are measured with `r_compute` at the row's own
    /// position, so the offset is too.
    pub(crate) fn local(
        &self,
        i: usize,
        geometry: &PointGeometry,
        data: (f64, f64),
        ctx: &HitContext<'_>,
    ) -> Point {
        if self.outer.units == SpatialUnits::Data {
            let (px, cx) = ctx.x.r_compute(data.0, self.xy.x[i]);
            let (py, cy) = ctx.y.r_compute(data.1, self.xy.y[i]);
            Point::new(px - cx, py - cy)
        } else {
            let (sx, sy) = self.xy.screen(i);
            Point::new(geometry.sx - sx, geometry.sy - sy)
        }
    }

    fn margin(&self, ctx: &HitContext<'_>) -> f64 {
        self.max_souter * ctx.params.hit_dilation + ctx.params.tolerance
    }

    /// Rows whose center is within the largest radius of the pointer.
    pub(crate) fn point_candidates(
        &self,
        geometry: &PointGeometry,
        ctx: &HitContext<'_>,
    ) -> Vec<usize> {
        let bbox = ctx.data_box_around(geometry.sx, geometry.sy, self.margin(ctx));
        self.index.query_box(bbox)
    }

    /// Rows whose disk is hit by the pointer.
    pub(crate) fn disk_hits(&self, geometry: &PointGeometry, ctx: &HitContext<'_>) -> Vec<usize> {
        let data = ctx.data_point(geometry.sx, geometry.sy);
        self.point_candidates(geometry, ctx)
            .into_iter()
            .filter(|&i| {
                let disk = Disk {
                    center: Point::ZERO,
                    radius: self.souter(i),
                };
                let pt = self.local(i, geometry, data, ctx);
                disk.hit_test_local(pt, ctx.params).is_some()
            })
            .collect()
    }

    /// Rows whose disk crosses the sweep line.
    pub(crate) fn span_hits(&self, geometry: &SpanGeometry, ctx: &HitContext<'_>) -> Vec<usize> {
        let m = self.margin(ctx);
        let all = self.index.bbox();
        let bbox = match geometry.direction {
            SpanDirection::H => {
                let (x0, x1) = ctx.x.r_invert(geometry.sx - m, geometry.sx + m);
                Aabb2D::from_corners(x0, all.min_y, x1, all.max_y)
            }
            SpanDirection::V => {
                let (y0, y1) = ctx.y.r_invert(geometry.sy - m, geometry.sy + m);
                Aabb2D::from_corners(all.min_x, y0, all.max_x, y1)
            }
        };
        self.index
            .query_box(bbox)
            .into_iter()
            .filter(|&i| {
                let r = self.souter(i) * ctx.params.hit_dilation + ctx.params.tolerance;
                let (sx, sy) = self.xy.screen(i);
                let d = match geometry.direction {
                    SpanDirection::H => sx - geometry.sx,
                    SpanDirection::V => sy - geometry.sy,
                };
                d.abs() <= r
            })
            .collect()
    }
}

/// Rows whose screen center lies inside a rectangle query.
pub(crate) fn centers_in_rect(
    xy: &XyData,
    index: &SpatialIndex,
    geometry: &RectGeometry,
    ctx: &HitContext<'_>,
) -> Vec<usize> {
    let bbox = ctx.data_box(geometry.sx0, geometry.sx1, geometry.sy0, geometry.sy1);
    index
        .query_box(bbox)
        .into_iter()
        .filter(|&i| {
            let (sx, sy) = xy.screen(i);
            geometry.contains(sx, sy)
        })
        .collect()
}

/// Rows whose screen center lies inside a polygon query.
pub(crate) fn centers_in_poly(
    xy: &XyData,
    index: &SpatialIndex,
    geometry: &PolyGeometry,
    ctx: &HitContext<'_>,
) -> Vec<usize> {
    let (x0, y0, x1, y1) = geometry.bounds();
    let bbox = ctx.data_box(x0, x1, y0, y1);
    index
        .query_box(bbox)
        .into_iter()
        .filter(|&i| {
            let (sx, sy) = xy.screen(i);
            point_in_poly(sx, sy, geometry.sx(), geometry.sy())
        })
        .collect()
}

#[derive(Clone, Copy, Debug)]
struct CircleKeys {
    x: PropertyKey<f64>,
    y: PropertyKey<f64>,
    radius: PropertyKey<f64>,
}

/// Circles with a radius in data or screen units.
///
/// A data-space radius is projected along [`RadiusDimension`], so a circle
/// stays round on screen even when the two axes have different scales.
pub struct Circle {
    id: GlyphId,
    props: PropertyStore,
    keys: CircleKeys,
    radius_dimension: RadiusDimension,
    data: Radial,
}

impl Circle {
    /// Creates a circle glyph reading columns `x`, `y` and `radius`.
    #[must_use]
    pub fn new() -> Self {
        let mut table = PropertyTable::new();
        let keys = CircleKeys {
            x: table.define("x", PropertyDef::field(PropertyKind::Coordinate, "x")),
            y: table.define("y", PropertyDef::field(PropertyKind::Coordinate, "y")),
            radius: table.define("radius", PropertyDef::field(PropertyKind::Distance, "radius")),
        };
        Self {
            id: GlyphId::next(),
            props: table.instantiate(),
            keys,
            radius_dimension: RadiusDimension::default(),
            data: Radial::default(),
        }
    }

    /// Sets the axis data-space radii are measured along.
    #[must_use]
    pub fn with_radius_dimension(mut self, dimension: RadiusDimension) -> Self {
        self.radius_dimension = dimension;
        self
    }

    /// The axis data-space radii are measured along.
    #[must_use]
    pub fn radius_dimension(&self) -> RadiusDimension {
        self.radius_dimension
    }

    /// Screen radius of a row, NaN if unknown.
    #[must_use]
    pub fn screen_radius(&self, row: usize) -> f64 {
        self.data.souter(row)
    }
}

model_impls!(Circle);

impl fmt::Debug for Circle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Circle")
            .field("id", &self.id)
            .field("radius_dimension", &self.radius_dimension)
            .field("rows", &self.data.xy.len())
            .finish_non_exhaustive()
    }
}

impl Glyph for Circle {
    fn id(&self) -> GlyphId {
        self.id
    }

    fn kind_name(&self) -> &'static str {
        "circle"
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
    }

    fn map_data(&mut self, x: &dyn CoordinateMapper, y: &dyn CoordinateMapper) {
        self.data.map(x, y, self.radius_dimension);
    }

    fn index(&self) -> &SpatialIndex {
        &self.data.index
    }

    fn hit_point(&self, geometry: &PointGeometry, ctx: &HitContext<'_>) -> Option<Selection> {
        Some(rows(self.data.disk_hits(geometry, ctx)))
    }

    fn hit_span(&self, geometry: &SpanGeometry, ctx: &HitContext<'_>) -> Option<Selection> {
        Some(rows(self.data.span_hits(geometry, ctx)))
    }

    fn hit_rect(&self, geometry: &RectGeometry, ctx: &HitContext<'_>) -> Option<Selection> {
        Some(rows(centers_in_rect(
            &self.data.xy,
            &self.data.index,
            geometry,
            ctx,
        )))
    }

    fn hit_poly(&self, geometry: &PolyGeometry, ctx: &HitContext<'_>) -> Option<Selection> {
        Some(rows(centers_in_poly(
            &self.data.xy,
            &self.data.index,
            geometry,
            ctx,
        )))
    }
}

#[derive(Clone, Copy, Debug)]
struct ScatterKeys {
    x: PropertyKey<f64>,
    y: PropertyKey<f64>,
    size: PropertyKey<f64>,
}

/// Markers of a fixed pixel size, hit as disks of half that size.
pub struct Scatter {
    id: GlyphId,
    props: PropertyStore,
    keys: ScatterKeys,
    data: Radial,
}

impl Scatter {
    /// Creates a marker glyph reading columns `x` and `y`, 4 pixels wide.
    #[must_use]
    pub fn new() -> Self {
        let mut table = PropertyTable::new();
        let keys = ScatterKeys {
            x: table.define("x", PropertyDef::field(PropertyKind::Coordinate, "x")),
            y: table.define("y", PropertyDef::field(PropertyKind::Coordinate, "y")),
            size: table.define("size", PropertyDef::value(PropertyKind::Size, 4.0)),
        };
        Self {
            id: GlyphId::next(),
            props: table.instantiate(),
            keys,
            data: Radial::default(),
        }
    }
}

model_impls!(Scatter);

impl fmt::Debug for Scatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scatter")
            .field("id", &self.id)
            .field("rows", &self.data.xy.len())
            .finish_non_exhaustive()
    }
}

impl Glyph for Scatter {
    fn id(&self) -> GlyphId {
        self.id
    }

    fn kind_name(&self) -> &'static str {
        "scatter"
    }

    fn set_data(&mut self, source: &dyn ColumnSource, rows: &[usize]) {
        let k = self.keys;
        let xy = XyData::new(
            column(&self.props, k.x, source, rows),
            column(&self.props, k.y, source, rows),
        );
        let half: Vec<f64> = column(&self.props, k.size, source, rows)
            .into_iter()
            .map(|s| s / 2.0)
            .collect();
        self.data = Radial::new(xy, Radius::new(half, SpatialUnits::Screen), None);
    }

    fn map_data(&mut self, x: &dyn CoordinateMapper, y: &dyn CoordinateMapper) {
        self.data.map(x, y, RadiusDimension::X);
    }

    fn index(&self) -> &SpatialIndex {
        &self.data.index
    }

    fn hit_point(&self, geometry: &PointGeometry, ctx: &HitContext<'_>) -> Option<Selection> {
        Some(rows(self.data.disk_hits(geometry, ctx)))
    }

    fn hit_span(&self, geometry: &SpanGeometry, ctx: &HitContext<'_>) -> Option<Selection> {
        Some(rows(self.data.span_hits(geometry, ctx)))
    }

    fn hit_rect(&self, geometry: &RectGeometry, ctx: &HitContext<'_>) -> Option<Selection> {
        Some(rows(centers_in_rect(
            &self.data.xy,
            &self.data.index,
            geometry,
            ctx,
        )))
    }

    fn hit_poly(&self, geometry: &PolyGeometry, ctx: &HitContext<'_>) -> Option<Selection> {
        Some(rows(centers_in_poly(
            &self.data.xy,
            &self.data.index,
            geometry,
            ctx,
        )))
    }
}
