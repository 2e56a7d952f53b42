// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Centered rectangles and edge-defined boxes.

use alloc::vec::Vec;
use core::fmt;

use glyphscope_index::{Aabb2D, SpatialIndex};
use glyphscope_property::{
    ColumnSource, HasProps, PropertyDef, PropertyKey, PropertyKind, PropertyStore, PropertyTable,
    SpatialUnits,
};
use glyphscope_selection::{GlyphId, Selection};
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Vec2};

use super::radial::{centers_in_poly, centers_in_rect};
use crate::geometry::{PointGeometry, PolyGeometry, RectGeometry, SpanDirection, SpanGeometry};
use crate::glyph::{Glyph, HitContext, XyData, column, rows};
use crate::mapper::CoordinateMapper;
use crate::math::rotated_half_extents;
use crate::precise::{OrientedRect, PreciseHitTest};

#[derive(Clone, Copy, Debug)]
struct RectKeys {
    x: PropertyKey<f64>,
    y: PropertyKey<f64>,
    width: PropertyKey<f64>,
    height: PropertyKey<f64>,
    angle: PropertyKey<f64>,
}

/// Rectangles given by center, size and rotation.
///
/// The index holds centers. Pointer and sweep queries grow the query by the
/// largest screen distance from a center to a corner and then test each
/// candidate in its own rotated frame.
///
/// A data-unit size spans `x ± width / 2` in data space, so on a non-linear
/// axis the box is not centered on the projected `x`. Rotation stays about
/// the projected center.
pub struct Rect {
    id: GlyphId,
    props: PropertyStore,
    keys: RectKeys,
    xy: XyData,
    width: Vec<f64>,
    height: Vec<f64>,
    units: (SpatialUnits, SpatialUnits),
    angle: Vec<f64>,
    sx0: Vec<f64>,
    sy0: Vec<f64>,
    swidth: Vec<f64>,
    sheight: Vec<f64>,
    max_extent: f64,
    index: SpatialIndex,
}

impl Rect {
    /// Creates a rectangle glyph reading columns `x`, `y`, `width` and
    /// `height`, unrotated.
    #[must_use]
    pub fn new() -> Self {
        let mut table = PropertyTable::new();
        let keys = RectKeys {
            x: table.define("x", PropertyDef::field(PropertyKind::Coordinate, "x")),
            y: table.define("y", PropertyDef::field(PropertyKind::Coordinate, "y")),
            width: table.define("width", PropertyDef::field(PropertyKind::Distance, "width")),
            height: table.define("height", PropertyDef::field(PropertyKind::Distance, "height")),
            angle: table.define("angle", PropertyDef::value(PropertyKind::Angle, 0.0)),
        };
        Self {
            id: GlyphId::next(),
            props: table.instantiate(),
            keys,
            xy: XyData::default(),
            width: Vec::new(),
            height: Vec::new(),
            units: (SpatialUnits::Data, SpatialUnits::Data),
            angle: Vec::new(),
            sx0: Vec::new(),
            sy0: Vec::new(),
            swidth: Vec::new(),
            sheight: Vec::new(),
            max_extent: 0.0,
            index: SpatialIndex::default(),
        }
    }

    /// Screen width and height of a row, NaN if unknown.
    #[must_use]
    pub fn screen_size(&self, row: usize) -> (f64, f64) {
        (
            self.swidth.get(row).copied().unwrap_or(f64::NAN),
            self.sheight.get(row).copied().unwrap_or(f64::NAN),
        )
    }

    /// Screen position of a row's left and top edges before rotation, NaN if
    /// unknown.
    #[must_use]
    pub fn screen_corner(&self, row: usize) -> (f64, f64) {
        (
            self.sx0.get(row).copied().unwrap_or(f64::NAN),
            self.sy0.get(row).copied().unwrap_or(f64::NAN),
        )
    }

    fn oriented(&self, i: usize) -> OrientedRect {
        let (sx, sy) = self.xy.screen(i);
        let (w, h) = self.screen_size(i);
        let (x0, y0) = self.screen_corner(i);
        OrientedRect {
            pivot: Point::new(sx, sy),
            offset: Vec2::new(x0 + w / 2.0 - sx, y0 + h / 2.0 - sy),
            half_width: w / 2.0,
            half_height: h / 2.0,
            angle: self.angle.get(i).copied().unwrap_or(f64::NAN),
        }
    }

    fn margin(&self, ctx: &HitContext<'_>) -> f64 {
        self.max_extent + ctx.params.tolerance
    }
}

model_impls!(Rect);

impl fmt::Debug for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rect")
            .field("id", &self.id)
            .field("rows", &self.xy.len())
            .field("max_extent", &self.max_extent)
            .finish_non_exhaustive()
    }
}

impl Glyph for Rect {
    fn id(&self) -> GlyphId {
        self.id
    }

    fn kind_name(&self) -> &'static str {
        "rect"
    }

    fn set_data(&mut self, source: &dyn ColumnSource, rows: &[usize]) {
        let k = self.keys;
        self.xy = XyData::new(
            column(&self.props, k.x, source, rows),
            column(&self.props, k.y, source, rows),
        );
        self.width = column(&self.props, k.width, source, rows);
        self.height = column(&self.props, k.height, source, rows);
        self.units = (
            self.props.get(k.width).spatial_units(),
            self.props.get(k.height).spatial_units(),
        );
        self.angle = column(&self.props, k.angle, source, rows);
        self.index = self.xy.index();
        self.sx0.clear();
        self.sy0.clear();
        self.swidth.clear();
        self.sheight.clear();
        self.max_extent = 0.0;
    }

    fn map_data(&mut self, x: &dyn CoordinateMapper, y: &dyn CoordinateMapper) {
        self.xy.map(x, y);
        let (wu, hu) = self.units;
        (self.sx0, self.swidth) = screen_sides(wu, &self.xy.x, &self.xy.sx, &self.width, x);
        (self.sy0, self.sheight) = screen_sides(hu, &self.xy.y, &self.xy.sy, &self.height, y);
        self.max_extent = (0..self.xy.len())
            .map(|i| self.oriented(i).reach())
            .filter(|d| d.is_finite())
            .fold(0.0, f64::max);
    }

    fn index(&self) -> &SpatialIndex {
        &self.index
    }

    fn hit_point(&self, geometry: &PointGeometry, ctx: &HitContext<'_>) -> Option<Selection> {
        let bbox = ctx.data_box_around(geometry.sx, geometry.sy, self.margin(ctx));
        let pt = Point::new(geometry.sx, geometry.sy);
        let hits = self
            .index
            .query_box(bbox)
            .into_iter()
            .filter(|&i| self.oriented(i).hit_test_local(pt, ctx.params).is_some())
            .collect();
        Some(rows(hits))
    }

    fn hit_span(&self, geometry: &SpanGeometry, ctx: &HitContext<'_>) -> Option<Selection> {
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
        let tol = ctx.params.tolerance;
        let hits = self
            .index
            .query_box(bbox)
            .into_iter()
            .filter(|&i| {
                let r = self.oriented(i);
                let c = r.center();
                let (ex, ey) = rotated_half_extents(r.half_width, r.half_height, r.angle);
                match geometry.direction {
                    SpanDirection::H => (c.x - geometry.sx).abs() <= ex + tol,
                    SpanDirection::V => (c.y - geometry.sy).abs() <= ey + tol,
                }
            })
            .collect();
        Some(rows(hits))
    }

    fn hit_rect(&self, geometry: &RectGeometry, ctx: &HitContext<'_>) -> Option<Selection> {
        Some(rows(centers_in_rect(&self.xy, &self.index, geometry, ctx)))
    }

    fn hit_poly(&self, geometry: &PolyGeometry, ctx: &HitContext<'_>) -> Option<Selection> {
        Some(rows(centers_in_poly(&self.xy, &self.index, geometry, ctx)))
    }
}

/// Screen start and length of each row's side along one axis.
///
/// Screen-unit sizes are centered on the projected anchor. Data-unit sizes
/// project both data edges, so the start is whichever edge lands lower.
fn screen_sides(
    units: SpatialUnits,
    anchors: &[f64],
    screen: &[f64],
    sizes: &[f64],
    mapper: &dyn CoordinateMapper,
) -> (Vec<f64>, Vec<f64>) {
    match units {
        SpatialUnits::Screen => screen
            .iter()
            .zip(sizes)
            .map(|(&s, &len)| (s - len / 2.0, len))
            .unzip(),
        SpatialUnits::Data => anchors
            .iter()
            .zip(sizes)
            .map(|(&c, &len)| {
                let (a, b) = mapper.r_compute(c - len / 2.0, c + len / 2.0);
                if a.is_nan() || b.is_nan() {
                    (f64::NAN, f64::NAN)
                } else {
                    (a.min(b), (b - a).abs())
                }
            })
            .unzip(),
    }
}

/// Data-space edges of axis-aligned boxes.
///
/// The index holds full boxes, so pointer, sweep and rectangle queries are
/// answered by the index; screen edges only add the hit tolerance.
#[derive(Debug, Default)]
struct Boxes {
    left: Vec<f64>,
    right: Vec<f64>,
    top: Vec<f64>,
    bottom: Vec<f64>,
    screen: Vec<(f64, f64, f64, f64)>,
    index: SpatialIndex,
}

impl Boxes {
    fn new(left: Vec<f64>, right: Vec<f64>, top: Vec<f64>, bottom: Vec<f64>) -> Self {
        let index = SpatialIndex::build(
            left.iter()
                .zip(&right)
                .zip(top.iter().zip(&bottom))
                .map(|((&l, &r), (&t, &b))| Aabb2D::from_corners(l, b, r, t)),
        );
        Self {
            left,
            right,
            top,
            bottom,
            screen: Vec::new(),
            index,
        }
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn map(&mut self, x: &dyn CoordinateMapper, y: &dyn CoordinateMapper) {
        let sl = x.v_compute(&self.left);
        let sr = x.v_compute(&self.right);
        let st = y.v_compute(&self.top);
        let sb = y.v_compute(&self.bottom);
        self.screen = sl
            .iter()
            .zip(&sr)
            .zip(st.iter().zip(&sb))
            .map(|((&l, &r), (&t, &b))| (l.min(r), t.min(b), l.max(r), t.max(b)))
            .collect();
    }

    fn point_hits(&self, geometry: &PointGeometry, ctx: &HitContext<'_>) -> Vec<usize> {
        let tol = ctx.params.tolerance;
        let bbox = ctx.data_box_around(geometry.sx, geometry.sy, tol);
        self.index
            .query_box(bbox)
            .into_iter()
            .filter(|&i| {
                self.screen.get(i).is_some_and(|&(x0, y0, x1, y1)| {
                    x0 - tol <= geometry.sx
                        && geometry.sx <= x1 + tol
                        && y0 - tol <= geometry.sy
                        && geometry.sy <= y1 + tol
                })
            })
            .collect()
    }

    fn span_hits(&self, geometry: &SpanGeometry, ctx: &HitContext<'_>) -> Vec<usize> {
        let all = self.index.bbox();
        let bbox = match geometry.direction {
            SpanDirection::H => {
                let x = ctx.x.invert(geometry.sx);
                Aabb2D::from_corners(x, all.min_y, x, all.max_y)
            }
            SpanDirection::V => {
                let y = ctx.y.invert(geometry.sy);
                Aabb2D::from_corners(all.min_x, y, all.max_x, y)
            }
        };
        self.index.query_box(bbox)
    }

    fn rect_hits(&self, geometry: &RectGeometry, ctx: &HitContext<'_>) -> Vec<usize> {
        let bbox = ctx.data_box(geometry.sx0, geometry.sx1, geometry.sy0, geometry.sy1);
        self.index.query_box(bbox)
    }
}

/// Centered extents: `center ± size / 2`.
fn centered(center: &[f64], size: &[f64]) -> (Vec<f64>, Vec<f64>) {
    center
        .iter()
        .zip(size)
        .map(|(&c, &s)| (c - s / 2.0, c + s / 2.0))
        .unzip()
}

macro_rules! box_glyph {
    ($ty:ident, $name:literal) => {
        model_impls!($ty);

        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($ty))
                    .field("id", &self.id)
                    .field("rows", &self.boxes.len())
                    .finish_non_exhaustive()
            }
        }

        impl Glyph for $ty {
            fn id(&self) -> GlyphId {
                self.id
            }

            fn kind_name(&self) -> &'static str {
                $name
            }

            fn set_data(&mut self, source: &dyn ColumnSource, rows: &[usize]) {
                self.boxes = self.edges(source, rows);
            }

            fn map_data(&mut self, x: &dyn CoordinateMapper, y: &dyn CoordinateMapper) {
                self.boxes.map(x, y);
            }

            fn index(&self) -> &SpatialIndex {
                &self.boxes.index
            }

            fn hit_point(
                &self,
                geometry: &PointGeometry,
                ctx: &HitContext<'_>,
            ) -> Option<Selection> {
                Some(rows(self.boxes.point_hits(geometry, ctx)))
            }

            fn hit_span(
                &self,
                geometry: &SpanGeometry,
                ctx: &HitContext<'_>,
            ) -> Option<Selection> {
                Some(rows(self.boxes.span_hits(geometry, ctx)))
            }

            fn hit_rect(
                &self,
                geometry: &RectGeometry,
                ctx: &HitContext<'_>,
            ) -> Option<Selection> {
                Some(rows(self.boxes.rect_hits(geometry, ctx)))
            }
        }
    };
}

#[derive(Clone, Copy, Debug)]
struct QuadKeys {
    left: PropertyKey<f64>,
    right: PropertyKey<f64>,
    top: PropertyKey<f64>,
    bottom: PropertyKey<f64>,
}

/// Boxes given by their four edges.
pub struct Quad {
    id: GlyphId,
    props: PropertyStore,
    keys: QuadKeys,
    boxes: Boxes,
}

impl Quad {
    /// Creates a quad glyph reading columns `left`, `right`, `top` and
    /// `bottom`.
    #[must_use]
    pub fn new() -> Self {
        let mut table = PropertyTable::new();
        let keys = QuadKeys {
            left: table.define("left", PropertyDef::field(PropertyKind::Coordinate, "left")),
            right: table.define("right", PropertyDef::field(PropertyKind::Coordinate, "right")),
            top: table.define("top", PropertyDef::field(PropertyKind::Coordinate, "top")),
            bottom: table.define("bottom", PropertyDef::field(PropertyKind::Coordinate, "bottom")),
        };
        Self {
            id: GlyphId::next(),
            props: table.instantiate(),
            keys,
            boxes: Boxes::default(),
        }
    }

    fn edges(&self, source: &dyn ColumnSource, rows: &[usize]) -> Boxes {
        let k = self.keys;
        Boxes::new(
            column(&self.props, k.left, source, rows),
            column(&self.props, k.right, source, rows),
            column(&self.props, k.top, source, rows),
            column(&self.props, k.bottom, source, rows),
        )
    }
}

box_glyph!(Quad, "quad");

#[derive(Clone, Copy, Debug)]
struct VBarKeys {
    x: PropertyKey<f64>,
    width: PropertyKey<f64>,
    top: PropertyKey<f64>,
    bottom: PropertyKey<f64>,
}

/// Vertical bars: centered on `x`, `width` wide, from `bottom` to `top`.
pub struct VBar {
    id: GlyphId,
    props: PropertyStore,
    keys: VBarKeys,
    boxes: Boxes,
}

impl VBar {
    /// Creates a vertical bar glyph reading columns `x`, `width` and `top`,
    /// with bars starting at zero.
    #[must_use]
    pub fn new() -> Self {
        let mut table = PropertyTable::new();
        let keys = VBarKeys {
            x: table.define("x", PropertyDef::field(PropertyKind::Coordinate, "x")),
            width: table.define("width", PropertyDef::field(PropertyKind::NonNegative, "width")),
            top: table.define("top", PropertyDef::field(PropertyKind::Coordinate, "top")),
            bottom: table.define("bottom", PropertyDef::value(PropertyKind::Coordinate, 0.0)),
        };
        Self {
            id: GlyphId::next(),
            props: table.instantiate(),
            keys,
            boxes: Boxes::default(),
        }
    }

    fn edges(&self, source: &dyn ColumnSource, rows: &[usize]) -> Boxes {
        let k = self.keys;
        let (left, right) = centered(
            &column(&self.props, k.x, source, rows),
            &column(&self.props, k.width, source, rows),
        );
        Boxes::new(
            left,
            right,
            column(&self.props, k.top, source, rows),
            column(&self.props, k.bottom, source, rows),
        )
    }
}

box_glyph!(VBar, "vbar");

#[derive(Clone, Copy, Debug)]
struct HBarKeys {
    y: PropertyKey<f64>,
    height: PropertyKey<f64>,
    left: PropertyKey<f64>,
    right: PropertyKey<f64>,
}

/// Horizontal bars: centered on `y`, `height` tall, from `left` to `right`.
pub struct HBar {
    id: GlyphId,
    props: PropertyStore,
    keys: HBarKeys,
    boxes: Boxes,
}

impl HBar {
    /// Creates a horizontal bar glyph reading columns `y`, `height` and
    /// `right`, with bars starting at zero.
    #[must_use]
    pub fn new() -> Self {
        let mut table = PropertyTable::new();
        let keys = HBarKeys {
            y: table.define("y", PropertyDef::field(PropertyKind::Coordinate, "y")),
            height: table.define(
                "height",
                PropertyDef::field(PropertyKind::NonNegative, "height"),
            ),
            left: table.define("left", PropertyDef::value(PropertyKind::Coordinate, 0.0)),
            right: table.define("right", PropertyDef::field(PropertyKind::Coordinate, "right")),
        };
        Self {
            id: GlyphId::next(),
            props: table.instantiate(),
            keys,
            boxes: Boxes::default(),
        }
    }

    fn edges(&self, source: &dyn ColumnSource, rows: &[usize]) -> Boxes {
        let k = self.keys;
        let (bottom, top) = centered(
            &column(&self.props, k.y, source, rows),
            &column(&self.props, k.height, source, rows),
        );
        Boxes::new(
            column(&self.props, k.left, source, rows),
            column(&self.props, k.right, source, rows),
            top,
            bottom,
        )
    }
}

box_glyph!(HBar, "hbar");
