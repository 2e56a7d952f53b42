// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Filled regions: single patches, per-row patches and stacked areas.
//!
//! A region that is one shape for the whole source has no row to report, so
//! a hit is recorded as glyph provenance only. Per-row patches report rows.

use alloc::vec::Vec;
use core::fmt;

use glyphscope_index::{Aabb2D, SpatialIndex};
use glyphscope_property::{
    ColumnSource, HasProps, PropertyDef, PropertyKey, PropertyKind, PropertyStore, PropertyTable,
};
use glyphscope_selection::{GlyphId, Selection};
use kurbo::Point;

use super::line::path_bounds;
use crate::geometry::{PointGeometry, PolyGeometry, RectGeometry};
use crate::glyph::{Glyph, HitContext, column, rows};
use crate::mapper::CoordinateMapper;
use crate::math::point_in_poly;
use crate::precise::{HitParams, PreciseHitTest, Ring};

/// Whether a screen point is inside any NaN-separated ring of a path.
fn in_any_ring(pt: Point, xs: &[f64], ys: &[f64], params: &HitParams) -> bool {
    let n = xs.len().min(ys.len());
    let mut start = 0;
    for end in 0..=n {
        if end < n && !xs[end].is_nan() && !ys[end].is_nan() {
            continue;
        }
        if end > start {
            let ring = Ring {
                xs: &xs[start..end],
                ys: &ys[start..end],
            };
            if ring.hit_test_local(pt, params).is_some() {
                return true;
            }
        }
        start = end + 1;
    }
    false
}

/// Finite vertices of a screen path.
fn finite_vertices<'a>(xs: &'a [f64], ys: &'a [f64]) -> impl Iterator<Item = (f64, f64)> + 'a {
    xs.iter()
        .zip(ys)
        .map(|(&x, &y)| (x, y))
        .filter(|(x, y)| x.is_finite() && y.is_finite())
}

/// Hit with glyph provenance only.
fn glyph_hit(id: GlyphId, hit: bool) -> Selection {
    if hit {
        Selection::new().with_glyph(id)
    } else {
        Selection::new()
    }
}

#[derive(Clone, Copy, Debug)]
struct PatchKeys {
    x: PropertyKey<f64>,
    y: PropertyKey<f64>,
}

/// One polygon through every row. NaN rows separate rings.
pub struct Patch {
    id: GlyphId,
    props: PropertyStore,
    keys: PatchKeys,
    x: Vec<f64>,
    y: Vec<f64>,
    sx: Vec<f64>,
    sy: Vec<f64>,
    index: SpatialIndex,
}

impl Patch {
    /// Creates a patch glyph reading columns `x` and `y`.
    #[must_use]
    pub fn new() -> Self {
        let mut table = PropertyTable::new();
        let keys = PatchKeys {
            x: table.define("x", PropertyDef::field(PropertyKind::Coordinate, "x")),
            y: table.define("y", PropertyDef::field(PropertyKind::Coordinate, "y")),
        };
        Self {
            id: GlyphId::next(),
            props: table.instantiate(),
            keys,
            x: Vec::new(),
            y: Vec::new(),
            sx: Vec::new(),
            sy: Vec::new(),
            index: SpatialIndex::default(),
        }
    }
}

model_impls!(Patch);

impl fmt::Debug for Patch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Patch")
            .field("id", &self.id)
            .field("rows", &self.x.len())
            .finish_non_exhaustive()
    }
}

impl Glyph for Patch {
    fn id(&self) -> GlyphId {
        self.id
    }

    fn kind_name(&self) -> &'static str {
        "patch"
    }

    fn set_data(&mut self, source: &dyn ColumnSource, rows: &[usize]) {
        self.x = column(&self.props, self.keys.x, source, rows);
        self.y = column(&self.props, self.keys.y, source, rows);
        self.index = SpatialIndex::from_points(&self.x, &self.y);
    }

    fn map_data(&mut self, x: &dyn CoordinateMapper, y: &dyn CoordinateMapper) {
        self.sx = x.v_compute(&self.x);
        self.sy = y.v_compute(&self.y);
    }

    fn index(&self) -> &SpatialIndex {
        &self.index
    }

    fn hit_point(&self, geometry: &PointGeometry, ctx: &HitContext<'_>) -> Option<Selection> {
        let (x, y) = ctx.data_point(geometry.sx, geometry.sy);
        let hit = self.index.bbox().contains_point(x, y)
            && in_any_ring(
                Point::new(geometry.sx, geometry.sy),
                &self.sx,
                &self.sy,
                ctx.params,
            );
        Some(glyph_hit(self.id, hit))
    }
}

#[derive(Clone, Copy, Debug)]
struct PatchesKeys {
    xs: PropertyKey<Vec<f64>>,
    ys: PropertyKey<Vec<f64>>,
}

/// One polygon per row.
///
/// Rectangle and polygon queries select a row only when every finite vertex
/// lies inside the query.
pub struct Patches {
    id: GlyphId,
    props: PropertyStore,
    keys: PatchesKeys,
    xs: Vec<Vec<f64>>,
    ys: Vec<Vec<f64>>,
    sxs: Vec<Vec<f64>>,
    sys: Vec<Vec<f64>>,
    index: SpatialIndex,
}

impl Patches {
    /// Creates a patches glyph reading ragged columns `xs` and `ys`.
    #[must_use]
    pub fn new() -> Self {
        let mut table = PropertyTable::new();
        let keys = PatchesKeys {
            xs: table.define("xs", PropertyDef::field(PropertyKind::Coordinate, "xs")),
            ys: table.define("ys", PropertyDef::field(PropertyKind::Coordinate, "ys")),
        };
        Self {
            id: GlyphId::next(),
            props: table.instantiate(),
            keys,
            xs: Vec::new(),
            ys: Vec::new(),
            sxs: Vec::new(),
            sys: Vec::new(),
            index: SpatialIndex::default(),
        }
    }

    fn screen(&self, row: usize) -> (&[f64], &[f64]) {
        (
            self.sxs.get(row).map_or(&[][..], Vec::as_slice),
            self.sys.get(row).map_or(&[][..], Vec::as_slice),
        )
    }

    /// Candidate rows whose finite screen vertices all satisfy `inside`.
    fn enclosed(&self, bbox: Aabb2D<f64>, inside: impl Fn(f64, f64) -> bool) -> Vec<usize> {
        self.index
            .query_box(bbox)
            .into_iter()
            .filter(|&row| {
                let (sx, sy) = self.screen(row);
                finite_vertices(sx, sy).all(|(x, y)| inside(x, y))
            })
            .collect()
    }
}

model_impls!(Patches);

impl fmt::Debug for Patches {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Patches")
            .field("id", &self.id)
            .field("rows", &self.xs.len())
            .finish_non_exhaustive()
    }
}

impl Glyph for Patches {
    fn id(&self) -> GlyphId {
        self.id
    }

    fn kind_name(&self) -> &'static str {
        "patches"
    }

    fn set_data(&mut self, source: &dyn ColumnSource, rows: &[usize]) {
        self.xs = column(&self.props, self.keys.xs, source, rows);
        self.ys = column(&self.props, self.keys.ys, source, rows);
        self.index = SpatialIndex::build(
            self.xs
                .iter()
                .zip(&self.ys)
                .map(|(xs, ys)| path_bounds(xs, ys)),
        );
    }

    fn map_data(&mut self, x: &dyn CoordinateMapper, y: &dyn CoordinateMapper) {
        self.sxs = self.xs.iter().map(|xs| x.v_compute(xs)).collect();
        self.sys = self.ys.iter().map(|ys| y.v_compute(ys)).collect();
    }

    fn index(&self) -> &SpatialIndex {
        &self.index
    }

    fn hit_point(&self, geometry: &PointGeometry, ctx: &HitContext<'_>) -> Option<Selection> {
        let (x, y) = ctx.data_point(geometry.sx, geometry.sy);
        let pt = Point::new(geometry.sx, geometry.sy);
        let hits = self
            .index
            .query_point(x, y)
            .into_iter()
            .filter(|&row| {
                let (sx, sy) = self.screen(row);
                in_any_ring(pt, sx, sy, ctx.params)
            })
            .collect();
        Some(rows(hits))
    }

    fn hit_rect(&self, geometry: &RectGeometry, ctx: &HitContext<'_>) -> Option<Selection> {
        let bbox = ctx.data_box(geometry.sx0, geometry.sx1, geometry.sy0, geometry.sy1);
        Some(rows(self.enclosed(bbox, |x, y| geometry.contains(x, y))))
    }

    fn hit_poly(&self, geometry: &PolyGeometry, ctx: &HitContext<'_>) -> Option<Selection> {
        let (x0, y0, x1, y1) = geometry.bounds();
        let bbox = ctx.data_box(x0, x1, y0, y1);
        Some(rows(self.enclosed(bbox, |x, y| {
            point_in_poly(x, y, geometry.sx(), geometry.sy())
        })))
    }
}

/// A band between two curves sharing one coordinate.
///
/// For a vertical area the shared coordinate is `x` and the curves are
/// `y1` and `y2`; a horizontal area swaps the axes. The band's outline runs
/// along the first curve and back along the second.
#[derive(Debug, Default)]
struct Band {
    along: Vec<f64>,
    first: Vec<f64>,
    second: Vec<f64>,
    vertical: bool,
    ring_x: Vec<f64>,
    ring_y: Vec<f64>,
    index: SpatialIndex,
}

impl Band {
    fn new(along: Vec<f64>, first: Vec<f64>, second: Vec<f64>, vertical: bool) -> Self {
        let boxes = along.iter().zip(first.iter().zip(&second)).map(|(&a, (&p, &q))| {
            if vertical {
                Aabb2D::from_corners(a, p, a, q)
            } else {
                Aabb2D::from_corners(p, a, q, a)
            }
        });
        let index = SpatialIndex::build(boxes);
        Self {
            along,
            first,
            second,
            vertical,
            ring_x: Vec::new(),
            ring_y: Vec::new(),
            index,
        }
    }

    /// Screen outline: forward along `first`, backward along `second`.
    fn map(&mut self, x: &dyn CoordinateMapper, y: &dyn CoordinateMapper) {
        let (along, across) = if self.vertical { (x, y) } else { (y, x) };
        let sa = along.v_compute(&self.along);
        let s1 = across.v_compute(&self.first);
        let s2 = across.v_compute(&self.second);
        let outline_along: Vec<f64> = sa.iter().chain(sa.iter().rev()).copied().collect();
        let outline_across: Vec<f64> = s1.iter().chain(s2.iter().rev()).copied().collect();
        if self.vertical {
            self.ring_x = outline_along;
            self.ring_y = outline_across;
        } else {
            self.ring_x = outline_across;
            self.ring_y = outline_along;
        }
    }

    fn hit(&self, geometry: &PointGeometry, ctx: &HitContext<'_>) -> bool {
        let (x, y) = ctx.data_point(geometry.sx, geometry.sy);
        self.index.bbox().contains_point(x, y)
            && Ring {
                xs: &self.ring_x,
                ys: &self.ring_y,
            }
            .hit_test_local(Point::new(geometry.sx, geometry.sy), ctx.params)
            .is_some()
    }
}

macro_rules! band_glyph {
    (
        $ty:ident,
        $keys:ident,
        $name:literal,
        $along:ident,
        $first:ident,
        $second:ident,
        $vertical:literal
    ) => {
        #[derive(Clone, Copy, Debug)]
        struct $keys {
            $along: PropertyKey<f64>,
            $first: PropertyKey<f64>,
            $second: PropertyKey<f64>,
        }

        impl $ty {
            #[doc = concat!(
                "Creates an area glyph reading columns `",
                stringify!($along), "`, `", stringify!($first), "` and `",
                stringify!($second), "`."
            )]
            #[must_use]
            pub fn new() -> Self {
                let mut table = PropertyTable::new();
                let keys = $keys {
                    $along: table.define(
                        stringify!($along),
                        PropertyDef::field(PropertyKind::Coordinate, stringify!($along)),
                    ),
                    $first: table.define(
                        stringify!($first),
                        PropertyDef::field(PropertyKind::Coordinate, stringify!($first)),
                    ),
                    $second: table.define(
                        stringify!($second),
                        PropertyDef::field(PropertyKind::Coordinate, stringify!($second)),
                    ),
                };
                Self {
                    id: GlyphId::next(),
                    props: table.instantiate(),
                    keys,
                    band: Band::default(),
                }
            }
        }

        model_impls!($ty);

        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($ty))
                    .field("id", &self.id)
                    .field("rows", &self.band.along.len())
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
                let k = self.keys;
                self.band = Band::new(
                    column(&self.props, k.$along, source, rows),
                    column(&self.props, k.$first, source, rows),
                    column(&self.props, k.$second, source, rows),
                    $vertical,
                );
            }

            fn map_data(&mut self, x: &dyn CoordinateMapper, y: &dyn CoordinateMapper) {
                self.band.map(x, y);
            }

            fn index(&self) -> &SpatialIndex {
                &self.band.index
            }

            fn hit_point(
                &self,
                geometry: &PointGeometry,
                ctx: &HitContext<'_>,
            ) -> Option<Selection> {
                Some(glyph_hit(self.id, self.band.hit(geometry, ctx)))
            }
        }
    };
}

/// A vertical band: at each `x`, the span from `y1` to `y2`.
pub struct VArea {
    id: GlyphId,
    props: PropertyStore,
    keys: VAreaKeys,
    band: Band,
}

band_glyph!(VArea, VAreaKeys, "varea", x, y1, y2, true);

/// A horizontal band: at each `y`, the span from `x1` to `x2`.
pub struct HArea {
    id: GlyphId,
    props: PropertyStore,
    keys: HAreaKeys,
    band: Band,
}

band_glyph!(HArea, HAreaKeys, "harea", y, x1, x2, false);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;
    use crate::mapper::LinearMapper;
    use alloc::vec;
    use glyphscope_property::ColumnDataSource;

    fn mappers() -> (LinearMapper, LinearMapper) {
        (
            LinearMapper::new((0.0, 4.0), (0.0, 400.0)),
            LinearMapper::new((0.0, 4.0), (400.0, 0.0)),
        )
    }

    fn prepare(glyph: &mut dyn Glyph, source: &ColumnDataSource) {
        let (x, y) = mappers();
        let rows: Vec<usize> = (0..source.get_length().unwrap_or(0)).collect();
        glyph.set_data(source, &rows);
        glyph.map_data(&x, &y);
    }

    fn run(glyph: &dyn Glyph, geometry: Geometry) -> Option<Selection> {
        let (x, y) = mappers();
        let params = HitParams::default();
        glyph.hit_test(&geometry, &HitContext::new(&x, &y, &params))
    }

    #[test]
    fn patch_hit_is_glyph_level() {
        let source = ColumnDataSource::new()
            .with_column("x", vec![0.0, 2.0, 2.0, 0.0])
            .with_column("y", vec![0.0, 0.0, 2.0, 2.0]);
        let mut patch = Patch::new();
        prepare(&mut patch, &source);

        let hit = run(&patch, Geometry::point(100.0, 300.0)).unwrap();
        assert!(hit.indices().is_empty());
        assert_eq!(hit.selected_glyphs(), &[patch.id()]);
        assert!(!hit.is_empty());

        assert!(run(&patch, Geometry::point(300.0, 300.0)).unwrap().is_empty());
        assert!(run(&patch, Geometry::rect(0.0, 1.0, 0.0, 1.0)).is_none());
    }

    #[test]
    fn patch_nan_separates_rings() {
        let nan = f64::NAN;
        let source = ColumnDataSource::new()
            .with_column("x", vec![0.0, 1.0, 1.0, 0.0, nan, 2.0, 3.0, 3.0, 2.0])
            .with_column("y", vec![0.0, 0.0, 1.0, 1.0, nan, 2.0, 2.0, 3.0, 3.0]);
        let mut patch = Patch::new();
        prepare(&mut patch, &source);
        assert!(!run(&patch, Geometry::point(250.0, 150.0)).unwrap().is_empty());
        assert!(!run(&patch, Geometry::point(50.0, 350.0)).unwrap().is_empty());
        assert!(run(&patch, Geometry::point(150.0, 250.0)).unwrap().is_empty());
    }

    fn two_triangles() -> Patches {
        let source = ColumnDataSource::new()
            .with_column("xs", vec![vec![0.0, 1.0, 0.0], vec![2.0, 4.0, 2.0]])
            .with_column("ys", vec![vec![0.0, 0.0, 1.0], vec![2.0, 2.0, 4.0]]);
        let mut patches = Patches::new();
        prepare(&mut patches, &source);
        patches
    }

    #[test]
    fn patches_point_reports_rows() {
        let patches = two_triangles();
        let hit = run(&patches, Geometry::point(250.0, 150.0)).unwrap();
        assert_eq!(hit.indices(), &[1]);
        assert!(run(&patches, Geometry::point(350.0, 50.0)).unwrap().is_empty());
    }

    #[test]
    fn patches_rect_and_poly_need_every_vertex() {
        let patches = two_triangles();
        // Covers the first triangle and half of the second.
        let hit = run(&patches, Geometry::rect(-10.0, 310.0, 410.0, 90.0)).unwrap();
        assert_eq!(hit.indices(), &[0]);

        let lasso = Geometry::poly(
            vec![-10.0, 450.0, 450.0, -10.0],
            vec![410.0, 410.0, -10.0, -10.0],
        )
        .unwrap();
        assert_eq!(run(&patches, lasso).unwrap().indices(), &[0, 1]);
    }

    #[test]
    fn varea_band_contains_interior() {
        let source = ColumnDataSource::new()
            .with_column("x", vec![0.0, 1.0, 2.0])
            .with_column("y1", vec![0.0, 0.0, 0.0])
            .with_column("y2", vec![1.0, 2.0, 1.0]);
        let mut area = VArea::new();
        prepare(&mut area, &source);
        let hit = run(&area, Geometry::point(100.0, 250.0)).unwrap();
        assert_eq!(hit.selected_glyphs(), &[area.id()]);
        assert!(run(&area, Geometry::point(100.0, 150.0)).unwrap().is_empty());
    }

    #[test]
    fn harea_swaps_axes() {
        let source = ColumnDataSource::new()
            .with_column("y", vec![0.0, 1.0, 2.0])
            .with_column("x1", vec![0.0, 0.0, 0.0])
            .with_column("x2", vec![1.0, 2.0, 1.0]);
        let mut area = HArea::new();
        prepare(&mut area, &source);
        assert!(!run(&area, Geometry::point(150.0, 300.0)).unwrap().is_empty());
        assert!(run(&area, Geometry::point(250.0, 300.0)).unwrap().is_empty());
    }
}
