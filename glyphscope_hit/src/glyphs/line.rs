// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polylines, single and multiple.
//!
//! A line hit reports segments by the row they start at. A pointer hit keeps
//! only the nearest segment within the stroke threshold; a sweep reports
//! every segment whose coordinate range contains the swept value.

use alloc::vec::Vec;
use core::fmt;

use glyphscope_index::{Aabb2D, SpatialIndex};
use glyphscope_property::{
    ColumnSource, HasProps, PropertyDef, PropertyKey, PropertyKind, PropertyStore, PropertyTable,
};
use glyphscope_selection::{GlyphId, Selection};
use kurbo::Point;

use crate::geometry::{PointGeometry, SpanDirection, SpanGeometry};
use crate::glyph::{Glyph, HitContext, XyData, column, max_finite};
use crate::mapper::CoordinateMapper;
use crate::math::between;
use crate::precise::{HitParams, PreciseHitTest, StrokedSegment};

/// Nearest segment of a screen polyline strictly within its threshold.
fn nearest_segment(
    sx: &[f64],
    sy: &[f64],
    candidates: impl IntoIterator<Item = usize>,
    line_width: f64,
    pt: Point,
    params: &HitParams,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for i in candidates {
        let (Some(&x1), Some(&y1)) = (sx.get(i + 1), sy.get(i + 1)) else {
            continue;
        };
        let seg = StrokedSegment::with_width(
            kurbo::Line::new((sx[i], sy[i]), (x1, y1)),
            line_width,
            params,
        );
        if let Some(score) = seg.hit_test_local(pt, params)
            && best.is_none_or(|(_, d)| score.distance < d)
        {
            best = Some((i, score.distance));
        }
    }
    best.map(|(i, _)| i)
}

/// Segments whose coordinate range along the sweep axis contains `value`.
fn crossing_segments(
    values: &[f64],
    candidates: impl IntoIterator<Item = usize>,
    value: f64,
) -> Vec<usize> {
    candidates
        .into_iter()
        .filter(|&i| {
            values
                .get(i + 1)
                .is_some_and(|&next| between(value, values[i], next))
        })
        .collect()
}

/// The data value a sweep fixes, and the band it spans in data space.
fn sweep(geometry: &SpanGeometry, ctx: &HitContext<'_>, all: Aabb2D<f64>) -> (f64, Aabb2D<f64>) {
    match geometry.direction {
        SpanDirection::H => {
            let x = ctx.x.invert(geometry.sx);
            (x, Aabb2D::from_corners(x, all.min_y, x, all.max_y))
        }
        SpanDirection::V => {
            let y = ctx.y.invert(geometry.sy);
            (y, Aabb2D::from_corners(all.min_x, y, all.max_x, y))
        }
    }
}

/// Threshold used to grow pointer queries for a given stroke width.
fn reach(line_width: f64, params: &HitParams) -> f64 {
    params.min_line_threshold.max(line_width / 2.0)
}

#[derive(Clone, Copy, Debug)]
struct LineKeys {
    x: PropertyKey<f64>,
    y: PropertyKey<f64>,
    line_width: PropertyKey<f64>,
}

/// A single polyline through every row.
///
/// Row `i` of the index is the segment from row `i` to row `i + 1`; the
/// last row has no segment. A NaN coordinate breaks the line.
///
/// Hits name segments by their start row in `line_indices` and leave
/// `indices` empty: the line is one mark, so a hit must not highlight the
/// start row in other glyphs sharing the source.
pub struct Line {
    id: GlyphId,
    props: PropertyStore,
    keys: LineKeys,
    xy: XyData,
    line_width: f64,
    index: SpatialIndex,
}

impl Line {
    /// Creates a line glyph reading columns `x` and `y`, one pixel wide.
    #[must_use]
    pub fn new() -> Self {
        let mut table = PropertyTable::new();
        let keys = LineKeys {
            x: table.define("x", PropertyDef::field(PropertyKind::Coordinate, "x")),
            y: table.define("y", PropertyDef::field(PropertyKind::Coordinate, "y")),
            line_width: table.define("line_width", PropertyDef::value(PropertyKind::Size, 1.0)),
        };
        Self {
            id: GlyphId::next(),
            props: table.instantiate(),
            keys,
            xy: XyData::default(),
            line_width: 1.0,
            index: SpatialIndex::default(),
        }
    }

    fn hit(&self, segments: Vec<usize>) -> Selection {
        let mut result = Selection::new().with_line_indices(segments.iter().copied());
        if !segments.is_empty() {
            result.add_to_selected_glyphs(self.id);
        }
        result
    }
}

model_impls!(Line);

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Line")
            .field("id", &self.id)
            .field("rows", &self.xy.len())
            .field("line_width", &self.line_width)
            .finish_non_exhaustive()
    }
}

impl Glyph for Line {
    fn id(&self) -> GlyphId {
        self.id
    }

    fn kind_name(&self) -> &'static str {
        "line"
    }

    fn set_data(&mut self, source: &dyn ColumnSource, rows: &[usize]) {
        let k = self.keys;
        self.xy = XyData::new(
            column(&self.props, k.x, source, rows),
            column(&self.props, k.y, source, rows),
        );
        self.line_width = max_finite(&column(&self.props, k.line_width, source, rows));
        let (x, y) = (&self.xy.x, &self.xy.y);
        let n = self.xy.len();
        self.index = SpatialIndex::build((0..n).map(|i| {
            if i + 1 < n {
                Aabb2D::from_corners(x[i], y[i], x[i + 1], y[i + 1])
            } else {
                Aabb2D::EMPTY
            }
        }));
    }

    fn map_data(&mut self, x: &dyn CoordinateMapper, y: &dyn CoordinateMapper) {
        self.xy.map(x, y);
    }

    fn index(&self) -> &SpatialIndex {
        &self.index
    }

    fn hit_point(&self, geometry: &PointGeometry, ctx: &HitContext<'_>) -> Option<Selection> {
        let margin = reach(self.line_width, ctx.params);
        let bbox = ctx.data_box_around(geometry.sx, geometry.sy, margin);
        let nearest = nearest_segment(
            &self.xy.sx,
            &self.xy.sy,
            self.index.query_box(bbox),
            self.line_width,
            Point::new(geometry.sx, geometry.sy),
            ctx.params,
        );
        Some(self.hit(nearest.into_iter().collect()))
    }

    fn hit_span(&self, geometry: &SpanGeometry, ctx: &HitContext<'_>) -> Option<Selection> {
        let (value, band) = sweep(geometry, ctx, self.index.bbox());
        let values = match geometry.direction {
            SpanDirection::H => &self.xy.x,
            SpanDirection::V => &self.xy.y,
        };
        let hits = crossing_segments(values, self.index.query_box(band), value);
        Some(self.hit(hits))
    }
}

#[derive(Clone, Copy, Debug)]
struct MultiLineKeys {
    xs: PropertyKey<Vec<f64>>,
    ys: PropertyKey<Vec<f64>>,
    line_width: PropertyKey<f64>,
}

/// One polyline per row.
///
/// The index holds the extent of each row's finite vertices. Hits list the
/// rows in `indices` and their segments in `multiline_indices`.
pub struct MultiLine {
    id: GlyphId,
    props: PropertyStore,
    keys: MultiLineKeys,
    xs: Vec<Vec<f64>>,
    ys: Vec<Vec<f64>>,
    sxs: Vec<Vec<f64>>,
    sys: Vec<Vec<f64>>,
    line_widths: Vec<f64>,
    index: SpatialIndex,
}

impl MultiLine {
    /// Creates a multi-line glyph reading ragged columns `xs` and `ys`, one
    /// pixel wide.
    #[must_use]
    pub fn new() -> Self {
        let mut table = PropertyTable::new();
        let keys = MultiLineKeys {
            xs: table.define("xs", PropertyDef::field(PropertyKind::Coordinate, "xs")),
            ys: table.define("ys", PropertyDef::field(PropertyKind::Coordinate, "ys")),
            line_width: table.define("line_width", PropertyDef::value(PropertyKind::Size, 1.0)),
        };
        Self {
            id: GlyphId::next(),
            props: table.instantiate(),
            keys,
            xs: Vec::new(),
            ys: Vec::new(),
            sxs: Vec::new(),
            sys: Vec::new(),
            line_widths: Vec::new(),
            index: SpatialIndex::default(),
        }
    }

    fn line_width(&self, row: usize) -> f64 {
        self.line_widths.get(row).copied().unwrap_or(1.0)
    }

    fn hit(&self, hits: Vec<(usize, Vec<usize>)>) -> Selection {
        let mut result = Selection::new().with_indices(hits.iter().map(|(row, _)| *row));
        for (row, segments) in hits {
            result = result.with_multiline(row, segments);
        }
        if !result.indices().is_empty() {
            result.add_to_selected_glyphs(self.id);
        }
        result
    }
}

/// Extent of the finite vertices of a path.
pub(crate) fn path_bounds(xs: &[f64], ys: &[f64]) -> Aabb2D<f64> {
    xs.iter()
        .zip(ys)
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .fold(Aabb2D::EMPTY, |acc, (&x, &y)| {
            acc.union(Aabb2D::from_point(x, y))
        })
}

model_impls!(MultiLine);

impl fmt::Debug for MultiLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiLine")
            .field("id", &self.id)
            .field("rows", &self.xs.len())
            .finish_non_exhaustive()
    }
}

impl Glyph for MultiLine {
    fn id(&self) -> GlyphId {
        self.id
    }

    fn kind_name(&self) -> &'static str {
        "multi_line"
    }

    fn set_data(&mut self, source: &dyn ColumnSource, rows: &[usize]) {
        let k = self.keys;
        self.xs = column(&self.props, k.xs, source, rows);
        self.ys = column(&self.props, k.ys, source, rows);
        self.line_widths = column(&self.props, k.line_width, source, rows);
        self.sxs.clear();
        self.sys.clear();
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
        let margin = reach(max_finite(&self.line_widths), ctx.params);
        let bbox = ctx.data_box_around(geometry.sx, geometry.sy, margin);
        let pt = Point::new(geometry.sx, geometry.sy);
        let hits = self
            .index
            .query_box(bbox)
            .into_iter()
            .filter_map(|row| {
                let (sx, sy) = (self.sxs.get(row)?, self.sys.get(row)?);
                let n = sx.len().min(sy.len());
                let nearest = nearest_segment(
                    sx,
                    sy,
                    0..n.saturating_sub(1),
                    self.line_width(row),
                    pt,
                    ctx.params,
                )?;
                Some((row, alloc::vec![nearest]))
            })
            .collect();
        Some(self.hit(hits))
    }

    fn hit_span(&self, geometry: &SpanGeometry, ctx: &HitContext<'_>) -> Option<Selection> {
        let (value, band) = sweep(geometry, ctx, self.index.bbox());
        let hits = self
            .index
            .query_box(band)
            .into_iter()
            .filter_map(|row| {
                let values = match geometry.direction {
                    SpanDirection::H => &self.xs[row],
                    SpanDirection::V => &self.ys[row],
                };
                let segments = crossing_segments(values, 0..values.len(), value);
                (!segments.is_empty()).then_some((row, segments))
            })
            .collect();
        Some(self.hit(hits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Geometry;
    use crate::mapper::LinearMapper;
    use alloc::vec;
    use glyphscope_property::{ColumnDataSource, HasPropsExt, PropertySpec};

    fn mappers() -> (LinearMapper, LinearMapper) {
        (
            LinearMapper::new((0.0, 4.0), (0.0, 400.0)),
            LinearMapper::new((0.0, 4.0), (400.0, 0.0)),
        )
    }

    fn run(glyph: &dyn Glyph, geometry: Geometry) -> Selection {
        let (x, y) = mappers();
        let params = HitParams::default();
        glyph
            .hit_test(&geometry, &HitContext::new(&x, &y, &params))
            .unwrap_or_default()
    }

    fn line_with_width(width: f64) -> Line {
        let source = ColumnDataSource::new()
            .with_column("x", vec![0.0, 1.0, 2.0, f64::NAN, 4.0])
            .with_column("y", vec![0.0, 1.0, 0.0, f64::NAN, 1.0]);
        let (x, y) = mappers();
        let mut line = Line::new();
        line.set_spec("line_width", PropertySpec::value(width)).unwrap();
        line.set_data(&source, &[0, 1, 2, 3, 4]);
        line.map_data(&x, &y);
        line
    }

    fn broken_line() -> Line {
        line_with_width(1.0)
    }

    #[test]
    fn span_reports_segment_starts() {
        let line = broken_line();
        let v = run(&line, Geometry::span(0.0, 350.0, SpanDirection::V));
        assert_eq!(v.line_indices(), &[0, 1]);
        assert!(v.indices().is_empty(), "segments are not rows");
        assert_eq!(v.selected_glyphs(), &[line.id()]);

        let h = run(&line, Geometry::span(50.0, 0.0, SpanDirection::H));
        assert_eq!(h.line_indices(), &[0]);

        let past_gap = run(&line, Geometry::span(0.0, 380.0, SpanDirection::V));
        assert!(!past_gap.line_indices().contains(&2));
        assert!(!past_gap.line_indices().contains(&3));
    }

    #[test]
    fn point_keeps_the_nearest_segment() {
        let line = broken_line();
        // Screen (100, 300) is the shared vertex of segments 0 and 1; just
        // left of it, segment 0 is closer.
        let hit = run(&line, Geometry::point(99.0, 301.5));
        assert_eq!(hit.line_indices(), &[0]);

        let miss = run(&line, Geometry::point(50.0, 320.0));
        assert!(miss.is_empty());
    }

    #[test]
    fn wide_lines_are_easier_to_hit() {
        let line = line_with_width(20.0);
        // Segment 0 runs from (0, 400) to (100, 300); this point is about
        // 7 pixels off it.
        let hit = run(&line, Geometry::point(50.0, 340.0));
        assert_eq!(hit.line_indices(), &[0]);
    }

    #[test]
    fn rect_is_unsupported() {
        let line = broken_line();
        let (x, y) = mappers();
        let params = HitParams::default();
        let ctx = HitContext::new(&x, &y, &params);
        assert!(line.hit_test(&Geometry::rect(0.0, 10.0, 0.0, 10.0), &ctx).is_none());
    }

    fn two_paths() -> MultiLine {
        let source = ColumnDataSource::new()
            .with_column("xs", vec![vec![0.0, 1.0, 2.0], vec![0.0, 2.0]])
            .with_column("ys", vec![vec![0.0, 2.0, 0.0], vec![3.0, 3.0]]);
        let (x, y) = mappers();
        let mut lines = MultiLine::new();
        lines.set_data(&source, &[0, 1]);
        lines.map_data(&x, &y);
        lines
    }

    #[test]
    fn multi_line_point_hits_per_row() {
        let lines = two_paths();
        // On the second segment of the first path: data (1.5, 1.0).
        let hit = run(&lines, Geometry::point(150.0, 300.0));
        assert_eq!(hit.indices(), &[0]);
        assert_eq!(hit.multiline_indices().get(&0), Some(&vec![1]));

        let hit = run(&lines, Geometry::point(100.0, 101.0));
        assert_eq!(hit.indices(), &[1]);
        assert_eq!(hit.multiline_indices().get(&1), Some(&vec![0]));
    }

    #[test]
    fn multi_line_span_lists_every_crossing() {
        let lines = two_paths();
        let hit = run(&lines, Geometry::span(0.0, 300.0, SpanDirection::V));
        assert_eq!(hit.indices(), &[0]);
        assert_eq!(hit.multiline_indices().get(&0), Some(&vec![0, 1]));

        let hit = run(&lines, Geometry::span(150.0, 0.0, SpanDirection::H));
        assert_eq!(hit.indices(), &[0, 1]);
        assert_eq!(hit.multiline_indices().get(&0), Some(&vec![1]));
        assert_eq!(hit.multiline_indices().get(&1), Some(&vec![0]));
    }
}
