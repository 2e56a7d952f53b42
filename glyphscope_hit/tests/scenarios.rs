// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end hit testing through renderers and the selection manager.

use std::f64::consts::{FRAC_PI_2, TAU};
use std::rc::Rc;

use glyphscope_hit::glyphs::{AnnularWedge, Annulus, Circle, Line, Wedge};
use glyphscope_hit::{
    CdsView, CoordinateMapper, DataRendererView, Geometry, GlyphRenderer, LinearMapper, LogMapper,
    SelectionManager, SpanDirection,
};
use glyphscope_property::{ColumnDataSource, ColumnSource};

struct Rng(u64);

impl Rng {
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    /// Uniform in `[lo, hi)`.
    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        let unit = (self.next_u64() >> 11) as f64 / (1_u64 << 53) as f64;
        lo + unit * (hi - lo)
    }
}

/// 100 pixels per data unit over `[0, 4]`, y pointing down on screen.
fn mappers() -> (Rc<dyn CoordinateMapper>, Rc<dyn CoordinateMapper>) {
    (
        Rc::new(LinearMapper::new((0.0, 4.0), (0.0, 400.0))),
        Rc::new(LinearMapper::new((0.0, 4.0), (400.0, 0.0))),
    )
}

fn circles(radius: f64) -> (ColumnDataSource, GlyphRenderer) {
    let source = ColumnDataSource::new()
        .with_column("x", vec![0.0, 1.0, 2.0])
        .with_column("y", vec![0.0, 1.0, 2.0])
        .with_column("radius", vec![radius; 3]);
    let (x, y) = mappers();
    let renderer = GlyphRenderer::new(Circle::new(), &source, x, y);
    (source, renderer)
}

#[test]
fn circle_point_query_respects_radius() {
    let (source, renderer) = circles(0.5);
    let mut manager = SelectionManager::new(source.source_id());

    // Data (1, 1).
    assert!(manager.select(&[&renderer], &Geometry::point(100.0, 300.0), true, false), "hit");
    assert_eq!(manager.selected().indices(), &[1]);

    // Data (0.5, 0.5) is about 0.71 from both neighbors, beyond a 0.5 radius.
    assert!(!manager.select(&[&renderer], &Geometry::point(50.0, 350.0), true, false), "miss");
    assert!(manager.selected().indices().is_empty(), "replace clears on a miss");
}

#[test]
fn overlapping_radii_report_both_rows() {
    let (source, renderer) = circles(0.75);
    let mut manager = SelectionManager::new(source.source_id());
    manager.select(&[&renderer], &Geometry::point(50.0, 350.0), true, false);
    let mut rows = manager.selected().indices().to_vec();
    rows.sort_unstable();
    assert_eq!(rows, [0, 1]);
}

#[test]
fn line_span_skips_segments_touching_nan() {
    let source = ColumnDataSource::new()
        .with_column("x", vec![0.0, 1.0, 2.0, f64::NAN, 4.0])
        .with_column("y", vec![0.0, 1.0, 0.0, f64::NAN, 1.0]);
    let (x, y) = mappers();
    let renderer = GlyphRenderer::new(Line::new(), &source, x, y);

    // Data x = 0.5.
    let hit = renderer
        .hit_test(&Geometry::span(50.0, 0.0, SpanDirection::H))
        .expect("lines support span queries");
    assert_eq!(hit.line_indices(), &[0]);
    assert!(hit.indices().is_empty(), "line hits are segments, not rows");

    // Data x = 3.5 lies between rows 3 and 4, but row 3 is NaN.
    let hit = renderer
        .hit_test(&Geometry::span(350.0, 0.0, SpanDirection::H))
        .expect("lines support span queries");
    assert!(hit.line_indices().is_empty(), "no segment through a NaN row");
}

#[test]
fn filtered_line_reports_source_segment_starts() {
    let source = ColumnDataSource::new()
        .with_column("x", vec![0.0, 1.0, 2.0, 3.0, 4.0])
        .with_column("y", vec![0.0, 1.0, 0.0, 1.0, 0.0])
        .with_column("radius", vec![0.2; 5]);
    let (x, y) = mappers();
    let mut line = GlyphRenderer::new(Line::new(), &source, Rc::clone(&x), Rc::clone(&y));
    line.set_view(CdsView::filtered([1, 3, 4]), &source);
    let dots = GlyphRenderer::new(Circle::new(), &source, x, y);

    // Data x = 2 falls on the filtered path's first segment, rows 1 to 3.
    let sweep = Geometry::span(200.0, 0.0, SpanDirection::H);
    let hit = line.hit_test(&sweep).expect("lines support span queries");
    assert_eq!(hit.line_indices(), &[1]);
    assert!(hit.indices().is_empty());

    // The sweep also crosses the circle of row 2; the line adds no rows.
    let mut manager = SelectionManager::new(source.source_id());
    assert!(manager.select(&[&line, &dots], &sweep, true, false));
    assert_eq!(manager.selected().indices(), &[2]);
    assert_eq!(manager.selected().line_indices(), &[1]);
}

/// A base-10 log x axis at 100 pixels per decade over `[1, 10^4]` and a
/// linear y axis.
fn log_x_mappers() -> (Rc<dyn CoordinateMapper>, Rc<dyn CoordinateMapper>) {
    (
        Rc::new(LogMapper::new((1.0, 10_000.0), (0.0, 400.0))),
        Rc::new(LinearMapper::new((0.0, 4.0), (400.0, 0.0))),
    )
}

fn hit_rows(renderer: &GlyphRenderer, sx: f64, sy: f64) -> Vec<usize> {
    renderer
        .hit_test(&Geometry::point(sx, sy))
        .expect("point queries are supported")
        .indices()
        .to_vec()
}

#[test]
fn log_axis_circles_measure_radius_at_each_row() {
    // Both radii are 10 data units. At x = 10 that spans about 30 pixels,
    // at x = 1000 less than half a pixel.
    let source = ColumnDataSource::new()
        .with_column("x", vec![10.0, 1000.0])
        .with_column("y", vec![1.0, 1.0])
        .with_column("radius", vec![10.0, 10.0]);
    let (x, y) = log_x_mappers();
    let renderer = GlyphRenderer::new(Circle::new(), &source, x, y);

    assert_eq!(hit_rows(&renderer, 120.0, 300.0), [0]);
    assert_eq!(hit_rows(&renderer, 300.3, 300.0), [1]);
    assert!(hit_rows(&renderer, 320.0, 300.0).is_empty(), "row 1 is tiny");
    assert!(hit_rows(&renderer, 300.0, 310.0).is_empty());
}

#[test]
fn log_axis_sectors_measure_bounds_at_each_row() {
    // Inner radius 5 and outer radius 10: about 17.6 to 30.1 pixels at
    // x = 10, and 0.22 to 0.43 pixels at x = 1000.
    let source = ColumnDataSource::new()
        .with_column("x", vec![10.0, 1000.0])
        .with_column("y", vec![1.0, 1.0])
        .with_column("inner_radius", vec![5.0, 5.0])
        .with_column("outer_radius", vec![10.0, 10.0])
        .with_column("radius", vec![10.0, 10.0])
        .with_column("start_angle", vec![0.0, 0.0])
        .with_column("end_angle", vec![FRAC_PI_2, FRAC_PI_2]);
    let (x, y) = log_x_mappers();

    let rings = GlyphRenderer::new(Annulus::new(), &source, Rc::clone(&x), Rc::clone(&y));
    assert_eq!(hit_rows(&rings, 125.0, 300.0), [0]);
    assert!(hit_rows(&rings, 110.0, 300.0).is_empty(), "inside the hole");
    assert_eq!(hit_rows(&rings, 300.3, 300.0), [1]);
    assert!(hit_rows(&rings, 325.0, 300.0).is_empty(), "beyond row 1");

    // Quarter pies opening up and to the right.
    let pies = GlyphRenderer::new(Wedge::new(), &source, Rc::clone(&x), Rc::clone(&y));
    let slices = GlyphRenderer::new(AnnularWedge::new(), &source, x, y);
    for sectors in [&pies, &slices] {
        assert_eq!(hit_rows(sectors, 114.0, 286.0), [0]);
        assert!(hit_rows(sectors, 114.0, 314.0).is_empty(), "outside the angle");
        assert_eq!(hit_rows(sectors, 300.2, 299.8), [1]);
        assert!(hit_rows(sectors, 314.0, 286.0).is_empty(), "beyond row 1");
    }
    assert_eq!(hit_rows(&pies, 107.0, 293.0), [0]);
    assert!(hit_rows(&slices, 107.0, 293.0).is_empty(), "inside the hole");
}

#[test]
fn full_turn_wedge_accepts_every_angle() {
    let source = ColumnDataSource::new()
        .with_column("x", vec![2.0])
        .with_column("y", vec![2.0])
        .with_column("radius", vec![1.0])
        .with_column("start_angle", vec![0.0])
        .with_column("end_angle", vec![TAU]);
    let (x, y) = mappers();
    let renderer = GlyphRenderer::new(Wedge::new(), &source, x, y);

    let mut angles: Vec<f64> = (0..64).map(|k| f64::from(k) / 64.0 * TAU).collect();
    angles.extend([0.0, TAU - 1e-9, TAU - f64::EPSILON]);
    for theta in angles {
        let (sin, cos) = theta.sin_cos();
        let geometry = Geometry::point(200.0 + 50.0 * cos, 200.0 - 50.0 * sin);
        let hit = renderer.hit_test(&geometry).expect("wedges support point queries");
        assert_eq!(hit.indices(), &[0], "angle {theta} missed");
    }
}

#[test]
fn repeated_selects_are_idempotent() {
    let (source, renderer) = circles(0.5);
    let mut manager = SelectionManager::new(source.source_id());
    let rect = Geometry::rect(-10.0, 150.0, 410.0, 250.0);

    manager.select(&[&renderer], &rect, true, false);
    let first = manager.selected().indices().to_vec();
    assert_eq!(first, [0, 1]);
    manager.select(&[&renderer], &rect, true, false);
    assert_eq!(manager.selected().indices(), first.as_slice(), "replace");

    let revision = manager.selected().revision();
    manager.select(&[&renderer], &rect, true, true);
    manager.select(&[&renderer], &rect, true, true);
    assert_eq!(manager.selected().indices(), first.as_slice(), "append");
    assert_eq!(manager.selected().revision(), revision, "no change, no new revision");
}

#[test]
fn filtered_views_select_source_rows() {
    let source = ColumnDataSource::new()
        .with_column("x", vec![0.5, 1.5, 2.5, 3.5])
        .with_column("y", vec![0.5, 0.5, 0.5, 0.5])
        .with_column("radius", vec![0.2; 4]);
    let (x, y) = mappers();
    let mut odd = GlyphRenderer::new(Circle::new(), &source, Rc::clone(&x), Rc::clone(&y));
    odd.set_view(CdsView::filtered([1, 3]), &source);
    let mut even = GlyphRenderer::new(Circle::new(), &source, x, y);
    even.set_view(CdsView::filtered([0, 2]), &source);

    let mut manager = SelectionManager::new(source.source_id());
    let band = Geometry::rect(0.0, 400.0, 300.0, 400.0);
    manager.select(&[&odd, &even], &band, true, false);
    assert_eq!(manager.selected().indices(), &[1, 3, 0, 2]);
}

#[test]
fn hover_is_tracked_per_view() {
    let (source, first) = circles(0.5);
    let (x, y) = mappers();
    let second = GlyphRenderer::new(Circle::new(), &source, x, y);
    let mut manager = SelectionManager::new(source.source_id());

    let views: [&dyn DataRendererView; 2] = [&first, &second];
    assert!(manager.inspect(&views, &Geometry::point(200.0, 200.0)), "hover hit");
    assert!(manager.inspect(&views, &Geometry::point(0.0, 400.0)), "hover moved");

    for view in views {
        let hover = manager.inspection(view.view_id()).expect("inspected");
        assert_eq!(hover.indices(), &[0], "last pointer position wins");
        assert_eq!(hover.view(), Some(view.view_id()));
    }
    assert!(manager.selected().is_empty(), "hover never commits");
}

#[test]
fn rows_with_nan_never_hit() {
    let source = ColumnDataSource::new()
        .with_column("x", vec![1.0, f64::NAN, 3.0])
        .with_column("y", vec![1.0, 2.0, f64::NAN])
        .with_column("radius", vec![0.5; 3]);
    let (x, y) = mappers();
    let renderer = GlyphRenderer::new(Circle::new(), &source, x, y);
    let everything = Geometry::rect(-1e6, 1e6, -1e6, 1e6);
    let hit = renderer.hit_test(&everything).expect("circles support rect queries");
    assert_eq!(hit.indices(), &[0]);
}

#[test]
fn mappers_round_trip() {
    let mut rng = Rng(0x2545_f491_4f6c_dd1d);
    let linear = LinearMapper::new((-3.0, 7.0), (640.0, 20.0));
    let log = LogMapper::new((0.1, 1000.0), (0.0, 500.0));
    for _ in 0..500 {
        let v = rng.range(-100.0, 100.0);
        let back = linear.invert(linear.compute(v));
        assert!((back - v).abs() <= 1e-9 * v.abs().max(1.0), "linear {v} -> {back}");

        let p = rng.range(1e-3, 1e4);
        let back = log.invert(log.compute(p));
        assert!((back - p).abs() <= 1e-9 * p, "log {p} -> {back}");
    }
}
