// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Exact per-row hit predicates.
//!
//! Every glyph family narrows its candidates through the spatial index first
//! and then asks one of these primitives about each survivor. Primitives work
//! in local screen coordinates: the caller translates the query point so that
//! the primitive's own frame applies.

use core::f64::consts::TAU;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Line, Point, Vec2};

use crate::math::{angle_between, dist_to_segment, in_rect_axis_aligned, in_rect_rotated};

/// Tuning knobs shared by all hit tests.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitParams {
    /// Smallest distance, in pixels, at which a path segment still counts as
    /// hit. Thin lines use this instead of half their width.
    pub min_line_threshold: f64,
    /// Multiplier applied to radial hit radii.
    pub hit_dilation: f64,
    /// Extra pixels added to every filled primitive.
    pub tolerance: f64,
}

impl Default for HitParams {
    fn default() -> Self {
        Self {
            min_line_threshold: 2.0,
            hit_dilation: 1.0,
            tolerance: 0.0,
        }
    }
}

/// Which part of a shape was hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HitKind {
    /// The interior.
    Fill,
    /// The outline or centerline.
    Stroke,
}

/// Result of a successful precise hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitScore {
    /// Distance from the query point to the shape's reference point or line.
    /// Smaller is better when ranking several hits.
    pub distance: f64,
    /// What was hit.
    pub kind: HitKind,
}

/// A shape that can answer whether a local point hits it.
pub trait PreciseHitTest {
    /// Tests `pt`, given in the shape's local coordinates.
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore>;
}

/// A filled circle.
#[derive(Clone, Copy, Debug)]
pub struct Disk {
    /// Center.
    pub center: Point,
    /// Radius in pixels, before dilation.
    pub radius: f64,
}

impl PreciseHitTest for Disk {
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore> {
        let r = self.radius * params.hit_dilation + params.tolerance;
        let d2 = (pt - self.center).hypot2();
        (d2 <= r * r).then(|| HitScore {
            distance: d2.sqrt(),
            kind: HitKind::Fill,
        })
    }
}

/// A ring sector: the part of an annulus between two angles.
///
/// Angles follow the mathematical convention, counter-clockwise with the
/// vertical axis pointing up. The local frame is screen space, with the
/// vertical axis pointing down, so the query angle is negated before the
/// comparison. A sector spanning at least a full turn accepts every angle.
#[derive(Clone, Copy, Debug)]
pub struct AnnularSector {
    /// Center.
    pub center: Point,
    /// Inner radius in pixels; zero for a plain wedge.
    pub inner_radius: f64,
    /// Outer radius in pixels.
    pub outer_radius: f64,
    /// Start angle in radians.
    pub start_angle: f64,
    /// End angle in radians.
    pub end_angle: f64,
    /// Walk from start to end counter-clockwise.
    pub anticlock: bool,
}

impl AnnularSector {
    /// A full ring.
    #[must_use]
    pub fn annulus(center: Point, inner_radius: f64, outer_radius: f64) -> Self {
        Self {
            center,
            inner_radius,
            outer_radius,
            start_angle: 0.0,
            end_angle: TAU,
            anticlock: true,
        }
    }

    /// Returns `true` if the sector spans at least one full turn.
    #[must_use]
    pub fn is_full(&self) -> bool {
        (self.end_angle - self.start_angle).abs() >= TAU
    }
}

impl PreciseHitTest for AnnularSector {
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore> {
        if !(self.start_angle.is_finite() && self.end_angle.is_finite()) {
            return None;
        }
        let d = pt - self.center;
        let d2 = d.hypot2();
        let outer = self.outer_radius * params.hit_dilation + params.tolerance;
        let inner = (self.inner_radius * params.hit_dilation - params.tolerance).max(0.0);
        if d2 > outer * outer || d2 < inner * inner {
            return None;
        }
        let angle = -d.y.atan2(d.x);
        let on_arc = self.is_full()
            || angle_between(angle, self.start_angle, self.end_angle, self.anticlock);
        on_arc.then(|| HitScore {
            distance: d2.sqrt(),
            kind: HitKind::Fill,
        })
    }
}

/// A filled rectangle, possibly rotated about a pivot.
///
/// The pivot is usually the box center. Boxes whose screen extent is not
/// centered on the projected anchor, such as data-sized boxes on a log axis,
/// carry the box center as `offset` from the pivot in the unrotated frame.
#[derive(Clone, Copy, Debug)]
pub struct OrientedRect {
    /// Rotation pivot.
    pub pivot: Point,
    /// Box center relative to the pivot, before rotation.
    pub offset: Vec2,
    /// Half of the unrotated width.
    pub half_width: f64,
    /// Half of the unrotated height.
    pub half_height: f64,
    /// Rotation in screen space, in radians.
    pub angle: f64,
}

impl OrientedRect {
    /// A rectangle rotated about its own center.
    #[must_use]
    pub const fn centered(center: Point, half_width: f64, half_height: f64, angle: f64) -> Self {
        Self {
            pivot: center,
            offset: Vec2::ZERO,
            half_width,
            half_height,
            angle,
        }
    }

    /// The box center after rotation.
    #[must_use]
    pub fn center(&self) -> Point {
        if self.angle == 0.0 {
            return self.pivot + self.offset;
        }
        let (s, c) = self.angle.sin_cos();
        let Vec2 { x, y } = self.offset;
        self.pivot + Vec2::new(x * c - y * s, x * s + y * c)
    }

    /// Largest distance from the pivot to any point of the box.
    #[must_use]
    pub fn reach(&self) -> f64 {
        (self.offset.x.abs() + self.half_width).hypot(self.offset.y.abs() + self.half_height)
    }
}

impl PreciseHitTest for OrientedRect {
    fn hit_test_local(&self, pt: Point, params: &HitParams) -> Option<HitScore> {
        let d = pt - self.center();
        let hw = self.half_width + params.tolerance;
        let hh = self.half_height + params.tolerance;
        let inside = if self.angle == 0.0 {
            in_rect_axis_aligned(d.x, d.y, hw, hh)
        } else {
            in_rect_rotated(d.x, d.y, hw, hh, self.angle)
        };
        inside.then(|| HitScore {
            distance: d.hypot(),
            kind: HitKind::Fill,
        })
    }
}

/// A straight path segment hit within a distance threshold.
///
/// The segment counts as hit when the query point is strictly closer than
/// `threshold`. Joins and caps are not modeled.
#[derive(Clone, Copy, Debug)]
pub struct StrokedSegment {
    /// The centerline.
    pub line: Line,
    /// Hit distance in pixels.
    pub threshold: f64,
}

impl StrokedSegment {
    /// A segment hit at half its stroke width, but never closer than
    /// [`HitParams::min_line_threshold`].
    #[must_use]
    pub fn with_width(line: Line, line_width: f64, params: &HitParams) -> Self {
        Self {
            line,
            threshold: params.min_line_threshold.max(line_width / 2.0),
        }
    }
}

impl PreciseHitTest for StrokedSegment {
    fn hit_test_local(&self, pt: Point, _params: &HitParams) -> Option<HitScore> {
        let dist = dist_to_segment(pt, self.line.p0, self.line.p1);
        (dist < self.threshold).then_some(HitScore {
            distance: dist,
            kind: HitKind::Stroke,
        })
    }
}

/// A closed polygon, filled with the even-odd rule.
#[derive(Clone, Copy, Debug)]
pub struct Ring<'a> {
    /// Vertex x coordinates.
    pub xs: &'a [f64],
    /// Vertex y coordinates.
    pub ys: &'a [f64],
}

impl PreciseHitTest for Ring<'_> {
    fn hit_test_local(&self, pt: Point, _params: &HitParams) -> Option<HitScore> {
        crate::math::point_in_poly(pt.x, pt.y, self.xs, self.ys).then_some(HitScore {
            distance: 0.0,
            kind: HitKind::Fill,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn disk_edge_is_inclusive() {
        let disk = Disk {
            center: Point::new(10.0, 10.0),
            radius: 5.0,
        };
        let params = HitParams::default();
        assert!(disk.hit_test_local(Point::new(15.0, 10.0), &params).is_some());
        assert!(disk.hit_test_local(Point::new(15.1, 10.0), &params).is_none());
        let dilated = HitParams {
            hit_dilation: 1.1,
            ..params
        };
        assert!(disk.hit_test_local(Point::new(15.1, 10.0), &dilated).is_some());
    }

    #[test]
    fn sector_negates_screen_angle() {
        // Upper-right quadrant in data convention: screen y is negative there.
        let sector = AnnularSector {
            center: Point::ZERO,
            inner_radius: 0.0,
            outer_radius: 10.0,
            start_angle: 0.0,
            end_angle: FRAC_PI_2,
            anticlock: true,
        };
        let params = HitParams::default();
        assert!(sector.hit_test_local(Point::new(3.0, -3.0), &params).is_some());
        assert!(sector.hit_test_local(Point::new(3.0, 3.0), &params).is_none());
        let clockwise = AnnularSector {
            anticlock: false,
            ..sector
        };
        assert!(clockwise.hit_test_local(Point::new(3.0, 3.0), &params).is_some());
    }

    #[test]
    fn full_sector_accepts_every_angle() {
        let sector = AnnularSector {
            center: Point::ZERO,
            inner_radius: 0.0,
            outer_radius: 1.0,
            start_angle: 0.0,
            end_angle: 2.0 * PI,
            anticlock: true,
        };
        let params = HitParams::default();
        for k in 0..64 {
            let a = f64::from(k) / 64.0 * TAU;
            let pt = Point::new(0.5 * a.cos(), -0.5 * a.sin());
            assert!(sector.hit_test_local(pt, &params).is_some(), "{a}");
        }
        let almost = TAU - 1e-9;
        let pt = Point::new(0.5 * almost.cos(), -0.5 * almost.sin());
        assert!(sector.hit_test_local(pt, &params).is_some());
    }

    #[test]
    fn annulus_excludes_hole() {
        let ring = AnnularSector::annulus(Point::ZERO, 2.0, 4.0);
        let params = HitParams::default();
        assert!(ring.hit_test_local(Point::new(1.0, 0.0), &params).is_none());
        assert!(ring.hit_test_local(Point::new(0.0, 3.0), &params).is_some());
        assert!(ring.hit_test_local(Point::new(0.0, 4.5), &params).is_none());
    }

    #[test]
    fn stroked_segment_threshold() {
        let params = HitParams::default();
        let seg = StrokedSegment::with_width(Line::new((0.0, 0.0), (10.0, 0.0)), 1.0, &params);
        assert_eq!(seg.threshold, 2.0);
        assert!(seg.hit_test_local(Point::new(5.0, 1.5), &params).is_some());
        assert!(seg.hit_test_local(Point::new(5.0, 2.0), &params).is_none());
        let wide = StrokedSegment::with_width(seg.line, 10.0, &params);
        assert!(wide.hit_test_local(Point::new(5.0, 4.0), &params).is_some());
    }

    #[test]
    fn oriented_rect_rotation() {
        let rect = OrientedRect::centered(Point::new(10.0, 10.0), 4.0, 1.0, FRAC_PI_2);
        let params = HitParams::default();
        assert!(rect.hit_test_local(Point::new(10.0, 13.0), &params).is_some());
        assert!(rect.hit_test_local(Point::new(13.0, 10.0), &params).is_none());
    }

    #[test]
    fn offset_rect_turns_about_its_pivot() {
        // Box spanning x in [12, 16] around a pivot at the origin.
        let flat = OrientedRect {
            pivot: Point::ZERO,
            offset: Vec2::new(14.0, 0.0),
            half_width: 2.0,
            half_height: 1.0,
            angle: 0.0,
        };
        let params = HitParams::default();
        assert!(flat.hit_test_local(Point::new(12.5, 0.0), &params).is_some());
        assert!(flat.hit_test_local(Point::new(11.5, 0.0), &params).is_none());
        assert!(flat.hit_test_local(Point::ZERO, &params).is_none());
        assert!((flat.reach() - 16.0_f64.hypot(1.0)).abs() < 1e-12, "corner distance");

        let turned = OrientedRect {
            angle: FRAC_PI_2,
            ..flat
        };
        let c = turned.center();
        assert!(c.x.abs() < 1e-9 && (c.y - 14.0).abs() < 1e-9, "{c:?}");
        assert!(turned.hit_test_local(Point::new(0.5, 15.5), &params).is_some());
        assert!(turned.hit_test_local(Point::new(14.0, 0.0), &params).is_none());
    }
}
