// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Angle arithmetic and exact geometric predicates.

use core::f64::consts::TAU;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Line, ParamCurveNearest, Point};

/// Wraps an angle into `(0, 2π]`, keeping an exact zero as zero.
///
/// Non-finite input yields NaN.
#[must_use]
pub fn angle_norm(angle: f64) -> f64 {
    if angle == 0.0 {
        return 0.0;
    }
    if !angle.is_finite() {
        return f64::NAN;
    }
    let r = angle % TAU;
    if r <= 0.0 { r + TAU } else { r }
}

/// Distance walked clockwise from `rhs` to `lhs`, in `(0, 2π]` or zero.
#[must_use]
#[inline]
pub fn angle_dist(lhs: f64, rhs: f64) -> f64 {
    angle_norm(lhs - rhs)
}

/// Whether `mid` lies on the arc from `lhs` to `rhs`.
///
/// With `anticlock` unset the arc is the one walked clockwise from `lhs`;
/// otherwise its complement. Coincident ends describe an empty arc and a
/// separation of exactly `2π` a full one. Callers with a known full turn
/// should not rely on the latter and test `|end - start| >= 2π` themselves.
#[must_use]
pub fn angle_between(mid: f64, lhs: f64, rhs: f64, anticlock: bool) -> bool {
    let d = angle_dist(lhs, rhs);
    if d == 0.0 {
        return false;
    }
    if d == TAU {
        return true;
    }
    let inside = angle_dist(lhs, mid) <= d && angle_dist(mid, rhs) <= d;
    inside != anticlock
}

/// Even-odd point in polygon test.
///
/// The ring is closed implicitly from the last vertex to the first. Extra
/// entries of the longer array are ignored.
#[must_use]
pub fn point_in_poly(x: f64, y: f64, xs: &[f64], ys: &[f64]) -> bool {
    let n = xs.len().min(ys.len());
    if n == 0 {
        return false;
    }
    let mut inside = false;
    let (mut x1, mut y1) = (xs[n - 1], ys[n - 1]);
    for (&x2, &y2) in xs[..n].iter().zip(&ys[..n]) {
        if (y1 < y) != (y2 < y) && x1 + (y - y1) / (y2 - y1) * (x2 - x1) < x {
            inside = !inside;
        }
        x1 = x2;
        y1 = y2;
    }
    inside
}

/// Euclidean distance from `pt` to the segment `p0`–`p1`.
#[must_use]
pub fn dist_to_segment(pt: Point, p0: Point, p1: Point) -> f64 {
    if p0 == p1 {
        return pt.distance(p0);
    }
    Line::new(p0, p1).nearest(pt, 0.).distance_sq.sqrt()
}

/// Whether `val` lies between `a` and `b`, in either order, ends included.
///
/// NaN ends never contain anything.
#[must_use]
#[inline]
pub fn between(val: f64, a: f64, b: f64) -> bool {
    (a <= val && val <= b) || (b <= val && val <= a)
}

/// Containment in an unrotated rectangle given by its center and half sizes.
#[must_use]
#[inline]
pub(crate) fn in_rect_axis_aligned(dx: f64, dy: f64, half_w: f64, half_h: f64) -> bool {
    dx.abs() <= half_w && dy.abs() <= half_h
}

/// Containment in a rectangle rotated by `angle` about its center.
///
/// `(dx, dy)` is the query point relative to the center. The point is rotated
/// by `-angle` into the rectangle's own frame first.
#[must_use]
pub(crate) fn in_rect_rotated(dx: f64, dy: f64, half_w: f64, half_h: f64, angle: f64) -> bool {
    let (s, c) = angle.sin_cos();
    let lx = dx * c + dy * s;
    let ly = -dx * s + dy * c;
    in_rect_axis_aligned(lx, ly, half_w, half_h)
}

/// Screen-space half extents of a rectangle rotated by `angle`.
#[must_use]
pub(crate) fn rotated_half_extents(half_w: f64, half_h: f64, angle: f64) -> (f64, f64) {
    if angle == 0.0 {
        return (half_w, half_h);
    }
    let (s, c) = angle.sin_cos();
    (
        (half_w * c).abs() + (half_h * s).abs(),
        (half_w * s).abs() + (half_h * c).abs(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::{FRAC_PI_2, PI};

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

        fn next_f64(&mut self) -> f64 {
            (self.next_u64() >> 11) as f64 / (1_u64 << 53) as f64
        }
    }

    #[test]
    fn norm_wraps_into_half_open_turn() {
        assert_eq!(angle_norm(0.0), 0.0);
        assert_eq!(angle_norm(TAU), TAU);
        assert_eq!(angle_norm(-TAU), TAU);
        assert!((angle_norm(3.0 * PI) - PI).abs() < 1e-12);
        assert!((angle_norm(-FRAC_PI_2) - 1.5 * PI).abs() < 1e-12);
        assert!(angle_norm(f64::INFINITY).is_nan());
        assert!(angle_norm(f64::NAN).is_nan());
    }

    #[test]
    fn quarter_arc_in_both_directions() {
        let mid = PI / 4.0;
        assert!(angle_between(mid, 0.0, FRAC_PI_2, true));
        assert!(!angle_between(PI, 0.0, FRAC_PI_2, true));
        assert!(!angle_between(mid, 0.0, FRAC_PI_2, false));
        assert!(angle_between(PI, 0.0, FRAC_PI_2, false));
    }

    #[test]
    fn degenerate_arcs() {
        assert!(!angle_between(1.0, 2.0, 2.0, true));
        assert!(!angle_between(1.0, 2.0, 2.0, false));
        assert!(angle_between(1.0, 0.0, TAU, true));
    }

    #[test]
    fn polygon_even_odd() {
        let xs = [0.0, 4.0, 4.0, 0.0];
        let ys = [0.0, 0.0, 4.0, 4.0];
        assert!(point_in_poly(2.0, 2.0, &xs, &ys));
        assert!(!point_in_poly(5.0, 2.0, &xs, &ys));
        assert!(!point_in_poly(2.0, -0.5, &xs, &ys));
        assert!(!point_in_poly(1.0, 1.0, &[], &[]));

        // A bow tie: the crossing splits it into two lobes.
        let xs = [0.0, 4.0, 4.0, 0.0];
        let ys = [0.0, 4.0, 0.0, 4.0];
        assert!(point_in_poly(3.5, 2.0, &xs, &ys));
        assert!(!point_in_poly(2.0, 3.5, &xs, &ys));
    }

    #[test]
    fn segment_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!((dist_to_segment(Point::new(5.0, 3.0), a, b) - 3.0).abs() < 1e-12);
        assert!((dist_to_segment(Point::new(13.0, 4.0), a, b) - 5.0).abs() < 1e-12);
        assert!((dist_to_segment(Point::new(3.0, 4.0), a, a) - 5.0).abs() < 1e-12);
    }

    #[test]
    fn between_rejects_nan() {
        assert!(between(0.5, 1.0, 0.0));
        assert!(between(1.0, 1.0, 0.0));
        assert!(!between(0.5, f64::NAN, 1.0));
    }

    #[test]
    fn rotated_path_agrees_with_fast_path_at_zero() {
        let mut rng = Rng(0x2545_f491_4f6c_dd1d);
        let (hw, hh) = (0.5, 0.5);
        let mut inside = 0;
        let mut outside = 0;
        while inside < 100 || outside < 100 {
            let dx = rng.next_f64() * 4.0 - 2.0;
            let dy = rng.next_f64() * 4.0 - 2.0;
            let fast = in_rect_axis_aligned(dx, dy, hw, hh);
            assert_eq!(fast, in_rect_rotated(dx, dy, hw, hh, 0.0), "({dx}, {dy})");
            if fast {
                inside += 1;
            } else {
                outside += 1;
            }
        }
    }

    #[test]
    fn rotation_moves_corners() {
        // A 4x2 rectangle turned a quarter turn covers a 2x4 region.
        assert!(!in_rect_axis_aligned(0.0, 1.8, 2.0, 1.0));
        assert!(in_rect_rotated(0.0, 1.8, 2.0, 1.0, FRAC_PI_2));
        assert!(!in_rect_rotated(1.8, 0.0, 2.0, 1.0, FRAC_PI_2));
        let (ex, ey) = rotated_half_extents(2.0, 1.0, FRAC_PI_2);
        assert!((ex - 1.0).abs() < 1e-12 && (ey - 2.0).abs() < 1e-12);
    }
}
