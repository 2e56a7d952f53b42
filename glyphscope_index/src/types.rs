// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Primitive geometry types and helpers.

/// Axis-aligned bounding box in 2D.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Aabb2D<T> {
    /// Minimum x
    pub min_x: T,
    /// Minimum y
    pub min_y: T,
    /// Maximum x
    pub max_x: T,
    /// Maximum y
    pub max_y: T,
}

impl<T> Aabb2D<T> {
    /// Create a new AABB from min/max corners.
    #[inline(always)]
    pub const fn new(min_x: T, min_y: T, max_x: T, max_y: T) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }
}

impl<T: Copy + PartialOrd> Aabb2D<T> {
    /// Whether this AABB contains the point. Edges are inclusive.
    #[inline]
    pub fn contains_point(&self, x: T, y: T) -> bool {
        self.min_x <= x && self.min_y <= y && x <= self.max_x && y <= self.max_y
    }

    /// Whether this AABB overlaps another. Shared edges count as overlap, so
    /// zero-area boxes (points, axis-parallel segments) are found by queries
    /// that touch them.
    ///
    /// ```
    /// use glyphscope_index::Aabb2D;
    ///
    /// let a = Aabb2D::new(0.0, 0.0, 10.0, 10.0);
    /// assert!(a.overlaps(&Aabb2D::new(10.0, 0.0, 20.0, 10.0)));
    /// assert!(a.overlaps(&Aabb2D::new(3.0, 3.0, 3.0, 3.0)));
    /// assert!(!a.overlaps(&Aabb2D::new(11.0, 0.0, 20.0, 10.0)));
    /// ```
    #[inline]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }

    /// The smallest AABB enclosing two AABBs.
    #[inline]
    pub fn union(&self, other: Self) -> Self {
        Self {
            min_x: min_t(self.min_x, other.min_x),
            min_y: min_t(self.min_y, other.min_y),
            max_x: max_t(self.max_x, other.max_x),
            max_y: max_t(self.max_y, other.max_y),
        }
    }
}

impl Aabb2D<f64> {
    /// Placeholder for rows without usable geometry.
    ///
    /// Inverted and infinite, so it overlaps nothing and is the identity of
    /// [`Aabb2D::union`].
    pub const EMPTY: Self = Self::new(
        f64::INFINITY,
        f64::INFINITY,
        f64::NEG_INFINITY,
        f64::NEG_INFINITY,
    );

    /// Creates a box from two corners given in any order.
    ///
    /// Returns [`Aabb2D::EMPTY`] if any coordinate is NaN.
    #[must_use]
    pub fn from_corners(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        if x0.is_nan() || y0.is_nan() || x1.is_nan() || y1.is_nan() {
            return Self::EMPTY;
        }
        Self::new(x0.min(x1), y0.min(y1), x0.max(x1), y0.max(y1))
    }

    /// A zero-area box at a point.
    #[must_use]
    #[inline]
    pub const fn from_point(x: f64, y: f64) -> Self {
        Self::new(x, y, x, y)
    }

    /// Returns `true` if every bound is finite and `min <= max` on both axes.
    #[must_use]
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.min_x.is_finite()
            && self.min_y.is_finite()
            && self.max_x.is_finite()
            && self.max_y.is_finite()
            && self.min_x <= self.max_x
            && self.min_y <= self.max_y
    }

    /// Width of the box.
    #[must_use]
    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the box.
    #[must_use]
    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Center of the box.
    #[must_use]
    #[inline]
    pub fn center(&self) -> (f64, f64) {
        (
            0.5 * (self.min_x + self.max_x),
            0.5 * (self.min_y + self.max_y),
        )
    }
}

#[inline]
fn min_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    if a <= b { a } else { b }
}

#[inline]
fn max_t<T: PartialOrd + Copy>(a: T, b: T) -> T {
    if a >= b { a } else { b }
}
