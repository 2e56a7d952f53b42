// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Query shapes produced by pointer gestures, in screen coordinates.

use alloc::vec::Vec;

use crate::error::GeometryError;

/// Axis of a span query.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpanDirection {
    /// A horizontal sweep: every screen y at the given screen x.
    H,
    /// A vertical sweep: every screen x at the given screen y.
    V,
}

/// A single pointer position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointGeometry {
    /// Screen x.
    pub sx: f64,
    /// Screen y.
    pub sy: f64,
}

/// A full-height or full-width sweep through a pointer position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpanGeometry {
    /// Screen x.
    pub sx: f64,
    /// Screen y.
    pub sy: f64,
    /// Which coordinate is fixed.
    pub direction: SpanDirection,
}

/// An axis-aligned screen rectangle. Corners may be in any order.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RectGeometry {
    /// First x edge.
    pub sx0: f64,
    /// Second x edge.
    pub sx1: f64,
    /// First y edge.
    pub sy0: f64,
    /// Second y edge.
    pub sy1: f64,
}

impl RectGeometry {
    /// Edges as `(min_x, min_y, max_x, max_y)`.
    #[must_use]
    pub fn normalized(&self) -> (f64, f64, f64, f64) {
        (
            self.sx0.min(self.sx1),
            self.sy0.min(self.sy1),
            self.sx0.max(self.sx1),
            self.sy0.max(self.sy1),
        )
    }

    /// Returns `true` if the screen point lies inside, edges included.
    #[must_use]
    pub fn contains(&self, sx: f64, sy: f64) -> bool {
        let (x0, y0, x1, y1) = self.normalized();
        x0 <= sx && sx <= x1 && y0 <= sy && sy <= y1
    }
}

/// A closed screen polygon with at least three vertices.
#[derive(Clone, Debug, PartialEq)]
pub struct PolyGeometry {
    sx: Vec<f64>,
    sy: Vec<f64>,
}

impl PolyGeometry {
    /// Creates a polygon from parallel coordinate arrays.
    pub fn new(sx: Vec<f64>, sy: Vec<f64>) -> Result<Self, GeometryError> {
        if sx.len() != sy.len() {
            return Err(GeometryError::MismatchedPoly {
                sx: sx.len(),
                sy: sy.len(),
            });
        }
        if sx.len() < 3 {
            return Err(GeometryError::TooFewVertices(sx.len()));
        }
        Ok(Self { sx, sy })
    }

    /// Vertex x coordinates.
    #[must_use]
    #[inline]
    pub fn sx(&self) -> &[f64] {
        &self.sx
    }

    /// Vertex y coordinates.
    #[must_use]
    #[inline]
    pub fn sy(&self) -> &[f64] {
        &self.sy
    }

    /// Screen bounds as `(min_x, min_y, max_x, max_y)`.
    #[must_use]
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        let fold = |v: &[f64]| {
            v.iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
                    (lo.min(x), hi.max(x))
                })
        };
        let (x0, x1) = fold(&self.sx);
        let (y0, y1) = fold(&self.sy);
        (x0, y0, x1, y1)
    }
}

/// A hit test query.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    /// A pointer position.
    Point(PointGeometry),
    /// A horizontal or vertical sweep.
    Span(SpanGeometry),
    /// A rubber-band rectangle.
    Rect(RectGeometry),
    /// A lasso or polygon.
    Poly(PolyGeometry),
}

impl Geometry {
    /// A point query.
    #[must_use]
    pub const fn point(sx: f64, sy: f64) -> Self {
        Self::Point(PointGeometry { sx, sy })
    }

    /// A span query.
    #[must_use]
    pub const fn span(sx: f64, sy: f64, direction: SpanDirection) -> Self {
        Self::Span(SpanGeometry { sx, sy, direction })
    }

    /// A rectangle query.
    #[must_use]
    pub const fn rect(sx0: f64, sx1: f64, sy0: f64, sy1: f64) -> Self {
        Self::Rect(RectGeometry { sx0, sx1, sy0, sy1 })
    }

    /// A polygon query.
    pub fn poly(sx: Vec<f64>, sy: Vec<f64>) -> Result<Self, GeometryError> {
        PolyGeometry::new(sx, sy).map(Self::Poly)
    }

    /// Short name of the query kind, as used in log events.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Point(_) => "point",
            Self::Span(_) => "span",
            Self::Rect(_) => "rect",
            Self::Poly(_) => "poly",
        }
    }
}
