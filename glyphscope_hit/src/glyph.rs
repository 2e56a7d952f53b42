// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The glyph contract and helpers shared by every family.

use alloc::vec::Vec;
use core::fmt;

use glyphscope_index::{Aabb2D, SpatialIndex};
use glyphscope_property::{ColumnSource, HasProps, PropertyKey, PropertyStore, PropertyValue};
use glyphscope_selection::{GlyphId, Selection};

use crate::geometry::{Geometry, PointGeometry, PolyGeometry, RectGeometry, SpanGeometry};
use crate::mapper::CoordinateMapper;
use crate::precise::HitParams;

/// Mappers and parameters a hit test runs with.
#[derive(Clone, Copy, Debug)]
pub struct HitContext<'a> {
    /// Horizontal mapper.
    pub x: &'a dyn CoordinateMapper,
    /// Vertical mapper.
    pub y: &'a dyn CoordinateMapper,
    /// Thresholds and tolerances.
    pub params: &'a HitParams,
}

impl<'a> HitContext<'a> {
    /// Bundles mappers and parameters.
    #[must_use]
    pub fn new(
        x: &'a dyn CoordinateMapper,
        y: &'a dyn CoordinateMapper,
        params: &'a HitParams,
    ) -> Self {
        Self { x, y, params }
    }

    /// Data position of a screen point.
    #[must_use]
    pub fn data_point(&self, sx: f64, sy: f64) -> (f64, f64) {
        (self.x.invert(sx), self.y.invert(sy))
    }

    /// Data box covering a screen box. Reversed mappers are handled.
    #[must_use]
    pub fn data_box(&self, sx0: f64, sx1: f64, sy0: f64, sy1: f64) -> Aabb2D<f64> {
        let (x0, x1) = self.x.r_invert(sx0, sx1);
        let (y0, y1) = self.y.r_invert(sy0, sy1);
        Aabb2D::from_corners(x0, y0, x1, y1)
    }

    /// Data box covering a screen point grown by `margin` pixels.
    #[must_use]
    pub fn data_box_around(&self, sx: f64, sy: f64, margin: f64) -> Aabb2D<f64> {
        self.data_box(sx - margin, sx + margin, sy - margin, sy + margin)
    }
}

/// A plotted mark: properties bound to a source, their screen projection,
/// a spatial index, and the hit tests of its geometric family.
///
/// The lifecycle is `set_data` when the source or a property changes,
/// `map_data` when the mappers change, and any number of hit tests in
/// between. Hit tests return rows numbered within the rows given to
/// `set_data`; the renderer translates them back to source rows.
///
/// Families implement the query kinds they support and inherit a default for
/// the rest, which logs a warning and returns `None`.
pub trait Glyph: HasProps + fmt::Debug {
    /// Identity used for selection provenance.
    fn id(&self) -> GlyphId;

    /// Short name of the glyph type, as used in log events.
    fn kind_name(&self) -> &'static str;

    /// Materializes the properties for `rows` of `source` and rebuilds the
    /// spatial index.
    fn set_data(&mut self, source: &dyn ColumnSource, rows: &[usize]);

    /// Projects the data arrays into screen space.
    fn map_data(&mut self, x: &dyn CoordinateMapper, y: &dyn CoordinateMapper);

    /// The index built by the last `set_data`.
    fn index(&self) -> &SpatialIndex;

    /// Pointer query.
    fn hit_point(&self, geometry: &PointGeometry, ctx: &HitContext<'_>) -> Option<Selection> {
        let _ = (geometry, ctx);
        unsupported(self.kind_name(), "point")
    }

    /// Sweep query.
    fn hit_span(&self, geometry: &SpanGeometry, ctx: &HitContext<'_>) -> Option<Selection> {
        let _ = (geometry, ctx);
        unsupported(self.kind_name(), "span")
    }

    /// Rectangle query.
    fn hit_rect(&self, geometry: &RectGeometry, ctx: &HitContext<'_>) -> Option<Selection> {
        let _ = (geometry, ctx);
        unsupported(self.kind_name(), "rect")
    }

    /// Polygon query.
    fn hit_poly(&self, geometry: &PolyGeometry, ctx: &HitContext<'_>) -> Option<Selection> {
        let _ = (geometry, ctx);
        unsupported(self.kind_name(), "poly")
    }

    /// Dispatches on the query kind.
    ///
    /// `None` means the glyph does not support the query; an empty selection
    /// means nothing was hit.
    fn hit_test(&self, geometry: &Geometry, ctx: &HitContext<'_>) -> Option<Selection> {
        match geometry {
            Geometry::Point(g) => self.hit_point(g, ctx),
            Geometry::Span(g) => self.hit_span(g, ctx),
            Geometry::Rect(g) => self.hit_rect(g, ctx),
            Geometry::Poly(g) => self.hit_poly(g, ctx),
        }
    }
}

pub(crate) fn unsupported(glyph: &'static str, geometry: &'static str) -> Option<Selection> {
    tracing::warn!(glyph, geometry, "hit test kind not supported by glyph");
    None
}

/// Values of `key` for the given source rows.
pub(crate) fn column<T: PropertyValue>(
    props: &PropertyStore,
    key: PropertyKey<T>,
    source: &dyn ColumnSource,
    rows: &[usize],
) -> Vec<T> {
    let all = props.get(key).array(source);
    rows.iter()
        .map(|&r| all.get(r).cloned().unwrap_or_else(T::missing))
        .collect()
}

/// Largest finite value, or zero.
pub(crate) fn max_finite(values: &[f64]) -> f64 {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(0.0, f64::max)
}

/// Row hits without glyph provenance.
pub(crate) fn rows(indices: Vec<usize>) -> Selection {
    Selection::new().with_indices(indices)
}

/// Data and screen positions of point-like rows.
#[derive(Clone, Debug, Default)]
pub(crate) struct XyData {
    pub(crate) x: Vec<f64>,
    pub(crate) y: Vec<f64>,
    pub(crate) sx: Vec<f64>,
    pub(crate) sy: Vec<f64>,
}

impl XyData {
    pub(crate) fn new(x: Vec<f64>, y: Vec<f64>) -> Self {
        Self {
            x,
            y,
            sx: Vec::new(),
            sy: Vec::new(),
        }
    }

    pub(crate) fn map(&mut self, x: &dyn CoordinateMapper, y: &dyn CoordinateMapper) {
        self.sx = x.v_compute(&self.x);
        self.sy = y.v_compute(&self.y);
    }

    pub(crate) fn len(&self) -> usize {
        self.x.len().min(self.y.len())
    }

    pub(crate) fn index(&self) -> SpatialIndex {
        SpatialIndex::from_points(&self.x, &self.y)
    }

    /// Screen position of a row; NaN until mapped.
    pub(crate) fn screen(&self, i: usize) -> (f64, f64) {
        (
            self.sx.get(i).copied().unwrap_or(f64::NAN),
            self.sy.get(i).copied().unwrap_or(f64::NAN),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapper::LinearMapper;

    #[test]
    fn data_box_handles_flipped_y() {
        let x = LinearMapper::new((0.0, 10.0), (0.0, 100.0));
        let y = LinearMapper::new((0.0, 10.0), (100.0, 0.0));
        let params = HitParams::default();
        let ctx = HitContext::new(&x, &y, &params);
        let b = ctx.data_box_around(50.0, 50.0, 10.0);
        assert_eq!(b, Aabb2D::new(4.0, 4.0, 6.0, 6.0));
        assert_eq!(ctx.data_point(20.0, 80.0), (2.0, 2.0));
    }

    #[test]
    fn max_finite_skips_nan() {
        assert_eq!(max_finite(&[1.0, f64::NAN, 3.0, f64::INFINITY]), 3.0);
        assert_eq!(max_finite(&[]), 0.0);
    }
}
