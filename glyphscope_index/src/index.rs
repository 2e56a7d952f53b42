// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Row-aligned spatial index snapshots.

use alloc::vec::Vec;
use core::fmt;

use crate::backend::Backend;
use crate::backends::PackedRTree;
use crate::types::Aabb2D;

/// An immutable bounding-box index over the rows of one mark.
///
/// Row `i` of the mark is slot `i` of the index. Rows whose box is not
/// finite keep their slot but are stored as [`Aabb2D::EMPTY`] and never
/// returned. A rebuild produces a new snapshot; nothing is mutated in place.
pub struct SpatialIndex<B: Backend<f64> = PackedRTree> {
    boxes: Vec<Aabb2D<f64>>,
    bbox: Aabb2D<f64>,
    backend: B,
}

impl<B: Backend<f64>> SpatialIndex<B> {
    /// Builds an index from one box per row.
    pub fn build(boxes: impl IntoIterator<Item = Aabb2D<f64>>) -> Self {
        let boxes: Vec<Aabb2D<f64>> = boxes
            .into_iter()
            .map(|b| if b.is_valid() { b } else { Aabb2D::EMPTY })
            .collect();
        let slots: Vec<Option<Aabb2D<f64>>> = boxes
            .iter()
            .map(|b| b.is_valid().then_some(*b))
            .collect();
        let bbox = boxes.iter().fold(Aabb2D::EMPTY, |acc, b| acc.union(*b));
        let backend = B::build(&slots);
        tracing::trace!(rows = boxes.len(), ?backend, "spatial index rebuilt");
        Self {
            boxes,
            bbox,
            backend,
        }
    }

    /// Builds an index of zero-area boxes from point coordinates.
    pub fn from_points(xs: &[f64], ys: &[f64]) -> Self {
        Self::build(
            xs.iter()
                .zip(ys)
                .map(|(&x, &y)| Aabb2D::from_point(x, y)),
        )
    }

    /// Number of rows, placeholders included.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    /// Returns `true` if the index has no rows.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// The stored box of a row; [`Aabb2D::EMPTY`] for placeholders.
    #[must_use]
    pub fn row_box(&self, row: usize) -> Option<Aabb2D<f64>> {
        self.boxes.get(row).copied()
    }

    /// Extent of all finite rows, or [`Aabb2D::EMPTY`] if there are none.
    #[must_use]
    #[inline]
    pub fn bbox(&self) -> Aabb2D<f64> {
        self.bbox
    }

    /// Rows whose box overlaps the query box, in ascending row order.
    ///
    /// The query corners may be given in any order. A query with a NaN
    /// bound matches nothing.
    #[must_use]
    pub fn query(&self, x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<usize> {
        if [x0, y0, x1, y1].iter().any(|v| v.is_nan()) {
            return Vec::new();
        }
        let rect = Aabb2D::from_corners(x0, y0, x1, y1);
        let mut out = Vec::new();
        self.backend.visit_rect(rect, |i| out.push(i));
        out.sort_unstable();
        out
    }

    /// Rows whose box overlaps `rect`, in ascending row order.
    ///
    /// Unlike [`SpatialIndex::query`], the box is taken as given: an inverted
    /// box such as [`Aabb2D::EMPTY`] matches nothing.
    #[must_use]
    pub fn query_box(&self, rect: Aabb2D<f64>) -> Vec<usize> {
        if !(rect.min_x <= rect.max_x && rect.min_y <= rect.max_y) {
            return Vec::new();
        }
        self.query(rect.min_x, rect.min_y, rect.max_x, rect.max_y)
    }

    /// Rows whose box contains the point, in ascending row order.
    #[must_use]
    pub fn query_point(&self, x: f64, y: f64) -> Vec<usize> {
        self.query(x, y, x, y)
    }

    /// Extent of the rows hit by a query box.
    #[must_use]
    pub fn bounds(&self, x0: f64, y0: f64, x1: f64, y1: f64) -> Aabb2D<f64> {
        self.query(x0, y0, x1, y1)
            .into_iter()
            .fold(Aabb2D::EMPTY, |acc, i| acc.union(self.boxes[i]))
    }
}

impl<B: Backend<f64>> Default for SpatialIndex<B> {
    fn default() -> Self {
        Self::build(core::iter::empty())
    }
}

impl<B: Backend<f64>> fmt::Debug for SpatialIndex<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("rows", &self.boxes.len())
            .field("bbox", &self.bbox)
            .field("backend", &self.backend)
            .finish()
    }
}
