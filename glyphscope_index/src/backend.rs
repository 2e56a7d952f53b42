// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend trait for spatial index snapshots.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;

use crate::types::Aabb2D;

/// Spatial backend abstraction used by [`SpatialIndex`](crate::SpatialIndex).
///
/// Backends are built once from a slice of optional boxes, one per row, and
/// are read-only afterwards. A `None` entry marks a row without usable
/// geometry: it keeps its slot number but is never visited.
pub trait Backend<T>: Debug
where
    T: Copy + PartialOrd + Debug,
{
    /// Builds the structure. Slot `i` corresponds to `boxes[i]`.
    fn build(boxes: &[Option<Aabb2D<T>>]) -> Self
    where
        Self: Sized;

    /// Visit slots whose AABB contains the point.
    fn visit_point<F: FnMut(usize)>(&self, x: T, y: T, f: F);

    /// Visit slots whose AABB overlaps the rectangle.
    fn visit_rect<F: FnMut(usize)>(&self, rect: Aabb2D<T>, f: F);

    /// Query slots whose AABB contains the point. Default: collects `visit_point`.
    fn query_point<'a>(&'a self, x: T, y: T) -> Box<dyn Iterator<Item = usize> + 'a> {
        let mut out = Vec::new();
        self.visit_point(x, y, |i| out.push(i));
        Box::new(out.into_iter())
    }

    /// Query slots whose AABB overlaps the rectangle. Default: collects `visit_rect`.
    fn query_rect<'a>(&'a self, rect: Aabb2D<T>) -> Box<dyn Iterator<Item = usize> + 'a> {
        let mut out = Vec::new();
        self.visit_rect(rect, |i| out.push(i));
        Box::new(out.into_iter())
    }
}
