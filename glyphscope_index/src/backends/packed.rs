// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Static packed Hilbert R-tree.
//!
//! Leaves are sorted along a Hilbert curve over their box centers and packed
//! bottom-up into nodes of [`NODE_SIZE`] children. All nodes live in one flat
//! array, level by level, root last. Build is `O(n log n)`, queries visit
//! `O(log n + k)` nodes for well-distributed data.

use alloc::vec::Vec;
use core::fmt;

use crate::backend::Backend;
use crate::types::Aabb2D;

/// Maximum number of children per node.
pub const NODE_SIZE: usize = 16;

const HILBERT_MAX: f64 = 65535.0;

/// Packed Hilbert R-tree over `f64` boxes.
pub struct PackedRTree {
    /// Leaf boxes first (in Hilbert order), then each upper level.
    boxes: Vec<Aabb2D<f64>>,
    /// For leaves: the original slot. For inner nodes: position of the first child.
    indices: Vec<usize>,
    /// End position (exclusive) of every level in `boxes`.
    level_bounds: Vec<usize>,
    num_leaves: usize,
}

impl PackedRTree {
    /// Number of indexed (non-placeholder) boxes.
    #[must_use]
    #[inline]
    pub fn num_leaves(&self) -> usize {
        self.num_leaves
    }

    /// Number of levels including the leaf level.
    #[must_use]
    #[inline]
    pub fn depth(&self) -> usize {
        self.level_bounds.len()
    }

    fn level_end(&self, pos: usize) -> usize {
        let level = self.level_bounds.partition_point(|&end| end <= pos);
        self.level_bounds.get(level).copied().unwrap_or(self.boxes.len())
    }

    fn search(&self, rect: &Aabb2D<f64>, mut f: impl FnMut(usize)) {
        let Some(root) = self.boxes.len().checked_sub(1) else {
            return;
        };
        let mut stack = Vec::new();
        let mut node = root;
        loop {
            let end = (node + NODE_SIZE).min(self.level_end(node));
            for pos in node..end {
                if !self.boxes[pos].overlaps(rect) {
                    continue;
                }
                if pos < self.num_leaves {
                    f(self.indices[pos]);
                } else {
                    stack.push(self.indices[pos]);
                }
            }
            match stack.pop() {
                Some(next) => node = next,
                None => break,
            }
        }
    }
}

impl Backend<f64> for PackedRTree {
    fn build(boxes: &[Option<Aabb2D<f64>>]) -> Self {
        let mut leaves: Vec<(usize, Aabb2D<f64>)> = boxes
            .iter()
            .enumerate()
            .filter_map(|(i, b)| b.map(|b| (i, b)))
            .collect();
        let n = leaves.len();
        if n == 0 {
            return Self {
                boxes: Vec::new(),
                indices: Vec::new(),
                level_bounds: Vec::new(),
                num_leaves: 0,
            };
        }

        let extent = leaves
            .iter()
            .fold(Aabb2D::EMPTY, |acc, (_, b)| acc.union(*b));
        let width = extent.width();
        let height = extent.height();
        leaves.sort_by_cached_key(|(_, b)| {
            let (cx, cy) = b.center();
            let hx = scale_to_grid(cx - extent.min_x, width);
            let hy = scale_to_grid(cy - extent.min_y, height);
            hilbert(hx, hy)
        });

        let mut level_bounds = Vec::new();
        let mut count = n;
        let mut total = n;
        level_bounds.push(total);
        loop {
            count = count.div_ceil(NODE_SIZE);
            total += count;
            level_bounds.push(total);
            if count == 1 {
                break;
            }
        }

        let mut out_boxes = Vec::with_capacity(total);
        let mut indices = Vec::with_capacity(total);
        for (slot, b) in leaves {
            out_boxes.push(b);
            indices.push(slot);
        }

        let mut pos = 0;
        for &end in &level_bounds[..level_bounds.len() - 1] {
            while pos < end {
                let first = pos;
                let stop = (pos + NODE_SIZE).min(end);
                let node_box = out_boxes[first..stop]
                    .iter()
                    .fold(Aabb2D::EMPTY, |acc, b| acc.union(*b));
                out_boxes.push(node_box);
                indices.push(first);
                pos = stop;
            }
        }

        Self {
            boxes: out_boxes,
            indices,
            level_bounds,
            num_leaves: n,
        }
    }

    fn visit_point<F: FnMut(usize)>(&self, x: f64, y: f64, f: F) {
        self.search(&Aabb2D::from_point(x, y), f);
    }

    fn visit_rect<F: FnMut(usize)>(&self, rect: Aabb2D<f64>, f: F) {
        self.search(&rect, f);
    }
}

impl fmt::Debug for PackedRTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PackedRTree")
            .field("leaves", &self.num_leaves)
            .field("nodes", &self.boxes.len())
            .field("depth", &self.depth())
            .finish_non_exhaustive()
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "value is clamped to the 16-bit grid first"
)]
fn scale_to_grid(offset: f64, span: f64) -> u32 {
    if span > 0.0 {
        (HILBERT_MAX * (offset / span)).clamp(0.0, HILBERT_MAX) as u32
    } else {
        0
    }
}

/// Position of `(x, y)` along a 16-bit Hilbert curve.
fn hilbert(x: u32, y: u32) -> u32 {
    let mut a = x ^ y;
    let mut b = 0xFFFF ^ a;
    let mut c = 0xFFFF ^ (x | y);
    let mut d = x & (y ^ 0xFFFF);

    let mut aa = a | (b >> 1);
    let mut bb = (a >> 1) ^ a;
    let mut cc = ((c >> 1) ^ (b & (d >> 1))) ^ c;
    let mut dd = ((a & (c >> 1)) ^ (d >> 1)) ^ d;

    a = aa;
    b = bb;
    c = cc;
    d = dd;
    aa = (a & (a >> 2)) ^ (b & (b >> 2));
    bb = (a & (b >> 2)) ^ (b & ((a ^ b) >> 2));
    cc ^= (a & (c >> 2)) ^ (b & (d >> 2));
    dd ^= (b & (c >> 2)) ^ ((a ^ b) & (d >> 2));

    a = aa;
    b = bb;
    c = cc;
    d = dd;
    aa = (a & (a >> 4)) ^ (b & (b >> 4));
    bb = (a & (b >> 4)) ^ (b & ((a ^ b) >> 4));
    cc ^= (a & (c >> 4)) ^ (b & (d >> 4));
    dd ^= (b & (c >> 4)) ^ ((a ^ b) & (d >> 4));

    a = aa;
    b = bb;
    c = cc;
    d = dd;
    cc ^= (a & (c >> 8)) ^ (b & (d >> 8));
    dd ^= (b & (c >> 8)) ^ ((a ^ b) & (d >> 8));

    a = cc ^ (cc >> 1);
    b = dd ^ (dd >> 1);

    let mut i0 = x ^ y;
    let mut i1 = b | (0xFFFF ^ (i0 | a));

    i0 = (i0 | (i0 << 8)) & 0x00FF_00FF;
    i0 = (i0 | (i0 << 4)) & 0x0F0F_0F0F;
    i0 = (i0 | (i0 << 2)) & 0x3333_3333;
    i0 = (i0 | (i0 << 1)) & 0x5555_5555;

    i1 = (i1 | (i1 << 8)) & 0x00FF_00FF;
    i1 = (i1 | (i1 << 4)) & 0x0F0F_0F0F;
    i1 = (i1 | (i1 << 2)) & 0x3333_3333;
    i1 = (i1 | (i1 << 1)) & 0x5555_5555;

    (i1 << 1) | i0
}
