// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyphscope Index: row-aligned bounding-box snapshots.
//!
//! A [`SpatialIndex`] holds one axis-aligned box per row of a mark and answers
//! "which rows may intersect this box?" in sub-linear time. It is the broad
//! phase of hit testing: callers refine its candidates with exact geometry.
//!
//! - Built once per data change from an iterator of [`Aabb2D`] boxes.
//! - Point rows are zero-area boxes; edges are inclusive, so they are found.
//! - Rows with a non-finite bound become [`Aabb2D::EMPTY`] placeholders. The
//!   placeholder keeps its slot, so row numbers stay aligned with every other
//!   per-row array.
//! - Query results come back sorted by row.
//!
//! Backends implement [`Backend`]. [`PackedRTree`](backends::PackedRTree), a
//! static Hilbert-packed R-tree, is the default; [`FlatVec`](backends::FlatVec)
//! scans linearly and is useful for tiny sets and as a reference in tests.
//!
//! ```rust
//! use glyphscope_index::{Aabb2D, SpatialIndex};
//!
//! let index: SpatialIndex = SpatialIndex::from_points(
//!     &[0.0, 1.0, f64::NAN, 3.0],
//!     &[0.0, 1.0, 2.0, 3.0],
//! );
//!
//! // The NaN row keeps slot 2 but is never returned.
//! assert_eq!(index.query(-1.0, -1.0, 4.0, 4.0), vec![0, 1, 3]);
//! assert_eq!(index.query(3.5, 3.5, 0.5, 0.5), vec![1, 3]);
//! assert_eq!(index.bbox(), Aabb2D::new(0.0, 0.0, 3.0, 3.0));
//! ```
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod backend;
pub mod backends;
mod index;
mod types;

pub use backend::Backend;
pub use index::SpatialIndex;
pub use types::Aabb2D;
