// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyphscope Selection: which rows of a source a gesture picked.
//!
//! A [`Selection`] records hits at three granularities:
//!
//! - `indices`: rows of the source, in the order they were discovered;
//! - `line_indices`: segments of a single path, named by their start row;
//! - `multiline_indices`: segments within each path of a multi-path mark;
//! - `image_indices`: pixels of image rows, as [`ImageIndex`].
//!
//! It also carries provenance: the [`ViewId`] that last wrote it and the
//! [`GlyphId`]s that contributed.
//!
//! Selections are combined with [`Selection::update`] under a
//! [`SelectionMode`]. Replace takes the incoming value; append, intersect and
//! subtract apply their set operation to `indices` and union every other
//! field. All merges deduplicate and keep first-occurrence order, so repeating
//! an append with the same input is a no-op.
//!
//! ```rust
//! use glyphscope_selection::{Selection, SelectionMode};
//!
//! let mut current = Selection::new().with_indices([4, 1]);
//! let hit = Selection::new().with_indices([1, 7]);
//!
//! assert!(current.update(&hit, SelectionMode::Append));
//! assert_eq!(current.indices(), &[4, 1, 7]);
//!
//! // Same input again: nothing changes and the revision stays put.
//! let revision = current.revision();
//! assert!(!current.update(&hit, SelectionMode::Append));
//! assert_eq!(current.revision(), revision);
//!
//! current.update(&hit, SelectionMode::Subtract);
//! assert_eq!(current.indices(), &[4]);
//! ```
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod ids;
mod merge;
mod selection;

pub use ids::{GlyphId, ViewId};
pub use selection::{ImageIndex, Selection, SelectionMode};
