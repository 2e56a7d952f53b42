// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The selection value object and its merge modes.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::fmt;

use crate::ids::{GlyphId, ViewId};
use crate::merge;

/// How an incoming selection is combined with an existing one.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SelectionMode {
    /// The incoming selection replaces the existing one entirely.
    #[default]
    Replace,
    /// Set union of row indices, in discovery order.
    Append,
    /// Set intersection of row indices; detail fields are unioned.
    Intersect,
    /// Set difference of row indices; detail fields are unioned.
    Subtract,
}

impl SelectionMode {
    /// `Append` when `append` is set, `Replace` otherwise.
    #[must_use]
    #[inline]
    pub const fn from_append(append: bool) -> Self {
        if append { Self::Append } else { Self::Replace }
    }
}

/// A pixel hit inside an image row.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImageIndex {
    /// Row of the image in its source.
    pub index: usize,
    /// Pixel column.
    pub i: usize,
    /// Pixel row.
    pub j: usize,
    /// Offset of the pixel in the flattened image buffer.
    pub flat_index: usize,
}

/// Rows, segments and pixels chosen by a hit test or a selection gesture.
///
/// A selection is logically a set of rows, but construction does not
/// deduplicate. Merges performed through [`Selection::update`] do.
///
/// Equality compares content only; the revision counter is ignored.
#[derive(Clone, Default)]
pub struct Selection {
    indices: Vec<usize>,
    line_indices: Vec<usize>,
    multiline_indices: BTreeMap<usize, Vec<usize>>,
    image_indices: Vec<ImageIndex>,
    view: Option<ViewId>,
    selected_glyphs: Vec<GlyphId>,
    revision: u64,
}

impl Selection {
    /// Creates an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the row-level hits.
    #[must_use]
    pub fn with_indices(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.indices = indices.into_iter().collect();
        self
    }

    /// Sets the segment-level hits of a single path.
    #[must_use]
    pub fn with_line_indices(mut self, segments: impl IntoIterator<Item = usize>) -> Self {
        self.line_indices = segments.into_iter().collect();
        self
    }

    /// Records the hit segments of one path of a multi-path row.
    #[must_use]
    pub fn with_multiline(
        mut self,
        row: usize,
        segments: impl IntoIterator<Item = usize>,
    ) -> Self {
        self.multiline_indices
            .insert(row, segments.into_iter().collect());
        self
    }

    /// Adds one pixel hit.
    #[must_use]
    pub fn with_image_index(mut self, index: ImageIndex) -> Self {
        self.image_indices.push(index);
        self
    }

    /// Sets the view that produced this selection.
    #[must_use]
    pub fn with_view(mut self, view: ViewId) -> Self {
        self.view = Some(view);
        self
    }

    /// Adds a glyph to the provenance list.
    #[must_use]
    pub fn with_glyph(mut self, glyph: GlyphId) -> Self {
        self.add_to_selected_glyphs(glyph);
        self
    }

    /// Adds a glyph to the provenance list unless it is already present.
    pub fn add_to_selected_glyphs(&mut self, glyph: GlyphId) {
        if !self.selected_glyphs.contains(&glyph) {
            self.selected_glyphs.push(glyph);
        }
    }

    /// Row-level hits in discovery order.
    #[must_use]
    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Segment-level hits of a single path.
    #[must_use]
    #[inline]
    pub fn line_indices(&self) -> &[usize] {
        &self.line_indices
    }

    /// Segment-level hits per row of a multi-path mark.
    #[must_use]
    #[inline]
    pub fn multiline_indices(&self) -> &BTreeMap<usize, Vec<usize>> {
        &self.multiline_indices
    }

    /// Pixel-level hits.
    #[must_use]
    #[inline]
    pub fn image_indices(&self) -> &[ImageIndex] {
        &self.image_indices
    }

    /// The view that last wrote this selection.
    #[must_use]
    #[inline]
    pub fn view(&self) -> Option<ViewId> {
        self.view
    }

    /// Glyphs that contributed to this selection.
    #[must_use]
    #[inline]
    pub fn selected_glyphs(&self) -> &[GlyphId] {
        &self.selected_glyphs
    }

    /// Change counter. Advances only when an update or clear alters content.
    #[must_use]
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Returns `true` if the row, segment, pixel and glyph lists are all empty.
    ///
    /// Area glyphs report a hit through `selected_glyphs` alone, so a
    /// selection carrying only glyph provenance is not empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
            && self.line_indices.is_empty()
            && self.multiline_indices.is_empty()
            && self.image_indices.is_empty()
            && self.selected_glyphs.is_empty()
    }

    /// Returns `true` if `row` is among the row-level hits.
    #[must_use]
    pub fn contains(&self, row: usize) -> bool {
        self.indices.contains(&row)
    }

    /// Returns `true` if every row reference is below `len`.
    ///
    /// A line segment is named by the row it starts at, so `line_indices`
    /// are checked too. Multi-path segment indices are positions within one
    /// row's path and are not.
    #[must_use]
    pub fn is_valid(&self, len: usize) -> bool {
        self.indices.iter().all(|&i| i < len)
            && self.line_indices.iter().all(|&i| i < len)
            && self.multiline_indices.keys().all(|&i| i < len)
            && self.image_indices.iter().all(|p| p.index < len)
    }

    /// Merges `other` into this selection.
    ///
    /// | mode | `indices` | other fields |
    /// |---|---|---|
    /// | `Replace` | `other`'s | `other`'s |
    /// | `Append` | union | union |
    /// | `Intersect` | intersection | union |
    /// | `Subtract` | difference | union |
    ///
    /// Unions keep this selection's order and then append new elements of
    /// `other` in its order. `view` always takes `other`'s value.
    ///
    /// Returns `true` if the content changed, in which case the revision
    /// advances.
    pub fn update(&mut self, other: &Self, mode: SelectionMode) -> bool {
        let next = match mode {
            SelectionMode::Replace => Parts::of(other),
            SelectionMode::Append => self.merged(other, merge::union),
            SelectionMode::Intersect => self.merged(other, merge::intersect),
            SelectionMode::Subtract => self.merged(other, merge::difference),
        };
        self.apply(next)
    }

    /// Removes every hit and the provenance.
    ///
    /// Returns `true` if anything was removed.
    pub fn clear(&mut self) -> bool {
        self.apply(Parts::default())
    }

    /// Translates row references through `f`, typically from the rows of a
    /// filtered view to the rows of the full source.
    ///
    /// Row indices, line segment starts, multi-path keys and image rows are
    /// mapped. Multi-path segment indices are positions within one row's path
    /// and are left alone.
    #[must_use]
    pub fn map(&self, f: impl Fn(usize) -> usize) -> Self {
        Self {
            indices: self.indices.iter().map(|&i| f(i)).collect(),
            line_indices: self.line_indices.iter().map(|&i| f(i)).collect(),
            multiline_indices: self
                .multiline_indices
                .iter()
                .map(|(&row, segs)| (f(row), segs.clone()))
                .collect(),
            image_indices: self
                .image_indices
                .iter()
                .map(|p| ImageIndex {
                    index: f(p.index),
                    ..*p
                })
                .collect(),
            view: self.view,
            selected_glyphs: self.selected_glyphs.clone(),
            revision: 0,
        }
    }

    fn merged(&self, other: &Self, rows: fn(&[usize], &[usize]) -> Vec<usize>) -> Parts {
        Parts {
            indices: rows(&self.indices, &other.indices),
            line_indices: merge::union(&self.line_indices, &other.line_indices),
            multiline_indices: merge::union_map(
                &self.multiline_indices,
                &other.multiline_indices,
            ),
            image_indices: merge::union(&self.image_indices, &other.image_indices),
            view: other.view,
            selected_glyphs: merge::union(&self.selected_glyphs, &other.selected_glyphs),
        }
    }

    fn apply(&mut self, next: Parts) -> bool {
        let changed = self.indices != next.indices
            || self.line_indices != next.line_indices
            || self.multiline_indices != next.multiline_indices
            || self.image_indices != next.image_indices
            || self.view != next.view
            || self.selected_glyphs != next.selected_glyphs;
        if changed {
            self.indices = next.indices;
            self.line_indices = next.line_indices;
            self.multiline_indices = next.multiline_indices;
            self.image_indices = next.image_indices;
            self.view = next.view;
            self.selected_glyphs = next.selected_glyphs;
            self.revision = self.revision.wrapping_add(1);
        }
        changed
    }
}

/// Content fields of a selection, without the revision.
#[derive(Default)]
struct Parts {
    indices: Vec<usize>,
    line_indices: Vec<usize>,
    multiline_indices: BTreeMap<usize, Vec<usize>>,
    image_indices: Vec<ImageIndex>,
    view: Option<ViewId>,
    selected_glyphs: Vec<GlyphId>,
}

impl Parts {
    fn of(s: &Selection) -> Self {
        Self {
            indices: s.indices.clone(),
            line_indices: s.line_indices.clone(),
            multiline_indices: s.multiline_indices.clone(),
            image_indices: s.image_indices.clone(),
            view: s.view,
            selected_glyphs: s.selected_glyphs.clone(),
        }
    }
}

impl PartialEq for Selection {
    fn eq(&self, other: &Self) -> bool {
        self.indices == other.indices
            && self.line_indices == other.line_indices
            && self.multiline_indices == other.multiline_indices
            && self.image_indices == other.image_indices
            && self.view == other.view
            && self.selected_glyphs == other.selected_glyphs
    }
}

impl Eq for Selection {}

impl fmt::Debug for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Selection");
        s.field("indices", &self.indices);
        if !self.line_indices.is_empty() {
            s.field("line_indices", &self.line_indices);
        }
        if !self.multiline_indices.is_empty() {
            s.field("multiline_indices", &self.multiline_indices);
        }
        if !self.image_indices.is_empty() {
            s.field("image_indices", &self.image_indices);
        }
        s.field("view", &self.view)
            .field("selected_glyphs", &self.selected_glyphs)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}
