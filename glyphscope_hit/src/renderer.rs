// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Renderer views: a glyph bound to a source, a row filter and two mappers.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;

use glyphscope_property::{ColumnSource, SourceId};
use glyphscope_selection::{Selection, ViewId};

use crate::geometry::Geometry;
use crate::glyph::{Glyph, HitContext};
use crate::mapper::CoordinateMapper;
use crate::precise::HitParams;

/// Which rows of a source a renderer draws.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CdsView {
    filter: Option<Vec<usize>>,
}

impl CdsView {
    /// Every row.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Only `rows`, in the given order.
    #[must_use]
    pub fn filtered(rows: impl IntoIterator<Item = usize>) -> Self {
        Self {
            filter: Some(rows.into_iter().collect()),
        }
    }

    /// Whether a row filter is set.
    #[must_use]
    pub fn is_filtered(&self) -> bool {
        self.filter.is_some()
    }

    /// Source rows drawn for a source of `len` rows.
    ///
    /// Position `i` of the result is subset row `i`; rows past the end of the
    /// source are dropped.
    #[must_use]
    pub fn indices(&self, len: usize) -> Vec<usize> {
        match &self.filter {
            None => (0..len).collect(),
            Some(rows) => rows.iter().copied().filter(|&r| r < len).collect(),
        }
    }
}

/// What the selection manager needs from a plotted mark.
pub trait DataRendererView: fmt::Debug {
    /// Identity written into selection provenance.
    fn view_id(&self) -> ViewId;

    /// The source whose rows the view draws.
    fn source_id(&self) -> SourceId;

    /// Hidden views are skipped by the manager.
    fn is_visible(&self) -> bool {
        true
    }

    /// Hit tests `geometry`, returning rows of the full source.
    ///
    /// `None` means the view does not support the query kind.
    fn hit_test(&self, geometry: &Geometry) -> Option<Selection>;
}

/// A glyph drawn from a source through a [`CdsView`] and a pair of mappers.
pub struct GlyphRenderer {
    id: ViewId,
    glyph: Box<dyn Glyph>,
    view: CdsView,
    source_id: SourceId,
    x: Rc<dyn CoordinateMapper>,
    y: Rc<dyn CoordinateMapper>,
    params: HitParams,
    visible: bool,
    rows: Vec<usize>,
    source_len: usize,
    seen: (u64, u64),
}

impl GlyphRenderer {
    /// Binds `glyph` to every row of `source` and projects it.
    pub fn new(
        glyph: impl Glyph + 'static,
        source: &dyn ColumnSource,
        x: Rc<dyn CoordinateMapper>,
        y: Rc<dyn CoordinateMapper>,
    ) -> Self {
        let mut renderer = Self {
            id: ViewId::next(),
            glyph: Box::new(glyph),
            view: CdsView::all(),
            source_id: source.source_id(),
            x,
            y,
            params: HitParams::default(),
            visible: true,
            rows: Vec::new(),
            source_len: 0,
            seen: (0, 0),
        };
        renderer.set_data(source);
        renderer
    }

    /// Replaces the hit parameters.
    #[must_use]
    pub fn with_params(mut self, params: HitParams) -> Self {
        self.params = params;
        self
    }

    /// Restricts drawing to the rows of `view` and rebuilds.
    pub fn set_view(&mut self, view: CdsView, source: &dyn ColumnSource) {
        self.view = view;
        self.set_data(source);
    }

    /// The row filter.
    #[must_use]
    pub fn view(&self) -> &CdsView {
        &self.view
    }

    /// Rematerializes properties, rebuilds the index and reprojects.
    pub fn set_data(&mut self, source: &dyn ColumnSource) {
        self.source_id = source.source_id();
        self.source_len = source.get_length().unwrap_or(0);
        self.rows = self.view.indices(self.source_len);
        self.glyph.set_data(source, &self.rows);
        self.glyph.map_data(&*self.x, &*self.y);
        self.seen = (source.generation(), self.glyph.properties().revision());
        tracing::trace!(
            view = self.id.get(),
            glyph = self.glyph.kind_name(),
            rows = self.rows.len(),
            "glyph data rebuilt"
        );
    }

    /// Whether the source or a glyph property changed since the last build.
    #[must_use]
    pub fn needs_update(&self, source: &dyn ColumnSource) -> bool {
        source.source_id() != self.source_id
            || (source.generation(), self.glyph.properties().revision()) != self.seen
    }

    /// Rebuilds if stale. Returns whether a rebuild happened.
    pub fn update(&mut self, source: &dyn ColumnSource) -> bool {
        let stale = self.needs_update(source);
        if stale {
            self.set_data(source);
        }
        stale
    }

    /// Swaps the mappers and reprojects without touching the index.
    pub fn set_mappers(&mut self, x: Rc<dyn CoordinateMapper>, y: Rc<dyn CoordinateMapper>) {
        self.x = x;
        self.y = y;
        self.glyph.map_data(&*self.x, &*self.y);
    }

    /// The glyph.
    #[must_use]
    pub fn glyph(&self) -> &dyn Glyph {
        &*self.glyph
    }

    /// Mutable access to the glyph, for property changes. Call
    /// [`update`](Self::update) afterwards.
    pub fn glyph_mut(&mut self) -> &mut dyn Glyph {
        &mut *self.glyph
    }

    /// Shows or hides the view.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Source rows drawn, in subset order.
    #[must_use]
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }
}

impl DataRendererView for GlyphRenderer {
    fn view_id(&self) -> ViewId {
        self.id
    }

    fn source_id(&self) -> SourceId {
        self.source_id
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn hit_test(&self, geometry: &Geometry) -> Option<Selection> {
        let ctx = HitContext::new(&*self.x, &*self.y, &self.params);
        let local = self.glyph.hit_test(geometry, &ctx)?;
        let rows = &self.rows;
        let result = local.map(|i| rows[i]).with_view(self.id);
        debug_assert!(
            result.is_valid(self.source_len),
            "hit test produced rows outside the source"
        );
        Some(result)
    }
}

impl fmt::Debug for GlyphRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlyphRenderer")
            .field("id", &self.id)
            .field("glyph", &self.glyph)
            .field("view", &self.view)
            .field("source_id", &self.source_id)
            .field("params", &self.params)
            .field("visible", &self.visible)
            .field("rows", &self.rows.len())
            .finish_non_exhaustive()
    }
}
