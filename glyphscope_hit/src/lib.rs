// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyphscope Hit: turning pointer gestures into selected rows.
//!
//! A [`Glyph`] materializes its properties from a source, projects them to
//! screen space through two [`CoordinateMapper`]s and keeps a
//! [`SpatialIndex`](glyphscope_index::SpatialIndex) of its rows. Hit tests
//! take a [`Geometry`] in screen pixels, narrow candidates through the index
//! and refine them with exact predicates from [`precise`] and [`math`].
//!
//! A [`GlyphRenderer`] binds a glyph to a source through a [`CdsView`] row
//! filter and translates subset rows back to source rows. A
//! [`SelectionManager`] owns the [`Selection`](glyphscope_selection::Selection)
//! of one source: [`select`](SelectionManager::select) commits hits under a
//! merge mode, [`inspect`](SelectionManager::inspect) keeps per-view hover
//! state.
//!
//! Glyph families live in [`glyphs`]; its docs list which query kinds each
//! family supports. Unsupported combinations log a `tracing` warning and are
//! skipped by the manager.
//!
//! ```rust
//! use std::rc::Rc;
//!
//! use glyphscope_hit::glyphs::Circle;
//! use glyphscope_hit::{Geometry, GlyphRenderer, LinearMapper, SelectionManager};
//! use glyphscope_property::{ColumnDataSource, ColumnSource};
//!
//! let source = ColumnDataSource::new()
//!     .with_column("x", vec![1.0, 2.0, 3.0])
//!     .with_column("y", vec![1.0, 2.0, 3.0])
//!     .with_column("radius", vec![0.25, 0.25, 0.25]);
//!
//! // 100 pixels per data unit, y pointing down on screen.
//! let x = Rc::new(LinearMapper::new((0.0, 4.0), (0.0, 400.0)));
//! let y = Rc::new(LinearMapper::new((0.0, 4.0), (400.0, 0.0)));
//! let renderer = GlyphRenderer::new(Circle::new(), &source, x, y);
//!
//! let mut manager = SelectionManager::new(source.source_id());
//! assert!(manager.select(&[&renderer], &Geometry::point(210.0, 195.0), true, false));
//! assert_eq!(manager.selected().indices(), &[1]);
//!
//! // Appending a rectangle around the first circle keeps the second.
//! manager.select(&[&renderer], &Geometry::rect(50.0, 150.0, 250.0, 350.0), true, true);
//! assert_eq!(manager.selected().indices(), &[1, 0]);
//! ```
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. Without the `std` feature, enable
//! `libm` for float math.

#![no_std]

extern crate alloc;

mod error;
mod geometry;
mod glyph;
pub mod glyphs;
mod manager;
mod mapper;
pub mod math;
pub mod precise;
mod renderer;

pub use error::GeometryError;
pub use geometry::{
    Geometry, PointGeometry, PolyGeometry, RectGeometry, SpanDirection, SpanGeometry,
};
pub use glyph::{Glyph, HitContext};
pub use manager::{InspectionEvent, SelectionEvent, SelectionManager};
pub use mapper::{CoordinateMapper, LinearMapper, LogMapper, SpanAnchor, sdist};
pub use precise::HitParams;
pub use renderer::{CdsView, DataRendererView, GlyphRenderer};
