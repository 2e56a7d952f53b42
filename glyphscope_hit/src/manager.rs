// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The selection manager of one source.

use core::fmt;

use glyphscope_property::{Signal, SourceId};
use glyphscope_selection::{Selection, SelectionMode, ViewId};
use hashbrown::HashMap;

use crate::geometry::Geometry;
use crate::renderer::DataRendererView;

/// Emitted after [`SelectionManager::select`] changes the selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectionEvent {
    /// The source whose selection changed.
    pub source: SourceId,
    /// Revision of the selection after the change.
    pub revision: u64,
    /// Whether the gesture that produced it has ended.
    pub is_final: bool,
}

/// Emitted after [`SelectionManager::inspect`] changes a view's inspection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InspectionEvent {
    /// The source the view draws.
    pub source: SourceId,
    /// The inspected view.
    pub view: ViewId,
    /// Revision of the view's inspection after the change.
    pub revision: u64,
}

/// Owns the selection of one source and the hover state of each of its
/// views.
///
/// Both are only written through [`select`](Self::select),
/// [`inspect`](Self::inspect) and [`clear`](Self::clear). Views that draw a
/// different source, or are hidden, are ignored.
pub struct SelectionManager {
    source: SourceId,
    selected: Selection,
    inspected: HashMap<ViewId, Selection>,
    on_select: Signal<SelectionEvent>,
    on_inspect: Signal<InspectionEvent>,
}

impl SelectionManager {
    /// Creates a manager with empty state for `source`.
    #[must_use]
    pub fn new(source: SourceId) -> Self {
        Self {
            source,
            selected: Selection::new(),
            inspected: HashMap::new(),
            on_select: Signal::new(),
            on_inspect: Signal::new(),
        }
    }

    /// The managed source.
    #[must_use]
    pub fn source_id(&self) -> SourceId {
        self.source
    }

    /// The committed selection.
    #[must_use]
    pub fn selected(&self) -> &Selection {
        &self.selected
    }

    /// Hover state of `view`, if it was ever inspected.
    #[must_use]
    pub fn inspection(&self, view: ViewId) -> Option<&Selection> {
        self.inspected.get(&view)
    }

    /// Fires after every selection change.
    #[must_use]
    pub fn on_select(&self) -> &Signal<SelectionEvent> {
        &self.on_select
    }

    /// Fires after every inspection change.
    #[must_use]
    pub fn on_inspect(&self) -> &Signal<InspectionEvent> {
        &self.on_inspect
    }

    /// Hit tests `geometry` against `views` and writes the combined result,
    /// replacing the selection or, with `append`, adding to it.
    ///
    /// Returns whether any view hit anything.
    pub fn select(
        &mut self,
        views: &[&dyn DataRendererView],
        geometry: &Geometry,
        is_final: bool,
        append: bool,
    ) -> bool {
        self.select_with_mode(views, geometry, is_final, SelectionMode::from_append(append))
    }

    /// [`select`](Self::select) with an explicit merge mode.
    pub fn select_with_mode(
        &mut self,
        views: &[&dyn DataRendererView],
        geometry: &Geometry,
        is_final: bool,
        mode: SelectionMode,
    ) -> bool {
        let mut combined = Selection::new();
        let mut answered = 0_usize;
        for view in eligible(self.source, views) {
            if let Some(hit) = view.hit_test(geometry) {
                combined.update(&hit, SelectionMode::Append);
                answered += 1;
            }
        }
        let did_hit = !combined.is_empty();
        let changed = self.selected.update(&combined, mode);
        tracing::debug!(
            source = self.source.get(),
            geometry = geometry.kind_name(),
            ?mode,
            answered,
            rows = self.selected.indices().len(),
            did_hit,
            changed,
            "select"
        );
        if changed {
            self.on_select.emit(&SelectionEvent {
                source: self.source,
                revision: self.selected.revision(),
                is_final,
            });
        }
        did_hit
    }

    /// Hit tests `geometry` against each view and replaces that view's hover
    /// state. The committed selection is untouched.
    ///
    /// Returns whether any view hit anything.
    pub fn inspect(&mut self, views: &[&dyn DataRendererView], geometry: &Geometry) -> bool {
        let mut did_hit = false;
        for view in eligible(self.source, views) {
            let Some(hit) = view.hit_test(geometry) else {
                continue;
            };
            did_hit |= !hit.is_empty();
            let id = view.view_id();
            let current = self.inspected.entry(id).or_default();
            if current.update(&hit, SelectionMode::Replace) {
                self.on_inspect.emit(&InspectionEvent {
                    source: self.source,
                    view: id,
                    revision: current.revision(),
                });
            }
        }
        tracing::debug!(
            source = self.source.get(),
            geometry = geometry.kind_name(),
            did_hit,
            "inspect"
        );
        did_hit
    }

    /// Empties the selection and, if given, the hover state of `view`.
    ///
    /// Returns whether anything changed.
    pub fn clear(&mut self, view: Option<ViewId>) -> bool {
        let mut changed = self.selected.clear();
        if changed {
            self.on_select.emit(&SelectionEvent {
                source: self.source,
                revision: self.selected.revision(),
                is_final: true,
            });
        }
        if let Some(id) = view {
            if let Some(inspected) = self.inspected.get_mut(&id) {
                if inspected.clear() {
                    changed = true;
                    self.on_inspect.emit(&InspectionEvent {
                        source: self.source,
                        view: id,
                        revision: inspected.revision(),
                    });
                }
            }
        }
        changed
    }
}

/// Visible views drawing `source`.
fn eligible<'v>(
    source: SourceId,
    views: &[&'v dyn DataRendererView],
) -> impl Iterator<Item = &'v dyn DataRendererView> {
    views
        .iter()
        .copied()
        .filter(move |v| v.source_id() == source && v.is_visible())
}

impl fmt::Debug for SelectionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionManager")
            .field("source", &self.source)
            .field("selected", &self.selected)
            .field("inspected", &self.inspected.len())
            .field("on_select", &self.on_select)
            .field("on_inspect", &self.on_inspect)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    /// A view answering every query with fixed rows.
    #[derive(Debug)]
    struct Fixed {
        id: ViewId,
        source: SourceId,
        rows: Option<Vec<usize>>,
        visible: bool,
    }

    impl Fixed {
        fn new(source: SourceId, rows: Option<Vec<usize>>) -> Self {
            Self {
                id: ViewId::next(),
                source,
                rows,
                visible: true,
            }
        }
    }

    impl DataRendererView for Fixed {
        fn view_id(&self) -> ViewId {
            self.id
        }

        fn source_id(&self) -> SourceId {
            self.source
        }

        fn is_visible(&self) -> bool {
            self.visible
        }

        fn hit_test(&self, _geometry: &Geometry) -> Option<Selection> {
            self.rows
                .as_ref()
                .map(|r| Selection::new().with_indices(r.iter().copied()).with_view(self.id))
        }
    }

    const HERE: Geometry = Geometry::point(0.0, 0.0);

    #[test]
    fn hits_from_several_views_are_unioned() {
        let source = SourceId::next();
        let a = Fixed::new(source, Some([3, 1].into()));
        let b = Fixed::new(source, Some([1, 5].into()));
        let unsupported = Fixed::new(source, None);
        let mut manager = SelectionManager::new(source);

        assert!(manager.select(&[&a, &b, &unsupported], &HERE, true, false), "rows were hit");
        assert_eq!(manager.selected().indices(), &[3, 1, 5]);
        assert_eq!(manager.selected().view(), Some(b.id));
    }

    #[test]
    fn other_sources_and_hidden_views_are_ignored() {
        let source = SourceId::next();
        let foreign = Fixed::new(SourceId::next(), Some([1].into()));
        let mut hidden = Fixed::new(source, Some([2].into()));
        hidden.visible = false;
        let mut manager = SelectionManager::new(source);

        assert!(!manager.select(&[&foreign, &hidden], &HERE, true, false), "nothing eligible");
        assert!(manager.selected().is_empty(), "selection untouched");
    }

    #[test]
    fn repeated_select_is_idempotent() {
        let source = SourceId::next();
        let view = Fixed::new(source, Some([2, 0].into()));
        let mut manager = SelectionManager::new(source);

        manager.select(&[&view], &HERE, true, false);
        let first = manager.selected().clone();
        manager.select(&[&view], &HERE, true, false);
        assert_eq!(manager.selected(), &first, "replace does not accumulate");

        manager.select(&[&view], &HERE, true, true);
        assert_eq!(manager.selected(), &first, "append of the same rows is a no-op");
    }

    #[test]
    fn select_signal_fires_only_on_change() {
        let source = SourceId::next();
        let view = Fixed::new(source, Some([4].into()));
        let mut manager = SelectionManager::new(source);
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        manager
            .on_select()
            .connect(move |e: &SelectionEvent| sink.borrow_mut().push(e.is_final));

        manager.select(&[&view], &HERE, false, false);
        manager.select(&[&view], &HERE, true, false);
        assert_eq!(*events.borrow(), [false], "second select changed nothing");

        assert!(manager.clear(None), "selection was non-empty");
        assert_eq!(events.borrow().len(), 2, "clear emits");
        assert!(!manager.clear(None), "already empty");
    }

    #[test]
    fn inspect_replaces_per_view_and_leaves_selection_alone() {
        let source = SourceId::next();
        let mut view = Fixed::new(source, Some([1, 2].into()));
        let mut manager = SelectionManager::new(source);

        assert!(manager.inspect(&[&view], &HERE), "hover hit");
        view.rows = Some([7].into());
        manager.inspect(&[&view], &HERE);

        let hover = manager.inspection(view.id).expect("view was inspected");
        assert_eq!(hover.indices(), &[7]);
        assert!(manager.selected().is_empty(), "inspect never commits");

        assert!(manager.clear(Some(view.id)), "hover cleared");
        assert!(manager.inspection(view.id).is_some_and(Selection::is_empty), "kept but empty");
    }

    #[test]
    fn modes_apply_to_the_committed_selection() {
        let source = SourceId::next();
        let wide = Fixed::new(source, Some([0, 1, 2].into()));
        let narrow = Fixed::new(source, Some([1].into()));
        let mut manager = SelectionManager::new(source);

        manager.select(&[&wide], &HERE, true, false);
        manager.select_with_mode(&[&narrow], &HERE, true, SelectionMode::Subtract);
        assert_eq!(manager.selected().indices(), &[0, 2]);
        manager.select_with_mode(&[&wide], &HERE, true, SelectionMode::Intersect);
        assert_eq!(manager.selected().indices(), &[0, 2]);
    }
}
