// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tabular sources that field-bound properties read from.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

use hashbrown::HashMap;

use crate::signal::Signal;

static NEXT_SOURCE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of a tabular source.
///
/// Used as part of the cache key for materialized arrays and by the selection
/// manager to tell which source a view reads from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceId(u64);

impl SourceId {
    /// Allocates a fresh, process-unique id.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_SOURCE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Returns the raw id.
    #[must_use]
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// One named column of a source.
#[derive(Clone, Debug, PartialEq)]
pub enum Column {
    /// One number per row.
    Numbers(Vec<f64>),
    /// A variable-length list of numbers per row.
    Ragged(Vec<Vec<f64>>),
}

impl Column {
    /// Number of rows in the column.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Numbers(v) => v.len(),
            Self::Ragged(v) => v.len(),
        }
    }

    /// Returns `true` if the column has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the numbers if this is a [`Column::Numbers`] column.
    #[must_use]
    pub fn as_numbers(&self) -> Option<&[f64]> {
        match self {
            Self::Numbers(v) => Some(v),
            Self::Ragged(_) => None,
        }
    }

    /// Returns the rows if this is a [`Column::Ragged`] column.
    #[must_use]
    pub fn as_ragged(&self) -> Option<&[Vec<f64>]> {
        match self {
            Self::Ragged(v) => Some(v),
            Self::Numbers(_) => None,
        }
    }

    fn truncate_front(&mut self, keep: usize) {
        fn drop_front<T>(v: &mut Vec<T>, keep: usize) {
            if v.len() > keep {
                v.drain(..v.len() - keep);
            }
        }
        match self {
            Self::Numbers(v) => drop_front(v, keep),
            Self::Ragged(v) => drop_front(v, keep),
        }
    }
}

impl From<Vec<f64>> for Column {
    fn from(value: Vec<f64>) -> Self {
        Self::Numbers(value)
    }
}

impl From<Vec<Vec<f64>>> for Column {
    fn from(value: Vec<Vec<f64>>) -> Self {
        Self::Ragged(value)
    }
}

/// Read access to a tabular source.
pub trait ColumnSource {
    /// Identity of the source.
    fn source_id(&self) -> SourceId;

    /// Counter bumped on every change to the column set or contents.
    fn generation(&self) -> u64;

    /// Looks up a column by name.
    fn get_column(&self, name: &str) -> Option<&Column>;

    /// Number of rows, or `None` if the source has no columns.
    fn get_length(&self) -> Option<usize>;
}

/// What changed in a [`ColumnDataSource`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceChange {
    /// Columns were added, replaced or removed.
    Columns,
    /// Rows were appended, possibly rolling older rows out.
    Stream {
        /// Number of rows appended.
        appended: usize,
    },
    /// Single cells were overwritten.
    Patch {
        /// Column that was patched.
        column: String,
        /// Row that was patched.
        row: usize,
    },
}

/// A column-oriented in-memory source.
///
/// ```rust
/// use glyphscope_property::{ColumnDataSource, ColumnSource};
///
/// let mut source = ColumnDataSource::new();
/// source.set_column("x", vec![0.0, 1.0, 2.0]);
/// source.set_column("y", vec![0.0, 1.0, 2.0]);
/// assert_eq!(source.get_length(), Some(3));
/// ```
pub struct ColumnDataSource {
    id: SourceId,
    generation: u64,
    columns: HashMap<String, Column>,
    changed: Signal<SourceChange>,
}

impl Default for ColumnDataSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnDataSource {
    /// Creates an empty source with a fresh [`SourceId`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: SourceId::next(),
            generation: 0,
            columns: HashMap::new(),
            changed: Signal::new(),
        }
    }

    /// Builder-style [`ColumnDataSource::set_column`].
    #[must_use]
    pub fn with_column(mut self, name: impl Into<String>, column: impl Into<Column>) -> Self {
        self.set_column(name, column);
        self
    }

    /// Signal emitted after every mutation.
    #[must_use]
    #[inline]
    pub fn changed(&self) -> &Signal<SourceChange> {
        &self.changed
    }

    /// Inserts or replaces a column.
    pub fn set_column(&mut self, name: impl Into<String>, column: impl Into<Column>) {
        self.columns.insert(name.into(), column.into());
        self.touch(SourceChange::Columns);
    }

    /// Removes a column, returning it if it existed.
    pub fn remove_column(&mut self, name: &str) -> Option<Column> {
        let removed = self.columns.remove(name);
        if removed.is_some() {
            self.touch(SourceChange::Columns);
        }
        removed
    }

    /// Iterates over column names in no particular order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.columns.keys().map(String::as_str)
    }

    /// Appends rows to existing columns.
    ///
    /// Each entry is appended to the column of the same name; unknown names
    /// create a new column. An entry whose shape does not match the existing
    /// column is skipped with a warning. With `rollover`, only the last
    /// `rollover` rows of every column are kept.
    pub fn stream<S: Into<String>>(
        &mut self,
        rows: impl IntoIterator<Item = (S, Column)>,
        rollover: Option<usize>,
    ) {
        let mut appended = 0;
        for (name, new) in rows {
            let name = name.into();
            appended = appended.max(new.len());
            match (self.columns.get_mut(&name), new) {
                (None, new) => {
                    self.columns.insert(name, new);
                }
                (Some(Column::Numbers(old)), Column::Numbers(new)) => old.extend(new),
                (Some(Column::Ragged(old)), Column::Ragged(new)) => old.extend(new),
                (Some(_), _) => {
                    tracing::warn!(
                        column = %name,
                        "streamed data does not match column shape; skipped"
                    );
                }
            }
        }
        if let Some(keep) = rollover {
            for column in self.columns.values_mut() {
                column.truncate_front(keep);
            }
        }
        self.touch(SourceChange::Stream { appended });
    }

    /// Overwrites one cell of a numeric column.
    ///
    /// Returns `false` if the column is missing, not numeric, or too short.
    pub fn patch(&mut self, name: &str, row: usize, value: f64) -> bool {
        let Some(Column::Numbers(values)) = self.columns.get_mut(name) else {
            return false;
        };
        let Some(slot) = values.get_mut(row) else {
            return false;
        };
        *slot = value;
        self.touch(SourceChange::Patch {
            column: String::from(name),
            row,
        });
        true
    }

    fn touch(&mut self, change: SourceChange) {
        self.generation = self.generation.wrapping_add(1);
        self.changed.emit(&change);
    }
}

impl ColumnSource for ColumnDataSource {
    fn source_id(&self) -> SourceId {
        self.id
    }

    fn generation(&self) -> u64 {
        self.generation
    }

    fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    fn get_length(&self) -> Option<usize> {
        let mut lengths = self.columns.values().map(Column::len);
        let first = lengths.next()?;
        let mut min = first;
        let mut consistent = true;
        for len in lengths {
            consistent &= len == first;
            min = min.min(len);
        }
        if !consistent {
            tracing::warn!(source = self.id.get(), "source has columns of inconsistent lengths");
        }
        Some(min)
    }
}

impl fmt::Debug for ColumnDataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.column_names().collect();
        names.sort_unstable();
        f.debug_struct("ColumnDataSource")
            .field("id", &self.id)
            .field("generation", &self.generation)
            .field("columns", &names)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use alloc::vec;
    use core::cell::RefCell;

    #[test]
    fn ids_are_unique() {
        assert_ne!(ColumnDataSource::new().source_id(), ColumnDataSource::new().source_id());
    }

    #[test]
    fn length_is_none_without_columns() {
        assert_eq!(ColumnDataSource::new().get_length(), None);
    }

    #[test]
    fn inconsistent_lengths_report_shortest() {
        let source = ColumnDataSource::new()
            .with_column("a", vec![1.0, 2.0, 3.0])
            .with_column("b", vec![1.0]);
        assert_eq!(source.get_length(), Some(1));
    }

    #[test]
    fn stream_with_rollover_keeps_tail() {
        let mut source = ColumnDataSource::new().with_column("x", vec![0.0, 1.0, 2.0]);
        let before = source.generation();
        source.stream([("x", Column::Numbers(vec![3.0, 4.0]))], Some(4));
        assert_eq!(
            source.get_column("x").and_then(Column::as_numbers),
            Some(&[1.0, 2.0, 3.0, 4.0][..])
        );
        assert_ne!(source.generation(), before);
    }

    #[test]
    fn patch_emits_change() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut source = ColumnDataSource::new().with_column("y", vec![0.0, 1.0]);
        let s = Rc::clone(&seen);
        source.changed().connect(move |c: &SourceChange| s.borrow_mut().push(c.clone()));
        assert!(source.patch("y", 1, 5.0));
        assert!(!source.patch("y", 9, 5.0));
        assert!(!source.patch("nope", 0, 5.0));
        assert_eq!(
            *seen.borrow(),
            [SourceChange::Patch {
                column: String::from("y"),
                row: 1
            }]
        );
    }
}
