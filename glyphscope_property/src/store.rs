// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-model property storage.

use alloc::string::String;
use core::fmt;

use smallvec::SmallVec;

use crate::erased::{AnyProperty, ErasedProperty};
use crate::error::{ConfigurationError, PropertyError};
use crate::id::PropertyKey;
use crate::property::{Property, PropertyValue};
use crate::spec::PropertySpec;

/// Inline capacity covers the property count of every built-in glyph.
const INLINE_CAPACITY: usize = 8;

/// The property cells of one mark model, indexed by [`PropertyKey`].
///
/// Stores are built by [`PropertyTable::instantiate`](crate::PropertyTable::instantiate),
/// so slot `i` always holds the property defined with id `i`.
pub struct PropertyStore {
    cells: SmallVec<[ErasedProperty; INLINE_CAPACITY]>,
}

impl PropertyStore {
    pub(crate) fn from_cells(cells: impl IntoIterator<Item = ErasedProperty>) -> Self {
        Self {
            cells: cells.into_iter().collect(),
        }
    }

    /// Number of properties.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the store holds no properties.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the typed property, or `None` if the key belongs to another table.
    #[must_use]
    pub fn try_get<T: PropertyValue>(&self, key: PropertyKey<T>) -> Option<&Property<T>> {
        self.cells
            .get(usize::from(key.id().index()))
            .and_then(ErasedProperty::downcast_ref)
    }

    /// Mutable [`PropertyStore::try_get`].
    #[must_use]
    pub fn try_get_mut<T: PropertyValue>(
        &mut self,
        key: PropertyKey<T>,
    ) -> Option<&mut Property<T>> {
        self.cells
            .get_mut(usize::from(key.id().index()))
            .and_then(ErasedProperty::downcast_mut)
    }

    /// Returns the typed property.
    ///
    /// # Panics
    ///
    /// Panics if `key` was not produced by the table this store came from.
    #[must_use]
    pub fn get<T: PropertyValue>(&self, key: PropertyKey<T>) -> &Property<T> {
        match self.try_get(key) {
            Some(p) => p,
            None => panic!("{key:?} does not belong to this store"),
        }
    }

    /// Mutable [`PropertyStore::get`].
    ///
    /// # Panics
    ///
    /// Panics if `key` was not produced by the table this store came from.
    #[must_use]
    pub fn get_mut<T: PropertyValue>(&mut self, key: PropertyKey<T>) -> &mut Property<T> {
        match self.try_get_mut(key) {
            Some(p) => p,
            None => panic!("{key:?} does not belong to this store"),
        }
    }

    /// Replaces the spec of a property.
    ///
    /// # Panics
    ///
    /// Panics if `key` was not produced by the table this store came from.
    pub fn set<T: PropertyValue>(
        &mut self,
        key: PropertyKey<T>,
        spec: PropertySpec<T>,
    ) -> Result<(), ConfigurationError> {
        self.get_mut(key).set_value(spec)
    }

    /// Looks up a property by name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&dyn AnyProperty> {
        self.cells
            .iter()
            .map(ErasedProperty::as_dyn)
            .find(|p| p.name() == name)
    }

    /// Replaces the spec of the property called `name`.
    pub fn set_by_name<T: PropertyValue>(
        &mut self,
        name: &str,
        spec: PropertySpec<T>,
    ) -> Result<(), PropertyError> {
        let cell = self
            .cells
            .iter_mut()
            .find(|c| c.as_dyn().name() == name)
            .ok_or_else(|| PropertyError::UnknownProperty {
                name: String::from(name),
            })?;
        let property = cell
            .downcast_mut::<T>()
            .ok_or_else(|| PropertyError::TypeMismatch {
                name: String::from(name),
                expected: core::any::type_name::<T>(),
            })?;
        property.set_value(spec)?;
        Ok(())
    }

    /// Iterates over all properties in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn AnyProperty> + '_ {
        self.cells.iter().map(ErasedProperty::as_dyn)
    }

    /// Sum of all property revisions.
    ///
    /// Changes whenever any spec in the store is replaced, so owners can tell
    /// whether derived data is stale.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.iter()
            .fold(0_u64, |acc, p| acc.wrapping_add(p.revision()))
    }
}

impl fmt::Debug for PropertyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
