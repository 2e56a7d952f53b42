// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property identification types.
//!
//! [`PropertyId`] names a slot in a [`PropertyTable`](crate::PropertyTable) and
//! [`PropertyKey<T>`] is the typed handle glyph models keep for their own slots.

use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;

/// A runtime property identifier.
///
/// The index is the definition order inside the owning
/// [`PropertyTable`](crate::PropertyTable).
///
/// # Example
///
/// ```rust
/// use glyphscope_property::PropertyId;
///
/// let id = PropertyId::new(3);
/// assert_eq!(id.index(), 3);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PropertyId(u16);

impl PropertyId {
    /// Creates a new property ID from the given index.
    #[must_use]
    #[inline]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Returns the underlying index of this property ID.
    #[must_use]
    #[inline]
    pub const fn index(self) -> u16 {
        self.0
    }
}

impl fmt::Debug for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PropertyId").field(&self.0).finish()
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PropertyId({})", self.0)
    }
}

/// A typed handle to a property slot.
///
/// The phantom type ties the handle to the value type the slot was defined
/// with, so a `PropertyKey<f64>` can only be used to read or write an `f64`
/// property in a [`PropertyStore`](crate::PropertyStore).
pub struct PropertyKey<T> {
    id: PropertyId,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PropertyKey<T> {
    /// Creates a typed key from a property ID.
    ///
    /// Normally produced by [`PropertyTable::define`](crate::PropertyTable::define).
    /// A key built for the wrong value type fails the store's downcast and
    /// yields `None` or [`PropertyError::TypeMismatch`](crate::PropertyError::TypeMismatch).
    #[must_use]
    #[inline]
    pub const fn from_id(id: PropertyId) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }

    /// Returns the underlying property ID.
    #[must_use]
    #[inline]
    pub const fn id(self) -> PropertyId {
        self.id
    }
}

impl<T> Copy for PropertyKey<T> {}

impl<T> Clone for PropertyKey<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> PartialEq for PropertyKey<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for PropertyKey<T> {}

impl<T> Hash for PropertyKey<T> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> fmt::Debug for PropertyKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyKey")
            .field("id", &self.id)
            .field("type", &core::any::type_name::<T>())
            .finish()
    }
}
