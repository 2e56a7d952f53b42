// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Type-erased property cells.
//!
//! A mark model stores properties of several value types side by side;
//! [`ErasedProperty`] keeps each cell together with its [`TypeId`] for later
//! downcasting.

use alloc::boxed::Box;
use core::any::{Any, TypeId};
use core::fmt;

use crate::kind::PropertyKind;
use crate::property::{Property, PropertyValue};

/// Object-safe view of a [`Property`] of any value type.
pub trait AnyProperty: Any + fmt::Debug {
    /// Property name.
    fn name(&self) -> &'static str;
    /// Property kind.
    fn kind(&self) -> PropertyKind;
    /// Revision counter.
    fn revision(&self) -> u64;
    /// Returns `true` if bound to a field or expression.
    fn is_vectorized(&self) -> bool;
    /// Name of the value type.
    fn value_type(&self) -> &'static str;
    /// Upcast for downcasting.
    fn as_any(&self) -> &dyn Any;
    /// Mutable upcast for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: PropertyValue> AnyProperty for Property<T> {
    fn name(&self) -> &'static str {
        Self::name(self)
    }

    fn kind(&self) -> PropertyKind {
        Self::kind(self)
    }

    fn revision(&self) -> u64 {
        Self::revision(self)
    }

    fn is_vectorized(&self) -> bool {
        Self::is_vectorized(self)
    }

    fn value_type(&self) -> &'static str {
        core::any::type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A property cell with its value type erased.
pub struct ErasedProperty {
    inner: Box<dyn AnyProperty>,
    type_id: TypeId,
}

impl ErasedProperty {
    /// Erases a typed property.
    #[must_use]
    pub fn new<T: PropertyValue>(property: Property<T>) -> Self {
        Self {
            inner: Box::new(property),
            type_id: TypeId::of::<T>(),
        }
    }

    /// Returns `true` if the cell holds a `Property<T>`.
    #[must_use]
    #[inline]
    pub fn is<T: PropertyValue>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }

    /// Downcasts to the typed property.
    #[must_use]
    pub fn downcast_ref<T: PropertyValue>(&self) -> Option<&Property<T>> {
        if self.is::<T>() {
            self.inner.as_any().downcast_ref()
        } else {
            None
        }
    }

    /// Mutable [`ErasedProperty::downcast_ref`].
    #[must_use]
    pub fn downcast_mut<T: PropertyValue>(&mut self) -> Option<&mut Property<T>> {
        if self.is::<T>() {
            self.inner.as_any_mut().downcast_mut()
        } else {
            None
        }
    }

    /// The cell as a trait object.
    #[must_use]
    #[inline]
    pub fn as_dyn(&self) -> &dyn AnyProperty {
        &*self.inner
    }
}

impl fmt::Debug for ErasedProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedProperty")
            .field("name", &self.inner.name())
            .field("value_type", &self.inner.value_type())
            .finish_non_exhaustive()
    }
}
