// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property definitions.

use core::fmt;

use crate::kind::PropertyKind;
use crate::property::PropertyValue;
use crate::spec::PropertySpec;
use crate::units::Units;

/// The definition of one property slot: its kind and default spec.
///
/// ```rust
/// use glyphscope_property::{PropertyDef, PropertyKind, SpatialUnits};
///
/// let radius = PropertyDef::value(PropertyKind::Distance, 1.0).units(SpatialUnits::Screen);
/// assert_eq!(radius.kind(), PropertyKind::Distance);
/// assert_eq!(radius.default_spec().as_value(), Some(&1.0));
/// ```
pub struct PropertyDef<T: PropertyValue> {
    kind: PropertyKind,
    default: PropertySpec<T>,
}

impl<T: PropertyValue> PropertyDef<T> {
    /// Creates a definition with an explicit default spec.
    #[must_use]
    pub fn new(kind: PropertyKind, default: PropertySpec<T>) -> Self {
        Self { kind, default }
    }

    /// Defaults to a literal.
    #[must_use]
    pub fn value(kind: PropertyKind, value: T) -> Self {
        Self::new(kind, PropertySpec::value(value))
    }

    /// Defaults to a column of the same or another name.
    #[must_use]
    pub fn field(kind: PropertyKind, field: &str) -> Self {
        Self::new(kind, PropertySpec::field(field))
    }

    /// Sets the units of the default spec.
    #[must_use]
    pub fn units(mut self, units: impl Into<Units>) -> Self {
        self.default = self.default.with_units(units);
        self
    }

    /// Kind of the property.
    #[must_use]
    #[inline]
    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    /// Default spec installed into every new instance.
    #[must_use]
    #[inline]
    pub fn default_spec(&self) -> &PropertySpec<T> {
        &self.default
    }
}

impl<T: PropertyValue> fmt::Debug for PropertyDef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDef")
            .field("kind", &self.kind)
            .field("default", &self.default)
            .finish()
    }
}
