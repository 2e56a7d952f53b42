// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The defined property table of a mark model.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;

use hashbrown::HashMap;

use crate::def::PropertyDef;
use crate::erased::ErasedProperty;
use crate::id::{PropertyId, PropertyKey};
use crate::kind::PropertyKind;
use crate::property::{Property, PropertyValue};
use crate::store::PropertyStore;

trait ErasedDef {
    fn kind(&self) -> PropertyKind;
    fn instantiate(&self, name: &'static str) -> ErasedProperty;
}

impl<T: PropertyValue> ErasedDef for PropertyDef<T> {
    fn kind(&self) -> PropertyKind {
        Self::kind(self)
    }

    fn instantiate(&self, name: &'static str) -> ErasedProperty {
        ErasedProperty::new(Property::from_checked(
            name,
            Self::kind(self),
            self.default_spec().clone(),
        ))
    }
}

struct Definition {
    name: &'static str,
    type_id: TypeId,
    def: Box<dyn ErasedDef>,
}

/// The ordered set of property definitions of one mark model.
///
/// Definitions are validated once here; [`PropertyTable::instantiate`] then
/// builds a fresh [`PropertyStore`] for every model instance.
///
/// ```rust
/// use glyphscope_property::{PropertyDef, PropertyKind, PropertyTable};
///
/// let mut table = PropertyTable::new();
/// let x = table.define("x", PropertyDef::<f64>::field(PropertyKind::Coordinate, "x"));
/// let radius = table.define("radius", PropertyDef::value(PropertyKind::Distance, 1.0));
///
/// let store = table.instantiate();
/// assert_eq!(store.get(radius).get_value(), Ok(1.0));
/// assert!(store.get(x).is_vectorized());
/// assert_eq!(table.by_name("radius"), Some(radius.id()));
/// ```
#[derive(Default)]
pub struct PropertyTable {
    defs: Vec<Definition>,
    by_name: HashMap<&'static str, PropertyId>,
}

impl PropertyTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines a new property and returns its typed key.
    ///
    /// # Panics
    ///
    /// Panics if the name is already defined, if the default spec is not
    /// valid for the kind, or if more than `u16::MAX` properties are defined.
    pub fn define<T: PropertyValue>(
        &mut self,
        name: &'static str,
        def: PropertyDef<T>,
    ) -> PropertyKey<T> {
        assert!(
            !self.by_name.contains_key(name),
            "Property '{name}' is already defined"
        );
        assert!(
            self.defs.len() < u16::MAX as usize,
            "Too many properties defined (max {})",
            u16::MAX
        );
        if let Err(err) = Property::new(name, def.kind(), def.default_spec().clone()) {
            panic!("Invalid default for property '{name}': {err}");
        }

        #[expect(clippy::cast_possible_truncation, reason = "checked above")]
        let id = PropertyId::new(self.defs.len() as u16);

        self.defs.push(Definition {
            name,
            type_id: TypeId::of::<T>(),
            def: Box::new(def),
        });
        self.by_name.insert(name, id);
        PropertyKey::from_id(id)
    }

    /// Number of definitions.
    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Returns `true` if nothing is defined.
    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// Looks up a property by name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<PropertyId> {
        self.by_name.get(name).copied()
    }

    /// Name of a property.
    #[must_use]
    pub fn name(&self, id: PropertyId) -> Option<&'static str> {
        self.defs.get(usize::from(id.index())).map(|d| d.name)
    }

    /// Kind of a property.
    #[must_use]
    pub fn kind(&self, id: PropertyId) -> Option<PropertyKind> {
        self.defs.get(usize::from(id.index())).map(|d| d.def.kind())
    }

    /// Returns `true` if `id` was defined with value type `T`.
    #[must_use]
    pub fn holds<T: PropertyValue>(&self, id: PropertyId) -> bool {
        self.defs
            .get(usize::from(id.index()))
            .is_some_and(|d| d.type_id == TypeId::of::<T>())
    }

    /// Iterates over defined names in definition order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.defs.iter().map(|d| d.name)
    }

    /// Builds a store holding every property at its default spec.
    #[must_use]
    pub fn instantiate(&self) -> PropertyStore {
        PropertyStore::from_cells(self.defs.iter().map(|d| d.def.instantiate(d.name)))
    }
}

impl fmt::Debug for PropertyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyTable")
            .field("names", &self.defs.iter().map(|d| d.name).collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn ids_follow_definition_order() {
        let mut table = PropertyTable::new();
        let a = table.define("a", PropertyDef::value(PropertyKind::Number, 0.0));
        let b = table.define("b", PropertyDef::<Vec<f64>>::field(PropertyKind::Coordinate, "b"));
        assert_eq!(a.id().index(), 0);
        assert_eq!(b.id().index(), 1);
        assert_eq!(table.len(), 2);
        assert_eq!(table.name(b.id()), Some("b"));
        assert_eq!(table.kind(a.id()), Some(PropertyKind::Number));
        assert!(table.holds::<Vec<f64>>(b.id()));
        assert!(!table.holds::<f64>(b.id()));
        assert_eq!(table.names().collect::<Vec<_>>(), ["a", "b"]);
    }

    #[test]
    #[should_panic(expected = "already defined")]
    fn duplicate_names_panic() {
        let mut table = PropertyTable::new();
        table.define("a", PropertyDef::value(PropertyKind::Number, 0.0));
        table.define("a", PropertyDef::value(PropertyKind::Number, 1.0));
    }

    #[test]
    #[should_panic(expected = "Invalid default")]
    fn invalid_default_panics() {
        let mut table = PropertyTable::new();
        table.define("size", PropertyDef::value(PropertyKind::Size, -4.0));
    }

    #[test]
    fn instances_are_independent() {
        let mut table = PropertyTable::new();
        let r = table.define("r", PropertyDef::value(PropertyKind::Distance, 1.0));
        let mut one = table.instantiate();
        let two = table.instantiate();
        one.set(r, crate::PropertySpec::value(2.0)).unwrap();
        assert_eq!(one.get(r).get_value(), Ok(2.0));
        assert_eq!(two.get(r).get_value(), Ok(1.0));
    }
}
