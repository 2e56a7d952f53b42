// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Models that own a [`PropertyStore`].

use crate::error::PropertyError;
use crate::property::{Property, PropertyValue};
use crate::spec::{PropertySpec, RawSpec};
use crate::store::PropertyStore;

/// A mark model whose attributes live in a [`PropertyStore`].
pub trait HasProps {
    /// The model's properties.
    fn properties(&self) -> &PropertyStore;

    /// Mutable access to the model's properties.
    fn properties_mut(&mut self) -> &mut PropertyStore;
}

/// By-name helpers for every [`HasProps`] model.
pub trait HasPropsExt: HasProps {
    /// Replaces the spec of the property called `name`.
    fn set_spec<T: PropertyValue>(
        &mut self,
        name: &str,
        spec: PropertySpec<T>,
    ) -> Result<(), PropertyError> {
        self.properties_mut().set_by_name(name, spec)
    }

    /// Checks an unvalidated spec and assigns it to the property called `name`.
    fn set_raw<T: PropertyValue>(
        &mut self,
        name: &str,
        raw: RawSpec<T>,
    ) -> Result<(), PropertyError> {
        let spec = raw.resolve(name)?;
        self.set_spec(name, spec)
    }

    /// Literal value of the property called `name`.
    fn get_value<T: PropertyValue>(&self, name: &str) -> Result<T, PropertyError> {
        let erased = self
            .properties()
            .by_name(name)
            .ok_or_else(|| PropertyError::UnknownProperty { name: name.into() })?;
        let property = erased
            .as_any()
            .downcast_ref::<Property<T>>()
            .ok_or_else(|| PropertyError::TypeMismatch {
                name: name.into(),
                expected: core::any::type_name::<T>(),
            })?;
        property.get_value()
    }
}

impl<M: HasProps + ?Sized> HasPropsExt for M {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::def::PropertyDef;
    use crate::error::ConfigurationError;
    use crate::kind::PropertyKind;
    use crate::table::PropertyTable;
    use alloc::string::String;

    struct Marker {
        props: PropertyStore,
    }

    impl HasProps for Marker {
        fn properties(&self) -> &PropertyStore {
            &self.props
        }

        fn properties_mut(&mut self) -> &mut PropertyStore {
            &mut self.props
        }
    }

    fn marker() -> Marker {
        let mut table = PropertyTable::new();
        table.define("size", PropertyDef::value(PropertyKind::Size, 4.0));
        Marker {
            props: table.instantiate(),
        }
    }

    #[test]
    fn raw_specs_are_checked_before_assignment() {
        let mut m = marker();
        let ambiguous = RawSpec {
            value: Some(1.0),
            field: Some(String::from("s")),
            ..RawSpec::default()
        };
        assert_eq!(
            m.set_raw("size", ambiguous),
            Err(PropertyError::Configuration(ConfigurationError::Ambiguous {
                property: String::from("size")
            }))
        );
        assert_eq!(m.get_value::<f64>("size"), Ok(4.0));

        let ok = RawSpec {
            value: Some(6.0),
            ..RawSpec::default()
        };
        m.set_raw("size", ok).unwrap();
        assert_eq!(m.get_value::<f64>("size"), Ok(6.0));
    }
}
