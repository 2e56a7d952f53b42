// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for spec assignment and property access.

use alloc::string::String;

use crate::kind::PropertyKind;
use crate::units::Units;

/// A spec could not be assigned to a property.
///
/// This is fatal to the assignment: the property keeps its previous spec.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    /// None of value, field or expr was given.
    #[error("spec for `{property}` sets none of value, field or expr")]
    Empty {
        /// Property the spec was meant for.
        property: String,
    },
    /// More than one of value, field or expr was given.
    #[error("spec for `{property}` sets more than one of value, field or expr")]
    Ambiguous {
        /// Property the spec was meant for.
        property: String,
    },
    /// The units tag does not apply to the property kind.
    #[error("units `{units}` are not valid for {kind:?} property `{property}`")]
    UnitsMismatch {
        /// Property the spec was meant for.
        property: String,
        /// Kind of the property.
        kind: PropertyKind,
        /// Offending units tag.
        units: Units,
    },
    /// The literal value was rejected by the property kind.
    #[error("value {value} is not valid for {kind:?} property `{property}`")]
    InvalidValue {
        /// Property the spec was meant for.
        property: String,
        /// Kind of the property.
        kind: PropertyKind,
        /// Offending literal.
        value: f64,
    },
}

/// Errors produced when reading or writing properties.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum PropertyError {
    /// `get_value` was called on a property bound to a field or expression.
    #[error("property `{property}` is not bound to a literal value")]
    InvalidSpec {
        /// Name of the property.
        property: String,
    },
    /// A by-name lookup did not match any defined property.
    #[error("no property named `{name}`")]
    UnknownProperty {
        /// Requested name.
        name: String,
    },
    /// A property exists under that name but with another value type.
    #[error("property `{name}` does not hold values of type {expected}")]
    TypeMismatch {
        /// Requested name.
        name: String,
        /// Type the caller asked for.
        expected: &'static str,
    },
    /// The new spec was rejected.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}
