// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Specs: what a property is bound to.
//!
//! A [`PropertySpec`] always holds exactly one [`Spec`] source. Loosely
//! structured input, such as attributes decoded from a document, arrives as a
//! [`RawSpec`] and is checked by [`RawSpec::resolve`].

use alloc::rc::Rc;
use alloc::string::String;
use core::fmt;

use crate::error::ConfigurationError;
use crate::expr::Expression;
use crate::transform::Transform;
use crate::units::Units;

/// The source of a property's value.
pub enum Spec<T> {
    /// A literal broadcast to every row.
    Value(T),
    /// A column of the bound source.
    Field(String),
    /// A computed expression over the bound source.
    Expr(Rc<dyn Expression<T>>),
}

impl<T: Clone> Clone for Spec<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Value(v) => Self::Value(v.clone()),
            Self::Field(f) => Self::Field(f.clone()),
            Self::Expr(e) => Self::Expr(Rc::clone(e)),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Spec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Field(name) => f.debug_tuple("Field").field(name).finish(),
            Self::Expr(e) => f.debug_tuple("Expr").field(e).finish(),
        }
    }
}

/// A resolved spec: one source plus optional units and transform.
pub struct PropertySpec<T> {
    spec: Spec<T>,
    units: Option<Units>,
    transform: Option<Rc<dyn Transform>>,
}

impl<T> PropertySpec<T> {
    /// Binds to a literal value.
    #[must_use]
    pub fn value(value: T) -> Self {
        Self::from_spec(Spec::Value(value))
    }

    /// Binds to a source column.
    #[must_use]
    pub fn field(name: impl Into<String>) -> Self {
        Self::from_spec(Spec::Field(name.into()))
    }

    /// Binds to a computed expression.
    #[must_use]
    pub fn expr(expr: impl Expression<T> + 'static) -> Self {
        Self::from_spec(Spec::Expr(Rc::new(expr)))
    }

    /// Wraps an existing [`Spec`].
    #[must_use]
    pub fn from_spec(spec: Spec<T>) -> Self {
        Self {
            spec,
            units: None,
            transform: None,
        }
    }

    /// Attaches a units tag.
    #[must_use]
    pub fn with_units(mut self, units: impl Into<Units>) -> Self {
        self.units = Some(units.into());
        self
    }

    /// Attaches a transform applied after unit conversion.
    #[must_use]
    pub fn with_transform(mut self, transform: impl Transform + 'static) -> Self {
        self.transform = Some(Rc::new(transform));
        self
    }

    /// The bound source.
    #[must_use]
    #[inline]
    pub fn spec(&self) -> &Spec<T> {
        &self.spec
    }

    /// The explicit units tag, if any.
    #[must_use]
    #[inline]
    pub fn units(&self) -> Option<Units> {
        self.units
    }

    /// The transform, if any.
    #[must_use]
    #[inline]
    pub fn transform(&self) -> Option<&dyn Transform> {
        self.transform.as_deref()
    }

    /// Returns the literal if this spec is value-bound.
    #[must_use]
    pub fn as_value(&self) -> Option<&T> {
        match &self.spec {
            Spec::Value(v) => Some(v),
            Spec::Field(_) | Spec::Expr(_) => None,
        }
    }

    /// Returns `true` if materializing needs a source.
    #[must_use]
    pub fn is_vectorized(&self) -> bool {
        !matches!(self.spec, Spec::Value(_))
    }
}

impl<T: Clone> Clone for PropertySpec<T> {
    fn clone(&self) -> Self {
        Self {
            spec: self.spec.clone(),
            units: self.units,
            transform: self.transform.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for PropertySpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertySpec")
            .field("spec", &self.spec)
            .field("units", &self.units)
            .field("transform", &self.transform)
            .finish()
    }
}

/// An unchecked spec in which any combination of sources may be set.
pub struct RawSpec<T> {
    /// Literal value.
    pub value: Option<T>,
    /// Column name.
    pub field: Option<String>,
    /// Computed expression.
    pub expr: Option<Rc<dyn Expression<T>>>,
    /// Units tag.
    pub units: Option<Units>,
    /// Transform applied after unit conversion.
    pub transform: Option<Rc<dyn Transform>>,
}

impl<T> Default for RawSpec<T> {
    fn default() -> Self {
        Self {
            value: None,
            field: None,
            expr: None,
            units: None,
            transform: None,
        }
    }
}

impl<T> RawSpec<T> {
    /// Checks that exactly one of value, field or expr is set.
    ///
    /// `property` names the target property in the error.
    pub fn resolve(self, property: &str) -> Result<PropertySpec<T>, ConfigurationError> {
        let spec = match (self.value, self.field, self.expr) {
            (Some(v), None, None) => Spec::Value(v),
            (None, Some(f), None) => Spec::Field(f),
            (None, None, Some(e)) => Spec::Expr(e),
            (None, None, None) => {
                return Err(ConfigurationError::Empty {
                    property: String::from(property),
                });
            }
            _ => {
                return Err(ConfigurationError::Ambiguous {
                    property: String::from(property),
                });
            }
        };
        Ok(PropertySpec {
            spec,
            units: self.units,
            transform: self.transform,
        })
    }
}

impl<T: fmt::Debug> fmt::Debug for RawSpec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawSpec")
            .field("value", &self.value)
            .field("field", &self.field)
            .field("expr", &self.expr)
            .field("units", &self.units)
            .finish_non_exhaustive()
    }
}
