// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Observable property cells and vector materialization.

use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use crate::error::{ConfigurationError, PropertyError};
use crate::kind::PropertyKind;
use crate::signal::Signal;
use crate::source::{Column, ColumnSource, SourceId};
use crate::spec::{PropertySpec, Spec};
use crate::transform::Transform;
use crate::units::{SpatialUnits, Units};

/// Value types a [`Property`] can hold.
pub trait PropertyValue: Clone + fmt::Debug + 'static {
    /// Placeholder for rows whose value is unavailable: NaN for scalars, an
    /// empty list for ragged rows.
    fn missing() -> Self;

    /// Extracts per-row values from a column, or `None` on a shape mismatch.
    fn from_column(column: &Column) -> Option<Vec<Self>>;

    /// Checks a literal against the property kind.
    fn validate(&self, property: &str, kind: PropertyKind) -> Result<(), ConfigurationError>;

    /// Applies unit normalization, then the transform, to a single literal.
    fn finish_one(
        self,
        kind: PropertyKind,
        units: Option<Units>,
        transform: Option<&dyn Transform>,
    ) -> Self;

    /// Applies unit normalization, then the transform, to a materialized column.
    fn finish(
        values: Vec<Self>,
        kind: PropertyKind,
        units: Option<Units>,
        transform: Option<&dyn Transform>,
    ) -> Vec<Self>;
}

fn normalize_scalar(kind: PropertyKind, units: Option<Units>, x: f64) -> f64 {
    match (kind, units) {
        (PropertyKind::Angle, Some(Units::Angle(u))) => u.normalize(x),
        _ => x,
    }
}

impl PropertyValue for f64 {
    fn missing() -> Self {
        Self::NAN
    }

    fn from_column(column: &Column) -> Option<Vec<Self>> {
        column.as_numbers().map(<[Self]>::to_vec)
    }

    fn validate(&self, property: &str, kind: PropertyKind) -> Result<(), ConfigurationError> {
        kind.validate(property, *self)
    }

    fn finish_one(
        self,
        kind: PropertyKind,
        units: Option<Units>,
        transform: Option<&dyn Transform>,
    ) -> Self {
        let x = normalize_scalar(kind, units, self);
        match transform {
            Some(t) => t.compute(x),
            None => x,
        }
    }

    fn finish(
        mut values: Vec<Self>,
        kind: PropertyKind,
        units: Option<Units>,
        transform: Option<&dyn Transform>,
    ) -> Vec<Self> {
        for v in &mut values {
            *v = normalize_scalar(kind, units, *v);
        }
        match transform {
            Some(t) => t.v_compute(&values),
            None => values,
        }
    }
}

// Ragged rows are transformed element-wise.
impl PropertyValue for Vec<f64> {
    fn missing() -> Self {
        Self::new()
    }

    fn from_column(column: &Column) -> Option<Vec<Self>> {
        column.as_ragged().map(<[Self]>::to_vec)
    }

    fn validate(&self, property: &str, kind: PropertyKind) -> Result<(), ConfigurationError> {
        self.iter().try_for_each(|&v| kind.validate(property, v))
    }

    fn finish_one(
        self,
        kind: PropertyKind,
        units: Option<Units>,
        transform: Option<&dyn Transform>,
    ) -> Self {
        self.into_iter()
            .map(|v| v.finish_one(kind, units, transform))
            .collect()
    }

    fn finish(
        values: Vec<Self>,
        kind: PropertyKind,
        units: Option<Units>,
        transform: Option<&dyn Transform>,
    ) -> Vec<Self> {
        values
            .into_iter()
            .map(|row| row.finish_one(kind, units, transform))
            .collect()
    }
}

/// Payload of [`Property::changed`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PropertyChange {
    /// Property name.
    pub name: &'static str,
    /// Revision after the change.
    pub revision: u64,
}

struct Materialized<T> {
    source: SourceId,
    generation: u64,
    revision: u64,
    values: Rc<[T]>,
}

/// A typed, observable value cell owned by one mark model.
///
/// The spec is replaced wholesale through [`Property::set_value`]; every
/// replacement bumps the revision, drops the cached array and notifies
/// [`Property::changed`].
///
/// ```rust
/// use glyphscope_property::{ColumnDataSource, Property, PropertyKind, PropertySpec};
///
/// let source = ColumnDataSource::new().with_column("x", vec![1.0, 2.0]);
/// let mut x = Property::new("x", PropertyKind::Coordinate, PropertySpec::field("x")).unwrap();
/// assert_eq!(&*x.array(&source), &[1.0, 2.0]);
///
/// x.set_value(PropertySpec::value(5.0)).unwrap();
/// assert_eq!(x.get_value(), Ok(5.0));
/// assert_eq!(&*x.array(&source), &[5.0, 5.0]);
/// ```
pub struct Property<T: PropertyValue> {
    name: &'static str,
    kind: PropertyKind,
    spec: PropertySpec<T>,
    revision: u64,
    changed: Signal<PropertyChange>,
    cache: RefCell<Option<Materialized<T>>>,
}

impl<T: PropertyValue> Property<T> {
    /// Creates a property with an initial spec.
    pub fn new(
        name: &'static str,
        kind: PropertyKind,
        spec: PropertySpec<T>,
    ) -> Result<Self, ConfigurationError> {
        check_spec(name, kind, &spec)?;
        Ok(Self::from_checked(name, kind, spec))
    }

    pub(crate) fn from_checked(
        name: &'static str,
        kind: PropertyKind,
        spec: PropertySpec<T>,
    ) -> Self {
        Self {
            name,
            kind,
            spec,
            revision: 0,
            changed: Signal::new(),
            cache: RefCell::new(None),
        }
    }

    /// Property name.
    #[must_use]
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Property kind.
    #[must_use]
    #[inline]
    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    /// The current spec.
    #[must_use]
    #[inline]
    pub fn spec(&self) -> &PropertySpec<T> {
        &self.spec
    }

    /// Revision counter, advanced by every successful [`Property::set_value`].
    #[must_use]
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Signal emitted after the spec changes.
    #[must_use]
    #[inline]
    pub fn changed(&self) -> &Signal<PropertyChange> {
        &self.changed
    }

    /// Effective units: the explicit tag, else the kind's default.
    #[must_use]
    pub fn units(&self) -> Option<Units> {
        self.spec.units().or(self.kind.default_units())
    }

    /// Effective spatial units; data units for non-distance properties.
    #[must_use]
    pub fn spatial_units(&self) -> SpatialUnits {
        match self.units() {
            Some(Units::Spatial(u)) => u,
            _ => SpatialUnits::Data,
        }
    }

    /// Returns `true` if the property is bound to a field or expression.
    #[must_use]
    #[inline]
    pub fn is_vectorized(&self) -> bool {
        self.spec.is_vectorized()
    }

    /// Replaces the spec.
    ///
    /// On error the previous spec is kept and nothing is notified.
    pub fn set_value(&mut self, spec: PropertySpec<T>) -> Result<(), ConfigurationError> {
        check_spec(self.name, self.kind, &spec)?;
        self.spec = spec;
        self.revision = self.revision.wrapping_add(1);
        self.cache.get_mut().take();
        self.changed.emit(&PropertyChange {
            name: self.name,
            revision: self.revision,
        });
        Ok(())
    }

    /// Returns the literal value with units and transform applied.
    pub fn get_value(&self) -> Result<T, PropertyError> {
        match self.spec.spec() {
            Spec::Value(v) => {
                Ok(v.clone().finish_one(self.kind, self.units(), self.spec.transform()))
            }
            Spec::Field(_) | Spec::Expr(_) => Err(PropertyError::InvalidSpec {
                property: String::from(self.name),
            }),
        }
    }

    /// Materializes one value per source row.
    ///
    /// Never fails: a missing column yields [`PropertyValue::missing`] for
    /// every row and logs a warning. That is NaN for scalar properties and an
    /// empty list for ragged ones, so a missing ragged column reads as rows
    /// with no points. The array is cached until the spec or the source
    /// changes.
    pub fn array(&self, source: &dyn ColumnSource) -> Rc<[T]> {
        let source_id = source.source_id();
        let generation = source.generation();
        if let Some(hit) = self.cache.borrow().as_ref()
            && hit.source == source_id
            && hit.generation == generation
            && hit.revision == self.revision
        {
            return Rc::clone(&hit.values);
        }

        let values: Rc<[T]> = self.materialize(source).into();
        *self.cache.borrow_mut() = Some(Materialized {
            source: source_id,
            generation,
            revision: self.revision,
            values: Rc::clone(&values),
        });
        values
    }

    fn materialize(&self, source: &dyn ColumnSource) -> Vec<T> {
        let len = source.get_length().unwrap_or(0);
        let mut raw = match self.spec.spec() {
            Spec::Value(v) => vec![v.clone(); len],
            Spec::Field(field) => match source.get_column(field) {
                Some(column) => T::from_column(column).unwrap_or_else(|| {
                    tracing::warn!(
                        property = self.name,
                        field = %field,
                        "column has the wrong shape; substituting missing values"
                    );
                    Vec::new()
                }),
                None => {
                    tracing::warn!(
                        property = self.name,
                        field = %field,
                        "column not found in source; substituting missing values"
                    );
                    Vec::new()
                }
            },
            Spec::Expr(expr) => expr.v_compute(source),
        };
        raw.resize(len, T::missing());
        T::finish(raw, self.kind, self.units(), self.spec.transform())
    }
}

fn check_spec<T: PropertyValue>(
    name: &str,
    kind: PropertyKind,
    spec: &PropertySpec<T>,
) -> Result<(), ConfigurationError> {
    kind.check_units(name, spec.units())?;
    if let Some(v) = spec.as_value() {
        v.validate(name, kind)?;
    }
    Ok(())
}

impl<T: PropertyValue> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("spec", &self.spec)
            .field("revision", &self.revision)
            .finish_non_exhaustive()
    }
}
