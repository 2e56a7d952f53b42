// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyphscope Property: typed mark attributes bound to data.
//!
//! Every attribute of a plotted mark (its coordinates, radius, angles, widths)
//! is a [`Property<T>`]. A property is bound by its [`PropertySpec`] to exactly
//! one of:
//!
//! - a literal value, broadcast to every row;
//! - a field, i.e. a named [`Column`] of a [`ColumnSource`];
//! - an [`Expression`] computed over the whole source.
//!
//! A spec may additionally carry a [`Units`] tag and a [`Transform`]. When a
//! property is materialized with [`Property::array`], unit conversion runs
//! first and the transform second. Angle properties are converted to radians
//! and negated, matching screen space where the vertical axis points down.
//!
//! Materialization never fails: a missing column degrades to NaN (or an empty
//! row for ragged properties) and logs a `tracing` warning, so a chart with
//! partially invalid data still renders. Spec assignment, on the other hand,
//! is strict and reports a [`ConfigurationError`].
//!
//! ## Mark models
//!
//! Mark models declare their attributes once in a [`PropertyTable`] and keep
//! the returned typed [`PropertyKey`]s. [`PropertyTable::instantiate`] builds a
//! [`PropertyStore`] with every property at its default spec. Models
//! implement [`HasProps`], which gives them by-name assignment through
//! [`HasPropsExt`].
//!
//! ```rust
//! use glyphscope_property::{
//!     ColumnDataSource, HasProps, HasPropsExt, PropertyDef, PropertyKey, PropertyKind,
//!     PropertySpec, PropertyStore, PropertyTable,
//! };
//!
//! struct Dot {
//!     props: PropertyStore,
//!     x: PropertyKey<f64>,
//! }
//!
//! impl HasProps for Dot {
//!     fn properties(&self) -> &PropertyStore { &self.props }
//!     fn properties_mut(&mut self) -> &mut PropertyStore { &mut self.props }
//! }
//!
//! let mut table = PropertyTable::new();
//! let x = table.define("x", PropertyDef::field(PropertyKind::Coordinate, "x"));
//! table.define("size", PropertyDef::value(PropertyKind::Size, 4.0));
//! let mut dot = Dot { props: table.instantiate(), x };
//!
//! let source = ColumnDataSource::new().with_column("x", vec![1.0, 2.0, 3.0]);
//! assert_eq!(&*dot.props.get(dot.x).array(&source), &[1.0, 2.0, 3.0]);
//!
//! dot.set_spec("size", PropertySpec::value(8.0)).unwrap();
//! assert_eq!(dot.get_value::<f64>("size"), Ok(8.0));
//! assert!(dot.set_spec("size", PropertySpec::value(-1.0)).is_err());
//! ```
//!
//! ## Observers
//!
//! Properties and sources expose a [`Signal`]. Disconnected receivers are
//! tombstoned and swept in a single batched pass.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod def;
mod erased;
mod error;
mod expr;
mod has_props;
mod id;
mod kind;
mod property;
mod signal;
mod source;
mod spec;
mod store;
mod table;
mod transform;
mod units;

pub use def::PropertyDef;
pub use erased::{AnyProperty, ErasedProperty};
pub use error::{ConfigurationError, PropertyError};
pub use expr::{CumSum, Expression, Stack};
pub use has_props::{HasProps, HasPropsExt};
pub use id::{PropertyId, PropertyKey};
pub use kind::PropertyKind;
pub use property::{Property, PropertyChange, PropertyValue};
pub use signal::{Connection, Signal};
pub use source::{Column, ColumnDataSource, ColumnSource, SourceChange, SourceId};
pub use spec::{PropertySpec, RawSpec, Spec};
pub use store::PropertyStore;
pub use table::PropertyTable;
pub use transform::{CustomTransform, Dodge, LinearInterpolator, Transform};
pub use units::{AngleUnits, Direction, SpatialUnits, Units};
