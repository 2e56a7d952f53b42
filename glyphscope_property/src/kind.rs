// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property kinds and their validators.

use alloc::string::String;

use crate::error::ConfigurationError;
use crate::units::{AngleUnits, SpatialUnits, Units};

/// The semantic kind of a property.
///
/// The kind decides which units a spec may carry, which literals are
/// accepted, and how materialized arrays are normalized.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// A plain number.
    Number,
    /// A number that must not be negative.
    NonNegative,
    /// A data-space coordinate along one axis.
    Coordinate,
    /// A length in data or screen units.
    Distance,
    /// A length in screen pixels.
    Size,
    /// An angle, stored negated and in radians.
    Angle,
}

impl PropertyKind {
    /// Units applied when a spec carries no explicit tag.
    #[must_use]
    pub const fn default_units(self) -> Option<Units> {
        match self {
            Self::Distance => Some(Units::Spatial(SpatialUnits::Data)),
            Self::Size => Some(Units::Spatial(SpatialUnits::Screen)),
            Self::Angle => Some(Units::Angle(AngleUnits::Rad)),
            Self::Number | Self::NonNegative | Self::Coordinate => None,
        }
    }

    /// Returns `true` if `units` may be attached to a spec of this kind.
    #[must_use]
    pub const fn accepts_units(self, units: Units) -> bool {
        match (self, units) {
            (Self::Distance, Units::Spatial(_)) => true,
            (Self::Size, Units::Spatial(SpatialUnits::Screen)) => true,
            (Self::Angle, Units::Angle(_)) => true,
            _ => false,
        }
    }

    pub(crate) fn check_units(
        self,
        property: &str,
        units: Option<Units>,
    ) -> Result<(), ConfigurationError> {
        match units {
            Some(units) if !self.accepts_units(units) => Err(ConfigurationError::UnitsMismatch {
                property: String::from(property),
                kind: self,
                units,
            }),
            _ => Ok(()),
        }
    }

    /// Validates a scalar literal for this kind.
    ///
    /// NaN is accepted everywhere since it marks missing data.
    pub fn validate(self, property: &str, value: f64) -> Result<(), ConfigurationError> {
        let ok = match self {
            Self::NonNegative | Self::Distance | Self::Size => value.is_nan() || value >= 0.0,
            Self::Angle => value.is_nan() || value.is_finite(),
            Self::Number | Self::Coordinate => true,
        };
        if ok {
            Ok(())
        } else {
            Err(ConfigurationError::InvalidValue {
                property: String::from(property),
                kind: self,
                value,
            })
        }
    }
}
