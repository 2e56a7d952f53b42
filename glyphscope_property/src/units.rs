// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Unit tags carried by distance and angle specs.

use core::f64::consts::PI;
use core::fmt;

/// Where a distance is measured.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum SpatialUnits {
    /// Data space; converted to screen lengths through a coordinate mapper.
    #[default]
    Data,
    /// Screen pixels; used as-is.
    Screen,
}

/// Angle unit tags.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum AngleUnits {
    /// Radians.
    #[default]
    Rad,
    /// Degrees.
    Deg,
    /// Gradians (400 per turn).
    Grad,
    /// Full turns.
    Turn,
}

impl AngleUnits {
    /// Returns the factor that converts one unit into radians.
    #[must_use]
    pub const fn to_radians_factor(self) -> f64 {
        match self {
            Self::Rad => 1.0,
            Self::Deg => PI / 180.0,
            Self::Grad => PI / 200.0,
            Self::Turn => 2.0 * PI,
        }
    }

    /// Converts `value` into radians and flips its sign.
    ///
    /// Screen space has its vertical axis pointing down, so a counter-clockwise
    /// angle in data convention is clockwise on screen. Every angle property
    /// is stored in this negated form.
    #[must_use]
    #[inline]
    pub fn normalize(self, value: f64) -> f64 {
        -(self.to_radians_factor() * value)
    }
}

/// A unit tag attached to a spec.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Units {
    /// Distance units.
    Spatial(SpatialUnits),
    /// Angle units.
    Angle(AngleUnits),
}

impl From<SpatialUnits> for Units {
    fn from(value: SpatialUnits) -> Self {
        Self::Spatial(value)
    }
}

impl From<AngleUnits> for Units {
    fn from(value: AngleUnits) -> Self {
        Self::Angle(value)
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Spatial(SpatialUnits::Data) => "data",
            Self::Spatial(SpatialUnits::Screen) => "screen",
            Self::Angle(AngleUnits::Rad) => "rad",
            Self::Angle(AngleUnits::Deg) => "deg",
            Self::Angle(AngleUnits::Grad) => "grad",
            Self::Angle(AngleUnits::Turn) => "turn",
        };
        f.write_str(name)
    }
}

/// Rotational direction of angular marks.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Clockwise.
    Clock,
    /// Counter-clockwise.
    #[default]
    Anticlock,
}

impl Direction {
    /// Returns `true` for [`Direction::Anticlock`].
    #[must_use]
    #[inline]
    pub const fn is_anticlock(self) -> bool {
        matches!(self, Self::Anticlock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radians_are_negated() {
        assert_eq!(AngleUnits::Rad.normalize(-10.0), 10.0);
        assert_eq!(AngleUnits::Rad.normalize(20.0), -20.0);
        assert!(AngleUnits::Rad.normalize(0.0).is_sign_negative());
    }

    #[test]
    fn degrees_scale_then_negate() {
        assert!((AngleUnits::Deg.normalize(-180.0) - PI).abs() < 1e-12);
        assert!((AngleUnits::Deg.normalize(180.0) + PI).abs() < 1e-12);
        assert!((AngleUnits::Turn.normalize(0.5) + PI).abs() < 1e-12);
        assert!((AngleUnits::Grad.normalize(100.0) + PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn direction_flags() {
        assert!(!Direction::Clock.is_anticlock());
        assert!(Direction::Anticlock.is_anticlock());
    }
}
