// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The coordinate mapper contract and two continuous mappers.

use alloc::vec::Vec;
use core::fmt;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// Maps one axis between data space and screen space.
///
/// Implementations need not be increasing: a mapper whose range runs from
/// bottom to top maps larger data values to smaller screen values. Callers of
/// [`CoordinateMapper::r_invert`] must therefore not assume `lo <= hi` in the
/// result.
pub trait CoordinateMapper: fmt::Debug {
    /// Data value to screen value.
    fn compute(&self, x: f64) -> f64;

    /// Screen value to data value.
    fn invert(&self, sx: f64) -> f64;

    /// Maps a whole array to screen space.
    fn v_compute(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.compute(x)).collect()
    }

    /// Maps a whole array back to data space.
    fn v_invert(&self, sxs: &[f64]) -> Vec<f64> {
        sxs.iter().map(|&sx| self.invert(sx)).collect()
    }

    /// Screen positions of two data values.
    ///
    /// Used to measure a data-space distance anchored at a specific position,
    /// which differs from place to place under non-linear mappers.
    fn r_compute(&self, a: f64, b: f64) -> (f64, f64) {
        (self.compute(a), self.compute(b))
    }

    /// Data positions of two screen values, in argument order.
    fn r_invert(&self, lo: f64, hi: f64) -> (f64, f64) {
        (self.invert(lo), self.invert(hi))
    }
}

/// Affine map from a data interval onto a screen interval.
///
/// ```
/// use glyphscope_hit::{CoordinateMapper, LinearMapper};
///
/// // A y axis: data 0..10 drawn from pixel 400 up to pixel 0.
/// let y = LinearMapper::new((0.0, 10.0), (400.0, 0.0));
/// assert_eq!(y.compute(2.5), 300.0);
/// assert_eq!(y.r_invert(0.0, 400.0), (10.0, 0.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearMapper {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearMapper {
    /// Creates a mapper taking `domain.0` to `range.0` and `domain.1` to
    /// `range.1`.
    #[must_use]
    pub const fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// The data interval.
    #[must_use]
    pub const fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// The screen interval.
    #[must_use]
    pub const fn range(&self) -> (f64, f64) {
        self.range
    }
}

impl CoordinateMapper for LinearMapper {
    fn compute(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 {
            return r0;
        }
        r0 + (x - d0) / denom * (r1 - r0)
    }

    fn invert(&self, sx: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = r1 - r0;
        if denom == 0.0 {
            return d0;
        }
        d0 + (sx - r0) / denom * (d1 - d0)
    }
}

/// Logarithmic map from a positive data interval onto a screen interval.
///
/// Non-positive data values have no screen position and map to NaN, so rows
/// carrying them drop out of hit testing like any other non-finite row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LogMapper {
    domain: (f64, f64),
    range: (f64, f64),
    base: f64,
}

impl LogMapper {
    /// Creates a base-10 mapper.
    #[must_use]
    pub const fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            domain,
            range,
            base: 10.0,
        }
    }

    /// Sets the logarithm base. Bases that are not finite, positive and
    /// different from one fall back to 10.
    #[must_use]
    pub fn with_base(mut self, base: f64) -> Self {
        self.base = if base.is_finite() && base > 0.0 && base != 1.0 {
            base
        } else {
            10.0
        };
        self
    }

    /// The logarithm base.
    #[must_use]
    pub const fn base(&self) -> f64 {
        self.base
    }

    fn log(&self, x: f64) -> f64 {
        x.ln() / self.base.ln()
    }

    fn log_domain(&self) -> Option<(f64, f64)> {
        let (d0, d1) = self.domain;
        if d0 <= 0.0 || d1 <= 0.0 {
            return None;
        }
        let (l0, l1) = (self.log(d0), self.log(d1));
        (l1 != l0).then_some((l0, l1))
    }
}

impl CoordinateMapper for LogMapper {
    fn compute(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return f64::NAN;
        }
        let (r0, r1) = self.range;
        let Some((l0, l1)) = self.log_domain() else {
            return r0;
        };
        r0 + (self.log(x) - l0) / (l1 - l0) * (r1 - r0)
    }

    fn invert(&self, sx: f64) -> f64 {
        let (r0, r1) = self.range;
        let Some((l0, l1)) = self.log_domain() else {
            return self.domain.0;
        };
        if r1 == r0 {
            return self.domain.0;
        }
        let l = l0 + (sx - r0) / (r1 - r0) * (l1 - l0);
        self.base.powf(l)
    }
}

/// Where a span starts relative to its anchor position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SpanAnchor {
    /// The span runs from the anchor to `anchor + span`.
    #[default]
    Edge,
    /// The span is centered on the anchor.
    Center,
}

/// Screen lengths of data-space spans, each measured at its own anchor.
///
/// Lengths are absolute. A row with a non-finite anchor or span yields NaN.
pub fn sdist(
    mapper: &dyn CoordinateMapper,
    anchors: &[f64],
    spans: &[f64],
    anchor: SpanAnchor,
) -> Vec<f64> {
    anchors
        .iter()
        .zip(spans)
        .map(|(&pt, &span)| {
            let (a, b) = match anchor {
                SpanAnchor::Edge => (pt, pt + span),
                SpanAnchor::Center => (pt - span / 2.0, pt + span / 2.0),
            };
            let (sa, sb) = mapper.r_compute(a, b);
            (sb - sa).abs()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn linear_round_trips() {
        let m = LinearMapper::new((-3.0, 7.0), (20.0, 620.0));
        for x in [-3.0, 0.0, 0.25, 6.9, 1.0e3] {
            assert!(close(m.invert(m.compute(x)), x), "{x}");
        }
    }

    #[test]
    fn reversed_range_reverses_r_invert() {
        let m = LinearMapper::new((0.0, 1.0), (100.0, 0.0));
        let (lo, hi) = m.r_invert(10.0, 90.0);
        assert!(lo > hi);
    }

    #[test]
    fn degenerate_intervals_do_not_divide_by_zero() {
        let m = LinearMapper::new((2.0, 2.0), (0.0, 100.0));
        assert_eq!(m.compute(5.0), 0.0);
        let m = LinearMapper::new((0.0, 1.0), (50.0, 50.0));
        assert_eq!(m.invert(80.0), 0.0);
    }

    #[test]
    fn log_round_trips_and_rejects_non_positive() {
        let m = LogMapper::new((1.0, 1000.0), (0.0, 300.0));
        assert!(close(m.compute(10.0), 100.0));
        for x in [1.0, 3.5, 42.0, 999.0] {
            assert!(close(m.invert(m.compute(x)), x), "{x}");
        }
        assert!(m.compute(0.0).is_nan());
        assert!(m.compute(-1.0).is_nan());
    }

    #[test]
    fn sdist_is_position_dependent_under_log() {
        let m = LogMapper::new((1.0, 100.0), (0.0, 200.0));
        let d = sdist(&m, &[1.0, 10.0], &[9.0, 90.0], SpanAnchor::Edge);
        assert!(close(d[0], 100.0));
        assert!(close(d[1], 100.0));

        let lin = LinearMapper::new((0.0, 10.0), (0.0, 100.0));
        let d = sdist(&lin, &[5.0, f64::NAN], &[2.0, 1.0], SpanAnchor::Center);
        assert_eq!(d[0], 20.0);
        assert!(d[1].is_nan());
        assert_eq!(
            sdist(&lin, &[1.0], &[-2.0], SpanAnchor::Edge),
            vec![20.0]
        );
    }
}
