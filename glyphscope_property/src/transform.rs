// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Post-materialization transforms for numeric specs.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;

/// A numeric transform applied after unit conversion.
pub trait Transform: fmt::Debug {
    /// Transforms one value.
    fn compute(&self, x: f64) -> f64;

    /// Transforms a whole column.
    ///
    /// Overriding this allows transforms that depend on the row position.
    fn v_compute(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.compute(x)).collect()
    }
}

/// Shifts every value by a constant.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Dodge {
    value: f64,
}

impl Dodge {
    /// Creates a dodge by `value`.
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Self { value }
    }
}

impl Transform for Dodge {
    fn compute(&self, x: f64) -> f64 {
        x + self.value
    }
}

/// Piecewise-linear interpolation through a set of control points.
///
/// Inputs outside the control range map to NaN, or to the nearest end value
/// when clipping is enabled.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    clip: bool,
}

impl LinearInterpolator {
    /// Creates an interpolator from `(x, y)` control points.
    ///
    /// Points are sorted by `x`; points with a non-finite coordinate are dropped.
    #[must_use]
    pub fn new(points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let mut points: Vec<(f64, f64)> = points
            .into_iter()
            .filter(|(x, y)| x.is_finite() && y.is_finite())
            .collect();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        let (xs, ys) = points.into_iter().unzip();
        Self {
            xs,
            ys,
            clip: true,
        }
    }

    /// Sets whether out-of-range inputs clamp to the end values.
    #[must_use]
    pub fn clip(mut self, clip: bool) -> Self {
        self.clip = clip;
        self
    }
}

impl Transform for LinearInterpolator {
    fn compute(&self, x: f64) -> f64 {
        let (Some(&x0), Some(&xn)) = (self.xs.first(), self.xs.last()) else {
            return f64::NAN;
        };
        if x.is_nan() {
            return f64::NAN;
        }
        if x < x0 || x > xn {
            if !self.clip {
                return f64::NAN;
            }
            return if x < x0 { self.ys[0] } else { self.ys[self.ys.len() - 1] };
        }
        let hi = self.xs.partition_point(|&v| v < x);
        if self.xs[hi] == x {
            return self.ys[hi];
        }
        let lo = hi - 1;
        let t = (x - self.xs[lo]) / (self.xs[hi] - self.xs[lo]);
        self.ys[lo] + t * (self.ys[hi] - self.ys[lo])
    }
}

/// A transform backed by closures.
#[derive(Clone)]
pub struct CustomTransform {
    func: Rc<dyn Fn(f64) -> f64>,
    v_func: Option<Rc<dyn Fn(&[f64]) -> Vec<f64>>>,
}

impl CustomTransform {
    /// Creates a transform from a scalar function.
    #[must_use]
    pub fn new(func: impl Fn(f64) -> f64 + 'static) -> Self {
        Self {
            func: Rc::new(func),
            v_func: None,
        }
    }

    /// Supplies a column-wide function used by [`Transform::v_compute`].
    #[must_use]
    pub fn with_vectorized(mut self, v_func: impl Fn(&[f64]) -> Vec<f64> + 'static) -> Self {
        self.v_func = Some(Rc::new(v_func));
        self
    }
}

impl Transform for CustomTransform {
    fn compute(&self, x: f64) -> f64 {
        (self.func)(x)
    }

    fn v_compute(&self, xs: &[f64]) -> Vec<f64> {
        match &self.v_func {
            Some(v_func) => v_func(xs),
            None => xs.iter().map(|&x| (self.func)(x)).collect(),
        }
    }
}

impl fmt::Debug for CustomTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomTransform")
            .field("vectorized", &self.v_func.is_some())
            .finish_non_exhaustive()
    }
}
