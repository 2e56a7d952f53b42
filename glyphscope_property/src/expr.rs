// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Computed expressions evaluated against a whole source.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::fmt;

use crate::source::{Column, ColumnSource};

/// A per-row computation over a source.
///
/// The result must have one entry per source row.
pub trait Expression<T>: fmt::Debug {
    /// Evaluates the expression for every row of `source`.
    fn v_compute(&self, source: &dyn ColumnSource) -> Vec<T>;
}

/// Reads a numeric column, padding or truncating to `len`.
///
/// A missing or non-numeric column degrades to all NaN with a warning.
pub(crate) fn numeric_column(source: &dyn ColumnSource, field: &str, len: usize) -> Vec<f64> {
    match source.get_column(field).and_then(Column::as_numbers) {
        Some(values) => {
            let mut out: Vec<f64> = values.iter().copied().take(len).collect();
            out.resize(len, f64::NAN);
            out
        }
        None => {
            tracing::warn!(field, "expected a numeric column; substituting NaN");
            vec![f64::NAN; len]
        }
    }
}

/// Row-wise sum of several numeric fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stack {
    fields: Vec<String>,
}

impl Stack {
    /// Creates a stack over `fields`, summed in order.
    #[must_use]
    pub fn new<S: Into<String>>(fields: impl IntoIterator<Item = S>) -> Self {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }
}

impl Expression<f64> for Stack {
    fn v_compute(&self, source: &dyn ColumnSource) -> Vec<f64> {
        let len = source.get_length().unwrap_or(0);
        let mut out = vec![0.0; len];
        for field in &self.fields {
            for (acc, v) in out.iter_mut().zip(numeric_column(source, field, len)) {
                *acc += v;
            }
        }
        out
    }
}

/// Cumulative sum of one numeric field.
///
/// With `include_zero`, the sum starts at zero: row `i` holds the sum of rows
/// `0..i` instead of `0..=i`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CumSum {
    field: String,
    include_zero: bool,
}

impl CumSum {
    /// Creates a cumulative sum over `field`.
    #[must_use]
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            include_zero: false,
        }
    }

    /// Starts the running total at zero.
    #[must_use]
    pub fn include_zero(mut self, include_zero: bool) -> Self {
        self.include_zero = include_zero;
        self
    }
}

impl Expression<f64> for CumSum {
    fn v_compute(&self, source: &dyn ColumnSource) -> Vec<f64> {
        let len = source.get_length().unwrap_or(0);
        let values = numeric_column(source, &self.field, len);
        let mut total = 0.0;
        values
            .into_iter()
            .map(|v| {
                let before = total;
                total += v;
                if self.include_zero { before } else { total }
            })
            .collect()
    }
}
