// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

/// A query geometry that cannot be hit tested.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GeometryError {
    /// The polygon's coordinate arrays differ in length.
    #[error("polygon has {sx} x coordinates but {sy} y coordinates")]
    MismatchedPoly {
        /// Number of x coordinates.
        sx: usize,
        /// Number of y coordinates.
        sy: usize,
    },
    /// The polygon has fewer than three vertices.
    #[error("polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
}
