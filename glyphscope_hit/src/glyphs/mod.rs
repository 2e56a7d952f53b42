// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Glyph families.
//!
//! | Family | point | span | rect | poly |
//! |---|---|---|---|---|
//! | [`Circle`], [`Scatter`] | disk | disk | center | center |
//! | [`Wedge`], [`AnnularWedge`], [`Annulus`] | sector | | center | center |
//! | [`Rect`] | oriented box | oriented box | center | center |
//! | [`Quad`], [`VBar`], [`HBar`] | box | box | overlap | |
//! | [`Line`], [`MultiLine`] | stroke | crossing | | |
//! | [`Patch`], [`VArea`], [`HArea`] | fill | | | |
//! | [`Patches`] | fill | | all vertices | all vertices |
//! | [`Image`] | pixel | | | |
//!
//! Blank cells log a warning and return `None`.

/// `Default` through `new()` and `HasProps` through a `props` field.
///
/// Expects `HasProps` and `PropertyStore` in scope.
macro_rules! model_impls {
    ($ty:ident) => {
        impl Default for $ty {
            fn default() -> Self {
                Self::new()
            }
        }

        impl HasProps for $ty {
            fn properties(&self) -> &PropertyStore {
                &self.props
            }

            fn properties_mut(&mut self) -> &mut PropertyStore {
                &mut self.props
            }
        }
    };
}

mod area;
mod image;
mod line;
mod radial;
mod rect;
mod wedge;

pub use area::{HArea, Patch, Patches, VArea};
pub use image::{Image, ImageShape};
pub use line::{Line, MultiLine};
pub use radial::{Circle, RadiusDimension, Scatter};
pub use rect::{HBar, Quad, Rect, VBar};
pub use wedge::{AnnularWedge, Annulus, Wedge};
