// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raster images placed in data space.

use alloc::vec::Vec;
use core::fmt;

use glyphscope_index::{Aabb2D, SpatialIndex};
use glyphscope_property::{
    ColumnSource, HasProps, PropertyDef, PropertyKey, PropertyKind, PropertyStore, PropertyTable,
};
use glyphscope_selection::{GlyphId, ImageIndex, Selection};
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

use crate::geometry::PointGeometry;
use crate::glyph::{Glyph, HitContext, column};
use crate::mapper::CoordinateMapper;

/// Pixel dimensions shared by every image of a glyph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImageShape {
    /// Pixels per image row.
    pub width: usize,
    /// Number of image rows.
    pub height: usize,
}

#[derive(Clone, Copy, Debug)]
struct ImageKeys {
    image: PropertyKey<Vec<f64>>,
    x: PropertyKey<f64>,
    y: PropertyKey<f64>,
    dw: PropertyKey<f64>,
    dh: PropertyKey<f64>,
}

/// Images anchored at their lower left corner `(x, y)`, `dw` by `dh` in data
/// units.
///
/// Each row's `image` column holds the pixels flattened row by row. Without
/// an [`ImageShape`] every image is taken as a single pixel row.
pub struct Image {
    id: GlyphId,
    props: PropertyStore,
    keys: ImageKeys,
    shape: Option<ImageShape>,
    lengths: Vec<usize>,
    x: Vec<f64>,
    y: Vec<f64>,
    dw: Vec<f64>,
    dh: Vec<f64>,
    index: SpatialIndex,
}

impl Image {
    /// Creates an image glyph reading columns `image`, `x`, `y`, `dw` and
    /// `dh`.
    #[must_use]
    pub fn new() -> Self {
        let mut table = PropertyTable::new();
        let keys = ImageKeys {
            image: table.define("image", PropertyDef::field(PropertyKind::Number, "image")),
            x: table.define("x", PropertyDef::field(PropertyKind::Coordinate, "x")),
            y: table.define("y", PropertyDef::field(PropertyKind::Coordinate, "y")),
            dw: table.define("dw", PropertyDef::field(PropertyKind::Distance, "dw")),
            dh: table.define("dh", PropertyDef::field(PropertyKind::Distance, "dh")),
        };
        Self {
            id: GlyphId::next(),
            props: table.instantiate(),
            keys,
            shape: None,
            lengths: Vec::new(),
            x: Vec::new(),
            y: Vec::new(),
            dw: Vec::new(),
            dh: Vec::new(),
            index: SpatialIndex::default(),
        }
    }

    /// Sets the pixel dimensions of every image.
    #[must_use]
    pub fn with_shape(mut self, shape: ImageShape) -> Self {
        self.shape = Some(shape);
        self
    }

    /// The configured pixel dimensions, if any.
    #[must_use]
    pub fn shape(&self) -> Option<ImageShape> {
        self.shape
    }

    fn shape_of(&self, row: usize) -> ImageShape {
        self.shape.unwrap_or_else(|| ImageShape {
            width: self.lengths.get(row).copied().unwrap_or(0),
            height: 1,
        })
    }

    /// The pixel under a data point, clamped to the image.
    fn pixel(&self, row: usize, x: f64, y: f64) -> Option<ImageIndex> {
        let ImageShape { width, height } = self.shape_of(row);
        if width == 0 || height == 0 {
            return None;
        }
        let i = offset((x - self.x[row]) / self.dw[row], width);
        let j = offset((y - self.y[row]) / self.dh[row], height);
        Some(ImageIndex {
            index: row,
            i,
            j,
            flat_index: j * width + i,
        })
    }
}

/// Cell of a fraction along `n` cells; the far edge belongs to the last cell.
#[expect(
    clippy::cast_possible_truncation,
    reason = "the cell is clamped to n - 1 before and after the cast"
)]
fn offset(fraction: f64, n: usize) -> usize {
    let last = n - 1;
    let cell = (fraction * n as f64).floor();
    if cell.is_nan() || cell <= 0.0 {
        0
    } else if cell >= last as f64 {
        last
    } else {
        cell as usize
    }
}

model_impls!(Image);

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("id", &self.id)
            .field("shape", &self.shape)
            .field("rows", &self.x.len())
            .finish_non_exhaustive()
    }
}

impl Glyph for Image {
    fn id(&self) -> GlyphId {
        self.id
    }

    fn kind_name(&self) -> &'static str {
        "image"
    }

    fn set_data(&mut self, source: &dyn ColumnSource, rows: &[usize]) {
        let k = self.keys;
        let images = column(&self.props, k.image, source, rows);
        self.lengths = images.iter().map(Vec::len).collect();
        self.x = column(&self.props, k.x, source, rows);
        self.y = column(&self.props, k.y, source, rows);
        self.dw = column(&self.props, k.dw, source, rows);
        self.dh = column(&self.props, k.dh, source, rows);
        let boxes = (0..self.x.len()).map(|i| {
            let (x, y) = (self.x[i], self.y[i]);
            let (dw, dh) = (
                self.dw.get(i).copied().unwrap_or(f64::NAN),
                self.dh.get(i).copied().unwrap_or(f64::NAN),
            );
            Aabb2D::from_corners(x, y, x + dw, y + dh)
        });
        self.index = SpatialIndex::build(boxes);
    }

    fn map_data(&mut self, _x: &dyn CoordinateMapper, _y: &dyn CoordinateMapper) {}

    fn index(&self) -> &SpatialIndex {
        &self.index
    }

    fn hit_point(&self, geometry: &PointGeometry, ctx: &HitContext<'_>) -> Option<Selection> {
        let (x, y) = ctx.data_point(geometry.sx, geometry.sy);
        let mut result = Selection::new();
        for row in self.index.query_point(x, y) {
            if let Some(pixel) = self.pixel(row, x, y) {
                result = result.with_image_index(pixel);
            }
        }
        Some(result)
    }
}
