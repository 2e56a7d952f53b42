// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Provenance identifiers.

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

static NEXT_VIEW: AtomicU64 = AtomicU64::new(1);
static NEXT_GLYPH: AtomicU64 = AtomicU64::new(1);

/// Identity of a renderer view, i.e. one glyph drawn from one source.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ViewId(u64);

impl ViewId {
    /// Allocates a fresh, process-unique id.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_VIEW.fetch_add(1, Ordering::Relaxed))
    }

    /// Wraps a raw id.
    #[must_use]
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id.
    #[must_use]
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ViewId({})", self.0)
    }
}

/// Identity of a glyph model.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GlyphId(u64);

impl GlyphId {
    /// Allocates a fresh, process-unique id.
    #[must_use]
    pub fn next() -> Self {
        Self(NEXT_GLYPH.fetch_add(1, Ordering::Relaxed))
    }

    /// Wraps a raw id.
    #[must_use]
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw id.
    #[must_use]
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for GlyphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GlyphId({})", self.0)
    }
}
