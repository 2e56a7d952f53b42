// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flat vector backend with linear scans. Small and simple; good for tiny sets.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::backend::Backend;
use crate::types::Aabb2D;

/// Flat vector backend with linear scans.
pub struct FlatVec<T: Copy + PartialOrd + Debug> {
    entries: Vec<Option<Aabb2D<T>>>,
}

impl<T: Copy + PartialOrd + Debug> Default for FlatVec<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T: Copy + PartialOrd + Debug> Debug for FlatVec<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.entries.len();
        let alive = self.entries.iter().filter(|e| e.is_some()).count();
        f.debug_struct("FlatVec")
            .field("total_slots", &total)
            .field("alive", &alive)
            .finish_non_exhaustive()
    }
}

impl<T: Copy + PartialOrd + Debug> Backend<T> for FlatVec<T> {
    fn build(boxes: &[Option<Aabb2D<T>>]) -> Self {
        Self {
            entries: boxes.to_vec(),
        }
    }

    fn visit_point<F: FnMut(usize)>(&self, x: T, y: T, mut f: F) {
        for (i, slot) in self.entries.iter().enumerate() {
            if let Some(a) = slot.as_ref()
                && a.contains_point(x, y)
            {
                f(i);
            }
        }
    }

    fn visit_rect<F: FnMut(usize)>(&self, rect: Aabb2D<T>, mut f: F) {
        for (i, slot) in self.entries.iter().enumerate() {
            if let Some(a) = slot.as_ref()
                && a.overlaps(&rect)
            {
                f(i);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn skips_missing_slots() {
        let backend = FlatVec::build(&[
            Some(Aabb2D::new(0.0, 0.0, 1.0, 1.0)),
            None,
            Some(Aabb2D::new(0.5, 0.5, 2.0, 2.0)),
        ]);
        assert_eq!(backend.query_point(0.75, 0.75).collect::<Vec<_>>(), vec![0, 2]);
        assert_eq!(
            backend
                .query_rect(Aabb2D::new(1.5, 1.5, 3.0, 3.0))
                .collect::<Vec<_>>(),
            vec![2]
        );
    }
}
