// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Order-preserving set operations over index lists.
//!
//! Inputs are not assumed to be duplicate-free. Every output keeps the order
//! of first occurrence and contains each element once.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashSet;

/// Elements of `a`, then elements of `b` not already present.
pub(crate) fn union<T: Copy + Eq + Hash>(a: &[T], b: &[T]) -> Vec<T> {
    let mut seen = HashSet::with_capacity(a.len() + b.len());
    a.iter()
        .chain(b)
        .copied()
        .filter(|v| seen.insert(*v))
        .collect()
}

/// Elements of `a` that are also in `b`, in `a`'s order.
pub(crate) fn intersect<T: Copy + Eq + Hash>(a: &[T], b: &[T]) -> Vec<T> {
    let keep: HashSet<T> = b.iter().copied().collect();
    let mut seen = HashSet::with_capacity(a.len());
    a.iter()
        .copied()
        .filter(|v| keep.contains(v) && seen.insert(*v))
        .collect()
}

/// Elements of `a` that are not in `b`, in `a`'s order.
pub(crate) fn difference<T: Copy + Eq + Hash>(a: &[T], b: &[T]) -> Vec<T> {
    let drop: HashSet<T> = b.iter().copied().collect();
    let mut seen = HashSet::with_capacity(a.len());
    a.iter()
        .copied()
        .filter(|v| !drop.contains(v) && seen.insert(*v))
        .collect()
}

/// Key-wise union: every key of either map, with segment lists unioned.
pub(crate) fn union_map(
    a: &BTreeMap<usize, Vec<usize>>,
    b: &BTreeMap<usize, Vec<usize>>,
) -> BTreeMap<usize, Vec<usize>> {
    let mut out = a.clone();
    for (row, segments) in b {
        let merged = match out.get(row) {
            Some(existing) => union(existing, segments),
            None => union(segments, &[]),
        };
        out.insert(*row, merged);
    }
    out
}
