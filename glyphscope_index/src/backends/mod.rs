// Copyright 2025 the Glyphscope Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Built-in backends.

mod flatvec;
mod packed;

pub use flatvec::FlatVec;
pub use packed::{NODE_SIZE, PackedRTree};
