//! Two-level hashed sparse matrix.
//!
//! `SparseMatrix` is the mutable build-time form: ordered rows of ordered
//! cells. `make_matrix` crams the row index and every row into open-addressed
//! arrays, and `image` flattens them into the int array that
//! `MatrixImage::peek` reads back, either owned or memory-mapped.
//!
//! Image layout: `[row_slots, cell_slots, (row, shift) * row_slots,
//! (col, value) * cell_slots]`. Empty row slots are `(-1, shift)` and empty
//! cells `(-1, -1)`, so `-1` cannot be used as a row or column key.

mod image;
mod sparse;
#[cfg(test)]
mod tests;

pub use image::MatrixImage;
pub use sparse::{Cell, SparseMatrix};

use std::io;

use crate::settings::settings;

/// Marks an empty slot in crammed arrays and images.
pub const EMPTY_KEY: i32 = -1;

#[derive(Debug, thiserror::Error)]
pub enum MatrixError {
    #[error("crammed array of {elements} elements still collides after {rounds} growth rounds")]
    GrowthLimit { elements: usize, rounds: usize },

    #[error("key {0} is reserved for empty slots")]
    ReservedKey(i32),

    #[error("malformed matrix image: {0}")]
    Malformed(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Probe bounds shared by the builder and every reader of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeLimits {
    /// Retries after the first probe before giving up on a slot.
    pub max_failure: usize,
    /// Times a crammed array may grow before the build fails.
    pub max_growth_rounds: usize,
}

impl Default for ProbeLimits {
    fn default() -> Self {
        let s = &settings().matrix;
        Self {
            max_failure: s.max_failure,
            max_growth_rounds: s.max_growth_rounds,
        }
    }
}

/// Probe position `nth` for `key` in a table of `size` slots.
#[inline]
pub(crate) fn probe(key: i32, size: usize, nth: usize) -> usize {
    if size == 0 {
        return 0;
    }
    let v = (key as i64 + nth as i64 * 113).unsigned_abs();
    (v % size as u64) as usize
}
