use std::path::Path;

use tracing::debug;

use super::{probe, MatrixError, ProbeLimits, EMPTY_KEY};
use crate::codec::{ints_to_be_bytes, read_i32_at};
use crate::dict::Blob;

enum Ints {
    Owned(Vec<i32>),
    /// Big-endian words, usually a mapped container section.
    Stored(Blob),
}

/// Read-only matrix image.
pub struct MatrixImage {
    ints: Ints,
    limits: ProbeLimits,
}

impl MatrixImage {
    pub fn from_ints(ints: Vec<i32>) -> Self {
        Self {
            ints: Ints::Owned(ints),
            limits: ProbeLimits::default(),
        }
    }

    /// Wrap a big-endian image after checking the header against its size.
    pub fn from_blob(blob: Blob) -> Result<Self, MatrixError> {
        let image = Self {
            ints: Ints::Stored(blob),
            limits: ProbeLimits::default(),
        };
        image.validate()?;
        Ok(image)
    }

    pub fn from_be_bytes(bytes: Vec<u8>) -> Result<Self, MatrixError> {
        Self::from_blob(Blob::from_vec(bytes))
    }

    pub fn open(path: &Path) -> Result<Self, MatrixError> {
        let image = Self::from_blob(Blob::map(path)?)?;
        debug!(
            path = %path.display(),
            rows = image.row_slots(),
            cells = image.cell_slots(),
            "opened matrix image"
        );
        Ok(image)
    }

    pub fn with_limits(mut self, limits: ProbeLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn to_be_bytes(&self) -> Vec<u8> {
        match &self.ints {
            Ints::Owned(v) => ints_to_be_bytes(v),
            Ints::Stored(b) => b[..self.int_len() * 4].to_vec(),
        }
    }

    pub fn to_ints(&self) -> Vec<i32> {
        (0..self.int_len()).filter_map(|i| self.int(i)).collect()
    }

    #[inline]
    fn int(&self, index: usize) -> Option<i32> {
        match &self.ints {
            Ints::Owned(v) => v.get(index).copied(),
            Ints::Stored(b) => read_i32_at(b, index),
        }
    }

    fn slot_count(&self, index: usize) -> usize {
        self.int(index)
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0)
    }

    pub fn row_slots(&self) -> usize {
        self.slot_count(0)
    }

    pub fn cell_slots(&self) -> usize {
        self.slot_count(1)
    }

    /// Ints covered by the header, excluding trailing padding.
    fn int_len(&self) -> usize {
        2 + (self.row_slots() + self.cell_slots()) * 2
    }

    fn validate(&self) -> Result<(), MatrixError> {
        let available = match &self.ints {
            Ints::Owned(v) => v.len(),
            Ints::Stored(b) => b.len() / 4,
        };
        let (Some(rows), Some(cells)) = (self.int(0), self.int(1)) else {
            return Err(MatrixError::Malformed("missing header".into()));
        };
        if rows < 0 || cells < 0 {
            return Err(MatrixError::Malformed(format!(
                "negative slot count ({rows}, {cells})"
            )));
        }
        if self.int_len() > available {
            return Err(MatrixError::Malformed(format!(
                "header needs {} ints, image has {available}",
                self.int_len()
            )));
        }
        Ok(())
    }

    /// Value at `(row, col)`, 0 when the pair is absent.
    pub fn peek(&self, row: i32, col: i32) -> i32 {
        self.lookup(row, col).unwrap_or(0)
    }

    fn lookup(&self, row: i32, col: i32) -> Option<i32> {
        if row == EMPTY_KEY || col == EMPTY_KEY {
            return None;
        }
        let rows = self.row_slots();
        if rows == 0 {
            return None;
        }
        let h = self.find_slot(row, rows, |h| 2 + h * 2)?;

        let shift = self.int(2 + h * 2 + 1)?;
        let next_shift = if h == rows - 1 {
            self.int(1)?
        } else {
            self.int(2 + (h + 1) * 2 + 1)?
        };
        let width = usize::try_from(next_shift - shift).ok().filter(|&w| w > 0)?;
        let shift = usize::try_from(shift).ok()?;

        let base = 2 + rows * 2;
        let c = self.find_slot(col, width, |c| base + (shift + c) * 2)?;
        self.int(base + (shift + c) * 2 + 1)
    }

    /// Follow the probe sequence for `key` until it matches, hits an empty
    /// slot, or runs out of retries.
    fn find_slot(&self, key: i32, size: usize, pos: impl Fn(usize) -> usize) -> Option<usize> {
        for nth in 0..=self.limits.max_failure {
            let h = probe(key, size, nth);
            match self.int(pos(h))? {
                k if k == key => return Some(h),
                EMPTY_KEY => return None,
                _ => {}
            }
        }
        None
    }
}

impl std::fmt::Debug for MatrixImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatrixImage")
            .field("row_slots", &self.row_slots())
            .field("cell_slots", &self.cell_slots())
            .finish()
    }
}
