use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::{FeatureError, FeatureList, MAX_FEATURES};
use crate::codec::{ints_to_be_bytes, read_i32_at};
use crate::dict::Blob;

/// Ints per table row: the feature key followed by the two counters.
pub const ROW_INTS: usize = 16;

/// Counters stored with a feature row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeatureFreq {
    pub neg: i32,
    pub pos: i32,
}

impl FeatureFreq {
    /// `1 - neg / (pos + neg)`, or `None` when both counters are zero.
    pub fn probability(self) -> Option<f64> {
        let total = self.pos as f64 + self.neg as f64;
        if total <= 0.0 {
            return None;
        }
        Some(1.0 - self.neg as f64 / total)
    }
}

/// Sorted feature-frequency table, one header row then fixed-width rows.
///
/// Header: `[ROW_INTS, rows, 0 ...]`. Each row holds [`MAX_FEATURES`] codes
/// (sorted, zero-padded) then `neg` and `pos`. Rows are ordered
/// lexicographically by their codes so lookups can binary search.
pub struct FeatureTable {
    blob: Blob,
    rows: usize,
}

impl FeatureTable {
    pub fn from_blob(blob: Blob) -> Result<Self, FeatureError> {
        let header = |i| {
            read_i32_at(&blob, i)
                .ok_or_else(|| FeatureError::Malformed("missing header row".into()))
        };
        let rows = header(1)?;
        let rows = usize::try_from(rows)
            .map_err(|_| FeatureError::Malformed(format!("negative row count {rows}")))?;
        let needed = (rows + 1) * ROW_INTS * 4;
        if blob.len() < needed {
            return Err(FeatureError::Malformed(format!(
                "{rows} rows need {needed} bytes, table has {}",
                blob.len()
            )));
        }
        Ok(Self { blob, rows })
    }

    pub fn from_be_bytes(bytes: Vec<u8>) -> Result<Self, FeatureError> {
        Self::from_blob(Blob::from_vec(bytes))
    }

    /// A table with no rows; every lookup misses.
    pub fn empty() -> Self {
        Self {
            blob: Blob::from_vec(ints_to_be_bytes(&[0; ROW_INTS])),
            rows: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    fn cell(&self, row: usize, col: usize) -> i32 {
        read_i32_at(&self.blob, (row + 1) * ROW_INTS + col).unwrap_or(0)
    }

    fn compare_row(&self, row: usize, key: &[i32; MAX_FEATURES]) -> Ordering {
        (0..MAX_FEATURES)
            .map(|i| self.cell(row, i).cmp(&key[i]))
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    /// Counters for the row matching `features` exactly, which must be sorted.
    pub fn find(&self, features: &FeatureList) -> Option<FeatureFreq> {
        let key = features.key();
        let (mut lo, mut hi) = (0, self.rows);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            match self.compare_row(mid, &key) {
                Ordering::Less => lo = mid + 1,
                Ordering::Greater => hi = mid,
                Ordering::Equal => {
                    return Some(FeatureFreq {
                        neg: self.cell(mid, MAX_FEATURES),
                        pos: self.cell(mid, MAX_FEATURES + 1),
                    })
                }
            }
        }
        None
    }

    /// Rows in table order, for inspection tools.
    pub fn rows(&self) -> impl Iterator<Item = ([i32; MAX_FEATURES], FeatureFreq)> + '_ {
        (0..self.rows).map(move |r| {
            let mut key = [0; MAX_FEATURES];
            for (i, k) in key.iter_mut().enumerate() {
                *k = self.cell(r, i);
            }
            let freq = FeatureFreq {
                neg: self.cell(r, MAX_FEATURES),
                pos: self.cell(r, MAX_FEATURES + 1),
            };
            (key, freq)
        })
    }
}

impl std::fmt::Debug for FeatureTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureTable").field("rows", &self.rows).finish()
    }
}

/// Accumulates counters per feature key and writes a [`FeatureTable`] image.
#[derive(Debug, Default)]
pub struct FeatureTableBuilder {
    rows: BTreeMap<[i32; MAX_FEATURES], FeatureFreq>,
}

impl FeatureTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add to the counters of `features` (sorted before use).
    pub fn add(&mut self, features: &FeatureList, neg: i32, pos: i32) {
        let mut sorted = features.clone();
        sorted.sort();
        let freq = self.rows.entry(sorted.key()).or_default();
        freq.neg += neg;
        freq.pos += pos;
    }

    /// Parse `neg pos code...` lines; `#` starts a comment line.
    pub fn from_text(text: &str) -> Result<Self, FeatureError> {
        let mut builder = Self::new();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let ints = line
                .split_whitespace()
                .map(|t| t.parse::<i32>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| FeatureError::Malformed(format!("line {}: {e}", lineno + 1)))?;
            let [neg, pos, codes @ ..] = ints.as_slice() else {
                return Err(FeatureError::Malformed(format!(
                    "line {}: expected `neg pos code...`",
                    lineno + 1
                )));
            };
            let mut fl = FeatureList::new();
            for &code in codes {
                fl.add(code)?;
            }
            builder.add(&fl, *neg, *pos);
        }
        Ok(builder)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn to_ints(&self) -> Vec<i32> {
        let mut ints = vec![0; ROW_INTS];
        ints[0] = ROW_INTS as i32;
        ints[1] = self.rows.len() as i32;
        for (key, freq) in &self.rows {
            ints.extend_from_slice(key);
            ints.push(freq.neg);
            ints.push(freq.pos);
        }
        ints
    }

    pub fn to_be_bytes(&self) -> Vec<u8> {
        ints_to_be_bytes(&self.to_ints())
    }

    pub fn build(&self) -> FeatureTable {
        FeatureTable {
            blob: Blob::from_vec(self.to_be_bytes()),
            rows: self.rows.len(),
        }
    }
}

/// Sorted hashes of words that only weakly bind to what follows.
///
/// Image: a 16-int header whose second int is the count, then the hashes.
#[derive(Debug, Clone, Default)]
pub struct WeakWords {
    hashes: Vec<i32>,
}

impl WeakWords {
    pub fn new(mut hashes: Vec<i32>) -> Self {
        hashes.sort_unstable();
        hashes.dedup();
        Self { hashes }
    }

    pub fn from_be_bytes(bytes: &[u8]) -> Result<Self, FeatureError> {
        let count = read_i32_at(bytes, 1)
            .ok_or_else(|| FeatureError::Malformed("weak word header".into()))?;
        let count = usize::try_from(count)
            .map_err(|_| FeatureError::Malformed(format!("negative weak word count {count}")))?;
        let hashes = (0..count)
            .map(|i| read_i32_at(bytes, ROW_INTS + i))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| FeatureError::Malformed(format!("truncated list of {count} hashes")))?;
        Ok(Self::new(hashes))
    }

    pub fn to_be_bytes(&self) -> Vec<u8> {
        let mut ints = vec![0; ROW_INTS];
        ints[0] = ROW_INTS as i32;
        ints[1] = self.hashes.len() as i32;
        ints.extend_from_slice(&self.hashes);
        ints_to_be_bytes(&ints)
    }

    pub fn contains(&self, hash: i32) -> bool {
        self.hashes.binary_search(&hash).is_ok()
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }
}
