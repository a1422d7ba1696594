//! Per-user learning store.
//!
//! Everything a commit teaches the engine lives here: swapped candidate
//! pairs, segments the user stretched, multi-segment sequences (ochaire),
//! candidate and suffix history, and word relations. The store only
//! changes through [`LearningOp`]s so the same operations can be appended
//! to the commit log and replayed on open.

mod persistence;
#[cfg(test)]
mod tests;
pub mod wal;

pub use wal::{open_with_wal, LearningWal};

use std::collections::HashSet;
use std::io;

use serde::{Deserialize, Serialize};

use crate::settings::settings;

const MAGIC: &[u8; 4] = b"BSLS";
const VERSION: u8 = 1;

#[derive(Debug, thiserror::Error)]
pub enum LearningError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid magic bytes (expected BSLS)")]
    InvalidMagic,

    #[error("unsupported version: {0}")]
    UnsupportedVersion(u8),

    #[error("serialization error: {0}")]
    Serialize(bincode::Error),

    #[error("deserialization error: {0}")]
    Deserialize(bincode::Error),
}

/// Rows keyed by string, most recently touched first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section<V> {
    rows: Vec<(String, V)>,
}

impl<V> Default for Section<V> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<V> Section<V> {
    pub fn get(&self, key: &str) -> Option<&V> {
        self.rows.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Move `key` to the front, creating it with `init` if absent.
    pub fn touch(&mut self, key: &str, init: impl FnOnce() -> V) -> &mut V {
        let row = match self.rows.iter().position(|(k, _)| k == key) {
            Some(i) => self.rows.remove(i),
            None => (key.to_string(), init()),
        };
        self.rows.insert(0, row);
        &mut self.rows[0].1
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        let i = self.rows.iter().position(|(k, _)| k == key)?;
        Some(self.rows.remove(i).1)
    }

    /// Drop the least recently touched rows beyond `max`.
    pub fn truncate(&mut self, max: usize) {
        self.rows.truncate(max);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.rows.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// One segment of a learned multi-segment sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OchaireSegment {
    /// Reading length in characters.
    pub len: usize,
    pub surface: String,
}

/// A single mutation of the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LearningOp {
    /// The core word `from` was ranked first but `to` was committed.
    IndepPair { from: String, to: String },
    /// The segment read as `from` was stretched to `to`.
    ExpandPair { from: String, to: String },
    /// Forget every learned sequence keyed by one of these readings.
    ReleaseOchaire { keys: Vec<String> },
    Ochaire {
        key: String,
        segments: Vec<OchaireSegment>,
    },
    CandHistory { reading: String, surface: String },
    SuffixHistory { reading: String, surface: String },
    /// Two words committed near each other.
    Relation { from: i32, to: i32 },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningStore {
    indep_pairs: Section<String>,
    expand_pairs: Section<Vec<String>>,
    ochaire: Section<Vec<OchaireSegment>>,
    cand_history: Section<Vec<String>>,
    suffix_history: Section<String>,
    relations: HashSet<(i32, i32)>,
}

impl LearningStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, op: &LearningOp) {
        let s = &settings().ordering;
        match op {
            LearningOp::IndepPair { from, to } => {
                // A pair pointing back at its own source closes a loop; drop both.
                if self.indep_pairs.get(to).is_some_and(|back| back == from) {
                    self.indep_pairs.remove(to);
                    self.indep_pairs.remove(from);
                    return;
                }
                *self.indep_pairs.touch(from, String::new) = to.clone();
            }
            LearningOp::ExpandPair { from, to } => {
                let targets = self.expand_pairs.touch(from, Vec::new);
                if !targets.contains(to) {
                    targets.push(to.clone());
                }
            }
            LearningOp::ReleaseOchaire { keys } => {
                for key in keys {
                    self.ochaire.remove(key);
                }
            }
            LearningOp::Ochaire { key, segments } => {
                if key.chars().count() < s.max_ochaire_len {
                    *self.ochaire.touch(key, Vec::new) = segments.clone();
                }
            }
            LearningOp::CandHistory { reading, surface } => {
                let row = self.cand_history.touch(reading, Vec::new);
                row.insert(0, surface.clone());
                row.truncate(s.history_depth);
            }
            LearningOp::SuffixHistory { reading, surface } => {
                *self.suffix_history.touch(reading, String::new) = surface.clone();
            }
            LearningOp::Relation { from, to } => {
                self.relations.insert((*from, *to));
            }
        }
    }

    /// Apply a commit's operations, then age every bounded section.
    pub fn apply_all(&mut self, ops: &[LearningOp]) {
        for op in ops {
            self.apply(op);
        }
        self.truncate();
    }

    fn truncate(&mut self) {
        let s = &settings().ordering;
        self.indep_pairs.truncate(s.max_indep_pair);
        self.expand_pairs.truncate(s.max_expand_pairs);
        self.ochaire.truncate(s.max_ochaire_entries);
        self.cand_history.truncate(s.max_history_entries);
        self.suffix_history.truncate(s.max_history_entries);
    }

    /// Committed replacement for a first-ranked core word.
    ///
    /// Follows one further hop (`a -> b -> c` yields `c`) unless that hop
    /// leads back to `from`.
    pub fn swap_target(&self, from: &str) -> Option<&str> {
        let first = self.indep_pairs.get(from)?;
        match self.indep_pairs.get(first) {
            None => Some(first),
            Some(next) if next == from => None,
            Some(next) => Some(next),
        }
    }

    /// Longer readings a segment read as `reading` was stretched to.
    pub fn expand_targets(&self, reading: &str) -> &[String] {
        self.expand_pairs.get(reading).map_or(&[], Vec::as_slice)
    }

    pub fn ochaire(&self, key: &str) -> Option<&[OchaireSegment]> {
        self.ochaire.get(key).map(Vec::as_slice)
    }

    /// Recently committed surfaces for a segment reading, newest first.
    pub fn cand_history(&self, reading: &str) -> Option<&[String]> {
        self.cand_history.get(reading).map(Vec::as_slice)
    }

    pub fn suffix_history(&self, reading: &str) -> Option<&str> {
        self.suffix_history.get(reading).map(String::as_str)
    }

    pub fn has_relation(&self, from: i32, to: i32) -> bool {
        self.relations.contains(&(from, to))
    }

    pub fn ochaire_len(&self) -> usize {
        self.ochaire.len()
    }

    pub fn indep_pair_len(&self) -> usize {
        self.indep_pairs.len()
    }

    pub fn expand_pair_len(&self) -> usize {
        self.expand_pairs.len()
    }

    pub fn history_len(&self) -> usize {
        self.cand_history.len()
    }

    pub fn relation_len(&self) -> usize {
        self.relations.len()
    }
}
