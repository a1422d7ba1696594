use serde::{Deserialize, Serialize};

use crate::wtype::{pos, WType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    pub surface: String,
    pub wt: WType,
    pub freq: i32,
}

/// One segment of a compound entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompoundPart {
    /// Number of reading characters this part covers.
    pub reading_len: usize,
    pub surface: String,
}

/// A multi-segment word registered under a single reading, e.g. 東京大学
/// as 東京 + 大学.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompoundEntry {
    pub wt: WType,
    pub freq: i32,
    pub parts: Vec<CompoundPart>,
}

impl CompoundEntry {
    pub fn surface(&self) -> String {
        self.parts.iter().map(|p| p.surface.as_str()).collect()
    }
}

/// Every entry registered under one reading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeqEntry {
    pub reading: String,
    pub words: Vec<WordEntry>,
    pub compounds: Vec<CompoundEntry>,
}

impl SeqEntry {
    pub fn new(reading: impl Into<String>) -> Self {
        Self {
            reading: reading.into(),
            ..Self::default()
        }
    }

    /// Highest frequency among words whose type falls under `wt`; 0 if none.
    pub fn wtype_freq(&self, wt: WType) -> i32 {
        self.words
            .iter()
            .filter(|w| wt.include(w.wt))
            .map(|w| w.freq)
            .max()
            .unwrap_or(0)
    }

    /// Like [`wtype_freq`](Self::wtype_freq) over compound entries.
    pub fn compound_freq(&self, wt: WType) -> i32 {
        self.compounds
            .iter()
            .filter(|c| wt.include(c.wt))
            .map(|c| c.freq)
            .max()
            .unwrap_or(0)
    }

    pub fn has_pos(&self, p: u8) -> bool {
        self.words.iter().any(|w| w.wt.pos == p)
    }

    pub fn has_prefix(&self) -> bool {
        self.has_pos(pos::PRE)
    }

    pub fn has_suffix(&self) -> bool {
        self.has_pos(pos::SUC)
    }

    /// Whether any non-compound entry exists.
    pub fn has_words(&self) -> bool {
        !self.words.is_empty()
    }

    pub fn has_compounds(&self) -> bool {
        !self.compounds.is_empty()
    }

    /// Whether some word here can head a segment.
    pub fn is_indep(&self) -> bool {
        self.words.iter().any(|w| w.wt.is_indep())
    }
}
