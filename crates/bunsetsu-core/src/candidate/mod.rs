//! Segments and their candidate renderings.
//!
//! A [`Segment`] is one stretch of the reading between two chosen
//! boundaries. [`make_candidates`] fills it with every rendering the
//! meta-words spanning it can produce, plus the raw kana fallbacks.
//! Scores are assigned later by the ordering stage.

mod compose;

pub use compose::make_candidates;

use crate::segclass::SegClass;
use crate::splitter::{MwId, SplitterContext};
use crate::wtype::{pos, WType};

/// Candidate origin bits.
pub mod flag {
    pub const NONE: u32 = 0;
    /// Recalled multi-segment sequence.
    pub const OCHAIRE: u32 = 0x001;
    /// Whole segment matched one dictionary word.
    pub const SINGLEWORD: u32 = 0x002;
    pub const HIRAGANA: u32 = 0x004;
    pub const KATAKANA: u32 = 0x008;
    /// Katakana guess for an unknown word followed by a particle.
    pub const GUESS: u32 = 0x010;
    /// Boosted by a word relation.
    pub const USEDICT: u32 = 0x020;
    pub const COMPOUND: u32 = 0x040;
    pub const COMPOUND_PART: u32 = 0x080;
    /// Built from the meta-word the boundary search chose.
    pub const BEST: u32 = 0x100;
}

/// One word of a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub reading: String,
    /// Word type of the grammar slot the word fills.
    pub wt: WType,
    /// Index of the dictionary word under `reading`; `None` when the
    /// reading is rendered as-is.
    pub nth: Option<usize>,
    pub surface: String,
    pub freq: i32,
    /// Surface hash used as the word id of relations.
    pub id: Option<i32>,
}

impl Element {
    pub fn len(&self) -> usize {
        self.reading.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.reading.is_empty()
    }

    pub fn pos(&self) -> u8 {
        self.wt.pos
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub surface: String,
    pub flags: u32,
    pub score: i64,
    pub elements: Vec<Element>,
    /// Index into `elements` of the independent word.
    pub core_elm_index: Option<usize>,
    /// Top-level meta-word the candidate came from.
    pub mw: Option<MwId>,
}

impl Candidate {
    pub(crate) fn plain(surface: String, flags: u32) -> Self {
        Self {
            surface,
            flags,
            score: 0,
            elements: Vec::new(),
            core_elm_index: None,
            mw: None,
        }
    }

    pub fn has_flag(&self, bits: u32) -> bool {
        self.flags & bits != 0
    }

    pub fn core(&self) -> Option<&Element> {
        self.core_elm_index.and_then(|i| self.elements.get(i))
    }

    /// Core element, if it was looked up in the dictionary.
    pub(crate) fn dict_core(&self) -> Option<&Element> {
        self.core().filter(|e| e.nth.is_some())
    }

    /// Suffix elements that were looked up in the dictionary.
    pub(crate) fn suffixes(&self) -> impl Iterator<Item = &Element> {
        self.elements
            .iter()
            .filter(|e| e.nth.is_some() && e.pos() == pos::SUC)
    }
}

#[derive(Debug, Clone)]
pub struct Segment {
    pub from: usize,
    pub len: usize,
    pub reading: String,
    pub best_seg_class: SegClass,
    pub best_mw: Option<MwId>,
    /// Usable meta-words spanning exactly this segment.
    pub mw_array: Vec<MwId>,
    pub cands: Vec<Candidate>,
    /// Candidate the user picked, if any.
    pub committed: Option<usize>,
}

impl Segment {
    /// Segment over `[from, from + len)` with the annotations of the last
    /// boundary search. Candidates are not made yet.
    pub fn new(ctx: &SplitterContext, from: usize, len: usize) -> Self {
        let ce = ctx.char_ent(from);
        Self {
            from,
            len,
            reading: ctx.reading(from, len),
            best_seg_class: ce.best_seg_class,
            best_mw: ce.best_mw,
            mw_array: ctx.usable_metawords(from, len),
            cands: Vec::new(),
            committed: None,
        }
    }

    pub fn end(&self) -> usize {
        self.from + self.len
    }

    pub fn candidate(&self, i: usize) -> Option<&Candidate> {
        self.cands.get(i)
    }

    /// The committed candidate, or the first one.
    pub fn chosen(&self) -> Option<&Candidate> {
        self.cands.get(self.committed.unwrap_or(0))
    }
}
