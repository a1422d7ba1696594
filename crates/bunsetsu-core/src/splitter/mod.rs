//! Boundary search.
//!
//! A [`SplitterContext`] is built once per reading: every word list and
//! meta-word of the string is enumerated up front. [`SplitterContext::mark_border`]
//! then chooses segment boundaries inside a window, optionally forbidding
//! a boundary between two positions, and leaves the result in the
//! per-character annotations.

mod evalborder;
mod lattice;
mod metaword;
#[cfg(test)]
mod tests;
mod wordlist;

pub use metaword::{
    Check, CheckKind, MetaWord, MetaWordKind, MwId, MwStatus, OCHAIRE_SCORE,
};
pub use wordlist::{make_word_list_all, WlId, WordList, WordLists, WordPart};

use tracing::{debug, debug_span};

use crate::learning::{LearningOp, LearningStore};
use crate::resources::Resources;
use crate::segclass::SegClass;
use crate::xchar::{char_type, to_string};

/// Per-character annotations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CharEnt {
    /// A segment starts here.
    pub seg_border: bool,
    /// Length of the segment that started here after the first search.
    pub initial_seg_len: usize,
    pub best_seg_class: SegClass,
    pub best_mw: Option<MwId>,
}

/// Scratch copy of the annotations the lattice writes into.
#[derive(Debug, Clone)]
pub(crate) struct BorderState {
    pub(crate) seg_border: Vec<bool>,
    pub(crate) best_seg_class: Vec<SegClass>,
    pub(crate) best_mw: Vec<Option<MwId>>,
}

pub struct SplitterContext {
    chars: Vec<char>,
    types: Vec<u32>,
    reverse: bool,
    word_lists: WordLists,
    metawords: Vec<MetaWord>,
    /// Meta-words by start position.
    mw_at: Vec<Vec<MwId>>,
    /// `len + 1` entries; both ends are always borders.
    ce: Vec<CharEnt>,
    /// End of the prefix frozen by `commit_border`.
    fixed: usize,
}

impl SplitterContext {
    /// Enumerate every word list and meta-word of `reading`.
    ///
    /// `reverse` looks readings up by surface instead, for reconversion of
    /// already converted text.
    pub fn new(res: &Resources, store: &LearningStore, reading: &[char], reverse: bool) -> Self {
        let n = reading.len();
        let _span = debug_span!("init_split_context", len = n, reverse).entered();
        let chars = reading.to_vec();
        let types: Vec<u32> = chars.iter().map(|&c| char_type(c)).collect();
        let word_lists = make_word_list_all(res, &chars, &types, reverse);

        let mut ce = vec![CharEnt::default(); n + 1];
        ce[0].seg_border = true;
        ce[n].seg_border = true;

        let mut ctx = Self {
            chars,
            types,
            reverse,
            word_lists,
            metawords: Vec::new(),
            mw_at: vec![Vec::new(); n + 1],
            ce,
            fixed: 0,
        };
        ctx.make_metaword_all(res, store);
        ctx
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn char_types(&self) -> &[u32] {
        &self.types
    }

    pub fn is_reverse(&self) -> bool {
        self.reverse
    }

    pub fn reading(&self, from: usize, len: usize) -> String {
        to_string(&self.chars[from..from + len])
    }

    pub fn word_lists(&self) -> &WordLists {
        &self.word_lists
    }

    pub fn word_list(&self, id: WlId) -> &WordList {
        &self.word_lists.lists[id]
    }

    pub fn metawords(&self) -> &[MetaWord] {
        &self.metawords
    }

    pub fn metaword(&self, id: MwId) -> &MetaWord {
        &self.metawords[id]
    }

    pub(crate) fn set_struct_score(&mut self, id: MwId, score: i32) {
        self.metawords[id].struct_score = score;
    }

    /// Meta-words starting at `from`, in creation order.
    pub fn metawords_at(&self, from: usize) -> &[MwId] {
        self.mw_at.get(from).map_or(&[][..], Vec::as_slice)
    }

    pub fn char_ent(&self, i: usize) -> &CharEnt {
        &self.ce[i]
    }

    pub fn char_ents(&self) -> &[CharEnt] {
        &self.ce
    }

    /// `(from, len)` of every segment from the current borders.
    pub fn segment_bounds(&self) -> Vec<(usize, usize)> {
        let n = self.len();
        let mut out = Vec::new();
        let mut start = 0;
        for i in 1..=n {
            if self.ce[i].seg_border {
                out.push((start, i - start));
                start = i;
            }
        }
        out
    }

    fn usable_at(&self, from: usize, len: usize) -> impl Iterator<Item = MwId> + '_ {
        self.metawords_at(from).iter().copied().filter(move |&id| {
            let mw = &self.metawords[id];
            mw.len == len && mw.can_use == Check::Ok
        })
    }

    /// Number of usable meta-words spanning exactly `[from, from + len)`.
    pub fn metaword_count(&self, from: usize, len: usize) -> usize {
        self.usable_at(from, len).count()
    }

    pub fn nth_metaword(&self, from: usize, len: usize, nth: usize) -> Option<MwId> {
        self.usable_at(from, len).nth(nth)
    }

    pub fn usable_metawords(&self, from: usize, len: usize) -> Vec<MwId> {
        self.usable_at(from, len).collect()
    }

    /// Choose boundaries in `[from, to)`, forbidding any boundary strictly
    /// between `from` and `from2`. Annotations outside `[from, to)` are
    /// left untouched, and so is the prefix frozen by a commit.
    pub fn mark_border(&mut self, res: &Resources, from: usize, from2: usize, to: usize) {
        let from = from.max(self.fixed);
        let from2 = from2.max(from);
        if to <= from {
            return;
        }
        let _span = debug_span!("mark_border", from, from2, to).entered();
        let mut state = BorderState {
            seg_border: self.ce.iter().map(|c| c.seg_border).collect(),
            best_seg_class: self.ce.iter().map(|c| c.best_seg_class).collect(),
            best_mw: self.ce.iter().map(|c| c.best_mw).collect(),
        };
        self.eval_border(res, &mut state, from, from2, to);
        for i in from..to {
            let c = &mut self.ce[i];
            c.seg_border = state.seg_border[i];
            c.best_seg_class = state.best_seg_class[i];
            c.best_mw = state.best_mw[i];
        }
        debug!(segments = self.segment_bounds().len());
    }

    /// Make `new_end` the end of the segment starting at `from` and forget
    /// every later boundary, ready for a new search of the rest. Frozen
    /// boundaries stay where they are.
    pub fn move_border(&mut self, from: usize, new_end: usize) {
        let n = self.len();
        if new_end <= self.fixed {
            return;
        }
        let from = from.max(self.fixed);
        for c in &mut self.ce[from + 1..n] {
            c.seg_border = false;
        }
        for c in &mut self.ce[from..n] {
            c.best_mw = None;
        }
        self.ce[new_end].seg_border = true;
        self.ce[n].seg_border = true;
    }

    /// Remember the current segmentation as the initial one, so a later
    /// commit can tell which segments the user stretched.
    pub fn record_initial_segments(&mut self) {
        for (from, len) in self.segment_bounds() {
            self.ce[from].initial_seg_len = len;
        }
    }

    /// Freeze the committed segmentation and return the learning updates
    /// for segments committed longer than first proposed.
    ///
    /// `segments` lists the committed meta-word (if any) and length of
    /// every segment in order. Each segment start becomes a border carrying
    /// its meta-word and class; later searches leave the covered prefix
    /// alone.
    pub fn commit_border(&mut self, segments: &[(Option<MwId>, usize)]) -> Vec<LearningOp> {
        let n = self.len();
        let mut ops = Vec::new();
        let mut from = 0;
        for &(mw, len) in segments {
            if from >= n || len == 0 {
                break;
            }
            let len = len.min(n - from);
            let initial = self.ce[from].initial_seg_len;
            let stretched = initial != 0
                && from + initial != n
                && initial + self.ce[from + initial].initial_seg_len <= len;
            let real_len = mw.map_or(0, |id| self.metawords[id].len);
            if stretched && real_len > initial && from + real_len <= n {
                ops.push(LearningOp::ExpandPair {
                    from: self.reading(from, initial),
                    to: self.reading(from, real_len),
                });
            }
            self.freeze_segment(from, len, mw);
            from += len;
        }
        self.fixed = self.fixed.max(from);
        ops
    }

    fn freeze_segment(&mut self, from: usize, len: usize, mw: Option<MwId>) {
        let class = mw.map(|id| self.metawords[id].seg_class);
        for (i, c) in self.ce[from..from + len].iter_mut().enumerate() {
            c.seg_border = i == 0;
            c.best_mw = if i == 0 { mw } else { None };
            if let Some(class) = class {
                c.best_seg_class = class;
            }
        }
        self.ce[from + len].seg_border = true;
    }

    /// End of the prefix fixed by [`commit_border`](Self::commit_border).
    pub fn frozen_len(&self) -> usize {
        self.fixed
    }
}
