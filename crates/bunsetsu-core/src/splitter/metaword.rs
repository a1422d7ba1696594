//! Meta-words: the units the boundary search chooses between.
//!
//! Every word list becomes a plain meta-word. Composite kinds are then
//! layered on top: adjacent pairs the grammar cannot express (verb stem +
//! adjective, family + given name, noun + noun suffix, numeral chains),
//! compound-dictionary splits, trailing
//! punctuation, and sequences recalled from the learning store.

use tracing::{debug, debug_span};

use super::wordlist::WlId;
use super::SplitterContext;
use crate::dict::CompoundEntry;
use crate::feature::mw_feature;
use crate::learning::{LearningStore, OchaireSegment};
use crate::resources::Resources;
use crate::segclass::{DepClass, SegClass};
use crate::settings::settings;
use crate::wtype::{ct, named, pos, scos, WType};
use crate::xchar::{to_chars, to_string, xct};

/// Index into the context's meta-word arena.
pub type MwId = usize;

/// Score given to learned multi-segment sequences.
pub const OCHAIRE_SCORE: i32 = 5_000_000;

/// Parts of a meta-word built straight from a word list.
const SIMPLE_PARTS: usize = 4;

/// Whether a meta-word respects the fixed boundaries of the current search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Check {
    #[default]
    Unchecked,
    Ok,
    Ng,
}

/// How a kind is turned into candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MwStatus {
    None,
    Wrapped,
    Compound,
    CompoundPart,
    Combined,
    Ochaire,
}

/// How a kind is checked against fixed boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    None,
    Single,
    Wrap,
    Compound,
    Border,
    Number,
    Ochaire,
}

/// Composite kinds hold `(first, rest)`: the left child and the chain of
/// the remaining children, itself a meta-word of the same family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaWordKind {
    Dummy,
    Single(WlId),
    /// Inner meta-word followed by punctuation or small kana.
    Wrap(MwId),
    CompoundHead(MwId, Option<MwId>),
    Compound(MwId, Option<MwId>),
    /// One segment of a compound entry; carries its rendering.
    CompoundLeaf(String),
    /// Several leading segments of a compound read as one.
    CompoundPart(String),
    VRenyouA(MwId, Option<MwId>),
    VRenyouNoun(MwId, Option<MwId>),
    /// Family name followed by a given name.
    NamePair(MwId, Option<MwId>),
    /// Noun followed by a noun suffix (サーバ + 用).
    NounNounPrefix(MwId, Option<MwId>),
    Number(MwId, Option<MwId>),
    Ochaire { hint: String, next: Option<MwId> },
}

impl MetaWordKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Dummy => "dummy",
            Self::Single(_) => "single",
            Self::Wrap(_) => "wrap",
            Self::CompoundHead(..) => "compound_head",
            Self::Compound(..) => "compound",
            Self::CompoundLeaf(_) => "compound_leaf",
            Self::CompoundPart(_) => "compound_part",
            Self::VRenyouA(..) => "v_renyou_a",
            Self::VRenyouNoun(..) => "v_renyou_noun",
            Self::NamePair(..) => "name_pair",
            Self::NounNounPrefix(..) => "noun_noun_prefix",
            Self::Number(..) => "number",
            Self::Ochaire { .. } => "ochaire",
        }
    }

    pub fn bonus(&self) -> i32 {
        match self {
            Self::VRenyouA(..) | Self::VRenyouNoun(..) => 100,
            _ => 0,
        }
    }

    pub fn status(&self) -> MwStatus {
        match self {
            Self::Dummy | Self::Single(_) | Self::CompoundHead(..) | Self::Compound(..) => {
                MwStatus::None
            }
            Self::Wrap(_) => MwStatus::Wrapped,
            Self::CompoundLeaf(_) => MwStatus::Compound,
            Self::CompoundPart(_) => MwStatus::CompoundPart,
            Self::VRenyouA(..)
            | Self::VRenyouNoun(..)
            | Self::NamePair(..)
            | Self::NounNounPrefix(..)
            | Self::Number(..) => MwStatus::Combined,
            Self::Ochaire { .. } => MwStatus::Ochaire,
        }
    }

    pub fn check_kind(&self) -> CheckKind {
        match self {
            Self::Dummy | Self::Single(_) | Self::CompoundPart(_) => CheckKind::Single,
            Self::Wrap(_) => CheckKind::Wrap,
            Self::CompoundHead(..) => CheckKind::Compound,
            Self::Compound(..) | Self::CompoundLeaf(_) => CheckKind::None,
            Self::VRenyouA(..)
            | Self::VRenyouNoun(..)
            | Self::NamePair(..)
            | Self::NounNounPrefix(..) => CheckKind::Border,
            Self::Number(..) => CheckKind::Number,
            Self::Ochaire { .. } => CheckKind::Ochaire,
        }
    }

    /// Rank used to break score ties: plain words first.
    pub fn preference(&self) -> u8 {
        match self {
            Self::Single(_) => 0,
            Self::Wrap(_) => 1,
            Self::Dummy => 3,
            _ => 2,
        }
    }

    /// Left (or only) child.
    pub fn first(&self) -> Option<MwId> {
        match *self {
            Self::Wrap(inner) => Some(inner),
            Self::CompoundHead(a, _)
            | Self::Compound(a, _)
            | Self::VRenyouA(a, _)
            | Self::VRenyouNoun(a, _)
            | Self::NamePair(a, _)
            | Self::NounNounPrefix(a, _)
            | Self::Number(a, _) => Some(a),
            Self::Ochaire { next, .. } => next,
            _ => None,
        }
    }

    pub fn rest(&self) -> Option<MwId> {
        match *self {
            Self::CompoundHead(_, b)
            | Self::Compound(_, b)
            | Self::VRenyouA(_, b)
            | Self::VRenyouNoun(_, b)
            | Self::NamePair(_, b)
            | Self::NounNounPrefix(_, b)
            | Self::Number(_, b) => b,
            _ => None,
        }
    }

    /// Rendering fixed at creation time.
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::CompoundLeaf(h) | Self::CompoundPart(h) => Some(h),
            Self::Ochaire { hint, .. } => Some(hint),
            _ => None,
        }
    }

    fn hint_mut(&mut self) -> Option<&mut String> {
        match self {
            Self::CompoundLeaf(h) | Self::CompoundPart(h) => Some(h),
            Self::Ochaire { hint, .. } => Some(hint),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetaWord {
    pub from: usize,
    pub len: usize,
    pub weak_len: usize,
    /// Boundary-search score.
    pub score: i32,
    /// Ordering score set by `sort_metaword`.
    pub struct_score: i32,
    pub seg_class: SegClass,
    pub dep_class: DepClass,
    pub dep_word_hash: i32,
    pub mw_features: u32,
    pub core_wt: WType,
    pub can_use: Check,
    pub nr_parts: usize,
    pub kind: MetaWordKind,
}

impl MetaWord {
    pub fn new(from: usize, len: usize, kind: MetaWordKind) -> Self {
        Self {
            from,
            len,
            weak_len: 0,
            score: 0,
            struct_score: 0,
            seg_class: SegClass::Head,
            dep_class: DepClass::None,
            dep_word_hash: 0,
            mw_features: 0,
            core_wt: WType::NONE,
            can_use: Check::Unchecked,
            nr_parts: 1,
            kind,
        }
    }

    pub fn end(&self) -> usize {
        self.from + self.len
    }

    pub fn wl(&self) -> Option<WlId> {
        match self.kind {
            MetaWordKind::Single(wl) => Some(wl),
            _ => None,
        }
    }

    fn copy_info(&mut self, src: &MetaWord) {
        self.dep_class = src.dep_class;
        self.dep_word_hash = src.dep_word_hash;
        self.mw_features = src.mw_features;
        self.core_wt = src.core_wt;
    }
}

impl SplitterContext {
    pub(super) fn make_metaword_all(&mut self, res: &Resources, store: &LearningStore) {
        let _span = debug_span!("make_metaword_all", len = self.chars.len()).entered();
        self.make_metaword_from_word_list(res);
        self.combine_metaword_all(res);
        self.make_expanded_metaword_all(store);
        self.make_metaword_with_depchar_all();
        if settings().splitter.enable_ochaire {
            self.make_ochaire_metaword_all(store);
        }
        self.bias_to_single_char_metaword();
        self.cover_unknown_chars();
        debug!(metawords = self.metawords.len());
    }

    fn commit_metaword(&mut self, mut mw: MetaWord) -> MwId {
        mw.score += mw.kind.bonus();
        let id = self.metawords.len();
        self.mw_at[mw.from].push(id);
        self.metawords.push(mw);
        id
    }

    fn info_from_word_list(&self, mw: &mut MetaWord, wl: WlId) {
        let wl = &self.word_lists.lists[wl];
        mw.weak_len = wl.weak_len;
        mw.score = wl.score;
        mw.seg_class = wl.seg_class;
        mw.dep_class = wl.dep_class;
        mw.dep_word_hash = wl.dep_word_hash;
        mw.mw_features = wl.features;
        mw.core_wt = wl.core.wt;
    }

    /// `make(first, rest)` over two meta-words; the result takes its class
    /// from the right side.
    fn cons(
        &mut self,
        make: fn(MwId, Option<MwId>) -> MetaWordKind,
        first: MwId,
        rest: Option<MwId>,
    ) -> MwId {
        let a = &self.metawords[first];
        let b = rest.map(|r| &self.metawords[r]);
        let mut n = MetaWord::new(a.from, a.len + b.map_or(0, |b| b.len), make(first, rest));
        n.weak_len = a.weak_len + b.map_or(0, |b| b.weak_len);
        n.score = match b {
            Some(b) => ((a.score as f64).sqrt() * (b.score as f64).sqrt()) as i32,
            None => a.score,
        };
        n.nr_parts = a.nr_parts + b.map_or(0, |b| b.nr_parts);
        let right = b.unwrap_or(a);
        n.seg_class = right.seg_class;
        n.copy_info(right);
        self.commit_metaword(n)
    }

    /// `a` then `b` as a two-element chain.
    fn list(&mut self, make: fn(MwId, Option<MwId>) -> MetaWordKind, a: MwId, b: MwId) -> MwId {
        let tail = self.cons(make, b, None);
        self.cons(make, a, Some(tail))
    }

    /// Like [`list`](Self::list), with all of `b` counted as weakly attached.
    fn list_weak(
        &mut self,
        make: fn(MwId, Option<MwId>) -> MetaWordKind,
        a: MwId,
        b: MwId,
    ) -> MwId {
        let id = self.list(make, a, b);
        self.metawords[id].weak_len = self.metawords[a].weak_len + self.metawords[b].len;
        id
    }

    fn make_metaword_from_word_list(&mut self, res: &Resources) {
        for i in 0..self.chars.len() {
            for wl_id in self.word_lists.by_from[i].clone() {
                if self.word_lists.lists[wl_id].is_compound {
                    self.make_compound_metawords(res, wl_id);
                } else {
                    let wl = &self.word_lists.lists[wl_id];
                    let mut mw = MetaWord::new(wl.from, wl.len, MetaWordKind::Single(wl_id));
                    self.info_from_word_list(&mut mw, wl_id);
                    mw.nr_parts = SIMPLE_PARTS;
                    self.commit_metaword(mw);
                }
            }
        }
    }

    fn make_compound_metawords(&mut self, res: &Resources, wl_id: WlId) {
        let core = self.word_lists.lists[wl_id].core;
        let reading = to_string(&self.chars[core.from..core.end()]);
        let Some(seq) = res.words.lookup(&reading, self.reverse) else {
            return;
        };
        for entry in &seq.compounds {
            let covered: usize = entry.parts.iter().map(|p| p.reading_len).sum();
            if entry.parts.is_empty() || covered != core.len {
                debug!(reading = %reading, "compound parts do not cover the reading");
                continue;
            }
            self.make_compound_leaves(wl_id, entry);
            self.make_compound_parts(wl_id, entry);
        }
    }

    /// The `nth` segment of a compound entry. The word list's prefix joins
    /// the first segment and its suffix and attached words the last.
    fn compound_nth(
        &self,
        wl_id: WlId,
        entry: &CompoundEntry,
        nth: usize,
        make: fn(String) -> MetaWordKind,
    ) -> MetaWord {
        let wl = &self.word_lists.lists[wl_id];
        let last = entry.parts.len() - 1;
        let pre_len = wl.prefix.len;
        let post_len = wl.postfix.len + wl.dep.len;

        let mut from = wl.from;
        let mut len = 0;
        for (i, part) in entry.parts.iter().enumerate().take(nth + 1) {
            from += len;
            len = part.reading_len;
            if i == 0 {
                len += pre_len;
            }
            if i == last {
                len += post_len;
            }
        }

        let mut hint = String::new();
        if nth == 0 {
            hint.push_str(&to_string(&self.chars[wl.from..wl.from + pre_len]));
        }
        hint.push_str(&entry.parts[nth].surface);
        if nth == last {
            hint.push_str(&to_string(&self.chars[wl.end() - post_len..wl.end()]));
        }

        let mut mw = MetaWord::new(from, len, make(hint));
        self.info_from_word_list(&mut mw, wl_id);
        mw.nr_parts = 0;
        mw
    }

    fn make_compound_leaves(&mut self, wl_id: WlId, entry: &CompoundEntry) {
        let mut rest = None;
        for j in (0..entry.parts.len()).rev() {
            let leaf = self.compound_nth(wl_id, entry, j, MetaWordKind::CompoundLeaf);
            let leaf = self.commit_metaword(leaf);
            let make = if j == 0 {
                MetaWordKind::CompoundHead
            } else {
                MetaWordKind::Compound
            };
            rest = Some(self.cons(make, leaf, rest));
        }
    }

    /// Every run of leading segments ending at segment `j`, read as one.
    fn make_compound_parts(&mut self, wl_id: WlId, entry: &CompoundEntry) {
        for j in (0..entry.parts.len()).rev() {
            let mut right = self.compound_nth(wl_id, entry, j, MetaWordKind::CompoundPart);
            for k in (0..j).rev() {
                let mut mw = self.compound_nth(wl_id, entry, k, MetaWordKind::CompoundPart);
                mw.len += right.len;
                mw.score += right.score;
                if let (Some(h), Some(tail)) = (mw.kind.hint_mut(), right.kind.hint()) {
                    h.push_str(tail);
                }
                self.commit_metaword(mw.clone());
                right = mw;
            }
        }
    }

    fn combine_metaword_all(&mut self, res: &Resources) {
        for i in (0..self.chars.len()).rev() {
            for right in self.mw_at[i].clone() {
                let mw = &self.metawords[right];
                if mw.seg_class.is_depword() {
                    continue;
                }
                let from = mw.from;
                for j in (0..from).rev() {
                    for left in self.mw_at[j].clone() {
                        if self.metawords[left].end() == from {
                            self.try_combine(res, left, right);
                        }
                    }
                }
            }
        }
    }

    fn try_combine(&mut self, res: &Resources, left: MwId, right: MwId) {
        let Some(lwl) = self.metawords[left].wl() else {
            return;
        };
        let rwl = self.metawords[right].wl();
        if rwl.is_some_and(|r| self.word_lists.lists[r].prefix.len > 0) {
            return;
        }
        if let Some(rwl) = rwl {
            self.try_name_pair(left, lwl, right, rwl);
            self.try_v_renyou(res, left, lwl, right, rwl);
            self.try_noun_suffix(res, left, lwl, right, rwl);
        }
        self.try_number(left, lwl, right, rwl);
    }

    fn try_name_pair(&mut self, left: MwId, lwl: WlId, right: MwId, rwl: WlId) {
        let l = self.word_lists.lists[lwl].core.wt;
        let r = self.word_lists.lists[rwl].core.wt;
        if l.pos == pos::NOUN
            && l.scos == scos::FAMNAME
            && r.pos == pos::NOUN
            && r.scos == scos::FSTNAME
        {
            self.list(MetaWordKind::NamePair, left, right);
        }
    }

    /// A bare noun of two or more characters and a suffix noun after it.
    fn try_noun_suffix(&mut self, res: &Resources, left: MwId, lwl: WlId, right: MwId, rwl: WlId) {
        let l = self.word_lists.lists[lwl];
        let r = self.word_lists.lists[rwl];
        if l.core.wt.pos != pos::NOUN
            || l.core.len < 2
            || l.postfix.len != 0
            || l.dep.len != 0
            || r.core.len < 2
            || r.core.wt.pos != pos::N2T
        {
            return;
        }
        let reading = to_string(&self.chars[r.core.from..r.core.end()]);
        let freq = res
            .words
            .lookup(&reading, self.reverse)
            .map_or(0, |seq| seq.wtype_freq(named::NOUN_TAIL));
        if freq > 0 {
            self.list_weak(MetaWordKind::NounNounPrefix, left, right);
        }
    }

    fn try_v_renyou(&mut self, res: &Resources, left: MwId, lwl: WlId, right: MwId, rwl: WlId) {
        let l = self.word_lists.lists[lwl];
        let r = self.word_lists.lists[rwl];
        if l.head_pos != pos::V || l.tail_ct != ct::RENYOU {
            return;
        }
        if r.core.wt.pos == pos::A {
            let reading = to_string(&self.chars[r.core.from..r.core.end()]);
            let tail = res
                .words
                .lookup(&reading, self.reverse)
                .map_or(0, |seq| seq.wtype_freq(named::A_TAIL_OF_V_RENYOU));
            if tail > 0 {
                self.list(MetaWordKind::VRenyouA, left, right);
            }
        }
        if r.core.wt.pos == pos::NOUN && r.core.wt.scos == scos::T40 {
            self.list(MetaWordKind::VRenyouNoun, left, right);
        }
    }

    fn try_number(&mut self, left: MwId, lwl: WlId, right: MwId, rwl: Option<WlId>) {
        let l = self.word_lists.lists[lwl];
        if l.core.wt.pos != pos::NUMBER {
            return;
        }
        let (r, chained) = match rwl {
            Some(rwl) => (self.word_lists.lists[rwl], false),
            None => match self.metawords[right].kind {
                MetaWordKind::Number(first, _) => match self.metawords[first].wl() {
                    Some(w) => (self.word_lists.lists[w], true),
                    None => return,
                },
                _ => return,
            },
        };
        if !chained && r.core.wt.pos != pos::NUMBER {
            return;
        }
        if l.postfix.len != 0 || l.dep.len != 0 {
            return;
        }
        if !number_can_precede(l.core.wt.scos, r.core.wt.scos) {
            return;
        }
        if chained {
            self.cons(MetaWordKind::Number, left, Some(right));
        } else {
            self.list(MetaWordKind::Number, left, right);
        }
    }

    fn make_expanded_metaword_all(&mut self, store: &LearningStore) {
        let n = self.chars.len();
        for i in 0..n {
            for j in 1..n - i {
                let reading = to_string(&self.chars[i..i + j]);
                for target in store.expand_targets(&reading) {
                    let target = to_chars(target);
                    let len = target.len();
                    if len <= n - i && self.chars[i..i + len] == target[..] {
                        self.make_expanded(i, len, j);
                    }
                }
            }
        }
    }

    /// A learned stretch of a segment from `orig_len` to `len` characters.
    fn make_expanded(&mut self, from: usize, len: usize, orig_len: usize) {
        let best = self.mw_at[from]
            .iter()
            .map(|&id| &self.metawords[id])
            .filter(|mw| mw.len == orig_len)
            .map(|mw| mw.score as i64)
            .max()
            .unwrap_or(0);
        let mut mw = MetaWord::new(from, len, MetaWordKind::Dummy);
        mw.score = (3 * best * len as i64 / orig_len as i64).min(i32::MAX as i64) as i32;
        self.commit_metaword(mw);
    }

    fn make_metaword_with_depchar_all(&mut self) {
        for i in 0..self.chars.len() {
            for id in self.mw_at[i].clone() {
                self.make_metaword_with_depchar(Some(id));
            }
        }
        self.make_metaword_with_depchar(None);
    }

    /// Extend a meta-word over the punctuation or small kana after it.
    fn make_metaword_with_depchar(&mut self, inner: Option<MwId>) {
        let n = self.chars.len();
        let (from, len) = inner.map_or((0, 0), |id| {
            let mw = &self.metawords[id];
            (mw.from, mw.len)
        });
        let start = from + len;
        if start >= n {
            return;
        }
        let t = self.types[start];
        if t & (xct::SYMBOL | xct::PART) == 0 {
            return;
        }

        let mut run = 0;
        let mut destroy = false;
        while start + run < n && self.types[start + run] == t {
            let p = start + run;
            if p > 0 && p + 1 < n && self.chars[p] != self.chars[p + 1] {
                destroy = true;
            }
            run += 1;
        }

        let mw = match inner {
            Some(id) => {
                let src = self.metawords[id].clone();
                let mut mw = MetaWord::new(from, len + run, MetaWordKind::Wrap(id));
                mw.score = src.score;
                mw.nr_parts = src.nr_parts;
                mw.weak_len = src.weak_len + run;
                mw.seg_class = src.seg_class;
                mw.copy_info(&src);
                if destroy {
                    mw.seg_class = SegClass::Dokuritsugo;
                    mw.score /= 10;
                }
                mw
            }
            None => {
                let mut mw = MetaWord::new(from, len + run, MetaWordKind::Dummy);
                mw.score = 1;
                mw.seg_class = SegClass::Dokuritsugo;
                mw
            }
        };
        self.commit_metaword(mw);
    }

    /// Recall the longest learned sequence starting anywhere in the string.
    fn make_ochaire_metaword_all(&mut self, store: &LearningStore) {
        let n = self.chars.len();
        let max = settings().ordering.max_ochaire_len.saturating_sub(1);
        for i in 0..n {
            let found = (1..=max.min(n - i)).rev().find_map(|len| {
                store
                    .ochaire(&to_string(&self.chars[i..i + len]))
                    .map(|segs| (len, segs.to_vec()))
            });
            if let Some((len, segs)) = found {
                self.make_ochaire(i, len, &segs);
                break;
            }
        }
    }

    fn make_ochaire(&mut self, from: usize, key_len: usize, segs: &[OchaireSegment]) {
        let total: usize = segs.iter().map(|s| s.len).sum();
        if segs.is_empty() || total != key_len || segs.iter().any(|s| s.len == 0) {
            debug!(from, "learned sequence does not match its key");
            return;
        }
        let mut offset = total;
        let mut next = None;
        for seg in segs.iter().rev() {
            offset -= seg.len;
            let kind = MetaWordKind::Ochaire {
                hint: seg.surface.clone(),
                next,
            };
            let mut mw = MetaWord::new(from + offset, seg.len, kind);
            mw.score = OCHAIRE_SCORE;
            next = Some(self.commit_metaword(mw));
        }
    }

    /// Meta-words ending in a run of small kana are unlikely segments.
    fn bias_to_single_char_metaword(&mut self) {
        for i in (0..self.chars.len()).rev() {
            if self.types[i] & (xct::OPEN | xct::CLOSE) != 0 {
                continue;
            }
            for id in self.mw_at[i].clone() {
                let mw = &self.metawords[id];
                if mw.seg_class.is_depword() {
                    continue;
                }
                let tail_is_part = (i + 1..mw.end()).all(|p| self.types[p] & xct::PART != 0);
                if tail_is_part {
                    self.metawords[id].score /= 100;
                }
            }
        }
    }

    /// One-character fallback wherever no plain meta-word starts, so the
    /// search can always cover the whole string.
    fn cover_unknown_chars(&mut self) {
        for i in 0..self.chars.len() {
            let covered = self.mw_at[i].iter().any(|&id| {
                matches!(
                    self.metawords[id].kind.check_kind(),
                    CheckKind::Single | CheckKind::Wrap
                )
            });
            if !covered {
                let mut mw = MetaWord::new(i, 1, MetaWordKind::Dummy);
                mw.score = 1;
                mw.seg_class = SegClass::Dokuritsugo;
                self.commit_metaword(mw);
            }
        }
    }

    /// Record the boundaries implied by a chosen meta-word.
    pub(super) fn mark_border_by_metaword(
        &self,
        id: MwId,
        seg_border: &mut [bool],
        best_mw: &mut [Option<MwId>],
    ) {
        let mw = &self.metawords[id];
        match &mw.kind {
            MetaWordKind::Dummy | MetaWordKind::Single(_) | MetaWordKind::CompoundPart(_) => {
                seg_border[mw.from] = true;
            }
            MetaWordKind::CompoundLeaf(_) => {
                seg_border[mw.from] = true;
                best_mw[mw.from] = Some(id);
            }
            MetaWordKind::CompoundHead(first, rest)
            | MetaWordKind::Compound(first, rest)
            | MetaWordKind::NamePair(first, rest)
            | MetaWordKind::Number(first, rest) => {
                best_mw[self.metawords[*first].from] = Some(*first);
                self.mark_border_by_metaword(*first, seg_border, best_mw);
                if let Some(rest) = rest {
                    self.mark_border_by_metaword(*rest, seg_border, best_mw);
                }
            }
            MetaWordKind::VRenyouA(..)
            | MetaWordKind::VRenyouNoun(..)
            | MetaWordKind::NounNounPrefix(..) => {
                seg_border[mw.from] = true;
            }
            MetaWordKind::Wrap(inner) => {
                self.mark_border_by_metaword(*inner, seg_border, best_mw);
            }
            MetaWordKind::Ochaire { next, .. } => {
                seg_border[mw.from] = true;
                if let Some(next) = next {
                    self.mark_border_by_metaword(*next, seg_border, best_mw);
                }
            }
        }
    }
}

/// Whether numeral class `left` may be followed by `right` (二十 + 三, but
/// not 三 + 十).
pub(super) fn number_can_precede(left: u8, right: u8) -> bool {
    if right == scos::NONE {
        return false;
    }
    match left {
        scos::N1 | scos::N10 | scos::N100 | scos::N1000 => !(left..=scos::N1000).contains(&right),
        scos::N10000 => true,
        _ => false,
    }
}

/// Whether `mw` carries the weak-connection feature.
pub(super) fn is_weak_conn(mw: &MetaWord) -> bool {
    mw.mw_features & mw_feature::WEAK_CONN != 0
}
