use tracing::{debug, debug_span};

use super::{candhistory, candswap, relation};
use crate::candidate::{flag, Candidate, Segment};
use crate::depgraph::RATIO_BASE;
use crate::learning::LearningStore;
use crate::resources::Resources;
use crate::splitter::{SplitterContext, OCHAIRE_SCORE};
use crate::wtype::pos;

pub(super) const OCHAIRE_BASE: i64 = OCHAIRE_SCORE as i64;
/// Raw kana when the meta-words look forced.
const NOCONV_WITH_BIAS: i64 = 900_000;
const SINGLEWORD_BASE: i64 = 10;
const COMPOUND_BASE: i64 = OCHAIRE_BASE / 2;
const COMPOUND_PART_BASE: i64 = 2;
pub(super) const NOCONV_BASE: i64 = 1;

/// Flags whose candidates get a fixed base score.
const BY_ORIGIN: u32 = flag::OCHAIRE
    | flag::SINGLEWORD
    | flag::HIRAGANA
    | flag::KATAKANA
    | flag::GUESS
    | flag::COMPOUND
    | flag::COMPOUND_PART
    | flag::BEST;

/// The best meta-word covers at most 60% of the segment.
fn is_uncertain(ctx: &SplitterContext, seg: &Segment) -> bool {
    seg.mw_array
        .first()
        .is_some_and(|&id| seg.len * 3 >= ctx.metaword(id).len * 5)
}

/// Word frequencies (prefixes and suffixes count a quarter) scaled by the
/// meta-word's structure score.
fn eval_by_metaword(ctx: &SplitterContext, cand: &Candidate) -> i64 {
    let mut score: i64 = 1;
    for e in cand.elements.iter().filter(|e| e.nth.is_some()) {
        let div = if matches!(e.pos(), pos::PRE | pos::SUC) {
            4
        } else {
            1
        };
        score += e.freq as i64 / div;
    }
    if let Some(mw) = cand.mw {
        score = score * ctx.metaword(mw).struct_score as i64 / RATIO_BASE as i64;
    }
    score
}

fn eval_candidate(ctx: &SplitterContext, cand: &mut Candidate, uncertain: bool) {
    let f = cand.flags;
    let score = if f & BY_ORIGIN == 0 {
        eval_by_metaword(ctx, cand)
    } else if f & flag::OCHAIRE != 0 {
        OCHAIRE_BASE
    } else if f & flag::SINGLEWORD != 0 {
        SINGLEWORD_BASE
    } else if f & flag::COMPOUND != 0 {
        COMPOUND_BASE
    } else if f & flag::COMPOUND_PART != 0 {
        COMPOUND_PART_BASE
    } else if f & flag::BEST != 0 {
        OCHAIRE_BASE
    } else if uncertain {
        let mut s = NOCONV_WITH_BIAS;
        if f & flag::KATAKANA != 0 {
            s += 1;
        }
        if f & flag::GUESS != 0 {
            s += 2;
        }
        s
    } else {
        NOCONV_BASE
    };
    cand.score = score + 1;
}

pub(super) fn sort_segment(seg: &mut Segment) {
    seg.cands.sort_by(|a, b| b.score.cmp(&a.score));
}

/// Zero every later duplicate of a surface, folding its flags into the
/// first occurrence.
fn check_dupl_candidate(seg: &mut Segment) {
    let n = seg.cands.len();
    for i in 0..n {
        for j in i + 1..n {
            if seg.cands[i].surface == seg.cands[j].surface {
                let bits = seg.cands[j].flags;
                seg.cands[j].score = 0;
                seg.cands[i].flags |= bits;
            }
        }
    }
}

/// Katakana only stays ahead when it already ranks first.
fn trim_kana_candidate(seg: &mut Segment) {
    if seg.cands.first().map_or(true, |c| c.has_flag(flag::KATAKANA)) {
        return;
    }
    for c in seg.cands.iter_mut().skip(1) {
        if c.has_flag(flag::KATAKANA) {
            c.score = NOCONV_BASE;
        }
    }
}

/// Lowest priority first: relations, then swapped pairs, then history.
fn apply_learning(res: &Resources, store: &LearningStore, segments: &mut [Segment], nth: usize) {
    relation::reorder_by_relation(res, store, segments, nth);
    for seg in segments.iter_mut().skip(nth) {
        candswap::proc_swap_candidate(seg, store);
        candhistory::reorder_by_history(seg, store);
    }
}

/// Score and order the candidates of segments `nth..`.
pub fn sort_candidate(
    ctx: &SplitterContext,
    res: &Resources,
    store: &LearningStore,
    segments: &mut [Segment],
    nth: usize,
) {
    let _span = debug_span!("sort_candidate", segments = segments.len(), nth).entered();
    for seg in segments.iter_mut().skip(nth) {
        let uncertain = is_uncertain(ctx, seg);
        for cand in &mut seg.cands {
            eval_candidate(ctx, cand, uncertain);
        }
        sort_segment(seg);
        check_dupl_candidate(seg);
        sort_segment(seg);
        seg.cands.retain(|c| c.score != 0);
    }

    apply_learning(res, store, segments, nth);

    for seg in segments.iter_mut().skip(nth) {
        sort_segment(seg);
        trim_kana_candidate(seg);
        sort_segment(seg);
    }
    debug!(
        candidates = segments
            .iter()
            .skip(nth)
            .map(|s| s.cands.len())
            .sum::<usize>(),
        "sorted candidates"
    );
}
