//! Swapped core words: when the user commits a candidate other than the
//! first, the first one's core word learns to yield to the committed one.

use super::candsort::OCHAIRE_BASE;
use crate::candidate::{flag, Candidate, Segment};
use crate::learning::{LearningOp, LearningStore};

/// Pair to record when `committed` was chosen over `first`.
///
/// Both need a dictionary core word of the same reading length.
/// Candidates boosted by a word relation teach nothing.
pub(super) fn learn_swap(first: &Candidate, committed: &Candidate) -> Option<LearningOp> {
    if committed.has_flag(flag::USEDICT) {
        return None;
    }
    let (o, n) = (first.dict_core()?, committed.dict_core()?);
    if o.len() != n.len() {
        return None;
    }
    Some(LearningOp::IndepPair {
        from: o.surface.clone(),
        to: n.surface.clone(),
    })
}

/// Lift the candidate whose core word the first one was swapped for to
/// just above the first.
pub(super) fn proc_swap_candidate(seg: &mut Segment, store: &LearningStore) {
    let Some(top) = seg.cands.first() else {
        return;
    };
    if top.score >= OCHAIRE_BASE || top.has_flag(flag::USEDICT) {
        return;
    }
    let (Some(core_idx), Some(core)) = (top.core_elm_index, top.dict_core()) else {
        return;
    };
    let Some(target) = store.swap_target(&core.surface) else {
        return;
    };
    let (nr, top_score) = (top.elements.len(), top.score);

    for cand in seg.cands.iter_mut().skip(1) {
        if cand.elements.len() != nr || cand.core_elm_index != Some(core_idx) {
            continue;
        }
        let e = &cand.elements[core_idx];
        if e.nth.is_some() && e.surface == target {
            cand.score = top_score + 1;
            return;
        }
    }
}
