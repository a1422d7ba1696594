//! Word relations: words committed near each other boost each other the
//! next time they appear together.

use crate::candidate::{flag, Segment};
use crate::learning::{LearningOp, LearningStore};
use crate::resources::Resources;

/// Segments within this distance are neighbours.
const REACH: usize = 2;

fn neighbours(i: usize, count: usize) -> impl Iterator<Item = usize> {
    (i.saturating_sub(REACH)..=(i + REACH).min(count - 1)).filter(move |&j| j != i)
}

/// Relation from the learning store or the `use_dic` image.
pub(super) fn related(res: &Resources, store: &LearningStore, from: i32, to: i32) -> bool {
    store.has_relation(from, to) || res.use_dic.as_ref().is_some_and(|m| m.peek(from, to) != 0)
}

/// Boost candidates of `seg` whose core word is related to `from` and
/// shares the part of speech of the current first candidate.
fn reorder_candidate(res: &Resources, store: &LearningStore, from: i32, seg: &mut Segment) {
    let Some(pos) = seg.cands.first().and_then(|c| c.core()).map(|e| e.pos()) else {
        return;
    };
    for cand in &mut seg.cands {
        let Some(core) = cand.core() else {
            continue;
        };
        let Some(id) = core.id else {
            continue;
        };
        if core.pos() == pos && related(res, store, from, id) {
            cand.flags |= flag::USEDICT;
            cand.score *= 10;
        }
    }
}

pub(super) fn reorder_by_relation(
    res: &Resources,
    store: &LearningStore,
    segments: &mut [Segment],
    nth: usize,
) {
    let count = segments.len();
    for i in nth..count {
        let Some(from) = segments[i].cands.first().and_then(|c| c.core()).and_then(|e| e.id) else {
            continue;
        };
        for j in neighbours(i, count) {
            reorder_candidate(res, store, from, &mut segments[j]);
        }
    }
}

/// A segment whose first candidate was swapped for another single word
/// of the same part of speech relates that word to the words committed
/// around it.
fn segment_relation(cur: &Segment, target: &Segment) -> Option<LearningOp> {
    let committed = cur.committed.filter(|&c| c > 0)?;
    let first = cur.cands.first()?;
    let chosen = cur.cands.get(committed)?;
    let other = target.chosen()?;
    if first.elements.len() != 1 || chosen.elements.len() != 1 || other.elements.len() != 1 {
        return None;
    }
    if first.elements[0].pos() != chosen.elements[0].pos() {
        return None;
    }
    Some(LearningOp::Relation {
        from: other.elements[0].id?,
        to: chosen.elements[0].id?,
    })
}

pub(super) fn learn_word_relation(segments: &[Segment]) -> Vec<LearningOp> {
    let count = segments.len();
    let mut ops = Vec::new();
    for i in 0..count {
        for j in neighbours(i, count) {
            ops.extend(segment_relation(&segments[i], &segments[j]));
        }
    }
    ops
}
