use crate::candidate::Segment;
use crate::learning::{LearningOp, LearningStore};
use crate::settings::settings;

/// Occurrences of `surface` in a history row; the newest entry counts
/// extra.
fn history_weight(surface: &str, row: &[String], depth: usize) -> i64 {
    row.iter()
        .enumerate()
        .filter(|(_, h)| h.as_str() == surface)
        .map(|(i, _)| if i == 0 { 1 + (depth / 2) as i64 } else { 1 })
        .sum()
}

fn reorder_by_candidate(seg: &mut Segment, store: &LearningStore) {
    let Some(row) = store.cand_history(&seg.reading) else {
        return;
    };
    let Some(primary) = seg.cands.first().map(|c| c.score) else {
        return;
    };
    let depth = settings().ordering.history_depth;
    let unit = primary / (depth / 2).max(1) as i64;
    for cand in &mut seg.cands {
        cand.score += unit * history_weight(&cand.surface, row, depth);
    }
}

/// Every candidate using the suffix rendering last committed for a
/// suffix reading moves just above the first such candidate.
fn reorder_by_suffix(seg: &mut Segment, store: &LearningStore) {
    let mut top: Option<usize> = None;
    let mut delta = 0;
    for i in 0..seg.cands.len() {
        let hits = seg.cands[i]
            .suffixes()
            .filter(|e| store.suffix_history(&e.reading) == Some(e.surface.as_str()))
            .count();
        for _ in 0..hits {
            let t = *top.get_or_insert(i);
            if delta == 0 {
                delta = seg.cands[t].score - seg.cands[i].score + 1;
            }
            seg.cands[i].score += delta;
        }
    }
}

pub(super) fn reorder_by_history(seg: &mut Segment, store: &LearningStore) {
    reorder_by_candidate(seg, store);
    reorder_by_suffix(seg, store);
}

/// History rows for every committed segment. A segment committed with
/// its first candidate and no history yet teaches nothing.
pub(super) fn learn_cand_history(store: &LearningStore, segments: &[Segment]) -> Vec<LearningOp> {
    let mut ops = Vec::new();
    for seg in segments {
        let Some(committed) = seg.committed else {
            continue;
        };
        if committed == 0 && store.cand_history(&seg.reading).is_none() {
            continue;
        }
        let Some(cand) = seg.cands.get(committed) else {
            continue;
        };
        ops.push(LearningOp::CandHistory {
            reading: seg.reading.clone(),
            surface: cand.surface.clone(),
        });
        for e in cand.suffixes() {
            ops.push(LearningOp::SuffixHistory {
                reading: e.reading.clone(),
                surface: e.surface.clone(),
            });
        }
    }
    ops
}
