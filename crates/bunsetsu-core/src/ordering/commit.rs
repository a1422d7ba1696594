use tracing::{debug, debug_span};

use super::{candhistory, candswap, relation};
use crate::candidate::Segment;
use crate::learning::{LearningOp, LearningStore, OchaireSegment};
use crate::settings::settings;
use crate::splitter::SplitterContext;
use crate::xchar::to_string;

/// Longest run of segments remembered as one sequence.
const MAX_OCHAIRE_SEGMENTS: usize = 4;

fn learn_swapped_candidates(segments: &[Segment]) -> Vec<LearningOp> {
    segments
        .iter()
        .filter_map(|seg| {
            let committed = seg.committed.filter(|&c| c > 0)?;
            candswap::learn_swap(seg.cands.first()?, seg.cands.get(committed)?)
        })
        .collect()
}

fn learn_resized_segment(ctx: &mut SplitterContext, segments: &[Segment]) -> Vec<LearningOp> {
    let committed: Vec<_> = segments
        .iter()
        .map(|seg| (seg.chosen().and_then(|c| c.mw), seg.len))
        .collect();
    ctx.commit_border(&committed)
}

/// Forget every sequence keyed by a substring of the reading, then
/// remember each run of 2 to 4 committed segments.
fn learn_ochaire(ctx: &SplitterContext, store: &LearningStore, segments: &[Segment]) -> Vec<LearningOp> {
    let max_len = settings().ordering.max_ochaire_len;
    let chars = ctx.chars();
    let mut ops = Vec::new();

    let mut stale = Vec::new();
    for start in 0..chars.len() {
        for len in 1..=(chars.len() - start) {
            if len >= max_len {
                break;
            }
            let key = to_string(&chars[start..start + len]);
            if store.ochaire(&key).is_some() {
                stale.push(key);
            }
        }
    }
    if !stale.is_empty() {
        ops.push(LearningOp::ReleaseOchaire { keys: stale });
    }

    let nr = segments.len();
    for count in 2..=nr.min(MAX_OCHAIRE_SEGMENTS) {
        for run in segments.windows(count) {
            let key: String = run.iter().map(|s| s.reading.as_str()).collect();
            if key.chars().count() >= max_len {
                continue;
            }
            let learned: Option<Vec<OchaireSegment>> = run
                .iter()
                .map(|s| {
                    s.chosen().map(|c| OchaireSegment {
                        len: s.len,
                        surface: c.surface.clone(),
                    })
                })
                .collect();
            if let Some(segments) = learned {
                ops.push(LearningOp::Ochaire { key, segments });
            }
        }
    }
    ops
}

/// Everything a commit of `segments` teaches, in the order it must be
/// applied. The committed segmentation is frozen in `ctx`.
pub fn proc_commit(
    ctx: &mut SplitterContext,
    store: &LearningStore,
    segments: &[Segment],
) -> Vec<LearningOp> {
    let _span = debug_span!("proc_commit", segments = segments.len()).entered();
    let mut ops = learn_swapped_candidates(segments);
    ops.extend(learn_resized_segment(ctx, segments));
    ops.extend(learn_ochaire(ctx, store, segments));
    ops.extend(relation::learn_word_relation(segments));
    ops.extend(candhistory::learn_cand_history(store, segments));
    debug!(ops = ops.len(), "commit learned");
    ops
}
