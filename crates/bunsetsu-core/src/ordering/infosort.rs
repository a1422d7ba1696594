use tracing::{debug_span, warn};

use crate::candidate::Segment;
use crate::depgraph::RATIO_BASE;
use crate::feature::{mw_feature, FeatureError, FeatureList};
use crate::resources::Resources;
use crate::segclass::SegClass;
use crate::splitter::{MetaWord, SplitterContext};

/// Features a meta-word is looked up by in `cand_info`.
pub fn metaword_features(mw: &MetaWord, prev: SegClass) -> Result<FeatureList, FeatureError> {
    let mut fl = FeatureList::new();
    fl.set_cur_class(mw.seg_class)?;
    fl.set_dep_word(mw.dep_word_hash)?;
    fl.set_dep_class(mw.dep_class)?;
    fl.set_mw_features(mw.mw_features)?;
    fl.set_class_trans(prev, mw.seg_class)?;
    fl.sort();
    Ok(fl)
}

/// `RATIO_BASE^2 * (0.1 + p^2)` where `p` is the positive share of the
/// matching row, 0 without one.
fn struct_score(res: &Resources, mw: &MetaWord, prev: SegClass) -> i32 {
    let p = match metaword_features(mw, prev) {
        Ok(fl) => res
            .cand_info
            .find(&fl)
            .and_then(|f| f.probability())
            .map_or(0.0, |p| p * p),
        Err(e) => {
            warn!(error = %e, from = mw.from, "meta-word feature overflow");
            0.0
        }
    };
    let base = (RATIO_BASE as f64) * (RATIO_BASE as f64);
    let mut score = (base * (0.1 + p)) as i32;
    if mw.mw_features & mw_feature::SUFFIX != 0 {
        score /= 2;
    }
    if mw.mw_features & mw_feature::WEAK_CONN != 0 {
        score /= 10;
    }
    score
}

/// Score every meta-word of every segment and sort each segment's
/// meta-words by descending score, plain words first on ties.
pub fn sort_metaword(ctx: &mut SplitterContext, res: &Resources, segments: &mut [Segment]) {
    let _span = debug_span!("sort_metaword", segments = segments.len()).entered();
    let mut prev = SegClass::Head;
    for seg in segments.iter_mut() {
        for &id in &seg.mw_array {
            let score = struct_score(res, ctx.metaword(id), prev);
            ctx.set_struct_score(id, score);
        }
        seg.mw_array.sort_by(|&a, &b| {
            let (ma, mb) = (ctx.metaword(a), ctx.metaword(b));
            mb.struct_score
                .cmp(&ma.struct_score)
                .then(ma.kind.preference().cmp(&mb.kind.preference()))
        });
        prev = seg.best_seg_class;
    }
}
