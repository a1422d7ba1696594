mod candsort;
mod infosort;

use super::*;
use crate::candidate::{make_candidates, Segment};
use crate::learning::LearningStore;
use crate::resources::Resources;
use crate::splitter::SplitterContext;
use crate::testutil::searched;

/// Segments over fixed `bounds`, ranked the way a conversion ranks them.
fn ranked(
    res: &Resources,
    store: &LearningStore,
    reading: &str,
    bounds: &[(usize, usize)],
) -> (SplitterContext, Vec<Segment>) {
    let mut ctx = searched(res, store, reading);
    let mut segments: Vec<Segment> = bounds
        .iter()
        .map(|&(from, len)| Segment::new(&ctx, from, len))
        .collect();
    sort_metaword(&mut ctx, res, &mut segments);
    for seg in &mut segments {
        make_candidates(&ctx, res, seg);
    }
    sort_candidate(&ctx, res, store, &mut segments, 0);
    (ctx, segments)
}

fn surfaces(seg: &Segment) -> Vec<&str> {
    seg.cands.iter().map(|c| c.surface.as_str()).collect()
}

fn index_of(seg: &Segment, surface: &str) -> usize {
    seg.cands
        .iter()
        .position(|c| c.surface == surface)
        .unwrap_or_else(|| panic!("{surface} not among {:?}", surfaces(seg)))
}
