use super::*;
use crate::feature::{mw_feature, FeatureTableBuilder};
use crate::segclass::SegClass;
use crate::testutil::stock_resources;

fn segment(ctx: &SplitterContext, from: usize, len: usize) -> Vec<Segment> {
    vec![Segment::new(ctx, from, len)]
}

#[test]
fn test_struct_score_without_statistics() {
    let res = stock_resources();
    let mut ctx = searched(&res, &LearningStore::new(), "かんじ");
    let mut segments = segment(&ctx, 0, 3);
    sort_metaword(&mut ctx, &res, &mut segments);

    assert!(!segments[0].mw_array.is_empty());
    for &id in &segments[0].mw_array {
        let mw = ctx.metaword(id);
        if mw.mw_features & (mw_feature::SUFFIX | mw_feature::WEAK_CONN) == 0 {
            assert_eq!(mw.struct_score, 6553);
        }
    }
}

#[test]
fn test_matching_row_lifts_metaword_first() {
    let mut res = stock_resources();
    let probe = searched(&res, &LearningStore::new(), "かんじ");
    let target = probe
        .usable_metawords(0, 3)
        .into_iter()
        .find(|&id| probe.metaword(id).wl().is_some())
        .expect("plain meta-word over the whole reading");
    let fl = metaword_features(probe.metaword(target), SegClass::Head).unwrap();
    let mut builder = FeatureTableBuilder::new();
    builder.add(&fl, 0, 10);
    res.cand_info = builder.build();

    let mut ctx = searched(&res, &LearningStore::new(), "かんじ");
    let mut segments = segment(&ctx, 0, 3);
    sort_metaword(&mut ctx, &res, &mut segments);

    let first = ctx.metaword(segments[0].mw_array[0]);
    assert_eq!(first.struct_score, 72089);
    assert_eq!(segments[0].mw_array[0], target);
}

#[test]
fn test_sorting_twice_keeps_the_order() {
    let res = stock_resources();
    let mut ctx = searched(&res, &LearningStore::new(), "とうきょうだいがく");
    let bounds = ctx.segment_bounds();
    let mut segments: Vec<Segment> = bounds
        .iter()
        .map(|&(from, len)| Segment::new(&ctx, from, len))
        .collect();
    sort_metaword(&mut ctx, &res, &mut segments);
    let once: Vec<Vec<usize>> = segments.iter().map(|s| s.mw_array.clone()).collect();
    sort_metaword(&mut ctx, &res, &mut segments);
    let twice: Vec<Vec<usize>> = segments.iter().map(|s| s.mw_array.clone()).collect();
    assert_eq!(once, twice);
}

#[test]
fn test_plain_words_win_ties() {
    let res = stock_resources();
    let mut ctx = searched(&res, &LearningStore::new(), "かん。");
    let mut segments = segment(&ctx, 0, 3);
    sort_metaword(&mut ctx, &res, &mut segments);
    for w in segments[0].mw_array.windows(2) {
        let (a, b) = (ctx.metaword(w[0]), ctx.metaword(w[1]));
        assert!(
            a.struct_score > b.struct_score
                || (a.struct_score == b.struct_score
                    && a.kind.preference() <= b.kind.preference())
        );
    }
}
