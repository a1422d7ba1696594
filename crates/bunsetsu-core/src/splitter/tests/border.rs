use proptest::prelude::*;

use crate::splitter::lattice::transition_features;
use super::*;
use crate::feature::FeatureTableBuilder;
use crate::testutil::searched;

fn assert_full_cover(ctx: &SplitterContext) {
    let mut next = 0;
    for (from, len) in ctx.segment_bounds() {
        assert_eq!(from, next);
        assert!(len > 0);
        next += len;
    }
    assert_eq!(next, ctx.len());
}

#[test]
fn test_aiueo_is_fully_covered() {
    let res = stock_resources();
    let ctx = searched(&res, &LearningStore::new(), "あいうえお");
    assert_full_cover(&ctx);
    for (from, len) in ctx.segment_bounds() {
        let ce = ctx.char_ent(from);
        assert!(ctx.metaword_count(from, len) > 0 || ce.best_mw.is_some());
        assert_ne!(ce.best_seg_class, SegClass::Head, "segment at {from}");
        assert_eq!(ce.initial_seg_len, len);
    }
}

#[test]
fn test_unknown_text_falls_back_to_single_characters() {
    let res = stock_resources();
    let ctx = searched(&res, &LearningStore::new(), "ぬぬぬ");
    assert_eq!(ctx.segment_bounds(), vec![(0, 1), (1, 1), (2, 1)]);
    assert_eq!(ctx.metaword_count(1, 1), 1);
    let id = ctx.nth_metaword(1, 1, 0).unwrap();
    assert_eq!(ctx.metaword(id).kind, MetaWordKind::Dummy);
    assert_eq!(ctx.nth_metaword(1, 1, 1), None);
}

#[test]
fn test_committed_prefix_is_not_disturbed() {
    let res = stock_resources();
    let mut ctx = searched(&res, &LearningStore::new(), "かんじがわたしのがっこう");
    let ents: Vec<CharEnt> = ctx.char_ents()[..3].to_vec();
    let mws: Vec<MetaWord> = (0..3)
        .flat_map(|i| ctx.metawords_at(i).to_vec())
        .map(|id| ctx.metaword(id).clone())
        .collect();

    let n = ctx.len();
    ctx.mark_border(&res, 3, 7, n);

    assert_eq!(&ctx.char_ents()[..3], ents.as_slice());
    let after: Vec<MetaWord> = (0..3)
        .flat_map(|i| ctx.metawords_at(i).to_vec())
        .map(|id| ctx.metaword(id).clone())
        .collect();
    assert_eq!(after, mws);
    assert!(ctx.char_ent(n).seg_border);
}

#[test]
fn test_forbidden_range_keeps_one_segment() {
    let res = stock_resources();
    let mut ctx = searched(&res, &LearningStore::new(), "かんじがわたし");
    let n = ctx.len();
    ctx.move_border(0, 4);
    ctx.mark_border(&res, 0, 4, n);
    assert_eq!(ctx.segment_bounds()[0], (0, 4));
    assert_full_cover(&ctx);
}

#[test]
fn test_transition_table_steers_the_path() {
    let plain = stock_resources();
    let store = LearningStore::new();
    let mut ctx = SplitterContext::new(&plain, &store, &to_chars("かんじがわたし"), false);

    let pick = |from: usize, len: usize, class: SegClass| {
        ctx.metawords_at(from)
            .iter()
            .map(|&id| ctx.metaword(id))
            .find(|mw| mw.len == len && mw.seg_class == class)
            .cloned()
            .unwrap()
    };
    let first = pick(0, 4, SegClass::MeishiKakujoshi);
    let second = pick(4, 3, SegClass::Meishi);

    let mut table = FeatureTableBuilder::new();
    let rows = [
        (SegClass::Head, first.seg_class, Some(&first), None, 90),
        (first.seg_class, second.seg_class, Some(&second), Some(&first), 80),
        (second.seg_class, SegClass::Tail, None, Some(&second), 70),
    ];
    for (prev, cur, mw, prev_mw, pos) in rows {
        let fl = transition_features(cur, prev, mw, prev_mw).unwrap();
        table.add(&fl, 100 - pos, pos);
    }
    let mut res = stock_resources();
    res.trans_info = table.build();

    let n = ctx.len();
    ctx.mark_border(&res, 0, 0, n);
    assert_eq!(ctx.segment_bounds(), vec![(0, 4), (4, 3)]);
    assert_eq!(ctx.char_ent(0).best_seg_class, SegClass::MeishiKakujoshi);
    assert_eq!(ctx.char_ent(4).best_seg_class, SegClass::Meishi);
}

#[test]
fn test_stretched_segment_is_learned() {
    let res = stock_resources();
    let mut ctx = SplitterContext::new(&res, &LearningStore::new(), &to_chars("かんじが"), false);
    ctx.mark_border(&res, 0, 0, 4);
    ctx.ce[0].initial_seg_len = 2;
    ctx.ce[2].initial_seg_len = 2;
    let mw = ctx.usable_metawords(0, 4)[0];

    let ops = ctx.commit_border(&[(Some(mw), 4)]);
    assert_eq!(
        ops,
        vec![LearningOp::ExpandPair {
            from: "かん".into(),
            to: "かんじが".into(),
        }]
    );
    assert!(ctx.commit_border(&[(None, 4)]).is_empty());
    assert!(ctx.commit_border(&[(Some(mw), 2), (None, 2)]).is_empty());
}

#[test]
fn test_committed_segments_survive_a_new_search() {
    let res = stock_resources();
    let mut ctx = searched(&res, &LearningStore::new(), "かんじがわたし");
    let n = ctx.len();
    let plan = [(0, 2), (2, 2), (4, 3)];
    assert_ne!(ctx.segment_bounds(), plan.to_vec());

    let chosen: Vec<(Option<MwId>, usize)> = plan
        .iter()
        .map(|&(from, len)| (ctx.usable_metawords(from, len).first().copied(), len))
        .collect();
    assert!(chosen[0].0.is_some());
    ctx.commit_border(&chosen);
    assert_eq!(ctx.frozen_len(), n);
    assert_eq!(ctx.segment_bounds(), plan.to_vec());

    ctx.mark_border(&res, 0, 0, n);
    ctx.move_border(0, 4);
    assert_eq!(ctx.segment_bounds(), plan.to_vec());
    for (&(from, _), &(mw, _)) in plan.iter().zip(&chosen) {
        let ce = ctx.char_ent(from);
        assert_eq!(ce.best_mw, mw);
        if let Some(mw) = mw {
            assert_eq!(ce.best_seg_class, ctx.metaword(mw).seg_class);
        }
    }
    assert_eq!(ctx.char_ent(1).best_mw, None);
}

#[test]
fn test_search_resumes_after_frozen_prefix() {
    let res = stock_resources();
    let mut ctx = searched(&res, &LearningStore::new(), "かんじがわたし");
    let n = ctx.len();
    let first = ctx.usable_metawords(0, 2).first().copied();
    ctx.commit_border(&[(first, 2)]);
    assert_eq!(ctx.frozen_len(), 2);

    ctx.mark_border(&res, 0, 0, n);
    let bounds = ctx.segment_bounds();
    assert_eq!(bounds[0], (0, 2));
    assert_eq!(bounds.iter().map(|&(_, len)| len).sum::<usize>(), n);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn test_any_kana_string_is_covered(s in "[あいうえおかんじがのをわたしっ。]{1,8}") {
        let res = stock_resources();
        let ctx = searched(&res, &LearningStore::new(), &s);
        let mut next = 0;
        for (from, len) in ctx.segment_bounds() {
            prop_assert_eq!(from, next);
            next += len;
        }
        prop_assert_eq!(next, ctx.len());
    }
}
