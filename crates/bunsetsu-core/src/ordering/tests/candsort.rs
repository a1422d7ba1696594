use super::*;
use crate::candidate::flag;
use crate::learning::LearningOp;
use crate::matrix::SparseMatrix;
use crate::testutil::stock_resources;
use crate::xchar::xstr_hash_str;

#[test]
fn test_dictionary_words_rank_above_raw_kana() {
    let res = stock_resources();
    let (_, segments) = ranked(&res, &LearningStore::new(), "かんじ", &[(0, 3)]);
    let seg = &segments[0];
    assert_eq!(surfaces(seg), vec!["漢字", "感じ", "かんじ", "カンジ"]);
    assert!(seg.cands[0].score > seg.cands[1].score);
    assert!(seg.cands[1].score > seg.cands[2].score);
}

#[test]
fn test_duplicates_fold_their_flags() {
    let res = stock_resources();
    let (_, segments) = ranked(&res, &LearningStore::new(), "かんじ", &[(0, 3)]);
    let seg = &segments[0];
    assert_eq!(seg.cands.iter().filter(|c| c.surface == "漢字").count(), 1);
    assert!(seg.cands[0].has_flag(flag::SINGLEWORD));
    assert!(seg.cands.iter().all(|c| c.score > 0));
}

#[test]
fn test_katakana_falls_to_the_floor_unless_first() {
    let res = stock_resources();
    let (_, segments) = ranked(&res, &LearningStore::new(), "ぬぬ", &[(0, 2)]);
    let seg = &segments[0];
    assert_eq!(surfaces(seg), vec!["ぬぬ", "ヌヌ"]);
    assert_eq!(seg.cands[0].score, 2);
    assert_eq!(seg.cands[1].score, 1);
}

#[test]
fn test_history_promotes_recent_choice() {
    let mut store = LearningStore::new();
    store.apply(&LearningOp::CandHistory {
        reading: "かんじ".into(),
        surface: "感じ".into(),
    });
    let res = stock_resources();
    let (_, segments) = ranked(&res, &store, "かんじ", &[(0, 3)]);
    assert_eq!(segments[0].cands[0].surface, "感じ");
}

#[test]
fn test_swapped_core_word_moves_up() {
    let mut store = LearningStore::new();
    store.apply(&LearningOp::IndepPair {
        from: "漢字".into(),
        to: "感じ".into(),
    });
    let res = stock_resources();
    let (_, segments) = ranked(&res, &store, "かんじ", &[(0, 3)]);
    let seg = &segments[0];
    assert_eq!(seg.cands[0].surface, "感じ");
    assert_eq!(seg.cands[0].score, seg.cands[1].score + 1);
}

#[test]
fn test_learned_relation_boosts_neighbour() {
    let mut store = LearningStore::new();
    store.apply(&LearningOp::Relation {
        from: xstr_hash_str("私"),
        to: xstr_hash_str("感じ"),
    });
    let res = stock_resources();
    let (_, segments) = ranked(&res, &store, "わたしかんじ", &[(0, 3), (3, 3)]);
    let top = &segments[1].cands[0];
    assert_eq!(top.surface, "感じ");
    assert!(top.has_flag(flag::USEDICT));
    assert_eq!(segments[0].cands[0].surface, "私");
}

#[test]
fn test_usage_dictionary_boosts_neighbour() {
    let mut usage: SparseMatrix = SparseMatrix::new();
    usage.set(xstr_hash_str("私"), xstr_hash_str("感じ"), 1, None);
    let mut res = stock_resources();
    res.use_dic = Some(usage.to_image().unwrap());

    let (_, segments) = ranked(&res, &LearningStore::new(), "わたしかんじ", &[(0, 3), (3, 3)]);
    assert_eq!(segments[1].cands[0].surface, "感じ");
    assert!(segments[1].cands[0].has_flag(flag::USEDICT));
}

#[test]
fn test_only_later_segments_are_resorted() {
    let res = stock_resources();
    let store = LearningStore::new();
    let (ctx, mut segments) = ranked(&res, &store, "わたしかんじ", &[(0, 3), (3, 3)]);
    segments[0].cands.reverse();
    let kept = segments[0].cands.clone();
    sort_candidate(&ctx, &res, &store, &mut segments, 1);
    assert_eq!(segments[0].cands, kept);
}
