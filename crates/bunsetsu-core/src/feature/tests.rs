use proptest::prelude::*;

use super::*;
use crate::segclass::{DepClass, SegClass};
use crate::wtype::{cos, pos, WType};

fn list(codes: &[i32]) -> FeatureList {
    let mut fl = FeatureList::new();
    for &c in codes {
        fl.add(c).unwrap();
    }
    fl
}

#[test]
fn test_bands_do_not_overlap() {
    let mut fl = FeatureList::new();
    fl.set_cur_class(SegClass::RentaiShushoku).unwrap();
    fl.set_dep_class(DepClass::Raw).unwrap();
    fl.set_class_trans(SegClass::RentaiShushoku, SegClass::RentaiShushoku)
        .unwrap();
    fl.set_dep_word(i32::MAX).unwrap();
    let c = fl.codes();
    assert!(c[0] < band::DEP_TYPE);
    assert!(c[1] < band::CLASS_TRANS);
    assert!(c[2] < band::SV);
    assert!(c[3] >= band::DEP_WORD && c[3] < band::DEP_WORD + band::DEP_WORD_SIZE);
}

#[test]
fn test_capacity_is_checked() {
    let mut fl = list(&[1; MAX_FEATURES]);
    let err = fl.add(99).unwrap_err();
    assert!(matches!(err, FeatureError::Capacity { code: 99, max: MAX_FEATURES }));
    assert_eq!(fl.len(), MAX_FEATURES);
}

#[test]
fn test_richest_meta_word_fits() {
    let mut fl = FeatureList::new();
    fl.set_cur_class(SegClass::MeishiKakujoshi).unwrap();
    fl.set_class_trans(SegClass::Head, SegClass::MeishiKakujoshi)
        .unwrap();
    fl.set_dep_class(DepClass::Kakujoshi).unwrap();
    fl.set_dep_word(1234).unwrap();
    fl.set_mw_features(u32::MAX).unwrap();
    fl.set_noun_cos(WType::new(pos::NOUN, cos::SUFFIX, 0, 0, 0, 0))
        .unwrap();
    fl.set_prev_weak().unwrap();
    assert!(fl.len() <= MAX_FEATURES);
}

#[test]
fn test_noun_cos_only_for_suffix_nouns() {
    let mut fl = FeatureList::new();
    fl.set_noun_cos(WType::from_dict_tag("#T35").unwrap()).unwrap();
    assert!(fl.is_empty());
    fl.set_noun_cos(WType::new(pos::NOUN, cos::SUFFIX, 0, 0, 0, 0))
        .unwrap();
    assert_eq!(fl.codes(), &[band::COS + cos::SUFFIX as i32]);
}

#[test]
fn test_mw_feature_flags() {
    let mut fl = FeatureList::new();
    fl.set_mw_features(mw_feature::SV | mw_feature::NUM | mw_feature::DEP_ONLY)
        .unwrap();
    fl.sort();
    assert_eq!(fl.codes(), &[band::SV, band::NUM]);
}

#[test]
fn test_table_lookup() {
    let mut b = FeatureTableBuilder::new();
    b.add(&list(&[3, 100, 1440]), 5, 15);
    b.add(&list(&[3]), 1, 0);
    b.add(&list(&[1400, 2]), 0, 7);
    let table = b.build();
    assert_eq!(table.len(), 3);

    let mut key = list(&[1440, 3, 100]);
    key.sort();
    let freq = table.find(&key).unwrap();
    assert_eq!(freq, FeatureFreq { neg: 5, pos: 15 });
    assert!((freq.probability().unwrap() - 0.75).abs() < 1e-9);

    assert_eq!(table.find(&list(&[2, 1400])).unwrap().pos, 7);
    assert!(table.find(&list(&[3, 100])).is_none());
    assert!(FeatureTable::empty().find(&list(&[3])).is_none());
}

#[test]
fn test_builder_merges_counts() {
    let mut b = FeatureTableBuilder::new();
    b.add(&list(&[7, 2]), 1, 2);
    b.add(&list(&[2, 7]), 3, 4);
    assert_eq!(b.len(), 1);
    let table = FeatureTable::from_be_bytes(b.to_be_bytes()).unwrap();
    assert_eq!(table.find(&list(&[2, 7])), Some(FeatureFreq { neg: 4, pos: 6 }));
}

#[test]
fn test_rows_are_sorted() {
    let b = FeatureTableBuilder::from_text("# neg pos codes\n1 1 9\n1 1 2 5\n1 1 2\n").unwrap();
    let table = b.build();
    let keys: Vec<_> = table.rows().map(|(k, _)| k).collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[test]
fn test_text_errors() {
    assert!(FeatureTableBuilder::from_text("1\n").is_err());
    assert!(FeatureTableBuilder::from_text("1 2 x\n").is_err());
    let fifteen = format!("0 0 {}", vec!["1"; 15].join(" "));
    assert!(matches!(
        FeatureTableBuilder::from_text(&fifteen),
        Err(FeatureError::Capacity { .. })
    ));
}

#[test]
fn test_truncated_table_rejected() {
    let mut bytes = FeatureTableBuilder::from_text("1 1 2\n").unwrap().to_be_bytes();
    bytes.truncate(bytes.len() - 4);
    assert!(FeatureTable::from_be_bytes(bytes).is_err());
    assert!(FeatureTable::from_be_bytes(vec![0, 0]).is_err());
}

#[test]
fn test_probability_of_empty_counters() {
    assert_eq!(FeatureFreq::default().probability(), None);
    let p = FeatureFreq { neg: 3, pos: 0 }.probability().unwrap();
    assert_eq!(p, 0.0);
}

#[test]
fn test_weak_words() {
    let w = WeakWords::new(vec![30, 10, 20, 10]);
    assert_eq!(w.len(), 3);
    assert!(w.contains(20));
    assert!(!w.contains(15));
    let back = WeakWords::from_be_bytes(&w.to_be_bytes()).unwrap();
    assert!(back.contains(30));
    assert!(WeakWords::from_be_bytes(&[0; 8]).unwrap().is_empty());
    assert!(WeakWords::from_be_bytes(&[0, 0, 0, 0, 0, 0, 0, 2]).is_err());
}

proptest! {
    #[test]
    fn test_sort_is_idempotent(codes in prop::collection::vec(0i32..2500, 0..=MAX_FEATURES)) {
        let mut once = list(&codes);
        once.sort();
        let mut twice = once.clone();
        twice.sort();
        prop_assert_eq!(&once, &twice);

        let mut reversed: Vec<i32> = codes.clone();
        reversed.reverse();
        let mut other = list(&reversed);
        other.sort();
        prop_assert_eq!(once.key(), other.key());
    }
}
