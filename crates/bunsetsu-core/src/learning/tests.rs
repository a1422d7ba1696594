use std::fs::OpenOptions;
use std::io::Write;

use super::*;

fn pair(from: &str, to: &str) -> LearningOp {
    LearningOp::IndepPair {
        from: from.into(),
        to: to.into(),
    }
}

#[test]
fn test_swap_follows_one_hop() {
    let mut store = LearningStore::new();
    store.apply_all(&[pair("感じ", "漢字"), pair("漢字", "幹事")]);
    assert_eq!(store.swap_target("感じ"), Some("幹事"));
    assert_eq!(store.swap_target("漢字"), Some("幹事"));
    assert_eq!(store.swap_target("幹事"), None);
}

#[test]
fn test_swap_loop_is_removed() {
    let mut store = LearningStore::new();
    store.apply_all(&[pair("感じ", "漢字")]);
    store.apply_all(&[pair("漢字", "感じ")]);
    assert_eq!(store.indep_pair_len(), 0);
    assert_eq!(store.swap_target("感じ"), None);
}

#[test]
fn test_history_is_bounded_and_newest_first() {
    let mut store = LearningStore::new();
    let depth = settings().ordering.history_depth;
    for i in 0..depth + 3 {
        store.apply(&LearningOp::CandHistory {
            reading: "かんじ".into(),
            surface: format!("候補{i}"),
        });
    }
    let row = store.cand_history("かんじ").unwrap();
    assert_eq!(row.len(), depth);
    assert_eq!(row[0], format!("候補{}", depth + 2));
}

#[test]
fn test_sections_age_out_oldest_rows() {
    let mut store = LearningStore::new();
    let max = settings().ordering.max_indep_pair;
    for i in 0..max + 5 {
        store.apply_all(&[pair(&format!("a{i}"), &format!("b{i}"))]);
    }
    assert_eq!(store.indep_pair_len(), max);
    assert_eq!(store.swap_target("a0"), None);
    assert_eq!(store.swap_target(&format!("a{}", max + 4)), Some(format!("b{}", max + 4).as_str()));
}

#[test]
fn test_ochaire_release_and_key_limit() {
    let mut store = LearningStore::new();
    let segs = vec![
        OchaireSegment {
            len: 2,
            surface: "今日".into(),
        },
        OchaireSegment {
            len: 1,
            surface: "は".into(),
        },
    ];
    store.apply(&LearningOp::Ochaire {
        key: "きょうは".into(),
        segments: segs.clone(),
    });
    assert_eq!(store.ochaire("きょうは"), Some(segs.as_slice()));

    let long = "あ".repeat(settings().ordering.max_ochaire_len);
    store.apply(&LearningOp::Ochaire {
        key: long.clone(),
        segments: segs,
    });
    assert!(store.ochaire(&long).is_none());

    store.apply(&LearningOp::ReleaseOchaire {
        keys: vec!["きょうは".into(), "は".into()],
    });
    assert_eq!(store.ochaire_len(), 0);
}

#[test]
fn test_expand_pairs_deduplicate() {
    let mut store = LearningStore::new();
    let op = LearningOp::ExpandPair {
        from: "きょう".into(),
        to: "きょうは".into(),
    };
    store.apply_all(&[op.clone(), op]);
    assert_eq!(store.expand_targets("きょう"), ["きょうは".to_string()]);
    assert!(store.expand_targets("あす").is_empty());
}

#[test]
fn test_bytes_round_trip_and_bad_magic() {
    let mut store = LearningStore::new();
    store.apply_all(&[pair("感じ", "漢字"), LearningOp::Relation { from: 1, to: 2 }]);
    let back = LearningStore::from_bytes(&store.to_bytes().unwrap()).unwrap();
    assert_eq!(back, store);
    assert!(matches!(
        LearningStore::from_bytes(b"XXXX\x01"),
        Err(LearningError::InvalidMagic)
    ));
    let mut bytes = store.to_bytes().unwrap();
    bytes[4] = 9;
    assert!(matches!(
        LearningStore::from_bytes(&bytes),
        Err(LearningError::UnsupportedVersion(9))
    ));
}

#[test]
fn test_open_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = LearningStore::open(&dir.path().join("none.bsls")).unwrap();
    assert_eq!(store, LearningStore::new());
}

#[test]
fn test_wal_replays_over_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("learn.bsls");

    let (mut store, mut wal) = open_with_wal(&path).unwrap();
    let ops = vec![pair("感じ", "漢字")];
    store.apply_all(&ops);
    wal.append(&ops).unwrap();
    let ops = vec![LearningOp::Relation { from: 3, to: 4 }];
    store.apply_all(&ops);
    wal.append(&ops).unwrap();
    assert_eq!(wal.entry_count(), 2);
    drop(wal);

    let (reopened, wal) = open_with_wal(&path).unwrap();
    assert_eq!(wal.entry_count(), 2);
    assert_eq!(reopened, store);
}

#[test]
fn test_wal_stops_at_corrupt_tail() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("learn.bsls");
    let mut wal = LearningWal::new(&path);
    wal.append(&[pair("a", "b")]).unwrap();
    drop(wal);

    let mut f = OpenOptions::new()
        .append(true)
        .open(dir.path().join("learn.bsls.wal"))
        .unwrap();
    f.write_all(&[40, 0, 0, 0, 1, 2, 3, 4, 5]).unwrap();
    drop(f);

    let (store, wal) = open_with_wal(&path).unwrap();
    assert_eq!(wal.entry_count(), 1);
    assert_eq!(store.swap_target("a"), Some("b"));
}

#[test]
fn test_compact_writes_snapshot_and_truncates() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("learn.bsls");
    let (mut store, mut wal) = open_with_wal(&path).unwrap();
    let ops = vec![pair("x", "y")];
    store.apply_all(&ops);
    wal.append(&ops).unwrap();
    wal.compact(&store).unwrap();
    assert_eq!(wal.entry_count(), 0);
    assert_eq!(std::fs::metadata(wal.wal_path()).unwrap().len(), 0);

    let (reopened, _) = open_with_wal(&path).unwrap();
    assert_eq!(reopened.swap_target("x"), Some("y"));
}
