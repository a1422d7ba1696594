use crate::dict::{DictError, MemoryWordDictionary, WordDictionary};
use crate::wtype::{named, pos, WType};

const SAMPLE: &str = "\
# comment line
かんじ #T35*500 漢字 #T35*200 感じ
かん #T35*300 缶 #KJ*10 缶
とうきょうだいがく #CN*300 _5東京_4大学
お #PRE*50 御
";

#[test]
fn test_parse_text() {
    let dic = MemoryWordDictionary::from_text(SAMPLE).unwrap();
    assert_eq!(dic.len(), 4);
    let seq = dic.lookup("かんじ", false).unwrap();
    assert_eq!(seq.words.len(), 2);
    assert_eq!(seq.wtype_freq(WType::by_name("名詞").unwrap()), 500);
    assert_eq!(seq.wtype_freq(WType::pos(pos::V)), 0);

    let kan = dic.lookup("かん", false).unwrap();
    assert_eq!(kan.wtype_freq(WType::pos(pos::TANKANJI)), 10);
}

#[test]
fn test_compound_entry() {
    let dic = MemoryWordDictionary::from_text(SAMPLE).unwrap();
    let seq = dic.lookup("とうきょうだいがく", false).unwrap();
    assert!(!seq.has_words());
    assert!(seq.has_compounds());
    let c = &seq.compounds[0];
    assert_eq!(c.surface(), "東京大学");
    assert_eq!(c.parts[0].reading_len, 5);
    assert_eq!(seq.compound_freq(WType::ALL), 300);
}

#[test]
fn test_prefix_flag() {
    let dic = MemoryWordDictionary::from_text(SAMPLE).unwrap();
    let o = dic.lookup("お", false).unwrap();
    assert!(o.has_prefix());
    assert!(!o.has_suffix());
    assert_eq!(o.wtype_freq(named::PREFIX), 50);
}

#[test]
fn test_reverse_lookup() {
    let dic = MemoryWordDictionary::from_text(SAMPLE).unwrap();
    let rev = dic.lookup("缶", true).unwrap();
    let readings: Vec<&str> = rev.words.iter().map(|w| w.surface.as_str()).collect();
    assert_eq!(readings, vec!["かん", "かん"]);
    assert!(dic.lookup("かん", true).is_none());
}

#[test]
fn test_duplicate_entries_keep_max_freq() {
    let dic = MemoryWordDictionary::from_text("かん #T35*3 缶\nかん #T35*9 缶\n").unwrap();
    let seq = dic.lookup("かん", false).unwrap();
    assert_eq!(seq.words.len(), 1);
    assert_eq!(seq.words[0].freq, 9);
}

#[test]
fn test_parse_errors() {
    assert!(matches!(
        MemoryWordDictionary::from_text("かん 缶"),
        Err(DictError::Parse(_))
    ));
    assert!(matches!(
        MemoryWordDictionary::from_text("かん #ZZ 缶"),
        Err(DictError::Parse(_))
    ));
    let err = MemoryWordDictionary::from_text("かんじ #CN _1漢_1字").unwrap_err();
    assert!(err.to_string().contains("covers 2"));
}

#[test]
fn test_serialize_roundtrip() {
    let dic = MemoryWordDictionary::from_text(SAMPLE).unwrap();
    let mut bytes = dic.to_bytes().unwrap();
    // container padding after the body must be tolerated
    bytes.extend_from_slice(&[0; 7]);
    let dic2 = MemoryWordDictionary::from_bytes(&bytes).unwrap();
    assert_eq!(dic2.len(), dic.len());
    assert_eq!(dic2.entry_count(), dic.entry_count());
    assert_eq!(
        dic2.lookup("かんじ", false),
        dic.lookup("かんじ", false)
    );
    assert!(dic2.lookup("漢字", true).is_some());
}

#[test]
fn test_bad_magic() {
    assert!(matches!(
        MemoryWordDictionary::from_bytes(b"XXXX\x01abc"),
        Err(DictError::InvalidMagic)
    ));
    assert!(matches!(
        MemoryWordDictionary::from_bytes(b"BSWD\x09abc"),
        Err(DictError::UnsupportedVersion(9))
    ));
}
