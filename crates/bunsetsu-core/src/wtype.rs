//! Word types: part of speech plus its sub-classes, conjugation class,
//! conjugation form and word flags.
//!
//! A `WType` is six small fields. `NONE` (0) in a field of the haystack acts
//! as a wildcard in [`WType::include`], so a rule typed "名詞" matches every
//! noun regardless of its sub-class.

use serde::{Deserialize, Serialize};

pub mod pos {
    pub const NONE: u8 = 0;
    pub const NOUN: u8 = 1;
    pub const PRT: u8 = 2;
    pub const XV: u8 = 3;
    pub const V: u8 = 4;
    pub const A: u8 = 5;
    pub const AJV: u8 = 6;
    pub const AV: u8 = 7;
    pub const ME: u8 = 8;
    pub const CONJ: u8 = 9;
    pub const IJ: u8 = 10;
    pub const PRE: u8 = 11;
    pub const SUC: u8 = 12;
    pub const TANKANJI: u8 = 13;
    /// Noun-forming suffix attached to a noun.
    pub const N2T: u8 = 14;
    /// Adjective-forming suffix attached to a continuative verb.
    pub const D2KY: u8 = 15;
    pub const NUMBER: u8 = 16;
    pub const INVAL: u8 = 17;
    pub const OPEN: u8 = 18;
    pub const CLOSE: u8 = 19;
}

pub mod ct {
    pub const NONE: u8 = 0;
    pub const SYUSI: u8 = 1;
    pub const MIZEN: u8 = 2;
    pub const RENYOU: u8 = 3;
    pub const RENTAI: u8 = 4;
    pub const KATEI: u8 = 5;
    pub const MEIREI: u8 = 6;
    pub const HEAD: u8 = 7;
}

pub mod cc {
    pub const NONE: u8 = 0;
    pub const K5: u8 = 1;
    pub const C5: u8 = 2;
    pub const G5: u8 = 3;
    pub const S5: u8 = 4;
    pub const T5: u8 = 5;
    pub const N5: u8 = 6;
    pub const M5: u8 = 7;
    pub const B5: u8 = 8;
    pub const R5: u8 = 9;
    pub const L5: u8 = 10;
    pub const W5: u8 = 11;
    pub const U5: u8 = 12;
    pub const KS1: u8 = 13;
    pub const RV: u8 = 14;
    pub const KV: u8 = 15;
    pub const SV: u8 = 16;
    pub const ZV: u8 = 17;
    pub const SRV: u8 = 18;
    pub const AJV: u8 = 21;
    pub const A_KU: u8 = 22;
}

pub mod cos {
    pub const NONE: u8 = 0;
    /// Place name.
    pub const CN: u8 = 1;
    /// Numeral.
    pub const NN: u8 = 2;
    /// Person name.
    pub const JN: u8 = 3;
    /// Organization name.
    pub const KK: u8 = 4;
    pub const SUFFIX: u8 = 5;
    pub const SVSUFFIX: u8 = 6;
}

pub mod scos {
    pub const NONE: u8 = 0;
    pub const FAMNAME: u8 = 1;
    pub const FSTNAME: u8 = 2;
    /// `T0`..`T40` occupy 10..=50.
    pub const T0: u8 = 10;
    pub const T35: u8 = 45;
    pub const T40: u8 = 50;
    /// `F0`..`F14` occupy 60..=74.
    pub const F0: u8 = 60;
    pub const A0: u8 = 80;
    pub const A1: u8 = 81;
    pub const N1: u8 = 90;
    pub const N10: u8 = 91;
    pub const N100: u8 = 92;
    pub const N1000: u8 = 93;
    pub const N10000: u8 = 94;
}

pub mod wf {
    pub const NONE: u8 = 0;
    /// The continuative form of this verb works as a noun.
    pub const MEISI: u8 = 1;
    /// Noun that takes する.
    pub const SV: u8 = 2;
    /// Independent word: the core of a segment.
    pub const INDEP: u8 = 4;
    pub const AJV: u8 = 8;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct WType {
    pub pos: u8,
    pub cos: u8,
    pub scos: u8,
    pub cc: u8,
    pub ct: u8,
    pub wf: u8,
}

impl WType {
    /// Matches every word type.
    pub const ALL: WType = WType::new(pos::NONE, cos::NONE, scos::NONE, cc::NONE, ct::NONE, 0);
    /// Matches nothing a dictionary can produce.
    pub const NONE: WType = WType::new(pos::INVAL, cos::NONE, scos::NONE, cc::NONE, ct::NONE, 0);

    pub const fn new(pos: u8, cos: u8, scos: u8, cc: u8, ct: u8, wf: u8) -> Self {
        Self {
            pos,
            cos,
            scos,
            cc,
            ct,
            wf,
        }
    }

    pub const fn pos(pos: u8) -> Self {
        Self::new(pos, 0, 0, 0, 0, 0)
    }

    /// Whether `needle` falls under `self`, treating NONE fields as wildcards.
    pub fn include(self, needle: WType) -> bool {
        fn field(hs: u8, n: u8) -> bool {
            hs == 0 || hs == n
        }
        field(self.pos, needle.pos)
            && field(self.cc, needle.cc)
            && field(self.ct, needle.ct)
            && field(self.cos, needle.cos)
            && field(self.scos, needle.scos)
    }

    pub fn with_ct(self, ct: u8) -> Self {
        Self { ct, ..self }
    }

    pub fn with_wf(self, wf: u8) -> Self {
        Self { wf, ..self }
    }

    pub fn is_indep(self) -> bool {
        self.wf & wf::INDEP != 0
    }

    pub fn is_sv(self) -> bool {
        self.wf & wf::SV != 0
    }

    pub fn is_meisi(self) -> bool {
        self.wf & wf::MEISI != 0
    }

    /// Six-byte encoding used by the grammar graph rule table.
    pub fn to_bytes(self) -> [u8; 6] {
        [self.pos, self.cos, self.scos, self.cc, self.ct, self.wf]
    }

    pub fn from_bytes(b: [u8; 6]) -> Self {
        Self::new(b[0], b[1], b[2], b[3], b[4], b[5])
    }

    /// Resolve a word-type name as written in grammar rule files.
    ///
    /// Accepts a Japanese category name, a dictionary tag (`#K5`), or the
    /// explicit `pos=V,ct=RENYOU` notation.
    pub fn by_name(name: &str) -> Option<Self> {
        if let Some((_, wt)) = NAMED.iter().find(|(n, _)| *n == name) {
            return Some(*wt);
        }
        if name.starts_with('#') {
            return Self::from_dict_tag(name);
        }
        if name.contains('=') {
            return parse_explicit(name);
        }
        None
    }

    /// Resolve a dictionary tag such as `#T35`, `#K5` or `#N100`.
    pub fn from_dict_tag(tag: &str) -> Option<Self> {
        let body = tag.strip_prefix('#')?;
        let indep = wf::INDEP;
        if let Some((_, wt)) = TAGS.iter().find(|(n, _)| *n == body) {
            return Some(*wt);
        }
        if let Some(n) = numbered(body, "T", 40) {
            let flags = if matches!(n, 30 | 31) {
                indep | wf::SV
            } else {
                indep
            };
            return Some(Self::new(pos::NOUN, 0, scos::T0 + n, 0, 0, flags));
        }
        if let Some(n) = numbered(body, "F", 14) {
            return Some(Self::new(pos::AV, 0, scos::F0 + n, 0, 0, indep));
        }
        None
    }
}

fn numbered(body: &str, prefix: &str, max: u8) -> Option<u8> {
    let digits = body.strip_prefix(prefix)?;
    if digits.is_empty() || digits.len() > 2 {
        return None;
    }
    digits.parse::<u8>().ok().filter(|&n| n <= max)
}

const fn noun(cos: u8, scos: u8) -> WType {
    WType::new(pos::NOUN, cos, scos, 0, 0, wf::INDEP)
}

const fn num(scos: u8) -> WType {
    WType::new(pos::NUMBER, cos::NN, scos, 0, 0, wf::INDEP)
}

const fn verb(cc: u8) -> WType {
    WType::new(pos::V, 0, 0, cc, 0, wf::INDEP)
}

/// Category names used by grammar rule files and by the splitter.
const NAMED: &[(&str, WType)] = &[
    ("名詞", WType::pos(pos::NOUN)),
    ("名詞35", WType::new(pos::NOUN, 0, scos::T35, 0, 0, 0)),
    ("名詞40", WType::new(pos::NOUN, 0, scos::T40, 0, 0, 0)),
    ("人名", WType::new(pos::NOUN, cos::JN, 0, 0, 0, 0)),
    ("姓", WType::new(pos::NOUN, cos::JN, scos::FAMNAME, 0, 0, 0)),
    ("名", WType::new(pos::NOUN, cos::JN, scos::FSTNAME, 0, 0, 0)),
    ("地名", WType::new(pos::NOUN, cos::CN, 0, 0, 0, 0)),
    ("数詞", WType::new(pos::NUMBER, cos::NN, 0, 0, 0, 0)),
    ("数詞1", WType::new(pos::NUMBER, cos::NN, scos::N1, 0, 0, 0)),
    ("数詞10", WType::new(pos::NUMBER, cos::NN, scos::N10, 0, 0, 0)),
    ("数詞100", WType::new(pos::NUMBER, cos::NN, scos::N100, 0, 0, 0)),
    ("数詞1000", WType::new(pos::NUMBER, cos::NN, scos::N1000, 0, 0, 0)),
    ("数詞10000", WType::new(pos::NUMBER, cos::NN, scos::N10000, 0, 0, 0)),
    ("動詞", WType::pos(pos::V)),
    ("動詞連用形", WType::new(pos::V, 0, 0, 0, ct::RENYOU, 0)),
    ("形容詞", WType::pos(pos::A)),
    ("形容詞化接尾語", WType::new(pos::A, 0, scos::A1, 0, 0, 0)),
    ("形容動詞", WType::pos(pos::AJV)),
    ("副詞", WType::pos(pos::AV)),
    ("連体詞", WType::pos(pos::ME)),
    ("接続詞", WType::pos(pos::CONJ)),
    ("感動詞", WType::pos(pos::IJ)),
    ("名詞接頭辞", WType::pos(pos::PRE)),
    ("数接頭辞", WType::new(pos::PRE, cos::NN, 0, 0, 0, 0)),
    ("数接尾辞", WType::new(pos::SUC, cos::NN, 0, 0, 0, 0)),
    ("人名接尾辞", WType::new(pos::SUC, cos::JN, 0, 0, 0, 0)),
    ("サ変接尾辞", WType::new(pos::SUC, cos::SVSUFFIX, 0, 0, 0, 0)),
    ("名詞化接尾語", WType::pos(pos::N2T)),
    ("単漢字", WType::pos(pos::TANKANJI)),
    ("開き括弧", WType::pos(pos::OPEN)),
    ("閉じ括弧", WType::pos(pos::CLOSE)),
];

/// Dictionary tags other than the numbered `T`/`F` noun and adverb classes.
const TAGS: &[(&str, WType)] = &[
    ("JN", noun(cos::JN, 0)),
    ("JNS", noun(cos::JN, scos::FAMNAME)),
    ("JNM", noun(cos::JN, scos::FSTNAME)),
    ("KK", noun(cos::KK, 0)),
    ("CN", noun(cos::CN, 0)),
    ("NN", num(0)),
    ("N1", num(scos::N1)),
    ("N10", num(scos::N10)),
    ("N100", num(scos::N100)),
    ("N1000", num(scos::N1000)),
    ("N10000", num(scos::N10000)),
    ("KJ", WType::new(pos::TANKANJI, 0, 0, 0, 0, wf::INDEP)),
    ("PRE", WType::new(pos::PRE, cos::SUFFIX, 0, 0, 0, 0)),
    ("SUC", WType::new(pos::SUC, cos::SUFFIX, 0, 0, 0, 0)),
    ("NNPRE", WType::new(pos::PRE, cos::NN, 0, 0, 0, 0)),
    ("NNSUC", WType::new(pos::SUC, cos::NN, 0, 0, 0, 0)),
    ("JNSUC", WType::new(pos::SUC, cos::JN, 0, 0, 0, 0)),
    ("SVSUC", WType::new(pos::SUC, cos::SVSUFFIX, 0, 0, 0, 0)),
    ("N2T", WType::new(pos::N2T, 0, 0, 0, 0, wf::INDEP)),
    ("D2T40", noun(0, scos::T40)),
    ("D2KY", WType::new(pos::A, 0, scos::A1, cc::A_KU, 0, wf::INDEP)),
    ("K5", verb(cc::K5)),
    ("C5", verb(cc::C5)),
    ("G5", verb(cc::G5)),
    ("S5", verb(cc::S5)),
    ("T5", verb(cc::T5)),
    ("N5", verb(cc::N5)),
    ("M5", verb(cc::M5)),
    ("B5", verb(cc::B5)),
    ("R5", verb(cc::R5)),
    ("L5", verb(cc::L5)),
    ("W5", verb(cc::W5)),
    ("U5", verb(cc::U5)),
    ("KS", verb(cc::KS1)),
    ("RV", verb(cc::RV)),
    ("KV", verb(cc::KV)),
    ("SV", verb(cc::SV)),
    ("ZV", verb(cc::ZV)),
    ("SRV", verb(cc::SRV)),
    ("A", WType::new(pos::A, 0, 0, cc::A_KU, 0, wf::INDEP)),
    ("AJV", WType::new(pos::AJV, 0, 0, cc::AJV, 0, wf::INDEP | wf::AJV)),
    ("ME", WType::new(pos::ME, 0, 0, 0, 0, wf::INDEP)),
    ("CJ", WType::new(pos::CONJ, 0, 0, 0, 0, wf::INDEP)),
    ("IJ", WType::new(pos::IJ, 0, 0, 0, 0, wf::INDEP)),
    ("OPEN", WType::new(pos::OPEN, 0, 0, 0, 0, wf::INDEP)),
    ("CLOSE", WType::new(pos::CLOSE, 0, 0, 0, 0, wf::INDEP)),
];

fn parse_explicit(spec: &str) -> Option<WType> {
    let mut wt = WType::ALL;
    for field in spec.split(',') {
        let (key, value) = field.split_once('=')?;
        let value = value.trim();
        match key.trim() {
            "pos" => wt.pos = pos_by_symbol(value)?,
            "ct" => wt.ct = ct_by_symbol(value)?,
            "cos" => wt.cos = value.parse().ok()?,
            "scos" => wt.scos = value.parse().ok()?,
            "cc" => wt.cc = value.parse().ok()?,
            "wf" => wt.wf = value.parse().ok()?,
            _ => return None,
        }
    }
    Some(wt)
}

fn pos_by_symbol(s: &str) -> Option<u8> {
    Some(match s {
        "NOUN" | "N" => pos::NOUN,
        "V" => pos::V,
        "A" => pos::A,
        "AJV" => pos::AJV,
        "AV" => pos::AV,
        "ME" => pos::ME,
        "CONJ" => pos::CONJ,
        "IJ" => pos::IJ,
        "PRE" => pos::PRE,
        "SUC" => pos::SUC,
        "TANKANJI" => pos::TANKANJI,
        "N2T" => pos::N2T,
        "D2KY" => pos::D2KY,
        "NUMBER" => pos::NUMBER,
        "OPEN" => pos::OPEN,
        "CLOSE" => pos::CLOSE,
        other => other.parse().ok()?,
    })
}

fn ct_by_symbol(s: &str) -> Option<u8> {
    Some(match s {
        "SYUSI" => ct::SYUSI,
        "MIZEN" => ct::MIZEN,
        "RENYOU" => ct::RENYOU,
        "RENTAI" => ct::RENTAI,
        "KATEI" => ct::KATEI,
        "MEIREI" => ct::MEIREI,
        "HEAD" => ct::HEAD,
        other => other.parse().ok()?,
    })
}

/// Word types the splitter asks for by meaning.
pub mod named {
    use super::{cos, pos, scos, ct, WType};

    pub const NOUN: WType = WType::new(pos::NOUN, 0, scos::T35, 0, 0, 0);
    pub const NAME_NOUN: WType = WType::new(pos::NOUN, cos::JN, 0, 0, 0, 0);
    pub const NUM_NOUN: WType = WType::new(pos::NUMBER, cos::NN, 0, 0, 0, 0);
    pub const A_TAIL_OF_V_RENYOU: WType = WType::new(pos::A, 0, scos::A1, 0, 0, 0);
    pub const V_RENYOU: WType = WType::new(pos::V, 0, 0, 0, ct::RENYOU, 0);
    pub const NOUN_TAIL: WType = WType::pos(pos::N2T);
    pub const PREFIX: WType = WType::pos(pos::PRE);
    pub const NUM_PREFIX: WType = WType::new(pos::PRE, cos::NN, 0, 0, 0, 0);
    pub const NUM_POSTFIX: WType = WType::new(pos::SUC, cos::NN, 0, 0, 0, 0);
    pub const NAME_POSTFIX: WType = WType::new(pos::SUC, cos::JN, 0, 0, 0, 0);
    pub const SV_POSTFIX: WType = WType::new(pos::SUC, cos::SVSUFFIX, 0, 0, 0, 0);
}
