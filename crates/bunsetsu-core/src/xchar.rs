//! Character-level classification and kana conversion for Japanese input.
//!
//! `char_type` is a pure function of the code point: a small table of
//! special marks (brackets, particles, small kana) combined with range tests.
//! `str_type` folds it with bitwise AND, so the result keeps only the
//! properties shared by every character.

/// Classification bits returned by [`char_type`].
pub mod xct {
    pub const NONE: u32 = 0;
    pub const HIRA: u32 = 1;
    pub const KATA: u32 = 2;
    pub const ASCII: u32 = 4;
    pub const NUM: u32 = 8;
    pub const WIDENUM: u32 = 16;
    pub const OPEN: u32 = 32;
    pub const CLOSE: u32 = 64;
    /// Small kana and the voicing mark: never start a word.
    pub const PART: u32 = 128;
    /// Particle characters (と, に, を, は, の, が).
    pub const DEP: u32 = 256;
    /// Particles that strongly end a segment (は, の, が).
    pub const STRONG: u32 = 512;
    pub const SYMBOL: u32 = 1024;
    pub const KANJI: u32 = 2048;
    pub const PUNCTUATION: u32 = 4096;
    pub const ALL: u32 = 0xffff;
}

const SPECIAL: &[(char, u32)] = &[
    ('（', xct::OPEN),
    ('）', xct::CLOSE),
    ('〔', xct::OPEN),
    ('〕', xct::CLOSE),
    ('［', xct::OPEN),
    ('］', xct::CLOSE),
    ('｛', xct::OPEN),
    ('｝', xct::CLOSE),
    ('〈', xct::OPEN),
    ('〉', xct::CLOSE),
    ('《', xct::OPEN),
    ('》', xct::CLOSE),
    ('「', xct::OPEN),
    ('」', xct::CLOSE),
    ('『', xct::OPEN),
    ('』', xct::CLOSE),
    ('【', xct::OPEN),
    ('】', xct::CLOSE),
    ('(', xct::OPEN),
    ('[', xct::OPEN),
    (')', xct::CLOSE),
    (']', xct::CLOSE),
    ('と', xct::DEP),
    ('は', xct::DEP | xct::STRONG),
    ('の', xct::DEP | xct::STRONG),
    ('に', xct::DEP),
    ('が', xct::DEP | xct::STRONG),
    ('を', xct::DEP),
    ('゛', xct::PART),
    ('ぁ', xct::PART),
    ('ぃ', xct::PART),
    ('ぅ', xct::PART),
    ('ぇ', xct::PART),
    ('ぉ', xct::PART),
    ('ゃ', xct::PART),
    ('ゅ', xct::PART),
    ('ょ', xct::PART),
    ('っ', xct::PART),
    ('、', xct::PUNCTUATION),
    ('。', xct::PUNCTUATION),
    ('，', xct::PUNCTUATION),
    ('．', xct::PUNCTUATION),
];

fn special_type(c: char) -> u32 {
    SPECIAL
        .iter()
        .find(|(sc, _)| *sc == c)
        .map(|(_, t)| *t)
        .unwrap_or(xct::NONE)
}

pub fn is_hiragana(c: char) -> bool {
    ('\u{3041}'..='\u{309F}').contains(&c) || c == 'ー'
}

pub fn is_katakana(c: char) -> bool {
    ('\u{30A0}'..='\u{30FF}').contains(&c)
}

pub fn is_kanji(c: char) -> bool {
    ('\u{4E00}'..='\u{9FFF}').contains(&c) || ('\u{3400}'..='\u{4DBF}').contains(&c)
}

fn is_wide_digit(c: char) -> bool {
    ('０'..='９').contains(&c)
}

/// CJK symbols and the fullwidth punctuation blocks.
fn is_symbol(c: char) -> bool {
    ('\u{3000}'..='\u{303F}').contains(&c)
        || ('\u{FF01}'..='\u{FF0F}').contains(&c)
        || ('\u{FF1A}'..='\u{FF20}').contains(&c)
        || ('\u{FF3B}'..='\u{FF40}').contains(&c)
        || ('\u{FF5B}'..='\u{FF65}').contains(&c)
}

/// Classify a single code point.
pub fn char_type(c: char) -> u32 {
    let mut t = special_type(c);
    if c.is_ascii_digit() {
        t |= xct::NUM;
    }
    if is_wide_digit(c) {
        t |= xct::WIDENUM;
    }
    if c.is_ascii() {
        t |= xct::ASCII;
    }
    if is_hiragana(c) {
        t |= xct::HIRA;
    }
    if is_katakana(c) {
        t |= xct::KATA;
    }
    if is_symbol(c) && t & (xct::OPEN | xct::CLOSE) == 0 {
        t |= xct::SYMBOL;
    }
    if is_kanji(c) {
        t |= xct::KANJI;
    }
    t
}

/// Properties true for every character of `s`. Empty input yields `ALL`.
pub fn str_type(s: &[char]) -> u32 {
    s.iter().fold(xct::ALL, |t, &c| t & char_type(c))
}

/// Hiragana to katakana; う followed by a voicing mark becomes ヴ.
pub fn hira_to_kata(s: &[char]) -> Vec<char> {
    let mut out = Vec::with_capacity(s.len());
    let mut i = 0;
    while i < s.len() {
        let c = s[i];
        if c == 'う' && matches!(s.get(i + 1), Some('゛') | Some('\u{3099}')) {
            out.push('ヴ');
            i += 2;
            continue;
        }
        out.push(shift_kana(c, '\u{3041}'..='\u{3096}', 0x60, true));
        i += 1;
    }
    out
}

pub fn kata_to_hira(s: &[char]) -> Vec<char> {
    s.iter()
        .map(|&c| shift_kana(c, '\u{30A1}'..='\u{30F6}', 0x60, false))
        .collect()
}

fn shift_kana(c: char, range: std::ops::RangeInclusive<char>, delta: u32, up: bool) -> char {
    if !range.contains(&c) {
        return c;
    }
    let code = if up { c as u32 + delta } else { c as u32 - delta };
    char::from_u32(code).unwrap_or(c)
}

/// Digit value of an ASCII or fullwidth digit.
pub fn char_to_num(c: char) -> Option<u32> {
    if is_wide_digit(c) {
        return Some(c as u32 - '０' as u32);
    }
    c.to_digit(10)
}

/// Parse a run of at most 16 (ASCII or wide) digits.
pub fn parse_number(s: &[char]) -> Option<i64> {
    if s.is_empty() || s.len() > 16 {
        return None;
    }
    if str_type(s) & (xct::NUM | xct::WIDENUM) == 0 {
        return None;
    }
    s.iter().try_fold(0i64, |n, &c| Some(n * 10 + char_to_num(c)? as i64))
}

/// Stable string hash used for word ids, dependent-word features and the
/// weak-word list. Never negative.
pub fn xstr_hash(s: &[char]) -> i32 {
    let mut h: i32 = 0;
    for &c in s {
        let c = c as i32;
        h = h
            .wrapping_mul(97)
            .wrapping_add(c << 4)
            .wrapping_add(c >> 4);
    }
    h.checked_abs().unwrap_or(i32::MAX)
}

pub fn xstr_hash_str(s: &str) -> i32 {
    let chars: Vec<char> = s.chars().collect();
    xstr_hash(&chars)
}

pub fn to_chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

pub fn to_string(s: &[char]) -> String {
    s.iter().collect()
}
