use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::entry::{CompoundEntry, CompoundPart, SeqEntry, WordEntry};
use super::word_dic::{MemoryWordDictionary, MAGIC, VERSION};
use super::DictError;
use crate::wtype::WType;

/// Flat serialization format for bincode.
#[derive(Serialize, Deserialize)]
struct WordDicData {
    seqs: Vec<SeqEntry>,
}

impl MemoryWordDictionary {
    /// Parse the text source format.
    ///
    /// One reading per line followed by `#TAG*freq surface` groups:
    ///
    /// ```text
    /// かんじ #T35*500 漢字 #T35*200 感じ
    /// とうきょうだいがく #CN*300 _5東京_4大学
    /// ```
    ///
    /// `*freq` is optional (default 1). A surface starting with `_` is a
    /// compound: each `_` is followed by one digit giving the reading length
    /// of that part. Lines starting with `#` are comments.
    pub fn from_text(text: &str) -> Result<Self, DictError> {
        let mut dic = Self::new();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut tokens = line.split_whitespace();
            let Some(reading) = tokens.next() else {
                continue;
            };
            let reading_len = reading.chars().count();
            let mut current: Option<(WType, i32)> = None;
            for token in tokens {
                if token.starts_with('#') {
                    current = Some(parse_tag(token).map_err(|e| {
                        DictError::Parse(format!("line {}: {e}", lineno + 1))
                    })?);
                    continue;
                }
                let (wt, freq) = current.ok_or_else(|| {
                    DictError::Parse(format!("line {}: surface before any tag", lineno + 1))
                })?;
                if token.starts_with('_') {
                    let parts = parse_compound(token, reading_len).map_err(|e| {
                        DictError::Parse(format!("line {}: {e}", lineno + 1))
                    })?;
                    dic.insert_compound(reading, CompoundEntry { wt, freq, parts });
                } else {
                    dic.insert_word(
                        reading,
                        WordEntry {
                            surface: token.to_string(),
                            wt,
                            freq,
                        },
                    );
                }
            }
        }
        Ok(dic)
    }

    /// Serialize to bytes (BSWD format).
    pub fn to_bytes(&self) -> Result<Vec<u8>, DictError> {
        let mut seqs: Vec<SeqEntry> = self.forward.values().cloned().collect();
        seqs.sort_by(|a, b| a.reading.cmp(&b.reading));
        let body = bincode::serialize(&WordDicData { seqs }).map_err(DictError::Serialize)?;

        let mut buf = Vec::with_capacity(5 + body.len());
        buf.extend_from_slice(MAGIC);
        buf.push(VERSION);
        buf.extend_from_slice(&body);
        Ok(buf)
    }

    /// Deserialize from bytes (BSWD format). Trailing padding is ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DictError> {
        if bytes.len() < 5 {
            return Err(DictError::InvalidHeader);
        }
        if &bytes[0..4] != MAGIC {
            return Err(DictError::InvalidMagic);
        }
        if bytes[4] != VERSION {
            return Err(DictError::UnsupportedVersion(bytes[4]));
        }
        let data: WordDicData =
            bincode::deserialize(&bytes[5..]).map_err(DictError::Deserialize)?;

        let mut dic = Self::new();
        for seq in data.seqs {
            for w in seq.words {
                dic.insert_word(&seq.reading, w);
            }
            for c in seq.compounds {
                dic.insert_compound(&seq.reading, c);
            }
        }
        Ok(dic)
    }

    pub fn open(path: &Path) -> Result<Self, DictError> {
        Self::from_bytes(&fs::read(path)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), DictError> {
        Ok(fs::write(path, self.to_bytes()?)?)
    }
}

fn parse_tag(token: &str) -> Result<(WType, i32), String> {
    let (tag, freq) = match token.split_once('*') {
        Some((tag, f)) => (
            tag,
            f.parse::<i32>()
                .map_err(|e| format!("invalid frequency in {token}: {e}"))?,
        ),
        None => (token, 1),
    };
    let wt = WType::from_dict_tag(tag).ok_or_else(|| format!("unknown tag {tag}"))?;
    Ok((wt, freq))
}

fn parse_compound(token: &str, reading_len: usize) -> Result<Vec<CompoundPart>, String> {
    let mut parts = Vec::new();
    for piece in token.split('_').skip(1) {
        let mut chars = piece.chars();
        let len = chars
            .next()
            .and_then(|c| c.to_digit(10))
            .filter(|&d| d > 0)
            .ok_or_else(|| format!("compound part without length: {piece}"))?;
        let surface: String = chars.collect();
        if surface.is_empty() {
            return Err(format!("empty compound part in {token}"));
        }
        parts.push(CompoundPart {
            reading_len: len as usize,
            surface,
        });
    }
    let total: usize = parts.iter().map(|p| p.reading_len).sum();
    if total != reading_len {
        return Err(format!(
            "compound {token} covers {total} characters, reading has {reading_len}"
        ));
    }
    Ok(parts)
}
