//! Feature lists and the frequency tables they key into.
//!
//! A meta-word (or a lattice transition) is described by at most
//! [`MAX_FEATURES`] small integer codes. Each kind of fact owns a numeric
//! band so codes never collide:
//!
//! | band         | codes                         |
//! |--------------|-------------------------------|
//! | current class| `0 + class`                   |
//! | dep class    | `64 + dep_class`              |
//! | transition   | `80 + prev * SEG_SIZE + cur`  |
//! | flags        | `1400..=1407`                 |
//! | noun cos     | `1420 + cos`                  |
//! | dep word     | `1440 + hash % 1024`          |
//!
//! Sorted and zero-padded, the codes form the key of a [`FeatureTable`] row.

mod table;
#[cfg(test)]
mod tests;

pub use table::{FeatureFreq, FeatureTable, FeatureTableBuilder, WeakWords, ROW_INTS};

use crate::segclass::{DepClass, SegClass, SEG_SIZE};
use crate::wtype::{cos, pos, WType};

/// Upper bound on the codes of one feature list.
pub const MAX_FEATURES: usize = 14;

/// Structural flags carried by word lists and meta-words.
pub mod mw_feature {
    pub const SV: u32 = 1;
    pub const WEAK_CONN: u32 = 2;
    pub const SUFFIX: u32 = 4;
    pub const NUM: u32 = 16;
    pub const CORE1: u32 = 32;
    pub const DEP_ONLY: u32 = 64;
    pub const HIGH_FREQ: u32 = 128;
    pub const WEAK_SEQ: u32 = 256;
}

pub mod band {
    pub const CUR_CLASS: i32 = 0;
    pub const DEP_TYPE: i32 = 64;
    pub const CLASS_TRANS: i32 = 80;
    pub const SV: i32 = 1400;
    pub const WEAK: i32 = 1401;
    pub const SUFFIX: i32 = 1402;
    pub const PREV_WEAK: i32 = 1403;
    pub const NUM: i32 = 1404;
    pub const CORE1: i32 = 1405;
    pub const HIGH_FREQ: i32 = 1406;
    pub const WEAK_SEQ: i32 = 1407;
    pub const COS: i32 = 1420;
    pub const DEP_WORD: i32 = 1440;
    pub const DEP_WORD_SIZE: i32 = 1024;
}

#[derive(Debug, thiserror::Error)]
pub enum FeatureError {
    #[error("feature list is full ({max} codes), cannot add {code}")]
    Capacity { code: i32, max: usize },

    #[error("malformed feature table: {0}")]
    Malformed(String),
}

/// Bounded list of feature codes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FeatureList {
    codes: Vec<i32>,
}

impl FeatureList {
    pub fn new() -> Self {
        Self {
            codes: Vec::with_capacity(MAX_FEATURES),
        }
    }

    pub fn add(&mut self, code: i32) -> Result<(), FeatureError> {
        if self.codes.len() >= MAX_FEATURES {
            return Err(FeatureError::Capacity {
                code,
                max: MAX_FEATURES,
            });
        }
        self.codes.push(code);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn codes(&self) -> &[i32] {
        &self.codes
    }

    pub fn sort(&mut self) {
        self.codes.sort_unstable();
    }

    /// Codes zero-padded to the table key width.
    pub fn key(&self) -> [i32; MAX_FEATURES] {
        let mut key = [0; MAX_FEATURES];
        key[..self.codes.len()].copy_from_slice(&self.codes);
        key
    }

    pub fn set_cur_class(&mut self, class: SegClass) -> Result<(), FeatureError> {
        self.add(band::CUR_CLASS + class.index() as i32)
    }

    pub fn set_class_trans(&mut self, prev: SegClass, cur: SegClass) -> Result<(), FeatureError> {
        let code = prev.index() * SEG_SIZE + cur.index();
        self.add(band::CLASS_TRANS + code as i32)
    }

    pub fn set_dep_class(&mut self, dc: DepClass) -> Result<(), FeatureError> {
        self.add(band::DEP_TYPE + dc.code())
    }

    /// `hash` is reduced modulo the band width.
    pub fn set_dep_word(&mut self, hash: i32) -> Result<(), FeatureError> {
        self.add(band::DEP_WORD + hash.rem_euclid(band::DEP_WORD_SIZE))
    }

    /// Only suffix nouns contribute a sub-class code.
    pub fn set_noun_cos(&mut self, wt: WType) -> Result<(), FeatureError> {
        if wt.pos == pos::NOUN && wt.cos == cos::SUFFIX {
            self.add(band::COS + wt.cos as i32)?;
        }
        Ok(())
    }

    pub fn set_mw_features(&mut self, mask: u32) -> Result<(), FeatureError> {
        const FLAGS: &[(u32, i32)] = &[
            (mw_feature::WEAK_CONN, band::WEAK),
            (mw_feature::SUFFIX, band::SUFFIX),
            (mw_feature::SV, band::SV),
            (mw_feature::NUM, band::NUM),
            (mw_feature::CORE1, band::CORE1),
            (mw_feature::HIGH_FREQ, band::HIGH_FREQ),
            (mw_feature::WEAK_SEQ, band::WEAK_SEQ),
        ];
        for &(bit, code) in FLAGS {
            if mask & bit != 0 {
                self.add(code)?;
            }
        }
        Ok(())
    }

    /// Set when the preceding segment ended in a weak connection.
    pub fn set_prev_weak(&mut self) -> Result<(), FeatureError> {
        self.add(band::PREV_WEAK)
    }
}
