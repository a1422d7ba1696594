//! Segment classes and dependency classes.
//!
//! The segment class summarizes what a segment is (noun + case particle,
//! verb ending a sentence, bare particle chain...) and drives both the
//! lattice transition features and the meta-word ordering features.

use serde::{Deserialize, Serialize};

use crate::wtype::pos;

/// Dependency class of an attached-word chain, set by grammar transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum DepClass {
    #[default]
    None = 0,
    Fuzokugo = 1,
    Kakujoshi = 2,
    Renyou = 3,
    Rentai = 4,
    End = 5,
    Raw = 6,
}

impl DepClass {
    pub fn from_code(code: i32) -> Option<Self> {
        Some(match code {
            0 => Self::None,
            1 => Self::Fuzokugo,
            2 => Self::Kakujoshi,
            3 => Self::Renyou,
            4 => Self::Rentai,
            5 => Self::End,
            6 => Self::Raw,
            _ => return None,
        })
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}

macro_rules! seg_classes {
    ($($variant:ident => $name:literal,)*) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
        #[repr(u8)]
        pub enum SegClass {
            #[default]
            $($variant,)*
        }

        impl SegClass {
            pub const ALL: &'static [SegClass] = &[$(SegClass::$variant,)*];

            pub fn name(self) -> &'static str {
                match self {
                    $(SegClass::$variant => $name,)*
                }
            }
        }
    };
}

seg_classes! {
    Head => "文頭",
    Tail => "文末",
    Bunsetsu => "文節",
    Meishi => "名詞",
    MeishiKakujoshi => "名詞+格助詞",
    MeishiFuzokugo => "名詞+付属語",
    MeishiShutan => "名詞+終端",
    MeishiRenyou => "名詞+連用",
    Doushi => "動詞",
    DoushiFuzokugo => "動詞+付属語",
    DoushiShutan => "動詞+終端",
    DoushiRenyou => "動詞+連用",
    DoushiRentai => "動詞+連体",
    Keiyoushi => "形容詞",
    KeiyoushiFuzokugo => "形容詞+付属語",
    KeiyoushiShutan => "形容詞+終端",
    KeiyoushiRenyou => "形容詞+連用",
    KeiyoushiRentai => "形容詞+連体",
    Keiyoudoushi => "形容動詞",
    KeiyoudoushiFuzokugo => "形容動詞+付属語",
    KeiyoudoushiShutan => "形容動詞+終端",
    KeiyoudoushiRenyou => "形容動詞+連用",
    KeiyoudoushiRentai => "形容動詞+連体",
    Fukushi => "副詞",
    Rentaishi => "連体詞",
    Setsuzokugo => "接続語",
    Dokuritsugo => "独立語",
    Hirakikakko => "開き括弧",
    Tojikakko => "閉じ括弧",
    Fuzokugo => "付属語",
    Kakujoshi => "格助詞",
    Renyou => "連用",
    Rentai => "連体",
    Shutan => "終端",
    RenyouShushoku => "連用修飾",
    RentaiShushoku => "連体修飾",
}

/// Number of segment classes; sizes the class-transition feature band.
pub const SEG_SIZE: usize = SegClass::ALL.len();

impl SegClass {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(i: usize) -> Option<Self> {
        Self::ALL.get(i).copied()
    }

    pub fn by_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.name() == name)
    }

    /// Classes made of attached words only.
    pub fn is_depword(self) -> bool {
        matches!(
            self,
            Self::Fuzokugo | Self::Kakujoshi | Self::Renyou | Self::Rentai | Self::Shutan
        )
    }

    /// Classify a segment from its head part of speech, its dependency
    /// class, and whether it has an independent core at all.
    pub fn classify(has_core: bool, head_pos: u8, dc: DepClass) -> Self {
        if !has_core {
            return match dc {
                DepClass::End => Self::Shutan,
                DepClass::Renyou => Self::Renyou,
                DepClass::Rentai => Self::Rentai,
                DepClass::Kakujoshi => Self::Kakujoshi,
                _ => Self::Fuzokugo,
            };
        }
        match head_pos {
            pos::NOUN | pos::NUMBER | pos::N2T => match dc {
                DepClass::Raw => Self::Meishi,
                DepClass::End => Self::MeishiShutan,
                DepClass::Renyou => Self::MeishiRenyou,
                DepClass::Kakujoshi => Self::MeishiKakujoshi,
                _ => Self::MeishiFuzokugo,
            },
            pos::V => match dc {
                DepClass::Raw => Self::Doushi,
                DepClass::End => Self::DoushiShutan,
                DepClass::Renyou => Self::DoushiRenyou,
                DepClass::Rentai => Self::DoushiRentai,
                _ => Self::DoushiFuzokugo,
            },
            pos::D2KY | pos::A => match dc {
                DepClass::Raw => Self::Keiyoushi,
                DepClass::End => Self::KeiyoushiShutan,
                DepClass::Renyou => Self::KeiyoushiRenyou,
                DepClass::Rentai => Self::KeiyoushiRentai,
                _ => Self::KeiyoushiFuzokugo,
            },
            pos::AJV => match dc {
                DepClass::Raw => Self::Keiyoudoushi,
                DepClass::End => Self::KeiyoudoushiShutan,
                DepClass::Renyou => Self::KeiyoudoushiRenyou,
                DepClass::Rentai => Self::KeiyoudoushiRentai,
                _ => Self::KeiyoudoushiFuzokugo,
            },
            pos::AV => Self::Fukushi,
            pos::ME => Self::Rentaishi,
            pos::CONJ => Self::Setsuzokugo,
            pos::OPEN => Self::Hirakikakko,
            pos::CLOSE => Self::Tojikakko,
            _ => Self::Dokuritsugo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_table_size() {
        assert_eq!(SEG_SIZE, 36);
        assert_eq!(SegClass::from_index(0), Some(SegClass::Head));
        assert_eq!(SegClass::from_index(SEG_SIZE), None);
        assert_eq!(SegClass::by_name("名詞+格助詞"), Some(SegClass::MeishiKakujoshi));
    }

    #[test]
    fn test_classify_by_head_and_dep() {
        assert_eq!(
            SegClass::classify(true, pos::NOUN, DepClass::Kakujoshi),
            SegClass::MeishiKakujoshi
        );
        assert_eq!(
            SegClass::classify(true, pos::V, DepClass::Rentai),
            SegClass::DoushiRentai
        );
        assert_eq!(
            SegClass::classify(false, pos::NONE, DepClass::Raw),
            SegClass::Fuzokugo
        );
        assert_eq!(
            SegClass::classify(true, pos::IJ, DepClass::End),
            SegClass::Dokuritsugo
        );
        assert!(SegClass::Kakujoshi.is_depword());
        assert!(!SegClass::Meishi.is_depword());
    }
}
