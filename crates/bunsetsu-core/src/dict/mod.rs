//! Dictionary storage.
//!
//! `FileDictionary` is the sectioned container every read-only resource is
//! packed into. `MemoryWordDictionary` maps readings to independent-word and
//! compound-word entries.

mod entry;
mod file_dic;
mod storage;
#[cfg(test)]
mod tests;
mod word_dic;
mod word_dic_io;

pub use entry::{CompoundEntry, CompoundPart, SeqEntry, WordEntry};
pub use file_dic::{FileDictionary, FileDictionaryBuilder};
pub use storage::Blob;
pub use word_dic::MemoryWordDictionary;

use std::io;

use crate::codec::CodecError;

/// Section names inside the dictionary container.
pub mod section {
    pub const WORD_DIC: &str = "word_dic";
    pub const DEP_DIC: &str = "dep_dic";
    pub const TRANS_INFO: &str = "trans_info";
    pub const CAND_INFO: &str = "cand_info";
    pub const WEAK_WORDS: &str = "weak_words";
    pub const USE_DIC: &str = "use_dic";
}

/// Unified error type for the container and word-dictionary binary I/O.
#[derive(Debug, thiserror::Error)]
pub enum DictError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid header")]
    InvalidHeader,

    #[error("invalid magic bytes (expected BSWD)")]
    InvalidMagic,

    #[error("unsupported version: {0}")]
    UnsupportedVersion(u8),

    #[error("serialization error: {0}")]
    Serialize(bincode::Error),

    #[error("deserialization error: {0}")]
    Deserialize(bincode::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("missing section: {0}")]
    MissingSection(String),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Lookup of independent words by reading.
///
/// With `reverse` set the key is a surface form and the returned entry lists
/// the readings (as `surface`) under which that surface is registered.
pub trait WordDictionary: Send + Sync {
    fn lookup(&self, key: &str, reverse: bool) -> Option<&SeqEntry>;

    /// Number of distinct readings.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
