use std::collections::HashMap;

use super::entry::{CompoundEntry, SeqEntry, WordEntry};
use super::WordDictionary;

pub(super) const MAGIC: &[u8; 4] = b"BSWD";
pub(super) const VERSION: u8 = 1;

/// In-memory word dictionary keyed by reading, with a surface index for
/// reverse lookups.
#[derive(Debug, Clone, Default)]
pub struct MemoryWordDictionary {
    pub(super) forward: HashMap<String, SeqEntry>,
    pub(super) reverse: HashMap<String, SeqEntry>,
}

impl MemoryWordDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(reading, entries)` pairs. Entries for the same reading
    /// are merged.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<WordEntry>)>,
    {
        let mut dic = Self::new();
        for (reading, words) in entries {
            for w in words {
                dic.insert_word(&reading, w);
            }
        }
        dic
    }

    pub fn insert_word(&mut self, reading: &str, entry: WordEntry) {
        let seq = self
            .forward
            .entry(reading.to_string())
            .or_insert_with(|| SeqEntry::new(reading));
        if let Some(existing) = seq
            .words
            .iter_mut()
            .find(|w| w.surface == entry.surface && w.wt == entry.wt)
        {
            existing.freq = existing.freq.max(entry.freq);
            return;
        }
        self.reverse
            .entry(entry.surface.clone())
            .or_insert_with(|| SeqEntry::new(entry.surface.clone()))
            .words
            .push(WordEntry {
                surface: reading.to_string(),
                wt: entry.wt,
                freq: entry.freq,
            });
        seq.words.push(entry);
    }

    pub fn insert_compound(&mut self, reading: &str, entry: CompoundEntry) {
        let seq = self
            .forward
            .entry(reading.to_string())
            .or_insert_with(|| SeqEntry::new(reading));
        if !seq.compounds.contains(&entry) {
            seq.compounds.push(entry);
        }
    }

    pub fn entry_count(&self) -> usize {
        self.forward
            .values()
            .map(|s| s.words.len() + s.compounds.len())
            .sum()
    }

    /// Readings sorted, for deterministic output.
    pub fn readings(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.forward.keys().map(|k| k.as_str()).collect();
        keys.sort_unstable();
        keys
    }
}

impl WordDictionary for MemoryWordDictionary {
    fn lookup(&self, key: &str, reverse: bool) -> Option<&SeqEntry> {
        if reverse {
            self.reverse.get(key)
        } else {
            self.forward.get(key)
        }
    }

    fn len(&self) -> usize {
        self.forward.len()
    }
}
