//! Sectioned dictionary container.
//!
//! Layout (all integers 4-byte big-endian):
//! `count`, then `count` × `(name_offset, name_len, contents_offset)`, then
//! the concatenated section names, then the section contents, each starting
//! on an 8-byte boundary. A section extends to the start of the next one (or
//! the end of the file), so trailing alignment padding may be included.

use std::fs;
use std::path::Path;

use tracing::debug;

use super::storage::Blob;
use super::DictError;
use crate::codec::{write_i32_be, Reader};

const ALIGN: usize = 8;
const ENTRY_SIZE: usize = 12;

struct SectionInfo {
    name: String,
    offset: usize,
    end: usize,
}

pub struct FileDictionary {
    blob: Blob,
    sections: Vec<SectionInfo>,
}

impl FileDictionary {
    /// Load using memory-mapped I/O.
    pub fn open(path: &Path) -> Result<Self, DictError> {
        let blob = Blob::map(path)?;
        let dic = Self::from_blob(blob)?;
        debug!(path = %path.display(), sections = dic.sections.len(), "opened container");
        Ok(dic)
    }

    pub fn from_bytes(data: Vec<u8>) -> Result<Self, DictError> {
        Self::from_blob(Blob::from_vec(data))
    }

    fn from_blob(blob: Blob) -> Result<Self, DictError> {
        let mut r = Reader::new(&blob);
        let count = r.read_len().map_err(|_| DictError::InvalidHeader)?;
        let header_end = count
            .checked_mul(ENTRY_SIZE)
            .and_then(|n| n.checked_add(4))
            .filter(|&end| end <= blob.len())
            .ok_or(DictError::InvalidHeader)?;

        let mut raw = Vec::with_capacity(count);
        for _ in 0..count {
            let name_off = r.read_len().map_err(|_| DictError::InvalidHeader)?;
            let name_len = r.read_len().map_err(|_| DictError::InvalidHeader)?;
            let contents = r.read_len().map_err(|_| DictError::InvalidHeader)?;
            let name_end = name_off
                .checked_add(name_len)
                .filter(|&e| name_off >= header_end && e <= blob.len())
                .ok_or(DictError::InvalidHeader)?;
            if contents > blob.len() {
                return Err(DictError::InvalidHeader);
            }
            let name = std::str::from_utf8(&blob[name_off..name_end])
                .map_err(|e| DictError::Parse(format!("section name: {e}")))?
                .to_string();
            raw.push((name, contents));
        }

        let mut starts: Vec<usize> = raw.iter().map(|(_, off)| *off).collect();
        starts.sort_unstable();
        let sections = raw
            .into_iter()
            .map(|(name, offset)| {
                let end = starts
                    .iter()
                    .copied()
                    .find(|&s| s > offset)
                    .unwrap_or(blob.len());
                SectionInfo { name, offset, end }
            })
            .collect();
        Ok(Self { blob, sections })
    }

    /// Bytes of a named section. Lookup is a linear scan by name.
    pub fn section(&self, name: &str) -> Option<Blob> {
        self.sections
            .iter()
            .find(|s| s.name.len() == name.len() && s.name == name)
            .and_then(|s| self.blob.slice(s.offset..s.end))
    }

    pub fn require(&self, name: &str) -> Result<Blob, DictError> {
        self.section(name)
            .ok_or_else(|| DictError::MissingSection(name.to_string()))
    }

    /// Section names with their sizes, in container order.
    pub fn section_sizes(&self) -> Vec<(&str, usize)> {
        self.sections
            .iter()
            .map(|s| (s.name.as_str(), s.end - s.offset))
            .collect()
    }

    pub fn is_mapped(&self) -> bool {
        self.blob.is_mapped()
    }
}

/// Writer for the container format.
#[derive(Default)]
pub struct FileDictionaryBuilder {
    sections: Vec<(String, Vec<u8>)>,
}

impl FileDictionaryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a section.
    pub fn add(&mut self, name: impl Into<String>, contents: Vec<u8>) -> &mut Self {
        let name = name.into();
        if let Some(slot) = self.sections.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = contents;
        } else {
            self.sections.push((name, contents));
        }
        self
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, DictError> {
        let to_i32 = |v: usize| {
            i32::try_from(v).map_err(|_| DictError::Parse("container exceeds i32::MAX".into()))
        };
        let header_len = 4 + self.sections.len() * ENTRY_SIZE;
        let names_len: usize = self.sections.iter().map(|(n, _)| n.len()).sum();

        let mut offsets = Vec::with_capacity(self.sections.len());
        let mut pos = align_up(header_len + names_len);
        for (_, contents) in &self.sections {
            offsets.push(pos);
            pos = align_up(pos + contents.len());
        }

        let mut buf = Vec::with_capacity(pos);
        write_i32_be(&mut buf, to_i32(self.sections.len())?);
        let mut name_off = header_len;
        for ((name, _), &contents_off) in self.sections.iter().zip(&offsets) {
            write_i32_be(&mut buf, to_i32(name_off)?);
            write_i32_be(&mut buf, to_i32(name.len())?);
            write_i32_be(&mut buf, to_i32(contents_off)?);
            name_off += name.len();
        }
        for (name, _) in &self.sections {
            buf.extend_from_slice(name.as_bytes());
        }
        for ((_, contents), &off) in self.sections.iter().zip(&offsets) {
            buf.resize(off, 0);
            buf.extend_from_slice(contents);
        }
        Ok(buf)
    }

    pub fn save(&self, path: &Path) -> Result<(), DictError> {
        Ok(fs::write(path, self.to_bytes()?)?)
    }
}

fn align_up(n: usize) -> usize {
    n.div_ceil(ALIGN) * ALIGN
}
