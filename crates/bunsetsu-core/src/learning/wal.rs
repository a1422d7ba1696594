//! Commit log for the learning store.
//!
//! Each commit appends one frame holding its operations instead of
//! rewriting the whole store. Once enough frames pile up the store is
//! saved as a snapshot and the log truncated.
//!
//! Frame: `[len u32 LE][crc32 u32 LE][bincode Vec<LearningOp>]`.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::{LearningError, LearningOp, LearningStore};
use crate::settings::settings;

const FRAME_HEADER: usize = 8;

pub struct LearningWal {
    snapshot_path: PathBuf,
    wal_path: PathBuf,
    /// Opened lazily in append mode.
    file: Option<File>,
    /// Frames since the last compaction.
    entry_count: usize,
}

impl LearningWal {
    pub fn new(snapshot_path: &Path) -> Self {
        Self {
            snapshot_path: snapshot_path.to_path_buf(),
            wal_path: snapshot_path.with_extension("bsls.wal"),
            file: None,
            entry_count: 0,
        }
    }

    /// Apply every intact frame to `store`, stopping at the first truncated
    /// or corrupt one. Returns the number of frames applied.
    pub fn replay(&mut self, store: &mut LearningStore) -> io::Result<usize> {
        let data = match fs::read(&self.wal_path) {
            Ok(d) => d,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.entry_count = 0;
                return Ok(0);
            }
            Err(e) => return Err(e),
        };

        let mut count = 0;
        let mut pos = 0;
        while let Some(header) = data.get(pos..pos + FRAME_HEADER) {
            let (len, crc) = header.split_at(4);
            let length = u32::from_le_bytes([len[0], len[1], len[2], len[3]]) as usize;
            let expected_crc = u32::from_le_bytes([crc[0], crc[1], crc[2], crc[3]]);

            let start = pos + FRAME_HEADER;
            let Some(payload) = data.get(start..start + length).filter(|_| length > 0) else {
                warn!(offset = pos, "truncated commit log frame");
                break;
            };
            if crc32fast::hash(payload) != expected_crc {
                warn!(offset = pos, "corrupt commit log frame");
                break;
            }
            let Ok(ops) = bincode::deserialize::<Vec<LearningOp>>(payload) else {
                warn!(offset = pos, "undecodable commit log frame");
                break;
            };
            store.apply_all(&ops);
            count += 1;
            pos = start + length;
        }

        self.entry_count = count;
        debug!(frames = count, "replayed commit log");
        Ok(count)
    }

    pub fn append(&mut self, ops: &[LearningOp]) -> Result<(), LearningError> {
        let payload = bincode::serialize(ops).map_err(LearningError::Serialize)?;
        let length = payload.len() as u32;
        let crc = crc32fast::hash(&payload);

        let file = self.open_file()?;
        file.write_all(&length.to_le_bytes())?;
        file.write_all(&crc.to_le_bytes())?;
        file.write_all(&payload)?;

        self.entry_count += 1;
        Ok(())
    }

    fn open_file(&mut self) -> io::Result<&mut File> {
        let file = match self.file.take() {
            Some(f) => f,
            None => {
                if let Some(parent) = self.wal_path.parent() {
                    fs::create_dir_all(parent)?;
                }
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&self.wal_path)?
            }
        };
        Ok(self.file.insert(file))
    }

    pub fn needs_compact(&self) -> bool {
        self.entry_count >= settings().ordering.wal_compact_threshold
    }

    /// Save `store` as the new snapshot and empty the log.
    pub fn compact(&mut self, store: &LearningStore) -> Result<(), LearningError> {
        store.save(&self.snapshot_path)?;
        self.truncate_wal()?;
        debug!(path = %self.snapshot_path.display(), "compacted learning store");
        Ok(())
    }

    pub fn truncate_wal(&mut self) -> io::Result<()> {
        self.file = None;
        File::create(&self.wal_path)?;
        self.entry_count = 0;
        Ok(())
    }

    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    pub fn wal_path(&self) -> &Path {
        &self.wal_path
    }
}

/// Open the snapshot and replay the log over it.
pub fn open_with_wal(snapshot_path: &Path) -> Result<(LearningStore, LearningWal), LearningError> {
    let mut store = LearningStore::open(snapshot_path)?;
    let mut wal = LearningWal::new(snapshot_path);
    wal.replay(&mut store)?;
    Ok((store, wal))
}
