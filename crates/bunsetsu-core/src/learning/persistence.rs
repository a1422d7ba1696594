use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use super::{LearningError, LearningStore, MAGIC, VERSION};

impl LearningStore {
    /// Serialize to bytes (BSLS format).
    pub fn to_bytes(&self) -> Result<Vec<u8>, LearningError> {
        let body = bincode::serialize(self).map_err(LearningError::Serialize)?;
        let mut buf = Vec::with_capacity(5 + body.len());
        buf.extend_from_slice(MAGIC);
        buf.push(VERSION);
        buf.extend_from_slice(&body);
        Ok(buf)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LearningError> {
        if bytes.len() < 5 || &bytes[0..4] != MAGIC {
            return Err(LearningError::InvalidMagic);
        }
        if bytes[4] != VERSION {
            return Err(LearningError::UnsupportedVersion(bytes[4]));
        }
        bincode::deserialize(&bytes[5..]).map_err(LearningError::Deserialize)
    }

    /// Atomic write: write to .tmp then rename.
    pub fn save(&self, path: &Path) -> Result<(), LearningError> {
        let bytes = self.to_bytes()?;
        let tmp = path.with_extension("tmp");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, path)?;
        debug!(path = %path.display(), bytes = bytes.len(), "saved learning store");
        Ok(())
    }

    /// Open from file, returning an empty store if the file doesn't exist.
    pub fn open(path: &Path) -> Result<Self, LearningError> {
        match fs::read(path) {
            Ok(bytes) => Self::from_bytes(&bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(e.into()),
        }
    }
}
