use std::path::{Path, PathBuf};

use crate::errors::CoreError;

use super::slot::{PortfolioSlot, SLOT_KEY};

/// File-backed persistence slot (native only).
///
/// Stands in for the browser's localStorage key: one JSON document in one
/// file, overwritten on every portfolio mutation.
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    /// Use an explicit file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Conventional slot location inside a data directory: `<dir>/portfolio.json`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{SLOT_KEY}.json")),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PortfolioSlot for FileSlot {
    fn read(&self) -> Result<Option<String>, CoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, payload: &str) -> Result<(), CoreError> {
        std::fs::write(&self.path, payload)?;
        Ok(())
    }
}
