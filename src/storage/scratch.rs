//! A private, self-deleting binary file for decoded inline arrays.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempPath;

use crate::error::MzbinError;
use crate::storage::BinaryStorage;
use crate::traits::DataStorage;

const SCRATCH_PREFIX: &str = "mzbin-scratch-";

/// Owns a headerless, append-only scratch file and the storage open on it.
///
/// Dropping the scratch file closes the storage and deletes the file, even if
/// locations still hold the storage. [`ScratchFile::keep`] retains both.
#[derive(Debug)]
pub struct ScratchFile {
    storage: Arc<BinaryStorage>,
    temp_path: Option<TempPath>,
}

impl ScratchFile {
    /// Creates a scratch file in `dir`, or in the system temp directory.
    pub fn create(dir: Option<&Path>) -> Result<Self, MzbinError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(SCRATCH_PREFIX).suffix(".bin");
        let named = match dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        let (file, temp_path) = named.into_parts();
        let path = temp_path.to_path_buf();
        log::debug!("Created scratch file {}", path.display());
        Ok(Self {
            storage: Arc::new(BinaryStorage::from_file(path, file)),
            temp_path: Some(temp_path),
        })
    }

    pub fn storage(&self) -> &Arc<BinaryStorage> {
        &self.storage
    }

    pub fn path(&self) -> &Path {
        self.storage.path()
    }

    /// Detaches the file from automatic deletion and returns its path. The
    /// storage stays open for any location still reading from it.
    pub fn keep(mut self) -> Result<PathBuf, MzbinError> {
        match self.temp_path.take() {
            Some(temp_path) => {
                let path = temp_path.keep().map_err(|e| MzbinError::Io(e.error))?;
                log::debug!("Keeping scratch file {}", path.display());
                Ok(path)
            }
            None => Ok(self.path().to_path_buf()),
        }
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if let Some(temp_path) = self.temp_path.take() {
            self.storage.close();
            let path = temp_path.to_path_buf();
            if let Err(e) = temp_path.close() {
                log::warn!("Could not delete scratch file {}: {}", path.display(), e);
            } else {
                log::debug!("Deleted scratch file {}", path.display());
            }
        }
    }
}
