//! The raw storage variant: one file handle, read by byte range.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::error::MzbinError;
use crate::traits::DataStorage;

/// Upper bound on the buffer reserved up front for a single read.
const MAX_READ_RESERVE: usize = 1 << 20;

/// A file-backed resource returning bytes exactly as stored.
///
/// The handle sits behind a mutex so that a seek and the read that follows it
/// happen as one critical section. Dropping the storage closes the handle.
#[derive(Debug)]
pub struct BinaryStorage {
    path: PathBuf,
    handle: Mutex<Option<File>>,
}

impl BinaryStorage {
    /// Opens an existing file for reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, MzbinError> {
        Self::open_with(path, false)
    }

    /// Opens `path`, for reading and appending when `for_writing` is set.
    /// A file opened for writing is created if missing and never truncated.
    pub fn open_with(path: impl AsRef<Path>, for_writing: bool) -> Result<Self, MzbinError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(for_writing)
            .create(for_writing)
            .open(&path)?;
        log::debug!(
            "Opened binary storage {} (writable: {})",
            path.display(),
            for_writing
        );
        Ok(Self::from_file(path, file))
    }

    /// Creates (or truncates) a file opened for reading and appending.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, MzbinError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;
        log::debug!("Created binary storage {}", path.display());
        Ok(Self::from_file(path, file))
    }

    /// Wraps an already open handle.
    pub fn from_file(path: PathBuf, file: File) -> Self {
        Self {
            path,
            handle: Mutex::new(Some(file)),
        }
    }

    /// Appends `bytes` at the end of the file and returns the offset where
    /// they begin.
    pub fn append(&self, bytes: &[u8]) -> Result<u64, MzbinError> {
        let mut guard = self.handle.lock();
        let file = guard.as_mut().ok_or_else(|| self.closed_error())?;
        let offset = file.seek(SeekFrom::End(0))?;
        file.write_all(bytes)?;
        Ok(offset)
    }

    pub fn flush(&self) -> Result<(), MzbinError> {
        let mut guard = self.handle.lock();
        if let Some(file) = guard.as_mut() {
            file.flush()?;
        }
        Ok(())
    }

    /// Current size of the underlying file in bytes.
    pub fn len(&self) -> Result<u64, MzbinError> {
        let guard = self.handle.lock();
        let len = match guard.as_ref() {
            Some(file) => file.metadata()?.len(),
            None => std::fs::metadata(&self.path)?.len(),
        };
        Ok(len)
    }

    pub fn is_empty(&self) -> Result<bool, MzbinError> {
        Ok(self.len()? == 0)
    }

    fn closed_error(&self) -> MzbinError {
        MzbinError::Io(std::io::Error::new(
            std::io::ErrorKind::NotConnected,
            format!("binary storage {} is closed", self.path.display()),
        ))
    }
}

impl DataStorage for BinaryStorage {
    fn path(&self) -> &Path {
        &self.path
    }

    fn is_open(&self) -> bool {
        self.handle.lock().is_some()
    }

    fn read(&self, offset: u64, len: usize) -> Result<Vec<u8>, MzbinError> {
        let mut guard = self.handle.lock();
        let Some(file) = guard.as_mut() else {
            log::error!(
                "Read of {} bytes at offset {} from closed storage {}",
                len,
                offset,
                self.path.display()
            );
            return Ok(Vec::new());
        };

        file.seek(SeekFrom::Start(offset))?;
        let mut buf = Vec::with_capacity(len.min(MAX_READ_RESERVE));
        Read::by_ref(file).take(len as u64).read_to_end(&mut buf)?;
        if buf.len() < len {
            log::warn!(
                "Short read from {}: wanted {} bytes at offset {}, got {}",
                self.path.display(),
                len,
                offset,
                buf.len()
            );
        }
        Ok(buf)
    }

    fn close(&self) {
        if self.handle.lock().take().is_some() {
            log::debug!("Closed binary storage {}", self.path.display());
        }
    }
}

impl Drop for BinaryStorage {
    fn drop(&mut self) {
        self.close();
    }
}
