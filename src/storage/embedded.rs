//! The composite storage variant for documents that carry their arrays inline.

use std::path::Path;
use std::sync::Arc;

use crate::error::MzbinError;
use crate::storage::{Base64Storage, BinaryStorage};
use crate::traits::DataStorage;

/// Two handles onto the same document: a raw one for locating text and a
/// base64 one for decoding array payloads. Reads through the composite itself
/// go to the base64 handle.
#[derive(Debug)]
pub struct EmbeddedStorage {
    raw: Arc<BinaryStorage>,
    base64: Arc<Base64Storage>,
}

impl EmbeddedStorage {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, MzbinError> {
        let path = path.as_ref();
        Ok(Self {
            raw: Arc::new(BinaryStorage::open(path)?),
            base64: Arc::new(Base64Storage::open(path)?),
        })
    }

    pub fn raw(&self) -> &Arc<BinaryStorage> {
        &self.raw
    }

    pub fn base64(&self) -> &Arc<Base64Storage> {
        &self.base64
    }
}

impl DataStorage for EmbeddedStorage {
    fn path(&self) -> &Path {
        self.raw.path()
    }

    fn is_open(&self) -> bool {
        self.base64.is_open()
    }

    fn read(&self, offset: u64, len: usize) -> Result<Vec<u8>, MzbinError> {
        self.base64.read(offset, len)
    }

    fn close(&self) {
        self.raw.close();
        self.base64.close();
    }
}
