//! The base64 storage variant: reads byte ranges of base64 text and returns
//! the decoded bytes.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::MzbinError;
use crate::storage::BinaryStorage;
use crate::traits::DataStorage;

/// A resource whose addressed byte ranges hold base64 text.
///
/// Offsets and lengths address the text, not the decoded bytes. ASCII
/// whitespace inside a range is ignored so line-wrapped payloads decode.
#[derive(Debug)]
pub struct Base64Storage {
    inner: BinaryStorage,
}

impl Base64Storage {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, MzbinError> {
        Ok(Self::from_raw(BinaryStorage::open(path)?))
    }

    pub fn from_raw(inner: BinaryStorage) -> Self {
        Self { inner }
    }
}

/// Decodes base64 text, skipping ASCII whitespace.
pub fn decode_text(text: &[u8]) -> Result<Vec<u8>, MzbinError> {
    if text.iter().any(u8::is_ascii_whitespace) {
        let compact: Vec<u8> = text
            .iter()
            .copied()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();
        Ok(STANDARD.decode(compact)?)
    } else {
        Ok(STANDARD.decode(text)?)
    }
}

impl DataStorage for Base64Storage {
    fn path(&self) -> &Path {
        self.inner.path()
    }

    fn is_open(&self) -> bool {
        self.inner.is_open()
    }

    fn read(&self, offset: u64, len: usize) -> Result<Vec<u8>, MzbinError> {
        let text = self.inner.read(offset, len)?;
        if text.is_empty() {
            return Ok(text);
        }
        decode_text(&text)
    }

    fn close(&self) {
        self.inner.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_reads_decode_the_addressed_text() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.xml");
        // "aGVsbG8=" is "hello".
        std::fs::write(&path, b"<binary>aGVsbG8=</binary>").unwrap();

        let storage = Base64Storage::open(&path).unwrap();
        assert_eq!(storage.read(8, 8).unwrap(), b"hello");
    }

    #[test]
    fn test_whitespace_inside_payload_is_ignored() {
        assert_eq!(decode_text(b"aGVs\n  bG8=\r\n").unwrap(), b"hello");
    }

    #[test]
    fn test_invalid_text_is_base64_error() {
        let result = decode_text(b"not*base64");
        assert!(matches!(result, Err(MzbinError::Base64(_))));
    }

    #[test]
    fn test_closed_base64_storage_reads_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.xml");
        std::fs::write(&path, b"aGVsbG8=").unwrap();

        let storage = Base64Storage::open(&path).unwrap();
        storage.close();
        assert!(storage.read(0, 8).unwrap().is_empty());
    }
}
