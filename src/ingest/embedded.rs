//! The eager path for inline arrays.
//!
//! While the document streams past, base64 text is buffered per array. When
//! the array's text ends it is decoded once and appended to a private scratch
//! file, and the returned location addresses the decoded bytes there. Every
//! later read is then a plain positional read.

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::MzbinError;
use crate::ingest::ArrayMetadata;
use crate::location::DataLocation;
use crate::pipeline::CodecResolver;
use crate::storage::base64_storage::decode_text;
use crate::storage::ScratchFile;
use crate::traits::DataStorage;

/// The ingestion session for one document with inline arrays.
///
/// The session owns the scratch file. Locations it produces stay readable
/// until the session is dropped, which deletes the file unless
/// [`EmbeddedIngest::finish`] keeps it.
pub struct EmbeddedIngest {
    scratch: ScratchFile,
    resolver: CodecResolver,
    text: Vec<u8>,
    collecting: bool,
    next_offset: u64,
}

impl EmbeddedIngest {
    /// Starts a session, creating its scratch file where the config says.
    pub fn new(resolver: CodecResolver) -> Result<Self, MzbinError> {
        let scratch = ScratchFile::create(resolver.config().scratch_dir.as_deref())?;
        Ok(Self {
            scratch,
            resolver,
            text: Vec::new(),
            collecting: false,
            next_offset: 0,
        })
    }

    /// Marks the start of an array's base64 text.
    pub fn begin_text(&mut self) -> Result<(), MzbinError> {
        if self.collecting {
            return Err(MzbinError::IngestState(
                "array text began while another array was still open".to_string(),
            ));
        }
        self.collecting = true;
        self.text.clear();
        Ok(())
    }

    /// Buffers a chunk of text. Text outside an array is ignored.
    pub fn push_text(&mut self, chunk: &[u8]) {
        if self.collecting {
            self.text.extend_from_slice(chunk);
        }
    }

    /// Decodes the buffered text, appends it to the scratch file and returns
    /// the location of the decoded bytes.
    pub fn end_text(&mut self, meta: &ArrayMetadata) -> Result<DataLocation, MzbinError> {
        if !self.collecting {
            return Err(MzbinError::IngestState(
                "array text ended without having begun".to_string(),
            ));
        }
        self.collecting = false;
        let text = std::mem::take(&mut self.text);

        let decoded = if text.is_empty() {
            Vec::new()
        } else {
            decode_text(&text)?
        };
        let pipeline =
            self.resolver
                .resolve(meta.numeric_type, meta.compression, meta.element_count)?;

        let offset = self.scratch.storage().append(&decoded)?;
        if offset != self.next_offset {
            return Err(MzbinError::InternalError(format!(
                "scratch file grew outside this session: expected offset {}, found {}",
                self.next_offset, offset
            )));
        }
        self.next_offset += decoded.len() as u64;
        log::trace!(
            "Ingested {} base64 bytes as {} bytes at scratch offset {}",
            text.len(),
            decoded.len(),
            offset
        );

        let storage: Arc<dyn DataStorage> = self.scratch.storage().clone();
        Ok(DataLocation::new(storage, offset as i64, decoded.len() as i64).with_pipeline(pipeline))
    }

    pub fn is_collecting(&self) -> bool {
        self.collecting
    }

    /// Total decoded bytes written to the scratch file so far.
    pub fn bytes_written(&self) -> u64 {
        self.next_offset
    }

    pub fn scratch(&self) -> &ScratchFile {
        &self.scratch
    }

    /// Ends the session. With `keep_scratch` set the scratch file is retained
    /// and its path returned; otherwise it is deleted.
    pub fn finish(self) -> Result<Option<PathBuf>, MzbinError> {
        if self.collecting {
            log::warn!("Finishing ingestion with an unterminated array; its text is dropped");
        }
        if self.resolver.config().keep_scratch {
            self.scratch.keep().map(Some)
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StoreConfig;
    use crate::types::{CompressionMethod, NumericType};
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use tempfile::TempDir;

    fn session(dir: &TempDir, keep: bool) -> EmbeddedIngest {
        let config = StoreConfig {
            scratch_dir: Some(dir.path().to_path_buf()),
            keep_scratch: keep,
            ..StoreConfig::default()
        };
        EmbeddedIngest::new(CodecResolver::new(Arc::new(config))).unwrap()
    }

    fn doubles_meta(count: usize) -> ArrayMetadata {
        ArrayMetadata::new(NumericType::Float64, CompressionMethod::None, count)
    }

    #[test]
    fn test_running_offsets_across_arrays() {
        let dir = TempDir::new().unwrap();
        let mut ingest = session(&dir, false);

        let first = STANDARD.encode(crate::utils::doubles_to_le_bytes(&[1.0, 2.0]));
        let second = STANDARD.encode(crate::utils::doubles_to_le_bytes(&[3.0]));

        ingest.begin_text().unwrap();
        ingest.push_text(&first.as_bytes()[..5]);
        ingest.push_text(&first.as_bytes()[5..]);
        let a = ingest.end_text(&doubles_meta(2)).unwrap();

        ingest.push_text(b"   ignored   ");
        ingest.begin_text().unwrap();
        ingest.push_text(second.as_bytes());
        let b = ingest.end_text(&doubles_meta(1)).unwrap();

        assert_eq!((a.offset(), a.length()), (0, 16));
        assert_eq!((b.offset(), b.length()), (16, 8));
        assert_eq!(ingest.bytes_written(), 24);
        assert_eq!(a.decoded_array().unwrap(), vec![1.0, 2.0]);
        assert_eq!(b.decoded_array().unwrap(), vec![3.0]);
    }

    #[test]
    fn test_empty_text_is_zero_length_array() {
        let dir = TempDir::new().unwrap();
        let mut ingest = session(&dir, false);
        ingest.begin_text().unwrap();
        let location = ingest.end_text(&doubles_meta(0)).unwrap();
        assert_eq!(location.length(), 0);
        assert!(location.decoded_array().unwrap().is_empty());
    }

    #[test]
    fn test_state_machine_misuse() {
        let dir = TempDir::new().unwrap();
        let mut ingest = session(&dir, false);
        assert!(matches!(
            ingest.end_text(&doubles_meta(0)),
            Err(MzbinError::IngestState(_))
        ));
        ingest.begin_text().unwrap();
        assert!(ingest.is_collecting());
        assert!(matches!(ingest.begin_text(), Err(MzbinError::IngestState(_))));
    }

    #[test]
    fn test_bad_base64_leaves_session_usable() {
        let dir = TempDir::new().unwrap();
        let mut ingest = session(&dir, false);
        ingest.begin_text().unwrap();
        ingest.push_text(b"***");
        assert!(ingest.end_text(&doubles_meta(1)).is_err());
        assert!(!ingest.is_collecting());

        ingest.begin_text().unwrap();
        ingest.push_text(STANDARD.encode(5.0f64.to_le_bytes()).as_bytes());
        let location = ingest.end_text(&doubles_meta(1)).unwrap();
        assert_eq!(location.offset(), 0);
        assert_eq!(location.decoded_array().unwrap(), vec![5.0]);
    }

    #[test]
    fn test_finish_deletes_or_keeps_scratch() {
        let dir = TempDir::new().unwrap();

        let ingest = session(&dir, false);
        let path = ingest.scratch().path().to_path_buf();
        assert!(path.exists());
        assert_eq!(ingest.finish().unwrap(), None);
        assert!(!path.exists());

        let ingest = session(&dir, true);
        let kept = ingest.finish().unwrap().unwrap();
        assert!(kept.exists());
    }
}
