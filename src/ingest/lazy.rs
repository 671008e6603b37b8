//! The lazy path for inline arrays: find the base64 payload by searching the
//! already-stored document text, and point straight at it.

use std::sync::Arc;

use memchr::memmem;

use crate::error::MzbinError;
use crate::ingest::ArrayMetadata;
use crate::location::DataLocation;
use crate::pipeline::CodecResolver;
use crate::storage::EmbeddedStorage;
use crate::traits::DataStorage;

const BINARY_OPEN: &[u8] = b"<binary>";
const BINARY_CLOSE: &[u8] = b"</binary>";

pub struct LazyEmbeddedLocator {
    storage: Arc<EmbeddedStorage>,
    resolver: CodecResolver,
}

impl LazyEmbeddedLocator {
    pub fn new(storage: Arc<EmbeddedStorage>, resolver: CodecResolver) -> Self {
        Self { storage, resolver }
    }

    pub fn storage(&self) -> &Arc<EmbeddedStorage> {
        &self.storage
    }

    /// Searches the element spanning `span_len` bytes from `span_offset` for
    /// `marker`, then for the first `<binary>` payload after it.
    ///
    /// The returned location addresses the base64 text through the decoding
    /// storage. A marker or payload that cannot be found is logged and yields
    /// `Ok(None)`.
    pub fn locate(
        &self,
        marker: &str,
        span_offset: u64,
        span_len: usize,
        meta: &ArrayMetadata,
    ) -> Result<Option<DataLocation>, MzbinError> {
        let text = self.storage.raw().read(span_offset, span_len)?;

        let Some(marker_pos) = memmem::find(&text, marker.as_bytes()) else {
            log::warn!(
                "Marker {} not found in {} bytes at offset {}",
                marker,
                text.len(),
                span_offset
            );
            return Ok(None);
        };
        let after_marker = marker_pos + marker.len();

        let Some(open_rel) = memmem::find(&text[after_marker..], BINARY_OPEN) else {
            log::warn!(
                "No binary payload after marker {} at offset {}",
                marker,
                span_offset + after_marker as u64
            );
            return Ok(None);
        };
        let payload_start = after_marker + open_rel + BINARY_OPEN.len();

        let Some(payload_len) = memmem::find(&text[payload_start..], BINARY_CLOSE) else {
            log::warn!(
                "Unterminated binary payload for marker {} at offset {}",
                marker,
                span_offset + payload_start as u64
            );
            return Ok(None);
        };

        let offset = i64::try_from(span_offset + payload_start as u64).map_err(|_| {
            MzbinError::InternalError(format!("span offset {} exceeds i64", span_offset))
        })?;
        let pipeline =
            self.resolver
                .resolve(meta.numeric_type, meta.compression, meta.element_count)?;
        let storage: Arc<dyn DataStorage> = self.storage.base64().clone();
        Ok(Some(
            DataLocation::new(storage, offset, payload_len as i64).with_pipeline(pipeline),
        ))
    }
}
