//! The pointer from a logical array to its stored bytes.

use std::fmt;
use std::sync::Arc;

use crate::error::MzbinError;
use crate::pipeline::CodecPipeline;
use crate::traits::DataStorage;
use crate::utils::le_bytes_to_doubles;

/// Added to a negative offset to recover the value a producer wrote through
/// a signed 32-bit field.
const OFFSET_OVERFLOW_FIX: i64 = 1 << 32;

/// Recovers an offset that overflowed a signed 32-bit field.
///
/// Non-negative offsets pass through. Negative ones get 2^32 added and an
/// error-level log line; anything still negative is `InvalidOffset`.
pub fn correct_offset(offset: i64) -> Result<u64, MzbinError> {
    if offset >= 0 {
        return Ok(offset as u64);
    }
    let corrected = offset.saturating_add(OFFSET_OVERFLOW_FIX);
    log::error!(
        "Negative offset {} found; attempting 32-bit overflow fix to {}",
        offset,
        corrected
    );
    u64::try_from(corrected).map_err(|_| MzbinError::InvalidOffset(offset))
}

/// Where an array lives and how it is encoded.
///
/// The storage is shared and not owned: closing it is the business of
/// whoever opened it. Every call re-reads and re-decodes; nothing is cached.
#[derive(Clone)]
pub struct DataLocation {
    storage: Arc<dyn DataStorage>,
    offset: i64,
    length: i64,
    pipeline: Option<CodecPipeline>,
}

impl DataLocation {
    pub fn new(storage: Arc<dyn DataStorage>, offset: i64, length: i64) -> Self {
        Self {
            storage,
            offset,
            length,
            pipeline: None,
        }
    }

    pub fn with_pipeline(mut self, pipeline: CodecPipeline) -> Self {
        self.pipeline = Some(pipeline);
        self
    }

    /// Assigns the pipeline once the array's metadata is complete.
    pub fn set_pipeline(&mut self, pipeline: CodecPipeline) {
        self.pipeline = Some(pipeline);
    }

    pub fn storage(&self) -> &Arc<dyn DataStorage> {
        &self.storage
    }

    /// The offset as recorded, before any overflow correction.
    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn length(&self) -> i64 {
        self.length
    }

    pub fn pipeline(&self) -> Option<&CodecPipeline> {
        self.pipeline.as_ref()
    }

    /// Reads the stored bytes.
    ///
    /// A length of zero or less is an empty array and does not touch storage.
    pub fn bytes(&self) -> Result<Vec<u8>, MzbinError> {
        if self.length <= 0 {
            log::trace!(
                "Zero-length array at offset {} in {}",
                self.offset,
                self.storage.path().display()
            );
            return Ok(Vec::new());
        }
        let offset = correct_offset(self.offset)?;
        let len = usize::try_from(self.length).map_err(|_| {
            MzbinError::InternalError(format!("length {} exceeds usize", self.length))
        })?;
        self.storage.read(offset, len)
    }

    /// Reads the stored bytes and decodes them to doubles. Without a pipeline
    /// the bytes are taken as little-endian doubles.
    pub fn decoded_array(&self) -> Result<Vec<f64>, MzbinError> {
        let bytes = self.bytes()?;
        match &self.pipeline {
            Some(pipeline) => pipeline.decode_array(&bytes),
            None => le_bytes_to_doubles(&bytes),
        }
    }
}

impl fmt::Debug for DataLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataLocation")
            .field("storage", &self.storage.path())
            .field("offset", &self.offset)
            .field("length", &self.length)
            .field("pipeline", &self.pipeline)
            .finish()
    }
}
