//! Writing arrays: the mirror of `DataLocation::decoded_array`.

use std::sync::Arc;

use crate::error::MzbinError;
use crate::location::DataLocation;
use crate::pipeline::CodecPipeline;
use crate::storage::BinaryStorage;
use crate::traits::DataStorage;

/// Appends encoded arrays to one writable storage.
pub struct ArrayWriter {
    storage: Arc<BinaryStorage>,
}

impl ArrayWriter {
    pub fn new(storage: Arc<BinaryStorage>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Arc<BinaryStorage> {
        &self.storage
    }

    /// Encodes `values` through `pipeline`, appends the result and returns a
    /// location that decodes back to `values`.
    pub fn write(
        &self,
        values: &[f64],
        pipeline: CodecPipeline,
    ) -> Result<DataLocation, MzbinError> {
        let encoded = pipeline.encode_array(values)?;
        let offset = self.storage.append(&encoded)?;
        let offset = i64::try_from(offset).map_err(|_| {
            MzbinError::InternalError(format!("offset {} exceeds i64", offset))
        })?;
        log::debug!(
            "Wrote {} values as {} bytes at offset {} of {}",
            values.len(),
            encoded.len(),
            offset,
            self.storage.path().display()
        );
        let storage: Arc<dyn DataStorage> = self.storage.clone();
        Ok(DataLocation::new(storage, offset, encoded.len() as i64).with_pipeline(pipeline))
    }
}
