//! The external-binary layout: the metadata already says where every array is.

use std::path::Path;
use std::sync::Arc;

use crate::error::MzbinError;
use crate::ingest::ArrayMetadata;
use crate::location::DataLocation;
use crate::pipeline::CodecResolver;
use crate::storage::BinaryStorage;
use crate::traits::DataStorage;

pub struct ExternalBinaryIngest {
    storage: Arc<dyn DataStorage>,
    resolver: CodecResolver,
}

impl ExternalBinaryIngest {
    pub fn new(storage: Arc<dyn DataStorage>, resolver: CodecResolver) -> Self {
        Self { storage, resolver }
    }

    /// Opens the companion binary file read-only.
    pub fn open(path: impl AsRef<Path>, resolver: CodecResolver) -> Result<Self, MzbinError> {
        let storage: Arc<dyn DataStorage> = Arc::new(BinaryStorage::open(path)?);
        Ok(Self::new(storage, resolver))
    }

    pub fn storage(&self) -> &Arc<dyn DataStorage> {
        &self.storage
    }

    /// Builds the location for one array from its declared offset and length.
    pub fn locate(&self, meta: &ArrayMetadata) -> Result<DataLocation, MzbinError> {
        let offset = meta.offset.ok_or_else(|| {
            MzbinError::IngestState("external array declares no offset".to_string())
        })?;
        let pipeline =
            self.resolver
                .resolve(meta.numeric_type, meta.compression, meta.element_count)?;
        Ok(DataLocation::new(Arc::clone(&self.storage), offset, meta.encoded_length)
            .with_pipeline(pipeline))
    }

    /// Closes the companion file for every location created here.
    pub fn close(&self) {
        self.storage.close();
    }
}
