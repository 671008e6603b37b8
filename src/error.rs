// In: src/error.rs

//! This module defines the single, unified error type for the entire mzbin library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MzbinError {
    // =========================================================================
    // === High-Level, Semantic Errors (Specific to our library's logic)
    // =========================================================================
    #[error("Unsupported numeric type: {0}")]
    UnsupportedType(String),

    #[error("Unsupported compression method: {0}")]
    UnsupportedCompression(String),

    #[error("Offset {0} is still negative after 32-bit overflow correction")]
    InvalidOffset(i64),

    #[error("Ingestion state error: {0}")]
    IngestState(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Internal logic error (this is a bug): {0}")]
    InternalError(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the underlying I/O subsystem (e.g., file not found).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the Serde JSON library, typically while loading a `StoreConfig`.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// Inline base64 text that could not be decoded.
    #[error("Base64 decoding error: {0}")]
    Base64(#[from] base64::DecodeError),

    // =========================================================================
    // === Low-Level Pipeline/Kernel Errors
    // =========================================================================
    #[error("Buffer length mismatch: expected a multiple of {0}, got {1}")]
    BufferMismatch(usize, usize),

    #[error("Decoded length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Deflate operation failed: {0}")]
    DeflateError(String),

    #[error("LZ4 operation failed: {0}")]
    Lz4Error(String),

    #[error("XZ operation failed: {0}")]
    XzError(String),

    #[error("Zstd operation failed: {0}")]
    ZstdError(String),

    #[error("Numpress encoding/decoding failed: {0}")]
    NumpressError(String),

    #[error("Pipeline execution failed at stage '{stage}': {source}")]
    PipelineError {
        stage: String,
        #[source]
        source: Box<MzbinError>,
    },
}

// =============================================================================
// === Stage Context ===
// =============================================================================

impl MzbinError {
    /// Wraps `self` with the name of the pipeline stage that produced it.
    pub(crate) fn at_stage(self, stage: impl Into<String>) -> Self {
        MzbinError::PipelineError {
            stage: stage.into(),
            source: Box::new(self),
        }
    }

    /// Returns the innermost error, unwrapping any `PipelineError` layers.
    pub fn root_cause(&self) -> &MzbinError {
        match self {
            MzbinError::PipelineError { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_cause_unwraps_nested_stages() {
        let err = MzbinError::ZstdError("bad frame".into())
            .at_stage("zstd")
            .at_stage("outer");
        assert!(err.to_string().contains("outer"));
        assert!(matches!(err.root_cause(), MzbinError::ZstdError(_)));
    }
}
