//! This module serves as the public API for codec pipelines.
//!
//! A `CodecPipeline` is an ordered, append-only list of `Codec`s plus an
//! implicit outermost stage converting between `f64` arrays and little-endian
//! bytes. Encoding runs the stages first to last; decoding undoes them last to
//! first.

//==================================================================================
// 1. Module Declarations
//==================================================================================

/// The closed set of codecs.
pub mod codec;

/// Runs a list of codecs over a byte buffer.
pub mod executor;

/// Maps declared numeric type and compression to a pipeline.
pub mod resolver;

pub use self::codec::Codec;
pub use self::resolver::CodecResolver;

use serde::{Deserialize, Serialize};

use crate::error::MzbinError;
use crate::traits::DataTransform;
use crate::utils::{doubles_to_le_bytes, le_bytes_to_doubles};

//==================================================================================
// 2. The Pipeline
//==================================================================================

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct CodecPipeline {
    stages: Vec<Codec>,
}

impl CodecPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_stages(stages: Vec<Codec>) -> Self {
        Self { stages }
    }

    /// Appends a stage to the end of the pipeline.
    pub fn push(&mut self, codec: Codec) {
        self.stages.push(codec);
    }

    /// Builder form of [`CodecPipeline::push`].
    pub fn with(mut self, codec: Codec) -> Self {
        self.push(codec);
        self
    }

    pub fn stages(&self) -> &[Codec] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Serializes `values` to little-endian doubles and runs every stage forward.
    pub fn encode_array(&self, values: &[f64]) -> Result<Vec<u8>, MzbinError> {
        let bytes = doubles_to_le_bytes(values);
        executor::execute_linear_encode_pipeline(&bytes, &self.stages)
    }

    /// Runs every stage in reverse and reinterprets the result as doubles.
    ///
    /// Empty stored bytes are an empty array, whatever the stages are.
    pub fn decode_array(&self, stored: &[u8]) -> Result<Vec<f64>, MzbinError> {
        if stored.is_empty() {
            return Ok(Vec::new());
        }
        let bytes = executor::execute_linear_decode_pipeline(stored, &self.stages)?;
        le_bytes_to_doubles(&bytes)
    }
}

impl DataTransform for CodecPipeline {
    fn forward(&self, input: &[u8]) -> Result<Vec<u8>, MzbinError> {
        executor::execute_linear_encode_pipeline(input, &self.stages)
    }

    fn reverse(&self, input: &[u8]) -> Result<Vec<u8>, MzbinError> {
        executor::execute_linear_decode_pipeline(input, &self.stages)
    }
}

//==================================================================================
// 3. Unit Tests
//==================================================================================
