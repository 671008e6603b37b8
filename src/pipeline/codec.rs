//! The closed set of codecs a pipeline may be composed of.

use serde::{Deserialize, Serialize};

use crate::error::MzbinError;
use crate::kernels;
use crate::traits::DataTransform;
use crate::types::{NumericType, NumpressVariant};

/// One reversible byte-to-byte stage, carrying its own parameters.
///
/// `forward` produces stored bytes from in-memory bytes; `reverse` undoes it.
/// Codecs hold no state beyond their parameters, so one value may be shared
/// between threads and reused across arrays.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "op", content = "params", rename_all = "snake_case")]
pub enum Codec {
    /// Re-encodes `from`-typed elements as `to`-typed elements.
    Numeric { from: NumericType, to: NumericType },
    /// zlib-wrapped deflate. `chunk_size` is the internal inflate buffer size.
    Deflate { chunk_size: usize },
    /// Raw LZ4 block. Decoding must produce exactly `decompressed_len` bytes.
    Lz4 { decompressed_len: usize },
    /// LZMA in the `.xz` container at preset `level`.
    Xz { level: u32 },
    /// Zstandard frame. Decoding must produce exactly `decompressed_len` bytes.
    Zstd { decompressed_len: usize, level: i32 },
    /// Numpress over Float64 bytes. `fixed_point: None` derives it from the data.
    Numpress {
        variant: NumpressVariant,
        fixed_point: Option<f64>,
    },
}

impl Codec {
    /// A short, stable name used to label pipeline errors and log lines.
    pub fn name(&self) -> String {
        match self {
            Codec::Numeric { from, to } => format!("numeric({}->{})", from, to),
            Codec::Deflate { .. } => "deflate".to_string(),
            Codec::Lz4 { .. } => "lz4".to_string(),
            Codec::Xz { .. } => "xz".to_string(),
            Codec::Zstd { .. } => "zstd".to_string(),
            Codec::Numpress { variant, .. } => format!("numpress-{}", variant.name()),
        }
    }
}

impl DataTransform for Codec {
    fn forward(&self, input: &[u8]) -> Result<Vec<u8>, MzbinError> {
        let mut out = Vec::with_capacity(input.len());
        kernels::dispatch_encode(self, input, &mut out)?;
        Ok(out)
    }

    fn reverse(&self, input: &[u8]) -> Result<Vec<u8>, MzbinError> {
        let mut out = Vec::with_capacity(input.len());
        kernels::dispatch_decode(self, input, &mut out)?;
        Ok(out)
    }
}
