//! This module serves as the public API and dispatcher for the collection of all
//! pure, stateless codec kernels.
//!
//! It declares all kernel sub-modules and provides a single, unified dispatcher
//! for each direction. The dispatchers are the sole entry point for the
//! `pipeline::executor`: they take one `Codec` from a pipeline and call the
//! matching kernel with that codec's parameters.

use crate::error::MzbinError;
use crate::pipeline::Codec;
use crate::utils::{doubles_to_le_bytes, le_bytes_to_doubles};

//==================================================================================
// 1. Module Declarations
//==================================================================================

/// Numeric re-encoding between fixed-width little-endian types.
pub mod numeric;

/// Domain-specific semi-lossy compression of double series.
pub mod numpress;

/// General-purpose byte compression.
pub mod deflate;
pub mod lz4;
pub mod xz;
pub mod zstd;

//==================================================================================
// 2. Public API (Unified Dispatchers)
//==================================================================================

/// The single, unified dispatcher for all forward (storage-producing) operations.
pub fn dispatch_encode(
    codec: &Codec,
    input_bytes: &[u8],
    output_buf: &mut Vec<u8>,
) -> Result<(), MzbinError> {
    match codec {
        Codec::Numeric { from, to } => numeric::encode(input_bytes, output_buf, *from, *to),
        Codec::Deflate { .. } => deflate::encode(input_bytes, output_buf),
        Codec::Lz4 { .. } => lz4::encode(input_bytes, output_buf),
        Codec::Xz { level } => xz::encode(input_bytes, output_buf, *level),
        Codec::Zstd { level, .. } => zstd::encode(input_bytes, output_buf, *level),
        Codec::Numpress {
            variant,
            fixed_point,
        } => {
            // Numpress consumes doubles, so its input is always Float64 bytes.
            let values = le_bytes_to_doubles(input_bytes)?;
            numpress::encode(&values, output_buf, *variant, *fixed_point)
        }
    }
}

/// The single, unified dispatcher for all reverse (storage-consuming) operations.
pub fn dispatch_decode(
    codec: &Codec,
    input_bytes: &[u8],
    output_buf: &mut Vec<u8>,
) -> Result<(), MzbinError> {
    match codec {
        Codec::Numeric { from, to } => numeric::decode(input_bytes, output_buf, *from, *to),
        Codec::Deflate { chunk_size } => deflate::decode(input_bytes, output_buf, *chunk_size),
        Codec::Lz4 { decompressed_len } => lz4::decode(input_bytes, output_buf, *decompressed_len),
        Codec::Xz { .. } => xz::decode(input_bytes, output_buf),
        Codec::Zstd {
            decompressed_len, ..
        } => zstd::decode(input_bytes, output_buf, *decompressed_len),
        Codec::Numpress { variant, .. } => {
            let values = numpress::decode(input_bytes, *variant)?;
            *output_buf = doubles_to_le_bytes(&values);
            Ok(())
        }
    }
}

//==================================================================================
// 3. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NumericType, NumpressVariant};

    fn roundtrip(codec: &Codec, input: &[u8]) -> Vec<u8> {
        let mut encoded = Vec::new();
        dispatch_encode(codec, input, &mut encoded).unwrap();
        let mut decoded = Vec::new();
        dispatch_decode(codec, &encoded, &mut decoded).unwrap();
        decoded
    }

    #[test]
    fn test_lossless_codecs_roundtrip_through_dispatcher() {
        let values: Vec<f64> = (0..256).map(|i| (i as f64).sqrt() * 1000.0).collect();
        let bytes = doubles_to_le_bytes(&values);
        let codecs = [
            Codec::Deflate { chunk_size: 128 },
            Codec::Lz4 {
                decompressed_len: bytes.len(),
            },
            Codec::Xz { level: 1 },
            Codec::Zstd {
                decompressed_len: bytes.len(),
                level: 3,
            },
            Codec::Numeric {
                from: NumericType::Float64,
                to: NumericType::Float64,
            },
        ];
        for codec in &codecs {
            assert_eq!(roundtrip(codec, &bytes), bytes, "codec {:?}", codec);
        }
    }

    #[test]
    fn test_numpress_pic_via_dispatcher() {
        let bytes = doubles_to_le_bytes(&[1.0, 20.0, 300.0]);
        let codec = Codec::Numpress {
            variant: NumpressVariant::Pic,
            fixed_point: None,
        };
        assert_eq!(roundtrip(&codec, &bytes), bytes);
    }

    #[test]
    fn test_numpress_rejects_non_double_input() {
        let codec = Codec::Numpress {
            variant: NumpressVariant::Linear,
            fixed_point: None,
        };
        let mut out = Vec::new();
        let result = dispatch_encode(&codec, &[0u8; 12], &mut out);
        assert!(matches!(result, Err(MzbinError::BufferMismatch(8, 12))));
    }
}
