//! This module contains the pure, stateless kernels for LZ4 block compression.
//!
//! Raw LZ4 blocks carry no size header, so decompression requires the caller to
//! supply the exact decompressed length. Compression writes into a scratch buffer
//! sized by the LZ4 worst-case bound for the input length and trims it afterwards.
//! This module is a safe, panic-free wrapper around the `lz4_flex` crate.

use lz4_flex::block;

use crate::error::MzbinError;

/// The public-facing encode function for this module.
pub fn encode(input_bytes: &[u8], output_buf: &mut Vec<u8>) -> Result<(), MzbinError> {
    output_buf.clear();
    if input_bytes.is_empty() {
        return Ok(());
    }

    output_buf.resize(block::get_maximum_output_size(input_bytes.len()), 0);
    let written = block::compress_into(input_bytes, output_buf)
        .map_err(|e| MzbinError::Lz4Error(e.to_string()))?;
    output_buf.truncate(written);
    Ok(())
}

/// The public-facing decode function for this module.
///
/// Fails unless the block expands to exactly `decompressed_len` bytes.
pub fn decode(
    input_bytes: &[u8],
    output_buf: &mut Vec<u8>,
    decompressed_len: usize,
) -> Result<(), MzbinError> {
    output_buf.clear();
    if input_bytes.is_empty() {
        if decompressed_len == 0 {
            return Ok(());
        }
        return Err(MzbinError::LengthMismatch {
            expected: decompressed_len,
            actual: 0,
        });
    }

    output_buf.resize(decompressed_len, 0);
    let written = block::decompress_into(input_bytes, output_buf)
        .map_err(|e| MzbinError::Lz4Error(e.to_string()))?;
    if written != decompressed_len {
        output_buf.clear();
        return Err(MzbinError::LengthMismatch {
            expected: decompressed_len,
            actual: written,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::doubles_to_le_bytes;

    #[test]
    fn test_lz4_roundtrip_repeated_doubles() {
        let original = doubles_to_le_bytes(&vec![100.0; 1000]);
        assert_eq!(original.len(), 8000);

        let mut compressed = Vec::new();
        encode(&original, &mut compressed).unwrap();
        assert!(compressed.len() < original.len());

        let mut decompressed = Vec::new();
        decode(&compressed, &mut decompressed, 8000).unwrap();
        assert_eq!(decompressed, original);
    }

    #[test]
    fn test_lz4_wrong_declared_length_is_error() {
        let original = vec![3u8; 512];
        let mut compressed = Vec::new();
        encode(&original, &mut compressed).unwrap();

        let mut out = Vec::new();
        // Too small: the block does not fit.
        assert!(decode(&compressed, &mut out, 100).is_err());
        // Too large: the block ends early.
        let result = decode(&compressed, &mut out, 1024);
        assert!(matches!(
            result,
            Err(MzbinError::LengthMismatch { expected: 1024, actual: 512 })
        ));
    }

    #[test]
    fn test_lz4_empty() {
        let mut compressed = vec![1];
        encode(&[], &mut compressed).unwrap();
        assert!(compressed.is_empty());

        let mut out = Vec::new();
        decode(&[], &mut out, 0).unwrap();
        assert!(out.is_empty());
        assert!(decode(&[], &mut out, 8).is_err());
    }
}
