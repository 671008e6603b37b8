//! This module contains the pure, stateless kernels for performing Zstandard
//! compression and decompression.
//!
//! Stored arrays carry no size header of their own, so decompression is bounded by
//! the decompressed length the caller declares (element count times element width)
//! and must produce exactly that many bytes.
//! This module is a safe, panic-free wrapper around the `zstd` crate.

use crate::error::MzbinError;

//==================================================================================
// 1. Public API
//==================================================================================

/// The public-facing encode function for this module.
pub fn encode(input_bytes: &[u8], output_buf: &mut Vec<u8>, level: i32) -> Result<(), MzbinError> {
    output_buf.clear();
    if input_bytes.is_empty() {
        return Ok(());
    }
    *output_buf = zstd::bulk::compress(input_bytes, level)
        .map_err(|e| MzbinError::ZstdError(e.to_string()))?;
    Ok(())
}

/// The public-facing decode function for this module.
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

    // A frame larger than the declared capacity fails inside zstd.
    *output_buf = zstd::bulk::decompress(input_bytes, decompressed_len)
        .map_err(|e| MzbinError::ZstdError(e.to_string()))?;
    if output_buf.len() != decompressed_len {
        let actual = output_buf.len();
        output_buf.clear();
        return Err(MzbinError::LengthMismatch {
            expected: decompressed_len,
            actual,
        });
    }
    Ok(())
}

//==================================================================================
// 2. Unit Tests
//==================================================================================
