//! This module provides a set of shared, low-level utility functions used
//! throughout the mzbin core.
//!
//! Its primary responsibility is the safe, validated conversion between raw
//! little-endian byte buffers and `f64` slices. Buffers read from storage carry no
//! alignment guarantee, so every conversion here copies rather than reinterprets.

use crate::error::MzbinError;

const F64_WIDTH: usize = std::mem::size_of::<f64>();

//==================================================================================
// 1. Core Utility Functions
//==================================================================================

/// Serializes a slice of doubles into little-endian bytes.
pub fn doubles_to_le_bytes(values: &[f64]) -> Vec<u8> {
    #[cfg(target_endian = "little")]
    {
        bytemuck::cast_slice::<f64, u8>(values).to_vec()
    }
    #[cfg(not(target_endian = "little"))]
    {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }
}

/// Reinterprets a little-endian byte buffer as doubles.
///
/// # Errors
/// Returns `MzbinError::BufferMismatch` if the buffer length is not a multiple of 8.
pub fn le_bytes_to_doubles(bytes: &[u8]) -> Result<Vec<f64>, MzbinError> {
    if bytes.len() % F64_WIDTH != 0 {
        return Err(MzbinError::BufferMismatch(F64_WIDTH, bytes.len()));
    }
    #[cfg(target_endian = "little")]
    {
        // `pod_collect_to_vec` copies into a fresh, correctly aligned allocation.
        Ok(bytemuck::pod_collect_to_vec::<u8, f64>(bytes))
    }
    #[cfg(not(target_endian = "little"))]
    {
        Ok(bytes
            .chunks_exact(F64_WIDTH)
            .map(|c| f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
            .collect())
    }
}
