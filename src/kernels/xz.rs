//! This module contains the pure, stateless kernels for LZMA compression in the
//! standard `.xz` container format.
//!
//! The container is self-delimiting and checksummed, so no length parameter is
//! needed to decode. This module is a safe, panic-free wrapper around `xz2`.

use std::io::{Read, Write};

use xz2::read::XzDecoder;
use xz2::write::XzEncoder;

use crate::error::MzbinError;

/// The public-facing encode function for this module. `level` is the xz preset (0-9).
pub fn encode(input_bytes: &[u8], output_buf: &mut Vec<u8>, level: u32) -> Result<(), MzbinError> {
    output_buf.clear();
    let mut encoder = XzEncoder::new(std::mem::take(output_buf), level);
    encoder
        .write_all(input_bytes)
        .map_err(|e| MzbinError::XzError(e.to_string()))?;
    *output_buf = encoder
        .finish()
        .map_err(|e| MzbinError::XzError(e.to_string()))?;
    Ok(())
}

/// The public-facing decode function for this module.
pub fn decode(input_bytes: &[u8], output_buf: &mut Vec<u8>) -> Result<(), MzbinError> {
    output_buf.clear();
    if input_bytes.is_empty() {
        return Ok(());
    }
    let mut decoder = XzDecoder::new(input_bytes);
    decoder
        .read_to_end(output_buf)
        .map_err(|e| MzbinError::XzError(e.to_string()))?;
    Ok(())
}
