//! This module contains the pure, stateless kernels for zlib-wrapped deflate
//! compression and decompression.
//!
//! Arrays declared with zlib compression in the document are stored in this
//! format. Inflation streams through a fixed-size internal buffer so that input
//! of arbitrary length is handled without knowing the decompressed size up front.
//! This module is a safe, panic-free wrapper around the `flate2` crate.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::{Compression, Decompress, FlushDecompress, Status};

use crate::error::MzbinError;

/// The public-facing encode function for this module.
pub fn encode(input_bytes: &[u8], output_buf: &mut Vec<u8>) -> Result<(), MzbinError> {
    output_buf.clear();
    let mut encoder = ZlibEncoder::new(std::mem::take(output_buf), Compression::default());
    encoder
        .write_all(input_bytes)
        .map_err(|e| MzbinError::DeflateError(e.to_string()))?;
    *output_buf = encoder
        .finish()
        .map_err(|e| MzbinError::DeflateError(e.to_string()))?;
    Ok(())
}

/// The public-facing decode function for this module.
///
/// `chunk_size` is the size of the intermediate buffer the decoder fills on
/// each step. The stream must run to its end marker; a stream that stops short
/// is an error rather than a shorter output.
pub fn decode(
    input_bytes: &[u8],
    output_buf: &mut Vec<u8>,
    chunk_size: usize,
) -> Result<(), MzbinError> {
    output_buf.clear();
    if input_bytes.is_empty() {
        return Ok(());
    }
    if chunk_size == 0 {
        return Err(MzbinError::DeflateError(
            "Inflate chunk size must be greater than zero".to_string(),
        ));
    }

    let mut inflater = Decompress::new(true);
    let mut chunk = vec![0u8; chunk_size];
    loop {
        let in_before = inflater.total_in();
        let out_before = inflater.total_out();
        let remaining = &input_bytes[in_before as usize..];
        let status = inflater
            .decompress(remaining, &mut chunk, FlushDecompress::None)
            .map_err(|e| MzbinError::DeflateError(e.to_string()))?;

        let produced = (inflater.total_out() - out_before) as usize;
        output_buf.extend_from_slice(&chunk[..produced]);

        match status {
            Status::StreamEnd => return Ok(()),
            Status::Ok | Status::BufError => {
                let consumed = inflater.total_in() - in_before;
                if consumed == 0 && produced == 0 {
                    return Err(MzbinError::DeflateError(format!(
                        "Truncated deflate stream after {} input bytes",
                        inflater.total_in()
                    )));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deflate_roundtrip_larger_than_chunk() {
        let original: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        let mut compressed = Vec::new();
        encode(&original, &mut compressed).unwrap();
        assert!(compressed.len() < original.len());

        let mut decompressed = Vec::new();
        decode(&compressed, &mut decompressed, 64).unwrap();
        assert_eq!(decompressed, original);
    }

    #[test]
    fn test_deflate_empty_input() {
        let mut compressed = Vec::new();
        encode(&[], &mut compressed).unwrap();
        // A zlib stream of nothing still has a header and checksum.
        assert!(!compressed.is_empty());

        let mut decompressed = vec![1, 2, 3];
        decode(&compressed, &mut decompressed, 1024).unwrap();
        assert!(decompressed.is_empty());

        decode(&[], &mut decompressed, 1024).unwrap();
        assert!(decompressed.is_empty());
    }

    #[test]
    fn test_deflate_rejects_garbage() {
        let mut out = Vec::new();
        let result = decode(b"definitely not zlib", &mut out, 1024);
        assert!(matches!(result, Err(MzbinError::DeflateError(_))));
    }

    #[test]
    fn test_deflate_rejects_truncated_stream() {
        let original = vec![7u8; 4096];
        let mut compressed = Vec::new();
        encode(&original, &mut compressed).unwrap();
        compressed.truncate(compressed.len() - 4);

        let mut out = Vec::new();
        assert!(decode(&compressed, &mut out, 1024).is_err());
    }
}
