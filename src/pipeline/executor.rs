//! This module contains the core execution logic for codec pipelines.
//!
//! It is a non-strategic byte engine: it runs a linear sequence of codecs
//! exactly as given, ping-ponging between two buffers, and labels any failure
//! with the stage that produced it.

use crate::error::MzbinError;
use crate::kernels;
use crate::pipeline::Codec;

/// Executes a linear encoding pipeline, first stage first.
pub(crate) fn execute_linear_encode_pipeline(
    bytes: &[u8],
    pipeline: &[Codec],
) -> Result<Vec<u8>, MzbinError> {
    if pipeline.is_empty() {
        return Ok(bytes.to_vec());
    }

    let mut buffer_a = bytes.to_vec();
    let mut buffer_b = Vec::with_capacity(buffer_a.len());

    for codec in pipeline {
        kernels::dispatch_encode(codec, &buffer_a, &mut buffer_b)
            .map_err(|e| e.at_stage(codec.name()))?;
        log::trace!(
            "encode stage {}: {} -> {} bytes",
            codec.name(),
            buffer_a.len(),
            buffer_b.len()
        );
        std::mem::swap(&mut buffer_a, &mut buffer_b);
        buffer_b.clear();
    }

    Ok(buffer_a)
}

/// Executes a linear decoding pipeline.
///
/// Stages are undone last stage first, so that decoding is the exact inverse
/// of `execute_linear_encode_pipeline` over the same list.
pub(crate) fn execute_linear_decode_pipeline(
    bytes: &[u8],
    pipeline: &[Codec],
) -> Result<Vec<u8>, MzbinError> {
    if pipeline.is_empty() {
        return Ok(bytes.to_vec());
    }

    let mut buffer_a = bytes.to_vec();
    let mut buffer_b = Vec::with_capacity(buffer_a.len());

    for codec in pipeline.iter().rev() {
        kernels::dispatch_decode(codec, &buffer_a, &mut buffer_b)
            .map_err(|e| e.at_stage(codec.name()))?;
        log::trace!(
            "decode stage {}: {} -> {} bytes",
            codec.name(),
            buffer_a.len(),
            buffer_b.len()
        );
        std::mem::swap(&mut buffer_a, &mut buffer_b);
        buffer_b.clear();
    }

    Ok(buffer_a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NumericType;
    use crate::utils::doubles_to_le_bytes;

    #[test]
    fn test_empty_pipeline_is_identity() {
        let bytes = vec![1, 2, 3];
        assert_eq!(execute_linear_encode_pipeline(&bytes, &[]).unwrap(), bytes);
        assert_eq!(execute_linear_decode_pipeline(&bytes, &[]).unwrap(), bytes);
    }

    #[test]
    fn test_decode_runs_stages_in_reverse_order() {
        let bytes = doubles_to_le_bytes(&[1.5, 2.5, 3.5, 4.5]);
        let pipeline = vec![
            Codec::Numeric {
                from: NumericType::Float64,
                to: NumericType::Float32,
            },
            Codec::Lz4 {
                decompressed_len: 16,
            },
        ];
        let encoded = execute_linear_encode_pipeline(&bytes, &pipeline).unwrap();
        let decoded = execute_linear_decode_pipeline(&encoded, &pipeline).unwrap();
        assert_eq!(decoded, bytes);
    }

    #[test]
    fn test_failure_names_the_stage() {
        let pipeline = vec![Codec::Deflate { chunk_size: 1024 }];
        let err = execute_linear_decode_pipeline(b"not deflate", &pipeline).unwrap_err();
        match err {
            MzbinError::PipelineError { stage, source } => {
                assert_eq!(stage, "deflate");
                assert!(matches!(*source, MzbinError::DeflateError(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
