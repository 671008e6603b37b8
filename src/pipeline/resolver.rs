//! Codec resolution: turning an array's declared metadata into a pipeline.
//!
//! The resolver is an explicit context object built from one shared
//! `StoreConfig`. Ingestion asks it for a pipeline per array instead of
//! consulting any process-wide lookup table.

use std::sync::Arc;

use crate::config::StoreConfig;
use crate::error::MzbinError;
use crate::pipeline::{Codec, CodecPipeline};
use crate::types::{CompressionMethod, NumericType, NumpressVariant};

#[derive(Debug, Clone)]
pub struct CodecResolver {
    config: Arc<StoreConfig>,
}

impl CodecResolver {
    pub fn new(config: Arc<StoreConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Builds the pipeline for an array of `element_count` values stored as
    /// `numeric` elements under `compression`.
    ///
    /// Numpress encodes doubles directly, so for numpress methods the declared
    /// numeric type does not add a stage.
    pub fn resolve(
        &self,
        numeric: NumericType,
        compression: CompressionMethod,
        element_count: usize,
    ) -> Result<CodecPipeline, MzbinError> {
        let mut pipeline = CodecPipeline::new();

        if let Some(variant) = compression.numpress_variant() {
            if numeric != NumericType::Float64 {
                log::debug!(
                    "Ignoring declared type {} for {} array; numpress decodes to Float64",
                    numeric,
                    compression
                );
            }
            pipeline.push(self.numpress_codec(variant));
            if matches!(compression, CompressionMethod::NumpressZlib(_)) {
                pipeline.push(self.deflate_codec());
            }
            return Ok(pipeline);
        }

        if numeric != NumericType::Float64 {
            pipeline.push(Codec::Numeric {
                from: NumericType::Float64,
                to: numeric,
            });
        }

        let decompressed_len = element_count.checked_mul(numeric.width()).ok_or_else(|| {
            MzbinError::InternalError(format!(
                "{} elements of {} overflow the addressable size",
                element_count, numeric
            ))
        })?;

        match compression {
            CompressionMethod::None => {}
            CompressionMethod::Zlib => pipeline.push(self.deflate_codec()),
            CompressionMethod::Lz4 => pipeline.push(Codec::Lz4 { decompressed_len }),
            CompressionMethod::Xz => pipeline.push(Codec::Xz {
                level: self.config.xz_level,
            }),
            CompressionMethod::Zstd => pipeline.push(Codec::Zstd {
                decompressed_len,
                level: self.config.zstd_level,
            }),
            CompressionMethod::Numpress(_) | CompressionMethod::NumpressZlib(_) => {
                return Err(MzbinError::InternalError(
                    "numpress methods are resolved above".to_string(),
                ))
            }
        }
        Ok(pipeline)
    }

    /// Resolves from the controlled-vocabulary accessions declared on an array.
    ///
    /// Accessions that name neither a numeric type nor a compression method are
    /// skipped. A known compression accession without a codec is
    /// `UnsupportedCompression`. A numpress accession declared next to the zlib accession is read
    /// as numpress followed by zlib. A missing compression accession means none;
    /// a missing numeric type is an error.
    pub fn resolve_accessions(
        &self,
        accessions: &[&str],
        element_count: usize,
    ) -> Result<CodecPipeline, MzbinError> {
        let mut numeric = None;
        let mut zlib = false;
        let mut numpress = None;
        let mut other = None;

        for accession in accessions {
            if let Some(t) = NumericType::from_accession(accession) {
                numeric = Some(t);
                continue;
            }
            match CompressionMethod::from_accession(accession) {
                Some(CompressionMethod::Zlib) => zlib = true,
                Some(CompressionMethod::Numpress(v)) => numpress = Some(v),
                Some(CompressionMethod::NumpressZlib(v)) => {
                    numpress = Some(v);
                    zlib = true;
                }
                Some(method) => other = Some(method),
                None if CompressionMethod::is_unimplemented_accession(accession) => {
                    return Err(MzbinError::UnsupportedCompression(accession.to_string()));
                }
                None => {}
            }
        }

        let numeric = numeric.ok_or_else(|| {
            MzbinError::UnsupportedType(format!(
                "no numeric type among declared accessions {:?}",
                accessions
            ))
        })?;
        let compression = match (numpress, zlib) {
            (Some(v), true) => CompressionMethod::NumpressZlib(v),
            (Some(v), false) => CompressionMethod::Numpress(v),
            (None, true) => CompressionMethod::Zlib,
            (None, false) => other.unwrap_or_default(),
        };
        self.resolve(numeric, compression, element_count)
    }

    fn deflate_codec(&self) -> Codec {
        Codec::Deflate {
            chunk_size: self.config.deflate_chunk_size,
        }
    }

    fn numpress_codec(&self, variant: NumpressVariant) -> Codec {
        let fixed_point = match variant {
            NumpressVariant::Linear => self.config.numpress_linear_fixed_point,
            NumpressVariant::Slof => self.config.numpress_slof_fixed_point,
            NumpressVariant::Pic => None,
        };
        Codec::Numpress {
            variant,
            fixed_point,
        }
    }
}
