// In: src/config.rs

//! The single source of truth for all mzbin storage and codec configuration.
//!
//! `StoreConfig` is created once at the application boundary (e.g. from a JSON
//! file) and then passed down through the system as a shared, read-only
//! `Arc<StoreConfig>`. The `CodecResolver` reads codec parameters from it and the
//! embedded-layout ingestion reads its scratch-file settings from it.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::MzbinError;

/// The unified configuration for codec construction and ingestion.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct StoreConfig {
    /// Compression level handed to the zstd codec.
    #[serde(default = "default_zstd_level")]
    pub zstd_level: i32,

    /// Preset level (0-9) handed to the XZ codec.
    #[serde(default = "default_xz_level")]
    pub xz_level: u32,

    /// Size of the fixed internal buffer used while inflating deflate streams.
    #[serde(default = "default_deflate_chunk_size")]
    pub deflate_chunk_size: usize,

    /// Fixed point for the numpress linear codec. `None` computes the optimal
    /// value from each array.
    #[serde(default)]
    pub numpress_linear_fixed_point: Option<f64>,

    /// Fixed point for the numpress slof codec. `None` computes the optimal
    /// value from each array.
    #[serde(default)]
    pub numpress_slof_fixed_point: Option<f64>,

    /// Directory for the scratch binary file written during embedded ingestion.
    /// Defaults to the system temp directory.
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,

    /// If true, the scratch file outlives the ingestion session that created it.
    #[serde(default)]
    pub keep_scratch: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            zstd_level: default_zstd_level(),
            xz_level: default_xz_level(),
            deflate_chunk_size: default_deflate_chunk_size(),
            numpress_linear_fixed_point: None,
            numpress_slof_fixed_point: None,
            scratch_dir: None,
            keep_scratch: false,
        }
    }
}

impl StoreConfig {
    /// Parses and validates a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, MzbinError> {
        let config: StoreConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, MzbinError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Rejects values no codec can work with.
    pub fn validate(&self) -> Result<(), MzbinError> {
        if self.deflate_chunk_size == 0 {
            return Err(MzbinError::InvalidConfig(
                "deflate_chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.xz_level > 9 {
            return Err(MzbinError::InvalidConfig(format!(
                "xz_level must be between 0 and 9, got {}",
                self.xz_level
            )));
        }
        for (name, fp) in [
            ("numpress_linear_fixed_point", self.numpress_linear_fixed_point),
            ("numpress_slof_fixed_point", self.numpress_slof_fixed_point),
        ] {
            if let Some(fp) = fp {
                if !(fp.is_finite() && fp > 0.0) {
                    return Err(MzbinError::InvalidConfig(format!(
                        "{} must be a positive finite number, got {}",
                        name, fp
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Helper for `serde` to provide a default for `zstd_level`.
fn default_zstd_level() -> i32 {
    3
}

fn default_xz_level() -> u32 {
    6
}

fn default_deflate_chunk_size() -> usize {
    1024
}
