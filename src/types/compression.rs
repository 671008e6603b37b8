//! Identifiers for the compression methods an array may be stored with.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MzbinError;

/// The three numpress algorithm variants. Decoding requires knowing which one
/// produced the bytes; it is not recoverable from the bytes themselves.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NumpressVariant {
    /// Linear prediction over fixed-point integers. Suited to m/z and time arrays.
    Linear,
    /// Positive integer compression. Rounds to the nearest integer.
    Pic,
    /// Short logged float. Suited to intensity arrays.
    Slof,
}

impl NumpressVariant {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Pic => "pic",
            Self::Slof => "slof",
        }
    }
}

impl FromStr for NumpressVariant {
    type Err = MzbinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "pic" => Ok(Self::Pic),
            "slof" => Ok(Self::Slof),
            _ => Err(MzbinError::UnsupportedCompression(format!("numpress-{}", s))),
        }
    }
}

/// Compression terms that must not fall through to "no compression".
const UNIMPLEMENTED_ACCESSIONS: &[&str] = &[
    "MS:1003088", // truncation, delta prediction and zlib
    "MS:1003089", // truncation, linear prediction and zlib
    "MS:1003090", // delta prediction and zlib
    "MS:1003091", // linear prediction and zlib
    "MS:1003092", // truncation and zlib
];

/// The compression method declared for a stored array.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum CompressionMethod {
    #[default]
    None,
    Zlib,
    Lz4,
    Xz,
    Zstd,
    Numpress(NumpressVariant),
    /// Numpress followed by zlib on the numpress output.
    NumpressZlib(NumpressVariant),
}

impl CompressionMethod {
    /// Maps a controlled-vocabulary accession to a compression method.
    ///
    /// Returns `None` for accessions that do not name a compression method.
    pub fn from_accession(accession: &str) -> Option<Self> {
        use NumpressVariant::*;
        match accession {
            "MS:1000576" => Some(Self::None),
            "MS:1000574" => Some(Self::Zlib),
            "MS:1002312" => Some(Self::Numpress(Linear)),
            "MS:1002313" => Some(Self::Numpress(Pic)),
            "MS:1002314" => Some(Self::Numpress(Slof)),
            "MS:1002746" => Some(Self::NumpressZlib(Linear)),
            "MS:1002747" => Some(Self::NumpressZlib(Pic)),
            "MS:1002748" => Some(Self::NumpressZlib(Slof)),
            _ => None,
        }
    }

    /// True for accessions that name a compression method with no codec here,
    /// such as the truncation and prediction schemes.
    pub fn is_unimplemented_accession(accession: &str) -> bool {
        UNIMPLEMENTED_ACCESSIONS.contains(&accession)
    }

    /// The numpress variant involved, if any.
    pub fn numpress_variant(&self) -> Option<NumpressVariant> {
        match self {
            Self::Numpress(v) | Self::NumpressZlib(v) => Some(*v),
            _ => None,
        }
    }
}

impl FromStr for CompressionMethod {
    type Err = MzbinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        match lower.as_str() {
            "none" | "no compression" => return Ok(Self::None),
            "zlib" | "deflate" => return Ok(Self::Zlib),
            "lz4" => return Ok(Self::Lz4),
            "xz" | "lzma" => return Ok(Self::Xz),
            "zstd" => return Ok(Self::Zstd),
            _ => {}
        }
        if let Some(rest) = lower.strip_prefix("numpress-") {
            return match rest.strip_suffix("-zlib") {
                Some(variant) => Ok(Self::NumpressZlib(variant.parse()?)),
                None => Ok(Self::Numpress(rest.parse()?)),
            };
        }
        Self::from_accession(s).ok_or_else(|| MzbinError::UnsupportedCompression(s.to_string()))
    }
}

impl fmt::Display for CompressionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Zlib => write!(f, "zlib"),
            Self::Lz4 => write!(f, "lz4"),
            Self::Xz => write!(f, "xz"),
            Self::Zstd => write!(f, "zstd"),
            Self::Numpress(v) => write!(f, "numpress-{}", v.name()),
            Self::NumpressZlib(v) => write!(f, "numpress-{}-zlib", v.name()),
        }
    }
}
