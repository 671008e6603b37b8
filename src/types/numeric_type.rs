//! This module defines the canonical, type-safe representation of the six
//! fixed-width little-endian numeric encodings a stored array may use.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::MzbinError;

/// The numeric encoding of a stored array, as declared by the document metadata.
///
/// All encodings are little-endian. Decoded arrays are always surfaced as `f64`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumericType {
    Float64,
    Float32,
    Int8,
    Int16,
    Int32,
    Int64,
}

impl NumericType {
    /// All six encodings, in declaration order.
    pub const ALL: [NumericType; 6] = [
        Self::Float64,
        Self::Float32,
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
    ];

    /// Size in bytes of one element.
    pub fn width(&self) -> usize {
        match self {
            Self::Int8 => 1,
            Self::Int16 => 2,
            Self::Float32 | Self::Int32 => 4,
            Self::Float64 | Self::Int64 => 8,
        }
    }

    /// Maps a controlled-vocabulary accession to a numeric type.
    ///
    /// Returns `None` for accessions that do not name a numeric type, so callers
    /// can scan a mixed list of declared terms.
    pub fn from_accession(accession: &str) -> Option<Self> {
        match accession {
            "MS:1000523" => Some(Self::Float64),
            "MS:1000521" => Some(Self::Float32),
            "MS:1000519" => Some(Self::Int32),
            "MS:1000522" => Some(Self::Int64),
            "IMS:1100000" => Some(Self::Int8),
            "IMS:1100001" => Some(Self::Int16),
            _ => None,
        }
    }
}

impl FromStr for NumericType {
    type Err = MzbinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "float64" | "f64" | "64-bit float" | "double" => Ok(Self::Float64),
            "float32" | "f32" | "32-bit float" | "float" => Ok(Self::Float32),
            "int8" | "i8" | "8-bit integer" => Ok(Self::Int8),
            "int16" | "i16" | "16-bit integer" => Ok(Self::Int16),
            "int32" | "i32" | "32-bit integer" => Ok(Self::Int32),
            "int64" | "i64" | "64-bit integer" => Ok(Self::Int64),
            _ => Self::from_accession(s).ok_or_else(|| MzbinError::UnsupportedType(s.to_string())),
        }
    }
}

impl fmt::Display for NumericType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
