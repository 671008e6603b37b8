//! This module turns the events of a document scan into `DataLocation`s.
//!
//! Each supported layout has its own small state machine. The document parser
//! stays outside the crate: it calls into these types with the metadata it has
//! collected for each array, and they hand back locations.

use serde::{Deserialize, Serialize};

use crate::types::{CompressionMethod, NumericType};

//==================================================================================
// 1. Module Declarations
//==================================================================================

/// Arrays in a separate binary file at declared offsets.
pub mod external;

/// Inline base64 arrays decoded once into a scratch file.
pub mod embedded;

/// Inline base64 arrays located by text search after the scan.
pub mod lazy;

/// Start-offset tables resolved into byte spans, one entry late.
pub mod index;

pub use self::embedded::EmbeddedIngest;
pub use self::external::ExternalBinaryIngest;
pub use self::index::{IndexedSpan, OffsetIndexIngest, SpectrumIndex};
pub use self::lazy::LazyEmbeddedLocator;

//==================================================================================
// 2. Shared Metadata
//==================================================================================

/// What the document declares about one stored array.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ArrayMetadata {
    pub numeric_type: NumericType,
    #[serde(default)]
    pub compression: CompressionMethod,
    /// Number of values the array decodes to.
    pub element_count: usize,
    /// Stored length in bytes. Only the external layout reads it.
    #[serde(default)]
    pub encoded_length: i64,
    /// Stored offset in bytes. Only the external layout reads it.
    #[serde(default)]
    pub offset: Option<i64>,
}

impl ArrayMetadata {
    pub fn new(
        numeric_type: NumericType,
        compression: CompressionMethod,
        element_count: usize,
    ) -> Self {
        Self {
            numeric_type,
            compression,
            element_count,
            encoded_length: 0,
            offset: None,
        }
    }

    /// Sets the declared byte range of an externally stored array.
    pub fn at(mut self, offset: i64, encoded_length: i64) -> Self {
        self.offset = Some(offset);
        self.encoded_length = encoded_length;
        self
    }
}
