//! This module defines the core, strongly-typed identifiers used throughout the
//! mzbin codec pipeline.
//!
//! It replaces the string identifiers found in document metadata with closed
//! enums so that codec selection is a single exhaustive `match`.

pub mod compression;
pub mod numeric_type;

// Re-export the main types for easier access.
pub use compression::{CompressionMethod, NumpressVariant};
pub use numeric_type::NumericType;
