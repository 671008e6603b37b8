//! This module contains every `DataStorage` implementation.
//!
//! All variants share the same byte-range read contract; they differ only in
//! what they do with the bytes they find.

//==================================================================================
// 1. Module Declarations
//==================================================================================

/// Bytes exactly as stored.
pub mod binary;

/// Bytes base64-decoded from the addressed text.
pub mod base64_storage;

/// Raw and base64 handles onto one inline-array document.
pub mod embedded;

/// The private scratch file written during eager ingestion.
pub mod scratch;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================

pub use self::base64_storage::Base64Storage;
pub use self::binary::BinaryStorage;
pub use self::embedded::EmbeddedStorage;
pub use self::scratch::ScratchFile;
