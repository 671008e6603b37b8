//! This module defines the two behavioral seams of the crate.
//!
//! `DataTransform` is implemented by every codec and by whole pipelines, so a
//! single stage and a chain of stages are interchangeable wherever bytes are
//! transformed. `DataStorage` is implemented by every byte-addressable resource
//! a `DataLocation` can point into.

use std::path::Path;

use crate::error::MzbinError;

/// A reversible byte-to-byte operation.
pub trait DataTransform {
    /// In-memory bytes to stored bytes.
    fn forward(&self, input: &[u8]) -> Result<Vec<u8>, MzbinError>;

    /// Stored bytes back to in-memory bytes.
    fn reverse(&self, input: &[u8]) -> Result<Vec<u8>, MzbinError>;
}

/// A byte-addressable resource backed by a single open file handle.
///
/// Implementations serialize positional reads internally, so a shared
/// reference may be read from any number of threads at once.
pub trait DataStorage: Send + Sync {
    /// The path of the underlying file.
    fn path(&self) -> &Path;

    fn is_open(&self) -> bool;

    /// Reads up to `len` bytes starting at `offset`.
    ///
    /// A closed resource yields an empty buffer and an error-level log line
    /// instead of an `Err`. A range running past the end of the file yields
    /// the bytes that exist.
    fn read(&self, offset: u64, len: usize) -> Result<Vec<u8>, MzbinError>;

    /// Releases the handle. Calling it again is a no-op.
    fn close(&self);
}
