//! This file is the root of the `mzbin` Rust crate: storage, location and codec
//! handling for the numeric arrays of mass-spectrometry documents.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of the library (`pipeline`, `kernels`, etc.)
//!     so the Rust compiler knows they exist.
//! 2.  Re-exporting the types most callers need, so that `use mzbin::*` style
//!     imports stay short.

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
//==================================================================================
// 1. Module Declarations
//==================================================================================
pub mod config;
pub mod error;
pub mod ingest;
pub mod kernels;
pub mod location;
pub mod observability;
pub mod pipeline;
pub mod storage;
pub mod traits;
pub mod types;
pub mod utils;
pub mod writer;

//==================================================================================
// 2. Public API Re-exports
//==================================================================================
pub use config::StoreConfig;
pub use error::MzbinError;
pub use ingest::{
    ArrayMetadata, EmbeddedIngest, ExternalBinaryIngest, IndexedSpan, LazyEmbeddedLocator,
    OffsetIndexIngest, SpectrumIndex,
};
pub use location::DataLocation;
pub use pipeline::{Codec, CodecPipeline, CodecResolver};
pub use storage::{Base64Storage, BinaryStorage, EmbeddedStorage, ScratchFile};
pub use traits::{DataStorage, DataTransform};
pub use types::{CompressionMethod, NumericType, NumpressVariant};
pub use writer::ArrayWriter;
