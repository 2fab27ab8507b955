//! zstd-bridge
//!
//! Buffer-lifetime and streaming-protocol layer over the native zstd codec.
//! One-shot wrap/unwrap, sync and async streams, dictionaries and advanced
//! parameters, with native failures mapped to one typed error.

// Only native::params reaches below zstd-safe.
#![deny(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;

pub mod native;
pub mod options;

pub mod codec;
pub mod dict;
pub mod stream;
pub mod telemetry;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::codec::{Compressor, Decompressor};
    pub use crate::constants::{DEFAULT_COMPRESSION_LEVEL, DEFAULT_DICT_CAPACITY};
    pub use crate::dict::train_dictionary;
    pub use crate::options::{
        CompressionOptions, CompressionParameter, DecompressionOptions, DecompressionParameter,
    };
    pub use crate::stream::{
        AsyncCompressionStream, AsyncDecompressionStream, CompressionStream, DecompressionStream,
        StreamConfig,
    };
    pub use crate::types::{Result, ZstdError};
}
