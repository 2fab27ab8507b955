//! options/mod.rs
//! Immutable codec configuration shared by one-shot codecs and streams.
//!
//! Notes:
//! - Everything is validated at construction; afterwards an options value is
//!   read-only and can be shared across threads behind an `Arc`.
//! - Native dictionary handles are built once here and freed when the last
//!   owner drops the options.

pub mod compression;
pub mod decompression;
pub mod params;

pub use compression::CompressionOptions;
pub use decompression::DecompressionOptions;
pub use params::{CompressionParameter, DecompressionParameter};
