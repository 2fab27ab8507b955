//! stream/mod.rs
//! Incremental compression and decompression over sinks and sources.
//!
//! Notes:
//! - `core` holds the native state machines; `compress`/`decompress` only add I/O.
//! - Blocking adapters implement `std::io::Write`/`Read`; async adapters work
//!   over `futures::io` traits and leave the executor to the caller.

pub mod compress;
pub mod config;
pub mod core;
pub mod decompress;
pub mod pool;

pub use self::compress::{AsyncCompressionStream, CompressionStream};
pub use self::config::StreamConfig;
pub use self::core::{CompressState, DecompressState};
pub use self::decompress::{AsyncDecompressionStream, DecompressionStream};
pub use self::pool::{BufferPool, PooledBuffer};
