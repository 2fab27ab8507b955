//! native/mod.rs
//! Thin layer between the safe API and the zstd library.
//!
//! Notes:
//! - `segment` validates caller buffer windows before any native call sees them.
//! - `error` turns raw `size_t` results into `ZstdError` by numeric code.
//! - `params` holds bounds and size queries that need no context.

pub mod error;
pub mod params;
pub mod segment;

pub use params::{ContentSize, ParamBounds};
pub use segment::{BufferSegment, BufferSegmentMut};
