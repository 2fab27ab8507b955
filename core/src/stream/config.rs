//! stream/config.rs
//! Stream construction knobs.
//!
//! Notes:
//! - `None` fields fall back to native-recommended sizes and pooling on.
//! - A buffer size of zero is treated as "not set".

use crate::native::params;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamConfig {
    /// Internal buffer size in bytes.
    pub buffer_size: Option<usize>,
    /// Rent the internal buffer from the shared pool.
    pub use_pool: Option<bool>,
}

impl StreamConfig {
    pub fn new(buffer_size: Option<usize>, use_pool: Option<bool>) -> Self {
        Self {
            buffer_size: buffer_size.filter(|&n| n > 0),
            use_pool,
        }
    }

    pub fn with_buffer_size(buffer_size: usize) -> Self {
        Self::new(Some(buffer_size), None)
    }

    pub(crate) fn compress_buffer_size(&self) -> usize {
        self.buffer_size
            .filter(|&n| n > 0)
            .unwrap_or_else(params::compress_stream_out_size)
    }

    pub(crate) fn decompress_buffer_size(&self) -> usize {
        self.buffer_size
            .filter(|&n| n > 0)
            .unwrap_or_else(params::decompress_stream_in_size)
    }

    pub(crate) fn pooled(&self) -> bool {
        self.use_pool.unwrap_or(true)
    }
}
