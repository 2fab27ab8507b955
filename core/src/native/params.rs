//! native/params.rs
//! Context-free queries against the native library: parameter bounds,
//! level range, worst-case output size and frame header inspection.

use zstd_sys::{ZSTD_bounds, ZSTD_cParameter, ZSTD_dParameter};

use crate::constants::MAX_BUFFER_SIZE;
use crate::native::error::translate;
use crate::types::Result;

/// Inclusive range accepted by the native library for one parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamBounds {
    pub lower: i32,
    pub upper: i32,
}

impl ParamBounds {
    pub fn contains(&self, value: i32) -> bool {
        self.lower <= value && value <= self.upper
    }
}

#[allow(unsafe_code)]
fn bounds_from(raw: ZSTD_bounds) -> Result<ParamBounds> {
    // SAFETY: ZSTD_isError only inspects the integer it is given.
    if unsafe { zstd_sys::ZSTD_isError(raw.error) } != 0 {
        return Err(translate(raw.error, 0));
    }
    Ok(ParamBounds { lower: raw.lowerBound, upper: raw.upperBound })
}

#[allow(unsafe_code)]
pub(crate) fn compression_bounds(param: ZSTD_cParameter) -> Result<ParamBounds> {
    // SAFETY: pure lookup, takes no pointers.
    bounds_from(unsafe { zstd_sys::ZSTD_cParam_getBounds(param) })
}

#[allow(unsafe_code)]
pub(crate) fn decompression_bounds(param: ZSTD_dParameter) -> Result<ParamBounds> {
    // SAFETY: pure lookup, takes no pointers.
    bounds_from(unsafe { zstd_sys::ZSTD_dParam_getBounds(param) })
}

pub fn min_level() -> i32 {
    zstd_safe::min_c_level()
}

pub fn max_level() -> i32 {
    zstd_safe::max_c_level()
}

/// Worst-case compressed size for `len` input bytes, capped to the largest
/// buffer this crate will allocate. Zero means the input is too large.
pub fn compress_bound(len: usize) -> usize {
    zstd_safe::compress_bound(len).min(MAX_BUFFER_SIZE)
}

/// Output chunk size the native library recommends for streaming compression.
pub fn compress_stream_out_size() -> usize {
    zstd_safe::CCtx::out_size()
}

/// Input chunk size the native library recommends for streaming decompression.
pub fn decompress_stream_in_size() -> usize {
    zstd_safe::DCtx::in_size()
}

/// What a frame header says about the decompressed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentSize {
    Known(u64),
    /// Frame is well formed but was written without a content size.
    Unknown,
    /// Header is truncated or corrupted.
    Invalid,
}

pub fn frame_content_size(src: &[u8]) -> ContentSize {
    match zstd_safe::get_frame_content_size(src) {
        Ok(Some(size)) => ContentSize::Known(size),
        Ok(None) => ContentSize::Unknown,
        Err(_) => ContentSize::Invalid,
    }
}
