//! codec/decompressor.rs
//! One-shot decompression sized from the frame header.
//!
//! Notes:
//! - `unwrap` trusts the header only to size the allocation; a frame that
//!   decodes to any other length is reported as corrupt.
//! - `unwrap_into` prechecks capacity when the header declares a size, and
//!   still relies on the native error path as a backstop.

use std::sync::Arc;

use log::{debug, trace};
use zstd_safe::DCtx;

use crate::constants::MAX_BUFFER_SIZE;
use crate::native::error::{check, created};
use crate::native::params::{frame_content_size, ContentSize};
use crate::native::segment::BufferSegmentMut;
use crate::options::DecompressionOptions;
use crate::types::{Result, ZstdError};

pub struct Decompressor {
    dctx: DCtx<'static>,
    options: Arc<DecompressionOptions>,
}

impl Decompressor {
    pub fn new() -> Result<Self> {
        Self::with_options(Arc::new(DecompressionOptions::default()))
    }

    pub fn with_options(options: Arc<DecompressionOptions>) -> Result<Self> {
        let mut dctx = created(DCtx::try_create(), "decompression context")?;
        options.apply_to(&mut dctx)?;
        debug!("decompressor created");
        Ok(Self { dctx, options })
    }

    pub fn options(&self) -> &Arc<DecompressionOptions> {
        &self.options
    }

    /// Content size declared in the frame header.
    ///
    /// # Errors
    /// `Codec` when the frame omits the size or the header is malformed.
    pub fn decompressed_size(src: &[u8]) -> Result<u64> {
        match frame_content_size(src) {
            ContentSize::Known(size) => Ok(size),
            ContentSize::Unknown => Err(ZstdError::codec(
                "frame does not declare its content size; decompress into a caller buffer or a stream",
            )),
            ContentSize::Invalid => Err(ZstdError::codec("malformed frame header")),
        }
    }

    pub fn unwrap(&mut self, src: &[u8]) -> Result<Vec<u8>> {
        self.unwrap_with_limit(src, u64::MAX)
    }

    /// Decompress a whole frame, refusing to allocate more than `max` bytes.
    pub fn unwrap_with_limit(&mut self, src: &[u8], max: u64) -> Result<Vec<u8>> {
        if src.is_empty() {
            return Ok(Vec::new());
        }
        let expected = Self::decompressed_size(src)?;
        if expected > max {
            return Err(ZstdError::too_small(usize::try_from(max).unwrap_or(usize::MAX), expected));
        }
        let expected = match usize::try_from(expected) {
            Ok(n) if n <= MAX_BUFFER_SIZE => n,
            _ => {
                return Err(ZstdError::argument(
                    "src",
                    format!("declared content size {expected} exceeds the largest buffer"),
                ))
            }
        };

        let mut dst = vec![0u8; expected];
        let produced = match self.unwrap_into(src, &mut dst, 0, false) {
            Err(ZstdError::InsufficientCapacity { .. }) => {
                return Err(ZstdError::codec("invalid decompressed size"))
            }
            other => other?,
        };
        if produced != expected {
            return Err(ZstdError::codec(format!(
                "frame declared {expected} bytes but decoded to {produced}"
            )));
        }
        Ok(dst)
    }

    /// Decompress into `dst[offset..]`, returning the bytes written.
    ///
    /// With `precheck`, a declared content size larger than the free space
    /// fails fast with `InsufficientCapacity` before the native call.
    pub fn unwrap_into(
        &mut self,
        src: &[u8],
        dst: &mut [u8],
        offset: usize,
        precheck: bool,
    ) -> Result<usize> {
        let mut target = BufferSegmentMut::acquire(dst, offset, None)?;
        if src.is_empty() {
            return Ok(0);
        }
        let capacity = target.capacity();
        if precheck {
            if let ContentSize::Known(required) = frame_content_size(src) {
                if required > capacity as u64 {
                    return Err(ZstdError::too_small(capacity, required));
                }
            }
        }
        let written = check(
            self.options.decompress(&mut self.dctx, &mut *target, src),
            capacity,
        )?;
        trace!("unwrap_into: {} -> {written} bytes at offset {offset}", src.len());
        Ok(written)
    }
}
