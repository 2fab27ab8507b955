//! codec/compressor.rs
//! One-shot compression over a single native context.

use std::sync::Arc;

use log::{debug, trace};
use zstd_safe::CCtx;

use crate::native::error::{check, created};
use crate::native::params;
use crate::native::segment::BufferSegmentMut;
use crate::options::CompressionOptions;
use crate::types::{Result, ZstdError};

pub struct Compressor {
    cctx: CCtx<'static>,
    // Declared after the context: the context may reference its dictionary.
    options: Arc<CompressionOptions>,
}

impl Compressor {
    /// Compressor at the default level, without dictionary.
    pub fn new() -> Result<Self> {
        Self::with_options(Arc::new(CompressionOptions::default()))
    }

    pub fn with_options(options: Arc<CompressionOptions>) -> Result<Self> {
        let mut cctx = created(CCtx::try_create(), "compression context")?;
        options.prepare_one_shot(&mut cctx)?;
        debug!("compressor created (level {})", options.level());
        Ok(Self { cctx, options })
    }

    pub fn options(&self) -> &Arc<CompressionOptions> {
        &self.options
    }

    /// Worst-case compressed size for `len` input bytes.
    pub fn compress_bound(len: usize) -> usize {
        params::compress_bound(len)
    }

    /// Compress `src` into a freshly allocated, exactly sized vector.
    pub fn wrap(&mut self, src: &[u8]) -> Result<Vec<u8>> {
        if src.is_empty() {
            return Ok(Vec::new());
        }
        let bound = Self::compress_bound(src.len());
        if bound == 0 {
            return Err(ZstdError::argument(
                "src",
                format!("{} bytes exceed the largest compressible input", src.len()),
            ));
        }

        let mut dst = Vec::with_capacity(bound);
        check(self.options.compress(&mut self.cctx, &mut dst, src), bound)?;
        if dst.len() < dst.capacity() {
            dst.shrink_to_fit();
        }
        trace!("wrap: {} -> {} bytes", src.len(), dst.len());
        Ok(dst)
    }

    /// Compress `src` into `dst[offset..]`, returning the bytes written.
    ///
    /// # Errors
    /// - `InvalidArgument` if `offset > dst.len()`.
    /// - `InsufficientCapacity` if the frame does not fit.
    pub fn wrap_into(&mut self, src: &[u8], dst: &mut [u8], offset: usize) -> Result<usize> {
        let mut target = BufferSegmentMut::acquire(dst, offset, None)?;
        if src.is_empty() {
            return Ok(0);
        }
        let capacity = target.capacity();
        let written = check(self.options.compress(&mut self.cctx, &mut *target, src), capacity)?;
        trace!("wrap_into: {} -> {written} bytes at offset {offset}", src.len());
        Ok(written)
    }
}
