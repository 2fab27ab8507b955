//! stream/core.rs
//! I/O-free state machines behind the sync and async stream adapters.
//!
//! Notes:
//! - Adapters alternate `step` (one or more synchronous native calls) with
//!   sink/source I/O, so a native step never spans a suspension point.
//! - Cursor invariants: `flushed <= pos <= buffer.len()` when compressing,
//!   `pos <= size <= buffer.len()` when decompressing; buffer length fixed.
//! - `flushed` lets a sink accept `pending()` piecemeal and resume after a
//!   suspended write.
//! - A native failure moves a machine to `Failed`; further use is `Poisoned`.

use std::sync::Arc;

use log::{debug, trace};
use zstd_safe::{CCtx, DCtx, InBuffer, OutBuffer, ResetDirective};
use zstd_sys::ZSTD_EndDirective;

use crate::native::error::{check, created};
use crate::options::{CompressionOptions, DecompressionOptions};
use crate::stream::config::StreamConfig;
use crate::stream::pool::{BufferPool, PooledBuffer};
use crate::telemetry::{StreamCounters, StreamSnapshot};
use crate::types::{Result, ZstdError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressState {
    Open,
    Writing,
    Flushed,
    Ended,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecompressState {
    Open,
    Reading,
    Exhausted,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Directive {
    Continue,
    Flush,
    End,
}

impl Directive {
    fn native(self) -> ZSTD_EndDirective {
        match self {
            Directive::Continue => ZSTD_EndDirective::ZSTD_e_continue,
            Directive::Flush => ZSTD_EndDirective::ZSTD_e_flush,
            Directive::End => ZSTD_EndDirective::ZSTD_e_end,
        }
    }
}

/// Why `CompressCore::step` returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    /// Internal buffer is full; write `pending()` out and call again.
    OutputFull,
    /// Directive satisfied.
    Drained,
}

fn rent(len: usize, config: &StreamConfig) -> PooledBuffer {
    if config.pooled() {
        BufferPool::shared().rent(len)
    } else {
        PooledBuffer::unpooled(len)
    }
}

pub(crate) struct CompressCore {
    cctx: CCtx<'static>,
    options: Arc<CompressionOptions>,
    buffer: PooledBuffer,
    pos: usize,
    flushed: usize,
    state: CompressState,
    counters: StreamCounters,
}

impl CompressCore {
    pub fn new(options: Arc<CompressionOptions>, config: &StreamConfig) -> Result<Self> {
        let mut cctx = created(CCtx::try_create(), "compression stream context")?;
        check(cctx.reset(ResetDirective::SessionOnly), 0)?;
        options.attach(&mut cctx)?;
        let buffer = rent(config.compress_buffer_size(), config);
        debug!(
            "compression stream opened: level={} buffer={} pooled={}",
            options.level(),
            buffer.len(),
            buffer.is_pooled()
        );
        Ok(Self {
            cctx,
            options,
            buffer,
            pos: 0,
            flushed: 0,
            state: CompressState::Open,
            counters: StreamCounters::default(),
        })
    }

    pub fn options(&self) -> &Arc<CompressionOptions> {
        &self.options
    }

    pub fn state(&self) -> CompressState {
        self.state
    }

    pub fn snapshot(&self) -> StreamSnapshot {
        StreamSnapshot::from_counters(&self.counters, true)
    }

    pub fn ensure_usable(&self) -> Result<()> {
        match self.state {
            CompressState::Failed => Err(ZstdError::Poisoned),
            CompressState::Ended => Err(ZstdError::codec("frame already ended")),
            _ => Ok(()),
        }
    }

    /// Still owes the sink an end of frame.
    pub fn needs_end(&self) -> bool {
        !matches!(self.state, CompressState::Ended | CompressState::Failed)
    }

    pub fn fail(&mut self) {
        self.state = CompressState::Failed;
    }

    /// Feed `src[*consumed..]` under `directive` until it is satisfied or the
    /// internal buffer fills up.
    pub fn step(&mut self, src: &[u8], consumed: &mut usize, directive: Directive) -> Result<Step> {
        self.ensure_usable()?;
        loop {
            if self.is_full() {
                return Ok(Step::OutputFull);
            }
            let before = self.pos;
            let (result, read, written) = {
                let mut input = InBuffer::around(&src[*consumed..]);
                let mut output = OutBuffer::around_pos(&mut self.buffer[..], self.pos);
                let result = self.cctx.compress_stream2(&mut output, &mut input, directive.native());
                (result, input.pos(), output.pos())
            };
            *consumed += read;
            self.pos = written;
            self.counters.add_step(read, written - before);

            let remaining = match check(result, self.buffer.len() - before) {
                Ok(remaining) => remaining,
                Err(e) => {
                    self.fail();
                    return Err(e);
                }
            };
            trace!("compress step {directive:?}: in={read} out={} remaining={remaining}", written - before);

            let satisfied = match directive {
                Directive::Continue => *consumed == src.len(),
                Directive::Flush | Directive::End => remaining == 0,
            };
            if satisfied {
                return Ok(Step::Drained);
            }
        }
    }

    /// Valid, not yet written region of the internal buffer.
    pub fn pending(&self) -> &[u8] {
        &self.buffer[self.flushed..self.pos]
    }

    /// No room left for the codec until `pending()` is written out.
    pub fn is_full(&self) -> bool {
        self.pos == self.buffer.len()
    }

    /// The sink accepted the first `n` bytes of `pending()`.
    pub fn output_written(&mut self, n: usize) {
        self.flushed = (self.flushed + n).min(self.pos);
        if self.flushed == self.pos {
            trace!("compress buffer flushed: {} bytes", self.pos);
            self.pos = 0;
            self.flushed = 0;
            self.counters.add_io();
        }
    }

    pub fn completed(&mut self, directive: Directive) {
        self.state = match directive {
            Directive::Continue => CompressState::Writing,
            Directive::Flush => {
                self.counters.add_flush();
                CompressState::Flushed
            }
            Directive::End => {
                debug!(
                    "compression frame ended: {} -> {} bytes",
                    self.counters.bytes_in, self.counters.bytes_out
                );
                CompressState::Ended
            }
        };
    }
}

pub(crate) struct DecompressCore {
    dctx: DCtx<'static>,
    options: Arc<DecompressionOptions>,
    buffer: PooledBuffer,
    pos: usize,
    size: usize,
    state: DecompressState,
    counters: StreamCounters,
}

impl DecompressCore {
    pub fn new(options: Arc<DecompressionOptions>, config: &StreamConfig) -> Result<Self> {
        let mut dctx = created(DCtx::try_create(), "decompression stream context")?;
        check(dctx.reset(ResetDirective::SessionOnly), 0)?;
        options.attach(&mut dctx)?;
        let buffer = rent(config.decompress_buffer_size(), config);
        debug!(
            "decompression stream opened: buffer={} pooled={}",
            buffer.len(),
            buffer.is_pooled()
        );
        Ok(Self {
            dctx,
            options,
            buffer,
            // Fully consumed, so the first read refills.
            pos: 0,
            size: 0,
            state: DecompressState::Open,
            counters: StreamCounters::default(),
        })
    }

    pub fn options(&self) -> &Arc<DecompressionOptions> {
        &self.options
    }

    pub fn state(&self) -> DecompressState {
        self.state
    }

    pub fn snapshot(&self) -> StreamSnapshot {
        StreamSnapshot::from_counters(&self.counters, false)
    }

    pub fn ensure_usable(&self) -> Result<()> {
        match self.state {
            DecompressState::Failed => Err(ZstdError::Poisoned),
            _ => Ok(()),
        }
    }

    pub fn needs_input(&self) -> bool {
        self.pos == self.size
    }

    /// Whole internal buffer, to be filled by the source.
    pub fn input_buffer(&mut self) -> &mut [u8] {
        &mut self.buffer[..]
    }

    pub fn refilled(&mut self, n: usize) {
        self.pos = 0;
        self.size = n.min(self.buffer.len());
        self.counters.add_io();
        trace!("decompress buffer refilled: {} bytes", self.size);
    }

    /// One native step from the buffered input into `out[*produced..]`.
    pub fn step(&mut self, out: &mut [u8], produced: &mut usize) -> Result<()> {
        self.ensure_usable()?;
        let available = out.len() - *produced;
        let (result, read, written) = {
            let mut input = InBuffer::around(&self.buffer[self.pos..self.size]);
            let mut output = OutBuffer::around(&mut out[*produced..]);
            let result = self.dctx.decompress_stream(&mut output, &mut input);
            (result, input.pos(), output.pos())
        };
        self.pos += read;
        *produced += written;
        self.counters.add_step(read, written);

        if let Err(e) = check(result, available) {
            self.state = DecompressState::Failed;
            return Err(e);
        }
        self.state = DecompressState::Reading;
        Ok(())
    }

    /// Source hit end of input: let the codec release anything it still holds.
    /// Returns `true` once nothing more comes out.
    pub fn drain_at_eof(&mut self, out: &mut [u8], produced: &mut usize) -> Result<bool> {
        let before = *produced;
        self.step(out, produced)?;
        if *produced == before {
            self.state = DecompressState::Exhausted;
            return Ok(true);
        }
        Ok(false)
    }
}
