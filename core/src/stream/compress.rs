//! stream/compress.rs
//! Push-style compression over a byte sink, blocking and async flavours.
//!
//! Notes:
//! - Output is staged in a fixed internal buffer and only written to the sink
//!   when it fills, on `flush`, or at end of frame.
//! - A failed sink write poisons the stream: compressed bytes were lost.
//! - The blocking stream finalises the frame on drop if `finish` was not called.
//!   The async one cannot, so dropping it unfinished only logs a warning.
//! - `AsyncWrite::poll_write` only returns `Pending` before taking input, and a
//!   partly written buffer resumes where the sink stopped.
//! - The inherent async `write`/`flush` may consume input before they suspend.
//!   Dropping one of those futures early poisons the stream.

use std::io::{self, Write};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::future::poll_fn;
use futures::io::AsyncWrite;
use futures::ready;
use log::{debug, warn};

use crate::options::CompressionOptions;
use crate::stream::config::StreamConfig;
use crate::stream::core::{CompressCore, CompressState, Directive, Step};
use crate::telemetry::StreamSnapshot;
use crate::types::{Result, ZstdError};

pub struct CompressionStream<W: Write> {
    core: CompressCore,
    sink: Option<W>,
}

impl<W: Write> CompressionStream<W> {
    pub fn new(sink: W) -> Result<Self> {
        Self::with_options(sink, Arc::new(CompressionOptions::default()))
    }

    pub fn with_options(sink: W, options: Arc<CompressionOptions>) -> Result<Self> {
        Self::with_config(sink, options, StreamConfig::default())
    }

    pub fn with_config(sink: W, options: Arc<CompressionOptions>, config: StreamConfig) -> Result<Self> {
        Ok(Self { core: CompressCore::new(options, &config)?, sink: Some(sink) })
    }

    pub fn state(&self) -> CompressState {
        self.core.state()
    }

    pub fn stats(&self) -> StreamSnapshot {
        self.core.snapshot()
    }

    pub fn options(&self) -> &Arc<CompressionOptions> {
        self.core.options()
    }

    pub fn get_ref(&self) -> Option<&W> {
        self.sink.as_ref()
    }

    /// End the frame, flush it to the sink and hand the sink back.
    pub fn finish(mut self) -> Result<W> {
        self.run(&[], Directive::End)?;
        let mut sink = self.sink.take().ok_or(ZstdError::Poisoned)?;
        sink.flush()?;
        Ok(sink)
    }

    fn run(&mut self, src: &[u8], directive: Directive) -> Result<()> {
        let mut consumed = 0;
        while self.core.step(src, &mut consumed, directive)? == Step::OutputFull {
            self.write_pending()?;
        }
        if directive != Directive::Continue {
            self.write_pending()?;
        }
        self.core.completed(directive);
        Ok(())
    }

    fn write_pending(&mut self) -> Result<()> {
        let sink = self.sink.as_mut().ok_or(ZstdError::Poisoned)?;
        let pending = self.core.pending();
        let n = pending.len();
        if n == 0 {
            return Ok(());
        }
        if let Err(e) = sink.write_all(pending) {
            self.core.fail();
            return Err(e.into());
        }
        self.core.output_written(n);
        Ok(())
    }
}

impl<W: Write> Write for CompressionStream<W> {
    /// Consumes the whole of `buf`; zero-length writes do nothing.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        self.run(buf, Directive::Continue)?;
        Ok(buf.len())
    }

    /// Makes everything written so far decodable, then flushes the sink.
    fn flush(&mut self) -> io::Result<()> {
        self.run(&[], Directive::Flush)?;
        if let Some(sink) = self.sink.as_mut() {
            sink.flush()?;
        }
        Ok(())
    }
}

impl<W: Write> Drop for CompressionStream<W> {
    fn drop(&mut self) {
        if self.sink.is_none() || !self.core.needs_end() {
            return;
        }
        if let Err(e) = self.run(&[], Directive::End) {
            warn!("compression stream dropped; finalising the frame failed: {e}");
            return;
        }
        if let Some(Err(e)) = self.sink.as_mut().map(|sink| sink.flush()) {
            warn!("compression stream dropped; flushing the sink failed: {e}");
            return;
        }
        debug!("compression stream finalised on drop");
    }
}

pub struct AsyncCompressionStream<W: AsyncWrite + Unpin> {
    core: CompressCore,
    sink: Option<W>,
    /// An inherent async call started and has not returned yet.
    in_flight: bool,
    /// Directive whose native step is done; only buffered output remains.
    settled: Option<Directive>,
}

impl<W: AsyncWrite + Unpin> AsyncCompressionStream<W> {
    pub fn new(sink: W) -> Result<Self> {
        Self::with_options(sink, Arc::new(CompressionOptions::default()))
    }

    pub fn with_options(sink: W, options: Arc<CompressionOptions>) -> Result<Self> {
        Self::with_config(sink, options, StreamConfig::default())
    }

    pub fn with_config(sink: W, options: Arc<CompressionOptions>, config: StreamConfig) -> Result<Self> {
        Ok(Self {
            core: CompressCore::new(options, &config)?,
            sink: Some(sink),
            in_flight: false,
            settled: None,
        })
    }

    /// A call abandoned mid-way reports `Failed` right away.
    pub fn state(&self) -> CompressState {
        if self.in_flight {
            CompressState::Failed
        } else {
            self.core.state()
        }
    }

    pub fn stats(&self) -> StreamSnapshot {
        self.core.snapshot()
    }

    pub fn options(&self) -> &Arc<CompressionOptions> {
        self.core.options()
    }

    pub fn get_ref(&self) -> Option<&W> {
        self.sink.as_ref()
    }

    /// Compress all of `buf`. Suspends only while the internal buffer is written out.
    pub async fn write(&mut self, buf: &[u8]) -> Result<()> {
        if buf.is_empty() {
            return Ok(());
        }
        self.begin()?;
        let mut done = 0;
        let outcome = loop {
            if done == buf.len() {
                break Ok(());
            }
            let rest = &buf[done..];
            match poll_fn(|cx| self.poll_write_inner(cx, rest)).await {
                Ok(n) => done += n,
                Err(e) => break Err(e),
            }
        };
        self.in_flight = false;
        outcome
    }

    pub async fn flush(&mut self) -> Result<()> {
        self.begin()?;
        let outcome = poll_fn(|cx| self.poll_flush_inner(cx)).await;
        self.in_flight = false;
        outcome
    }

    /// End the frame. Must be awaited; dropping the stream cannot do this.
    pub async fn finish(mut self) -> Result<W> {
        self.begin()?;
        poll_fn(|cx| self.poll_end_inner(cx)).await?;
        self.sink.take().ok_or(ZstdError::Poisoned)
    }

    fn begin(&mut self) -> Result<()> {
        self.guard()?;
        self.in_flight = true;
        Ok(())
    }

    /// Refuse to continue after a call was dropped before completing.
    fn guard(&mut self) -> Result<()> {
        if self.in_flight {
            warn!("async compression call was cancelled mid-way; stream poisoned");
            self.in_flight = false;
            self.core.fail();
            return Err(ZstdError::Poisoned);
        }
        Ok(())
    }

    /// Write `pending()` out, resuming after any bytes the sink already took.
    fn poll_drain(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        if self.core.state() == CompressState::Failed {
            return Poll::Ready(Err(ZstdError::Poisoned));
        }
        let sink = match self.sink.as_mut() {
            Some(sink) => sink,
            None => return Poll::Ready(Err(ZstdError::Poisoned)),
        };
        loop {
            let pending = self.core.pending();
            if pending.is_empty() {
                return Poll::Ready(Ok(()));
            }
            match ready!(Pin::new(&mut *sink).poll_write(cx, pending)) {
                Ok(0) => {
                    self.core.fail();
                    return Poll::Ready(Err(io::Error::from(io::ErrorKind::WriteZero).into()));
                }
                Ok(n) => self.core.output_written(n),
                Err(e) => {
                    self.core.fail();
                    return Poll::Ready(Err(e.into()));
                }
            }
        }
    }

    /// Takes as much of `buf` as the codec accepts without waiting on the sink
    /// again; `Pending` only before any input is consumed.
    fn poll_write_inner(&mut self, cx: &mut Context<'_>, buf: &[u8]) -> Poll<Result<usize>> {
        self.core.ensure_usable()?;
        if buf.is_empty() {
            return Poll::Ready(Ok(0));
        }
        loop {
            if self.core.is_full() {
                ready!(self.poll_drain(cx))?;
            }
            let mut consumed = 0;
            let step = self.core.step(buf, &mut consumed, Directive::Continue)?;
            if step == Step::Drained || consumed > 0 {
                self.core.completed(Directive::Continue);
                self.settled = None;
                return Poll::Ready(Ok(consumed));
            }
        }
    }

    /// Run `directive` to completion and write out everything it produced.
    fn poll_frame(&mut self, cx: &mut Context<'_>, directive: Directive) -> Poll<Result<()>> {
        loop {
            ready!(self.poll_drain(cx))?;
            if self.settled == Some(directive) {
                return Poll::Ready(Ok(()));
            }
            let mut consumed = 0;
            if self.core.step(&[], &mut consumed, directive)? == Step::Drained {
                self.core.completed(directive);
                self.settled = Some(directive);
            }
        }
    }

    fn poll_flush_inner(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        ready!(self.poll_frame(cx, Directive::Flush))?;
        if let Some(sink) = self.sink.as_mut() {
            ready!(Pin::new(sink).poll_flush(cx))?;
        }
        self.settled = None;
        Poll::Ready(Ok(()))
    }

    fn poll_end_inner(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        ready!(self.poll_frame(cx, Directive::End))?;
        if let Some(sink) = self.sink.as_mut() {
            ready!(Pin::new(sink).poll_flush(cx))?;
        }
        Poll::Ready(Ok(()))
    }
}

impl<W: AsyncWrite + Unpin> AsyncWrite for AsyncCompressionStream<W> {
    fn poll_write(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &[u8]) -> Poll<io::Result<usize>> {
        let this = self.get_mut();
        this.guard()?;
        this.poll_write_inner(cx, buf).map_err(io::Error::from)
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        this.guard()?;
        this.poll_flush_inner(cx).map_err(io::Error::from)
    }

    /// Ends the frame, then closes the sink.
    fn poll_close(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        this.guard()?;
        ready!(this.poll_end_inner(cx))?;
        match this.sink.as_mut() {
            Some(sink) => Pin::new(sink).poll_close(cx),
            None => Poll::Ready(Ok(())),
        }
    }
}

impl<W: AsyncWrite + Unpin> Drop for AsyncCompressionStream<W> {
    fn drop(&mut self) {
        if self.sink.is_some() && self.core.needs_end() {
            warn!("async compression stream dropped without finish(); frame is incomplete");
        }
    }
}
