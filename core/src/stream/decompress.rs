//! stream/decompress.rs
//! Pull-style decompression over a byte source, blocking and async flavours.
//!
//! Notes:
//! - Reads never pull more than one internal buffer from the source ahead of
//!   what the caller asked for.
//! - A blocking short read (including 0) is the end of the source, not an error.
//!   An async read may also come back short when the source has nothing ready
//!   but output was already produced; 0 still means end of source.
//! - Nothing needs finalising on drop; unread codec state is discarded.

use std::io::{self, Read};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::future::poll_fn;
use futures::io::AsyncRead;

use crate::options::DecompressionOptions;
use crate::stream::config::StreamConfig;
use crate::stream::core::{DecompressCore, DecompressState};
use crate::telemetry::StreamSnapshot;
use crate::types::Result;

pub struct DecompressionStream<R: Read> {
    core: DecompressCore,
    source: R,
}

impl<R: Read> DecompressionStream<R> {
    pub fn new(source: R) -> Result<Self> {
        Self::with_options(source, Arc::new(DecompressionOptions::default()))
    }

    pub fn with_options(source: R, options: Arc<DecompressionOptions>) -> Result<Self> {
        Self::with_config(source, options, StreamConfig::default())
    }

    pub fn with_config(source: R, options: Arc<DecompressionOptions>, config: StreamConfig) -> Result<Self> {
        Ok(Self { core: DecompressCore::new(options, &config)?, source })
    }

    pub fn state(&self) -> DecompressState {
        self.core.state()
    }

    pub fn stats(&self) -> StreamSnapshot {
        self.core.snapshot()
    }

    pub fn options(&self) -> &Arc<DecompressionOptions> {
        self.core.options()
    }

    pub fn get_ref(&self) -> &R {
        &self.source
    }

    pub fn into_inner(self) -> R {
        self.source
    }

    /// Fill as much of `out` as the source allows; returns the bytes produced.
    pub fn read_into(&mut self, out: &mut [u8]) -> Result<usize> {
        self.core.ensure_usable()?;
        let mut produced = 0;
        while produced < out.len() {
            if self.core.needs_input() {
                let n = self.source.read(self.core.input_buffer())?;
                if n == 0 {
                    if self.core.drain_at_eof(out, &mut produced)? {
                        break;
                    }
                    continue;
                }
                self.core.refilled(n);
            }
            self.core.step(out, &mut produced)?;
        }
        Ok(produced)
    }
}

impl<R: Read> Read for DecompressionStream<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.read_into(buf)?)
    }
}

pub struct AsyncDecompressionStream<R: AsyncRead + Unpin> {
    core: DecompressCore,
    source: R,
}

impl<R: AsyncRead + Unpin> AsyncDecompressionStream<R> {
    pub fn new(source: R) -> Result<Self> {
        Self::with_options(source, Arc::new(DecompressionOptions::default()))
    }

    pub fn with_options(source: R, options: Arc<DecompressionOptions>) -> Result<Self> {
        Self::with_config(source, options, StreamConfig::default())
    }

    pub fn with_config(source: R, options: Arc<DecompressionOptions>, config: StreamConfig) -> Result<Self> {
        Ok(Self { core: DecompressCore::new(options, &config)?, source })
    }

    pub fn state(&self) -> DecompressState {
        self.core.state()
    }

    pub fn stats(&self) -> StreamSnapshot {
        self.core.snapshot()
    }

    pub fn get_ref(&self) -> &R {
        &self.source
    }

    pub fn into_inner(self) -> R {
        self.source
    }

    pub fn options(&self) -> &Arc<DecompressionOptions> {
        self.core.options()
    }

    /// Suspends only while the internal input buffer is refilled.
    pub async fn read(&mut self, out: &mut [u8]) -> Result<usize> {
        poll_fn(|cx| self.poll_read_inner(cx, &mut *out)).await
    }

    /// Never holds produced bytes across `Pending`: output made before the
    /// source stalls is returned at once.
    fn poll_read_inner(&mut self, cx: &mut Context<'_>, out: &mut [u8]) -> Poll<Result<usize>> {
        self.core.ensure_usable()?;
        let mut produced = 0;
        while produced < out.len() {
            if self.core.needs_input() {
                let n = match Pin::new(&mut self.source).poll_read(cx, self.core.input_buffer()) {
                    Poll::Ready(n) => n?,
                    Poll::Pending if produced > 0 => break,
                    Poll::Pending => return Poll::Pending,
                };
                if n == 0 {
                    if self.core.drain_at_eof(out, &mut produced)? {
                        break;
                    }
                    continue;
                }
                self.core.refilled(n);
            }
            self.core.step(out, &mut produced)?;
        }
        Poll::Ready(Ok(produced))
    }

    /// Read until the source is exhausted.
    pub async fn read_to_end(&mut self, out: &mut Vec<u8>) -> Result<usize> {
        let start = out.len();
        let mut chunk = vec![0u8; 8 * 1024];
        loop {
            let n = self.read(&mut chunk).await?;
            if n == 0 {
                return Ok(out.len() - start);
            }
            out.extend_from_slice(&chunk[..n]);
        }
    }
}

impl<R: AsyncRead + Unpin> AsyncRead for AsyncDecompressionStream<R> {
    fn poll_read(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &mut [u8]) -> Poll<io::Result<usize>> {
        self.get_mut().poll_read_inner(cx, buf).map_err(io::Error::from)
    }
}
