//! native/segment.rs
//! Validated windows over caller buffers.
//!
//! Notes:
//! - A segment borrows its buffer, so the bytes stay put for as long as the
//!   segment lives and are released when it is dropped, on every exit path.
//! - Bounds are checked with `ZstdError::InvalidArgument` instead of a panic.
//! - `offset == buffer.len()` is accepted and yields an empty window.

use std::ops::{Deref, DerefMut};

use crate::types::{Result, ZstdError};

fn window(buffer_len: usize, offset: usize, len: Option<usize>) -> Result<usize> {
    if offset > buffer_len {
        return Err(ZstdError::argument(
            "offset",
            format!("offset {offset} exceeds buffer length {buffer_len}"),
        ));
    }
    let available = buffer_len - offset;
    match len {
        None => Ok(available),
        Some(len) if len <= available => Ok(len),
        Some(len) => Err(ZstdError::argument(
            "len",
            format!("window of {len} bytes at offset {offset} exceeds buffer length {buffer_len}"),
        )),
    }
}

/// Read-only window handed to the codec as a source.
#[derive(Debug, Clone, Copy)]
pub struct BufferSegment<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> BufferSegment<'a> {
    /// Window of `len` bytes starting at `offset`; `None` runs to the end.
    pub fn acquire(buffer: &'a [u8], offset: usize, len: Option<usize>) -> Result<Self> {
        let len = window(buffer.len(), offset, len)?;
        Ok(Self { bytes: &buffer[offset..offset + len], offset })
    }

    pub fn whole(buffer: &'a [u8]) -> Self {
        Self { bytes: buffer, offset: 0 }
    }

    pub fn as_slice(&self) -> &'a [u8] {
        self.bytes
    }

    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl Deref for BufferSegment<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.bytes
    }
}

/// Writable window handed to the codec as a destination.
#[derive(Debug)]
pub struct BufferSegmentMut<'a> {
    bytes: &'a mut [u8],
    offset: usize,
}

impl<'a> BufferSegmentMut<'a> {
    pub fn acquire(buffer: &'a mut [u8], offset: usize, len: Option<usize>) -> Result<Self> {
        let len = window(buffer.len(), offset, len)?;
        Ok(Self { bytes: &mut buffer[offset..offset + len], offset })
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Capacity the codec may write into.
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }
}

impl Deref for BufferSegmentMut<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.bytes
    }
}

impl DerefMut for BufferSegmentMut<'_> {
    fn deref_mut(&mut self) -> &mut [u8] {
        self.bytes
    }
}
