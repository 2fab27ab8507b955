//! stream/pool.rs
//! Shared pool of internal stream buffers.
//!
//! Notes:
//! - Lock-free bounded queue; a full pool simply frees the returned buffer.
//! - `PooledBuffer` hands its vector back on drop, so error and panic paths
//!   return it too.
//! - Buffers above `MAX_POOLED_BUFFER` are never retained.

use std::ops::{Deref, DerefMut};
use std::sync::OnceLock;

use crossbeam::queue::ArrayQueue;
use log::trace;

use crate::constants::{MAX_POOLED_BUFFER, POOL_SLOTS};

pub struct BufferPool {
    idle: ArrayQueue<Vec<u8>>,
    max_retained: usize,
}

static SHARED: OnceLock<BufferPool> = OnceLock::new();

impl BufferPool {
    pub fn new(slots: usize, max_retained: usize) -> Self {
        Self {
            idle: ArrayQueue::new(slots.max(1)),
            max_retained,
        }
    }

    /// Process-wide pool used by streams.
    pub fn shared() -> &'static BufferPool {
        SHARED.get_or_init(|| BufferPool::new(POOL_SLOTS, MAX_POOLED_BUFFER))
    }

    /// Zeroed buffer of exactly `len` bytes, reused when an idle one is big enough.
    pub fn rent(&'static self, len: usize) -> PooledBuffer {
        let bytes = match self.idle.pop() {
            Some(mut reused) if reused.capacity() >= len => {
                reused.clear();
                reused.resize(len, 0);
                reused
            }
            _ => vec![0u8; len],
        };
        PooledBuffer { bytes, pool: Some(self) }
    }

    pub fn idle(&self) -> usize {
        self.idle.len()
    }

    fn give_back(&self, bytes: Vec<u8>) {
        if bytes.capacity() > self.max_retained {
            return;
        }
        if self.idle.push(bytes).is_err() {
            trace!("buffer pool full, freeing returned buffer");
        }
    }
}

/// Fixed-size byte buffer, optionally owned by a pool.
pub struct PooledBuffer {
    bytes: Vec<u8>,
    pool: Option<&'static BufferPool>,
}

impl PooledBuffer {
    pub fn unpooled(len: usize) -> Self {
        Self { bytes: vec![0u8; len], pool: None }
    }

    pub fn is_pooled(&self) -> bool {
        self.pool.is_some()
    }
}

impl Deref for PooledBuffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

impl DerefMut for PooledBuffer {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }
}

impl Drop for PooledBuffer {
    fn drop(&mut self) {
        if let Some(pool) = self.pool {
            pool.give_back(std::mem::take(&mut self.bytes));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaked(slots: usize, max: usize) -> &'static BufferPool {
        Box::leak(Box::new(BufferPool::new(slots, max)))
    }

    #[test]
    fn buffer_returns_on_drop_and_is_reused() {
        let pool = leaked(2, 1024);
        {
            let mut buf = pool.rent(64);
            buf[0] = 7;
            assert_eq!(pool.idle(), 0);
        }
        assert_eq!(pool.idle(), 1);
        let again = pool.rent(32);
        assert_eq!(again.len(), 32);
        assert!(again.iter().all(|&b| b == 0));
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn oversized_buffers_are_not_retained() {
        let pool = leaked(2, 16);
        drop(pool.rent(17));
        assert_eq!(pool.idle(), 0);
    }

    #[test]
    fn buffer_returns_on_panic() {
        let pool = leaked(2, 1024);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let _buf = pool.rent(8);
            panic!("boom");
        }));
        assert!(result.is_err());
        assert_eq!(pool.idle(), 1);
    }
}
