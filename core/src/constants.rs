//! constants.rs
//! Crate-wide defaults and hard limits.

/// Level used when the caller does not choose one.
pub const DEFAULT_COMPRESSION_LEVEL: i32 = 3;

/// Dictionary capacity (110 KiB) used when the caller does not choose one.
pub const DEFAULT_DICT_CAPACITY: usize = 112_640;

/// Largest single buffer this crate will allocate.
pub const MAX_BUFFER_SIZE: usize = isize::MAX as usize;

/// Idle buffers kept by the shared stream buffer pool.
pub const POOL_SLOTS: usize = 32;

/// Buffers larger than this are freed instead of pooled (4 MiB).
pub const MAX_POOLED_BUFFER: usize = 4 * 1024 * 1024;
