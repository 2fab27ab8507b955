//! types.rs
//! Unified error taxonomy for every codec, stream and dictionary operation.
//!
//! Notes:
//! - `InvalidArgument` is always detected locally, before any native call.
//! - `InsufficientCapacity` is kept apart from generic codec failures so a
//!   caller can grow its buffer and retry. The retry is never automatic.
//! - `Codec` carries the native error code when the native layer reported it.

use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ZstdError>;

#[derive(Debug, Error)]
pub enum ZstdError {
    /// Caller-supplied parameter rejected before reaching the native codec.
    #[error("invalid argument `{name}`: {message}")]
    InvalidArgument { name: &'static str, message: String },

    /// Destination buffer cannot hold the produced bytes.
    /// `code` is set only when the native codec reported it; local prechecks leave it `None`.
    #[error(
        "destination buffer too small: {available} bytes available{}",
        .required.map(|r| format!(", {r} required")).unwrap_or_default()
    )]
    InsufficientCapacity { available: usize, required: Option<u64>, code: Option<u32> },

    /// Any other failure of the native codec, or data found inconsistent locally.
    #[error(
        "zstd error{}: {message}",
        .code.map(|c| format!(" {c}")).unwrap_or_default()
    )]
    Codec { code: Option<u32>, message: String },

    /// Underlying sink or source failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Stream was used again after a fatal codec failure.
    #[error("stream is unusable after a previous codec failure")]
    Poisoned,
}

impl ZstdError {
    pub(crate) fn argument(name: &'static str, message: impl Into<String>) -> Self {
        ZstdError::InvalidArgument { name, message: message.into() }
    }

    /// Capacity failure found before any native call.
    pub(crate) fn too_small(available: usize, required: u64) -> Self {
        ZstdError::InsufficientCapacity { available, required: Some(required), code: None }
    }

    pub(crate) fn codec(message: impl Into<String>) -> Self {
        ZstdError::Codec { code: None, message: message.into() }
    }

    pub fn is_argument(&self) -> bool {
        matches!(self, ZstdError::InvalidArgument { .. })
    }

    pub fn is_insufficient_capacity(&self) -> bool {
        matches!(self, ZstdError::InsufficientCapacity { .. })
    }

    pub fn is_codec(&self) -> bool {
        matches!(self, ZstdError::Codec { .. })
    }

    /// Native `ZSTD_ErrorCode` value, when the failure came from the codec.
    pub fn native_code(&self) -> Option<u32> {
        match self {
            ZstdError::Codec { code, .. } | ZstdError::InsufficientCapacity { code, .. } => *code,
            _ => None,
        }
    }
}

impl From<ZstdError> for io::Error {
    fn from(e: ZstdError) -> Self {
        match e {
            ZstdError::Io(inner) => inner,
            ZstdError::InvalidArgument { .. } => io::Error::new(io::ErrorKind::InvalidInput, e),
            ZstdError::InsufficientCapacity { .. } => io::Error::new(io::ErrorKind::WriteZero, e),
            ZstdError::Codec { .. } => io::Error::new(io::ErrorKind::InvalidData, e),
            ZstdError::Poisoned => io::Error::new(io::ErrorKind::Other, e),
        }
    }
}
