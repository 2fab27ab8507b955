//! native/error.rs
//! Translation of native result codes into `ZstdError`.
//!
//! Notes:
//! - Classification uses the numeric `ZSTD_ErrorCode`, never the message text.
//! - `dstSize_tooSmall` becomes `InsufficientCapacity`; everything else is `Codec`.

use zstd_safe::{ErrorCode, SafeResult};

use crate::types::{Result, ZstdError};

/// `ZSTD_error_dstSize_tooSmall`.
pub const DST_SIZE_TOO_SMALL: u32 = zstd_sys::ZSTD_ErrorCode::ZSTD_error_dstSize_tooSmall as u32;

/// Recover the stable `ZSTD_ErrorCode` from a raw `size_t` error result.
#[inline]
pub fn error_code(code: ErrorCode) -> u32 {
    code.wrapping_neg() as u32
}

/// Map a raw native error to the crate taxonomy.
/// `available` is the destination capacity the failed call was given.
pub(crate) fn translate(code: ErrorCode, available: usize) -> ZstdError {
    let numeric = error_code(code);
    if numeric == DST_SIZE_TOO_SMALL {
        ZstdError::InsufficientCapacity { available, required: None, code: Some(numeric) }
    } else {
        codec_failure(code)
    }
}

/// Native error as `Codec`, whatever its code.
pub(crate) fn codec_failure(code: ErrorCode) -> ZstdError {
    ZstdError::Codec {
        code: Some(error_code(code)),
        message: zstd_safe::get_error_name(code).to_string(),
    }
}

#[inline]
pub(crate) fn check(result: SafeResult, available: usize) -> Result<usize> {
    result.map_err(|code| translate(code, available))
}

/// Native constructors return null on allocation failure.
pub(crate) fn created<T>(handle: Option<T>, what: &str) -> Result<T> {
    handle.ok_or_else(|| ZstdError::codec(format!("failed to create {what}")))
}
