//! dict.rs
//! Dictionary training pass-through.
//!
//! Notes:
//! - Samples are concatenated into one flat buffer with a parallel length
//!   table, which is what the native trainer expects.
//! - Every trainer failure is a `Codec` error, including a capacity too small
//!   for any dictionary.

use log::debug;

use crate::native::error::codec_failure;
use crate::types::{Result, ZstdError};

/// Train a dictionary of at most `capacity` bytes from `samples`.
///
/// `DEFAULT_DICT_CAPACITY` is a reasonable capacity when in doubt. The native
/// trainer wants many small, representative samples; a handful of samples
/// usually fails with a `Codec` error.
pub fn train_dictionary<S: AsRef<[u8]>>(samples: &[S], capacity: usize) -> Result<Vec<u8>> {
    if capacity == 0 {
        return Err(ZstdError::argument("capacity", "dictionary capacity must be positive"));
    }
    if samples.is_empty() {
        return Err(ZstdError::argument("samples", "at least one sample is required"));
    }

    let total: usize = samples.iter().map(|s| s.as_ref().len()).sum();
    let mut flat = Vec::with_capacity(total);
    let mut sizes = Vec::with_capacity(samples.len());
    for sample in samples {
        let sample = sample.as_ref();
        flat.extend_from_slice(sample);
        sizes.push(sample.len());
    }

    let mut dictionary = vec![0u8; capacity];
    let trained = zstd_safe::train_from_buffer(&mut dictionary[..], &flat, &sizes)
        .map_err(codec_failure)?;
    dictionary.truncate(trained);
    debug!(
        "trained dictionary: {} samples, {total} bytes -> {trained} bytes",
        samples.len()
    );
    Ok(dictionary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_capacity_and_no_samples() {
        assert!(train_dictionary(&[b"abc"], 0).unwrap_err().is_argument());
        let none: [&[u8]; 0] = [];
        assert!(train_dictionary(&none, 1024).unwrap_err().is_argument());
    }

    #[test]
    fn too_few_samples_is_codec_error() {
        let err = train_dictionary(&[b"only one tiny sample"], 4096).unwrap_err();
        assert!(err.is_codec(), "{err:?}");
    }
}
