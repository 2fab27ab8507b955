//! options/params.rs
//! Advanced parameter keys for compression and decompression contexts.
//!
//! Notes:
//! - Valid ranges are queried from the linked native library, never hardcoded.
//! - Boolean switches take 0 or 1; `Strategy` takes the native 1..=9 range.

use std::fmt;

use zstd_safe::{CParameter, DParameter};
use zstd_sys::{ZSTD_cParameter, ZSTD_dParameter, ZSTD_strategy};

use crate::native::params::{compression_bounds, decompression_bounds, ParamBounds};
use crate::types::{Result, ZstdError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CompressionParameter {
    CompressionLevel,
    WindowLog,
    HashLog,
    ChainLog,
    SearchLog,
    MinMatch,
    TargetLength,
    Strategy,
    EnableLongDistanceMatching,
    LdmHashLog,
    LdmMinMatch,
    LdmBucketSizeLog,
    LdmHashRateLog,
    ContentSizeFlag,
    ChecksumFlag,
    DictIdFlag,
}

impl CompressionParameter {
    pub const ALL: [CompressionParameter; 16] = [
        Self::CompressionLevel,
        Self::WindowLog,
        Self::HashLog,
        Self::ChainLog,
        Self::SearchLog,
        Self::MinMatch,
        Self::TargetLength,
        Self::Strategy,
        Self::EnableLongDistanceMatching,
        Self::LdmHashLog,
        Self::LdmMinMatch,
        Self::LdmBucketSizeLog,
        Self::LdmHashRateLog,
        Self::ContentSizeFlag,
        Self::ChecksumFlag,
        Self::DictIdFlag,
    ];

    fn native_key(self) -> ZSTD_cParameter {
        use ZSTD_cParameter::*;
        match self {
            Self::CompressionLevel => ZSTD_c_compressionLevel,
            Self::WindowLog => ZSTD_c_windowLog,
            Self::HashLog => ZSTD_c_hashLog,
            Self::ChainLog => ZSTD_c_chainLog,
            Self::SearchLog => ZSTD_c_searchLog,
            Self::MinMatch => ZSTD_c_minMatch,
            Self::TargetLength => ZSTD_c_targetLength,
            Self::Strategy => ZSTD_c_strategy,
            Self::EnableLongDistanceMatching => ZSTD_c_enableLongDistanceMatching,
            Self::LdmHashLog => ZSTD_c_ldmHashLog,
            Self::LdmMinMatch => ZSTD_c_ldmMinMatch,
            Self::LdmBucketSizeLog => ZSTD_c_ldmBucketSizeLog,
            Self::LdmHashRateLog => ZSTD_c_ldmHashRateLog,
            Self::ContentSizeFlag => ZSTD_c_contentSizeFlag,
            Self::ChecksumFlag => ZSTD_c_checksumFlag,
            Self::DictIdFlag => ZSTD_c_dictIDFlag,
        }
    }

    fn is_switch(self) -> bool {
        matches!(
            self,
            Self::EnableLongDistanceMatching
                | Self::ContentSizeFlag
                | Self::ChecksumFlag
                | Self::DictIdFlag
        )
    }

    /// Range the linked native library accepts for this key.
    pub fn bounds(self) -> Result<ParamBounds> {
        compression_bounds(self.native_key())
    }

    /// Bounds-check `value` and build the typed native setter argument.
    pub(crate) fn validate(self, value: i32) -> Result<CParameter> {
        let bounds = self.bounds()?;
        if !bounds.contains(value) {
            return Err(out_of_bounds(self, value, bounds));
        }
        if self.is_switch() && value != 0 && value != 1 {
            return Err(ZstdError::argument(
                "advanced_params",
                format!("{self} is a switch and takes 0 or 1, got {value}"),
            ));
        }
        let unsigned = value as u32;
        let on = value == 1;
        let param = match self {
            Self::CompressionLevel => CParameter::CompressionLevel(value),
            Self::WindowLog => CParameter::WindowLog(unsigned),
            Self::HashLog => CParameter::HashLog(unsigned),
            Self::ChainLog => CParameter::ChainLog(unsigned),
            Self::SearchLog => CParameter::SearchLog(unsigned),
            Self::MinMatch => CParameter::MinMatch(unsigned),
            Self::TargetLength => CParameter::TargetLength(unsigned),
            Self::Strategy => CParameter::Strategy(strategy(value)?),
            Self::EnableLongDistanceMatching => CParameter::EnableLongDistanceMatching(on),
            Self::LdmHashLog => CParameter::LdmHashLog(unsigned),
            Self::LdmMinMatch => CParameter::LdmMinMatch(unsigned),
            Self::LdmBucketSizeLog => CParameter::LdmBucketSizeLog(unsigned),
            Self::LdmHashRateLog => CParameter::LdmHashRateLog(unsigned),
            Self::ContentSizeFlag => CParameter::ContentSizeFlag(on),
            Self::ChecksumFlag => CParameter::ChecksumFlag(on),
            Self::DictIdFlag => CParameter::DictIdFlag(on),
        };
        Ok(param)
    }
}

impl fmt::Display for CompressionParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CompressionLevel => "compression_level",
            Self::WindowLog => "window_log",
            Self::HashLog => "hash_log",
            Self::ChainLog => "chain_log",
            Self::SearchLog => "search_log",
            Self::MinMatch => "min_match",
            Self::TargetLength => "target_length",
            Self::Strategy => "strategy",
            Self::EnableLongDistanceMatching => "enable_long_distance_matching",
            Self::LdmHashLog => "ldm_hash_log",
            Self::LdmMinMatch => "ldm_min_match",
            Self::LdmBucketSizeLog => "ldm_bucket_size_log",
            Self::LdmHashRateLog => "ldm_hash_rate_log",
            Self::ContentSizeFlag => "content_size_flag",
            Self::ChecksumFlag => "checksum_flag",
            Self::DictIdFlag => "dict_id_flag",
        };
        f.write_str(name)
    }
}

fn strategy(value: i32) -> Result<ZSTD_strategy> {
    use ZSTD_strategy::*;
    Ok(match value {
        1 => ZSTD_fast,
        2 => ZSTD_dfast,
        3 => ZSTD_greedy,
        4 => ZSTD_lazy,
        5 => ZSTD_lazy2,
        6 => ZSTD_btlazy2,
        7 => ZSTD_btopt,
        8 => ZSTD_btultra,
        9 => ZSTD_btultra2,
        other => {
            return Err(ZstdError::argument(
                "advanced_params",
                format!("unknown strategy {other}"),
            ))
        }
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DecompressionParameter {
    /// Largest back-reference window (as a power of two) the decoder accepts.
    WindowLogMax,
}

impl DecompressionParameter {
    fn native_key(self) -> ZSTD_dParameter {
        match self {
            Self::WindowLogMax => ZSTD_dParameter::ZSTD_d_windowLogMax,
        }
    }

    pub fn bounds(self) -> Result<ParamBounds> {
        decompression_bounds(self.native_key())
    }

    pub(crate) fn validate(self, value: i32) -> Result<DParameter> {
        let bounds = self.bounds()?;
        if !bounds.contains(value) {
            return Err(out_of_bounds(self, value, bounds));
        }
        Ok(match self {
            Self::WindowLogMax => DParameter::WindowLogMax(value as u32),
        })
    }
}

impl fmt::Display for DecompressionParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WindowLogMax => f.write_str("window_log_max"),
        }
    }
}

fn out_of_bounds(key: impl fmt::Display, value: i32, bounds: ParamBounds) -> ZstdError {
    ZstdError::argument(
        "advanced_params",
        format!(
            "{key} = {value} is outside [{}, {}]",
            bounds.lower, bounds.upper
        ),
    )
}
