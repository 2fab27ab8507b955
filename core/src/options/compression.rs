//! options/compression.rs
//! Compression level, dictionary and advanced parameters.
//!
//! Notes:
//! - The native entry point (plain level, prepared dictionary, or the generic
//!   parameterised call) is resolved once at construction into `CompressEntry`.
//! - When advanced parameters are present they win over the dictionary-bound
//!   entry point; the dictionary is then referenced on the context instead.

use std::collections::BTreeMap;
use std::fmt;

use log::debug;
use zstd_safe::{CCtx, CDict, CParameter, SafeResult, WriteBuf};

use crate::constants::DEFAULT_COMPRESSION_LEVEL;
use crate::native::error::{check, created};
use crate::native::params;
use crate::options::params::CompressionParameter;
use crate::types::{Result, ZstdError};

/// Which native compress call a configuration uses.
enum CompressEntry {
    PlainLevel,
    WithDictionary(CDict<'static>),
    WithAdvancedParams { dictionary: Option<CDict<'static>> },
}

pub struct CompressionOptions {
    level: i32,
    dictionary: Option<Vec<u8>>,
    advanced: BTreeMap<CompressionParameter, i32>,
    /// Native values, validated and ready for `set_parameter`.
    prepared: Vec<CParameter>,
    entry: CompressEntry,
}

impl CompressionOptions {
    /// Validate everything and build the native dictionary, if any.
    ///
    /// # Errors
    /// - `InvalidArgument` for a level or advanced value outside native bounds.
    /// - `Codec` if the native dictionary cannot be built.
    pub fn new(
        dictionary: Option<&[u8]>,
        level: i32,
        advanced: Option<BTreeMap<CompressionParameter, i32>>,
    ) -> Result<Self> {
        let (min, max) = (Self::min_level(), Self::max_level());
        if level < min || level > max {
            return Err(ZstdError::argument(
                "level",
                format!("level {level} is outside [{min}, {max}]"),
            ));
        }

        let advanced = advanced.unwrap_or_default();
        let prepared = advanced
            .iter()
            .map(|(key, value)| key.validate(*value))
            .collect::<Result<Vec<_>>>()?;

        let dictionary = dictionary.filter(|d| !d.is_empty()).map(<[u8]>::to_vec);
        let cdict = match &dictionary {
            Some(bytes) => Some(created(
                CDict::try_create(bytes, level),
                "compression dictionary",
            )?),
            None => None,
        };

        let entry = match (advanced.is_empty(), cdict) {
            (false, dictionary) => CompressEntry::WithAdvancedParams { dictionary },
            (true, Some(cdict)) => CompressEntry::WithDictionary(cdict),
            (true, None) => CompressEntry::PlainLevel,
        };
        debug!(
            "compression options: level={level} dictionary={} advanced={}",
            dictionary.as_ref().map_or(0, Vec::len),
            advanced.len()
        );

        Ok(Self { level, dictionary, advanced, prepared, entry })
    }

    pub fn with_level(level: i32) -> Result<Self> {
        Self::new(None, level, None)
    }

    pub fn with_dictionary(dictionary: &[u8], level: i32) -> Result<Self> {
        Self::new(Some(dictionary), level, None)
    }

    pub fn min_level() -> i32 {
        params::min_level()
    }

    pub fn max_level() -> i32 {
        params::max_level()
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    pub fn dictionary(&self) -> Option<&[u8]> {
        self.dictionary.as_deref()
    }

    pub fn advanced_params(&self) -> &BTreeMap<CompressionParameter, i32> {
        &self.advanced
    }

    pub(crate) fn cdict(&self) -> Option<&CDict<'static>> {
        match &self.entry {
            CompressEntry::PlainLevel => None,
            CompressEntry::WithDictionary(cdict) => Some(cdict),
            CompressEntry::WithAdvancedParams { dictionary } => dictionary.as_ref(),
        }
    }

    /// Set the level (unless overridden) and every advanced parameter on `cctx`.
    pub fn apply_to(&self, cctx: &mut CCtx<'_>) -> Result<()> {
        if !self.advanced.contains_key(&CompressionParameter::CompressionLevel) {
            check(cctx.set_parameter(CParameter::CompressionLevel(self.level)), 0)?;
        }
        for param in &self.prepared {
            check(cctx.set_parameter(param.clone()), 0)?;
        }
        Ok(())
    }

    /// Make a session context ready for streaming: parameters plus dictionary.
    pub(crate) fn attach(&self, cctx: &mut CCtx<'static>) -> Result<()> {
        self.apply_to(cctx)?;
        if let Some(cdict) = self.cdict() {
            check(cctx.ref_cdict(cdict), 0)?;
        }
        Ok(())
    }

    /// One-shot contexts only need preparing for the parameterised entry point.
    pub(crate) fn prepare_one_shot(&self, cctx: &mut CCtx<'static>) -> Result<()> {
        match self.entry {
            CompressEntry::WithAdvancedParams { .. } => self.attach(cctx),
            _ => Ok(()),
        }
    }

    /// Single dispatch point for one-shot compression.
    pub(crate) fn compress<C: WriteBuf + ?Sized>(
        &self,
        cctx: &mut CCtx<'static>,
        dst: &mut C,
        src: &[u8],
    ) -> SafeResult {
        match &self.entry {
            CompressEntry::PlainLevel => cctx.compress(dst, src, self.level),
            CompressEntry::WithDictionary(cdict) => cctx.compress_using_cdict(dst, src, cdict),
            CompressEntry::WithAdvancedParams { .. } => cctx.compress2(dst, src),
        }
    }

    #[cfg(test)]
    fn entry_name(&self) -> &'static str {
        match self.entry {
            CompressEntry::PlainLevel => "plain",
            CompressEntry::WithDictionary(_) => "dictionary",
            CompressEntry::WithAdvancedParams { .. } => "advanced",
        }
    }
}

impl Default for CompressionOptions {
    fn default() -> Self {
        Self {
            level: DEFAULT_COMPRESSION_LEVEL,
            dictionary: None,
            advanced: BTreeMap::new(),
            prepared: Vec::new(),
            entry: CompressEntry::PlainLevel,
        }
    }
}

impl fmt::Debug for CompressionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompressionOptions")
            .field("level", &self.level)
            .field("dictionary_len", &self.dictionary.as_ref().map(Vec::len))
            .field("advanced", &self.advanced)
            .finish()
    }
}
