//! options/decompression.rs
//! Dictionary and advanced parameters for decompression.
//!
//! Notes:
//! - The native decompression dictionary does not depend on a level.
//! - No implicit parameters are set; only the caller's map is applied.

use std::collections::BTreeMap;
use std::fmt;

use log::debug;
use zstd_safe::{DCtx, DDict, DParameter, SafeResult, WriteBuf};

use crate::native::error::{check, created};
use crate::options::params::DecompressionParameter;
use crate::types::Result;

enum DecompressEntry {
    Plain,
    WithDictionary(DDict<'static>),
}

pub struct DecompressionOptions {
    dictionary: Option<Vec<u8>>,
    advanced: BTreeMap<DecompressionParameter, i32>,
    prepared: Vec<DParameter>,
    entry: DecompressEntry,
}

impl DecompressionOptions {
    /// # Errors
    /// - `InvalidArgument` for an advanced value outside native bounds.
    /// - `Codec` if the native dictionary cannot be built.
    pub fn new(
        dictionary: Option<&[u8]>,
        advanced: Option<BTreeMap<DecompressionParameter, i32>>,
    ) -> Result<Self> {
        let advanced = advanced.unwrap_or_default();
        let prepared = advanced
            .iter()
            .map(|(key, value)| key.validate(*value))
            .collect::<Result<Vec<_>>>()?;

        let dictionary = dictionary.filter(|d| !d.is_empty()).map(<[u8]>::to_vec);
        let entry = match &dictionary {
            Some(bytes) => DecompressEntry::WithDictionary(created(
                DDict::try_create(bytes),
                "decompression dictionary",
            )?),
            None => DecompressEntry::Plain,
        };
        debug!(
            "decompression options: dictionary={} advanced={}",
            dictionary.as_ref().map_or(0, Vec::len),
            advanced.len()
        );

        Ok(Self { dictionary, advanced, prepared, entry })
    }

    pub fn with_dictionary(dictionary: &[u8]) -> Result<Self> {
        Self::new(Some(dictionary), None)
    }

    pub fn dictionary(&self) -> Option<&[u8]> {
        self.dictionary.as_deref()
    }

    pub fn advanced_params(&self) -> &BTreeMap<DecompressionParameter, i32> {
        &self.advanced
    }

    pub(crate) fn ddict(&self) -> Option<&DDict<'static>> {
        match &self.entry {
            DecompressEntry::Plain => None,
            DecompressEntry::WithDictionary(ddict) => Some(ddict),
        }
    }

    pub fn apply_to(&self, dctx: &mut DCtx<'_>) -> Result<()> {
        for param in &self.prepared {
            check(dctx.set_parameter(param.clone()), 0)?;
        }
        Ok(())
    }

    /// Parameters plus dictionary reference, for contexts that decode many frames.
    pub(crate) fn attach(&self, dctx: &mut DCtx<'static>) -> Result<()> {
        self.apply_to(dctx)?;
        if let Some(ddict) = self.ddict() {
            check(dctx.ref_ddict(ddict), 0)?;
        }
        Ok(())
    }

    pub(crate) fn decompress<C: WriteBuf + ?Sized>(
        &self,
        dctx: &mut DCtx<'static>,
        dst: &mut C,
        src: &[u8],
    ) -> SafeResult {
        match &self.entry {
            DecompressEntry::Plain => dctx.decompress(dst, src),
            DecompressEntry::WithDictionary(ddict) => dctx.decompress_using_ddict(dst, src, ddict),
        }
    }
}

impl Default for DecompressionOptions {
    fn default() -> Self {
        Self {
            dictionary: None,
            advanced: BTreeMap::new(),
            prepared: Vec::new(),
            entry: DecompressEntry::Plain,
        }
    }
}

impl fmt::Debug for DecompressionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecompressionOptions")
            .field("dictionary_len", &self.dictionary.as_ref().map(Vec::len))
            .field("advanced", &self.advanced)
            .finish()
    }
}
