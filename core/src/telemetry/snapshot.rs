//! telemetry/snapshot.rs
//! Immutable view of a stream's counters with derived ratio.

use serde::{Deserialize, Serialize};

use crate::telemetry::counters::StreamCounters;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamSnapshot {
    pub counters: StreamCounters,
    /// Compressed bytes over uncompressed bytes; 0.0 before any data.
    pub ratio: f64,
}

impl StreamSnapshot {
    /// `compressing` tells which side of the counters holds the plaintext.
    pub fn from_counters(counters: &StreamCounters, compressing: bool) -> Self {
        let (plain, packed) = if compressing {
            (counters.bytes_in, counters.bytes_out)
        } else {
            (counters.bytes_out, counters.bytes_in)
        };
        let ratio = if plain > 0 { packed as f64 / plain as f64 } else { 0.0 };
        Self { counters: counters.clone(), ratio }
    }

    pub fn plaintext_bytes(&self, compressing: bool) -> u64 {
        if compressing {
            self.counters.bytes_in
        } else {
            self.counters.bytes_out
        }
    }
}
