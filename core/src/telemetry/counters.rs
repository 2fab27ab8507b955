//! telemetry/counters.rs
//! Mutable counters updated while a stream runs.
//!
//! Summary: byte totals on both sides of the codec plus native step and
//! sink/source call counts. Turned into an immutable `StreamSnapshot` on demand.

use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

#[derive(Default, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamCounters {
    /// Bytes handed to the codec (plaintext when compressing).
    pub bytes_in: u64,
    /// Bytes the codec produced (frame bytes when compressing).
    pub bytes_out: u64,
    pub native_steps: u64,
    /// Sink writes or source reads.
    pub io_calls: u64,
    pub flushes: u64,
}

impl StreamCounters {
    /// Record one native step.
    pub fn add_step(&mut self, consumed: usize, produced: usize) {
        self.native_steps += 1;
        self.bytes_in += consumed as u64;
        self.bytes_out += produced as u64;
    }

    pub fn add_io(&mut self) {
        self.io_calls += 1;
    }

    pub fn add_flush(&mut self) {
        self.flushes += 1;
    }
}

impl AddAssign for StreamCounters {
    fn add_assign(&mut self, other: Self) {
        self.bytes_in += other.bytes_in;
        self.bytes_out += other.bytes_out;
        self.native_steps += other.native_steps;
        self.io_calls += other.io_calls;
        self.flushes += other.flushes;
    }
}

impl AddAssign<&StreamCounters> for StreamCounters {
    fn add_assign(&mut self, other: &StreamCounters) {
        *self += other.clone();
    }
}
