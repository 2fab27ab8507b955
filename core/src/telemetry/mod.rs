//! telemetry/mod.rs
//! Per-stream counters and serialisable snapshots.

pub mod counters;
pub mod snapshot;

pub use counters::StreamCounters;
pub use snapshot::StreamSnapshot;
