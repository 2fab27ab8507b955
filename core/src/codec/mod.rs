//! codec/mod.rs
//! Whole-buffer compression ("wrap") and decompression ("unwrap").
//!
//! Notes:
//! - Each instance owns one native context; it is `Send` but takes `&mut self`,
//!   so one instance cannot serve overlapping calls.
//! - Instances sharing an `Arc` of options are independent.

pub mod compressor;
pub mod decompressor;

pub use compressor::Compressor;
pub use decompressor::Decompressor;
