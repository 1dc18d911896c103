//! Benchmark support crate for conceptalign.
//!
//! Provides a seeded synthetic link store and parameter types used by the
//! Criterion resolution benchmarks.

pub mod error;
pub mod params;
pub mod source;
