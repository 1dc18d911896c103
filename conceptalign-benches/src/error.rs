//! Benchmark setup error type.

use conceptalign_core::ConceptAlignError;

use crate::source::SyntheticError;

/// Errors that may occur while preparing a benchmark.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic link generation failed.
    #[error("synthetic link generation failed: {0}")]
    Synthetic(#[from] SyntheticError),
    /// Resolver configuration or a warm-up run failed.
    #[error("concept resolution failed: {0}")]
    Resolve(#[from] ConceptAlignError),
}
