//! Benchmark parameter types.

use std::fmt;

/// Parameters for one resolution benchmark run.
#[derive(Clone, Debug)]
pub struct ResolveBenchParams {
    /// Number of generated concepts.
    pub concept_count: usize,
    /// Number of spurious links added on top of the clean clusters.
    pub noise_links: usize,
}

impl fmt::Display for ResolveBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "concepts={},noise={}", self.concept_count, self.noise_links)
    }
}
