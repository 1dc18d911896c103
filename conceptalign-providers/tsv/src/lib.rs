//! Tab-separated collaborators for concept resolution.
//!
//! [`TsvEdgeSource`] ingests inter-language link records into an in-memory
//! adjacency store and [`TsvTitleLookup`] resolves article titles for
//! diagnostic dumps.

mod errors;
mod ingest;
mod source;
mod titles;

pub use errors::TsvProviderError;
pub use source::{IngestStats, TsvEdgeSource};
pub use titles::TsvTitleLookup;

#[cfg(test)]
mod tests;
