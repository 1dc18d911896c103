//! Output abstraction receiving finished concept clusters.

use crate::{concept::ConceptCluster, error::SinkError};

/// Receives every finished [`ConceptCluster`] exactly once, in traversal order.
///
/// The engine only publishes after the traversal completes, so store
/// failures and cancellation never reach the sink. If `emit` itself fails,
/// the clusters accepted before the failure stay in the sink; that prefix
/// belongs to a failed run and callers must discard it. Implementations may
/// batch or persist asynchronously provided each cluster is stored exactly
/// once.
pub trait ConceptSink {
    /// Accepts one finished cluster.
    ///
    /// # Errors
    /// Returns [`SinkError`] when the cluster cannot be stored.
    fn emit(&mut self, cluster: ConceptCluster) -> Result<(), SinkError>;
}

impl ConceptSink for Vec<ConceptCluster> {
    fn emit(&mut self, cluster: ConceptCluster) -> Result<(), SinkError> {
        self.push(cluster);
        Ok(())
    }
}

impl<K: ConceptSink + ?Sized> ConceptSink for &mut K {
    fn emit(&mut self, cluster: ConceptCluster) -> Result<(), SinkError> {
        (**self).emit(cluster)
    }
}
