//! Concept id allocation and cluster materialisation.

use crate::{
    Result,
    concept::{ConceptCluster, ConceptId},
    edge_source::EdgeSource,
    error::ConceptAlignError,
    graph::{LinkGraph, VertexId, VertexSet},
};

/// Assigns strictly increasing concept ids, starting at 1, to accepted
/// vertex subsets.
///
/// The assigner also guards the partition: a vertex handed to it twice is an
/// internal defect and reported as [`ConceptAlignError::InvariantViolation`].
/// It is a single writer and is not shared across threads.
#[derive(Debug)]
pub struct ConceptAssigner {
    next: u64,
    assigned: VertexSet,
}

impl ConceptAssigner {
    /// Creates an assigner for a graph of `vertex_count` vertices.
    #[must_use]
    pub fn new(vertex_count: usize) -> Self {
        Self {
            next: 1,
            assigned: VertexSet::with_capacity(vertex_count),
        }
    }

    /// Returns the next concept id.
    ///
    /// # Errors
    /// Returns [`ConceptAlignError::InvariantViolation`] if the id space is
    /// exhausted, since ids are never reused.
    pub fn next_id(&mut self) -> Result<ConceptId> {
        let id = self.next;
        self.next = id.checked_add(1).ok_or_else(|| {
            ConceptAlignError::invariant("concept ids must never be reused", "id space exhausted")
        })?;
        Ok(ConceptId::new(id))
    }

    /// Returns how many vertices have been assigned a concept.
    #[must_use]
    pub const fn assigned(&self) -> usize {
        self.assigned.len()
    }

    /// Converts `subset` into a [`ConceptCluster`] with a fresh id.
    ///
    /// # Errors
    /// Returns [`ConceptAlignError::InvariantViolation`] when `subset` is
    /// empty, names a vertex outside `graph`, or names a vertex that already
    /// belongs to a concept.
    pub fn assign<S: EdgeSource + ?Sized>(
        &mut self,
        graph: &LinkGraph<'_, S>,
        subset: &[VertexId],
    ) -> Result<ConceptCluster> {
        if subset.is_empty() {
            return Err(ConceptAlignError::invariant(
                "concept clusters are never empty",
                format!("empty subset offered before concept {}", self.next),
            ));
        }
        let mut articles = Vec::with_capacity(subset.len());
        for vertex in subset {
            let article = graph.resolve(*vertex)?;
            if !self.assigned.insert(*vertex) {
                return Err(ConceptAlignError::invariant(
                    "every article belongs to exactly one concept",
                    format!("{article} was assigned twice"),
                ));
            }
            articles.push(article);
        }
        let id = self.next_id()?;
        ConceptCluster::new(id, articles).ok_or_else(|| {
            ConceptAlignError::invariant(
                "concept clusters are never empty",
                format!("concept {} received no articles", id.get()),
            )
        })
    }
}
