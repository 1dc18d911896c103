//! Weak-connected-component decomposition.
//!
//! [`ComponentTraversal`] walks a [`LinkGraph`] in the store's enumeration
//! order, breadth-first over the union of out- and in-neighbours. One visited
//! set is shared across the whole run, so every vertex is discovered exactly
//! once. Given a fixed store and enumeration order, the sequence of
//! discoveries and the vertex order inside each component are always the same.

use std::collections::VecDeque;

use crate::{
    Result,
    edge_source::EdgeSource,
    graph::{LinkGraph, VertexId, VertexSet},
};

/// One step of a traversal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Discovery<'t> {
    /// A weak component of at least two vertices, in discovery order.
    Component(&'t [VertexId]),
    /// A vertex without any admissible link.
    Isolated(VertexId),
}

/// Streams the weak components of a [`LinkGraph`], one at a time.
///
/// # Examples
/// ```
/// use conceptalign_core::{ArticleId, ArticleIter, ComponentTraversal, Discovery, EdgeSource, EdgeSourceError, LinkGraph};
///
/// struct Pair(ArticleId, ArticleId, ArticleId);
///
/// impl EdgeSource for Pair {
///     fn name(&self) -> &str { "pair" }
///     fn edges_from(&self, article: ArticleId) -> Result<Vec<ArticleId>, EdgeSourceError> {
///         Ok(if article == self.0 { vec![self.1] } else { Vec::new() })
///     }
///     fn edges_to(&self, article: ArticleId) -> Result<Vec<ArticleId>, EdgeSourceError> {
///         Ok(if article == self.1 { vec![self.0] } else { Vec::new() })
///     }
///     fn valid_articles(&self) -> Result<ArticleIter<'_>, EdgeSourceError> {
///         Ok(Box::new([self.0, self.1, self.2].into_iter()))
///     }
/// }
///
/// let store = Pair("en:1".parse()?, "de:5".parse()?, "fr:9".parse()?);
/// let graph = LinkGraph::try_new(&store)?;
/// let mut traversal = ComponentTraversal::new(graph.len());
/// let mut sizes = Vec::new();
/// traversal.for_each_component(&graph, |component| {
///     sizes.push(component.len());
///     Ok(())
/// })?;
/// assert_eq!(sizes, [2]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct ComponentTraversal {
    visited: VertexSet,
    cursor: usize,
    component: Vec<VertexId>,
    frontier: VecDeque<VertexId>,
}

impl ComponentTraversal {
    /// Creates a traversal sized for `vertex_count` vertices.
    #[must_use]
    pub fn new(vertex_count: usize) -> Self {
        Self {
            visited: VertexSet::with_capacity(vertex_count),
            cursor: 0,
            component: Vec::new(),
            frontier: VecDeque::new(),
        }
    }

    /// Returns how many vertices have been discovered so far.
    #[must_use]
    pub const fn visited(&self) -> usize {
        self.visited.len()
    }

    /// Advances to the next undiscovered seed and traverses its component.
    ///
    /// Returns `None` once every vertex has been discovered.
    ///
    /// # Errors
    /// Propagates [`crate::ConceptAlignError::GraphAccess`] from neighbour
    /// queries; the traversal must then be discarded.
    pub fn next_discovery<S: EdgeSource + ?Sized>(
        &mut self,
        graph: &LinkGraph<'_, S>,
    ) -> Result<Option<Discovery<'_>>> {
        let Some(seed) = self.next_seed(graph.len()) else {
            return Ok(None);
        };

        self.component.clear();
        self.frontier.clear();
        self.component.push(seed);
        self.frontier.push_back(seed);
        while let Some(vertex) = self.frontier.pop_front() {
            for neighbour in graph.neighbors(vertex)? {
                if self.visited.insert(neighbour) {
                    self.component.push(neighbour);
                    self.frontier.push_back(neighbour);
                }
            }
        }

        if self.component.len() == 1 {
            Ok(Some(Discovery::Isolated(seed)))
        } else {
            Ok(Some(Discovery::Component(&self.component)))
        }
    }

    /// Invokes `on_component` once per component with at least one edge.
    ///
    /// Edgeless vertices are skipped; they trivially resolve to singleton
    /// concepts.
    ///
    /// # Errors
    /// Stops at the first error from the graph or from `on_component`.
    pub fn for_each_component<S, F>(
        &mut self,
        graph: &LinkGraph<'_, S>,
        mut on_component: F,
    ) -> Result<()>
    where
        S: EdgeSource + ?Sized,
        F: FnMut(&[VertexId]) -> Result<()>,
    {
        while let Some(discovery) = self.next_discovery(graph)? {
            if let Discovery::Component(vertices) = discovery {
                on_component(vertices)?;
            }
        }
        Ok(())
    }

    /// Resumes the seed scan at `cursor`; each vertex is inspected once per run.
    fn next_seed(&mut self, vertex_count: usize) -> Option<VertexId> {
        while self.cursor < vertex_count {
            let raw = u32::try_from(self.cursor).ok()?;
            self.cursor += 1;
            let vertex = VertexId::new(raw);
            if self.visited.insert(vertex) {
                return Some(vertex);
            }
        }
        None
    }
}

/// Splits a local adjacency list into weak components.
///
/// `adjacency[i]` must list the neighbours of local vertex `i` in both
/// directions. Components are returned ordered by their smallest member, with
/// members in breadth-first discovery order.
pub(crate) fn local_components(adjacency: &[Vec<usize>]) -> Vec<Vec<usize>> {
    let mut visited = vec![false; adjacency.len()];
    let mut components = Vec::new();
    let mut frontier = VecDeque::new();

    for seed in 0..adjacency.len() {
        if !mark(&mut visited, seed) {
            continue;
        }
        let mut component = vec![seed];
        frontier.push_back(seed);
        while let Some(vertex) = frontier.pop_front() {
            for &neighbour in adjacency.get(vertex).into_iter().flatten() {
                if mark(&mut visited, neighbour) {
                    component.push(neighbour);
                    frontier.push_back(neighbour);
                }
            }
        }
        components.push(component);
    }
    components
}

fn mark(visited: &mut [bool], index: usize) -> bool {
    match visited.get_mut(index) {
        Some(seen) if !*seen => {
            *seen = true;
            true
        }
        _ => false,
    }
}
