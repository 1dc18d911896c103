//! Read-only view of the inter-language link graph.
//!
//! [`LinkGraph`] enumerates the store's valid articles once, packing each into
//! a compact [`VertexId`], and answers neighbour queries by delegating to the
//! [`EdgeSource`] on every call. Nothing beyond the vertex index is
//! materialised; callers needing repeated access to one vertex's neighbours
//! cache them locally.

mod vertex_set;

use std::{collections::HashMap, sync::Arc};

use tracing::{debug, instrument};

use crate::{
    Result,
    article::{ArticleId, Language},
    edge_source::EdgeSource,
    error::{ConceptAlignError, EdgeSourceError},
};

pub(crate) use vertex_set::VertexSet;

/// Compact index of an article within one [`LinkGraph`].
///
/// Indices follow the store's enumeration order, so sorting by [`VertexId`]
/// reproduces that order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(u32);

impl VertexId {
    pub(crate) const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw index.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Read-only adapter presenting an [`EdgeSource`] as a graph over [`VertexId`]s.
///
/// Neighbour sets are distinct, sorted in enumeration order, restricted to
/// valid articles, and never contain an article of the queried vertex's own
/// language.
///
/// # Examples
/// ```
/// use conceptalign_core::{ArticleId, ArticleIter, EdgeSource, EdgeSourceError, LinkGraph};
///
/// struct Pair(ArticleId, ArticleId);
///
/// impl EdgeSource for Pair {
///     fn name(&self) -> &str { "pair" }
///     fn edges_from(&self, article: ArticleId) -> Result<Vec<ArticleId>, EdgeSourceError> {
///         Ok(if article == self.0 { vec![self.1, self.1] } else { Vec::new() })
///     }
///     fn edges_to(&self, article: ArticleId) -> Result<Vec<ArticleId>, EdgeSourceError> {
///         Ok(if article == self.1 { vec![self.0] } else { Vec::new() })
///     }
///     fn valid_articles(&self) -> Result<ArticleIter<'_>, EdgeSourceError> {
///         Ok(Box::new([self.0, self.1].into_iter()))
///     }
/// }
///
/// let en: ArticleId = "en:1".parse()?;
/// let de: ArticleId = "de:5".parse()?;
/// let store = Pair(en, de);
/// let graph = LinkGraph::try_new(&store)?;
/// let en_vertex = graph.vertex(en).expect("en:1 is valid");
/// let de_vertex = graph.vertex(de).expect("de:5 is valid");
/// assert_eq!(graph.neighbors_out(en_vertex)?, [de_vertex]);
/// assert_eq!(graph.neighbors_in(de_vertex)?, [en_vertex]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct LinkGraph<'a, S: EdgeSource + ?Sized> {
    source: &'a S,
    name: Arc<str>,
    articles: Vec<ArticleId>,
    index: HashMap<ArticleId, VertexId>,
}

impl<'a, S: EdgeSource + ?Sized> LinkGraph<'a, S> {
    /// Enumerates the store's valid articles and builds the vertex index.
    ///
    /// Articles repeated by the enumeration keep their first index.
    ///
    /// # Errors
    /// Returns [`ConceptAlignError::GraphAccess`] when enumeration fails and
    /// [`ConceptAlignError::InvariantViolation`] when the universe does not fit
    /// in 32-bit vertex indices.
    #[instrument(name = "core.graph.index", err, skip(source), fields(data_source = %source.name()))]
    pub fn try_new(source: &'a S) -> Result<Self> {
        let name: Arc<str> = Arc::from(source.name());
        let enumeration = source
            .valid_articles()
            .map_err(|error| graph_access(&name, error))?;

        let mut articles = Vec::new();
        let mut index = HashMap::new();
        let mut repeated = 0_usize;
        for article in enumeration {
            if index.contains_key(&article) {
                repeated += 1;
                continue;
            }
            let raw = u32::try_from(articles.len()).map_err(|_| {
                ConceptAlignError::invariant(
                    "vertex universe must fit in 32-bit indices",
                    format!("article {article} would be vertex {}", articles.len()),
                )
            })?;
            index.insert(article, VertexId::new(raw));
            articles.push(article);
        }
        if repeated > 0 {
            debug!(repeated, "enumeration repeated articles; keeping first occurrence");
        }

        Ok(Self {
            source,
            name,
            articles,
            index,
        })
    }

    /// Returns the store name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    /// Returns whether the universe is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Returns whether `article` is a valid vertex.
    #[must_use]
    pub fn contains_vertex(&self, article: ArticleId) -> bool {
        self.index.contains_key(&article)
    }

    /// Looks up the vertex for `article`.
    #[must_use]
    pub fn vertex(&self, article: ArticleId) -> Option<VertexId> {
        self.index.get(&article).copied()
    }

    /// Looks up the article behind `vertex`.
    #[must_use]
    pub fn article(&self, vertex: VertexId) -> Option<ArticleId> {
        self.articles.get(vertex.index()).copied()
    }

    /// Iterates over every vertex in enumeration order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> {
        (0..self.articles.len()).filter_map(|raw| u32::try_from(raw).ok().map(VertexId::new))
    }

    /// Returns the distinct destinations `vertex` links to.
    ///
    /// # Errors
    /// Returns [`ConceptAlignError::GraphAccess`] when the store query fails.
    pub fn neighbors_out(&self, vertex: VertexId) -> Result<Vec<VertexId>> {
        let article = self.resolve(vertex)?;
        let raw = self
            .source
            .edges_from(article)
            .map_err(|error| graph_access(&self.name, error))?;
        Ok(self.admit(article.language(), raw))
    }

    /// Returns the distinct sources linking to `vertex`.
    ///
    /// # Errors
    /// Returns [`ConceptAlignError::GraphAccess`] when the store query fails.
    pub fn neighbors_in(&self, vertex: VertexId) -> Result<Vec<VertexId>> {
        let article = self.resolve(vertex)?;
        let raw = self
            .source
            .edges_to(article)
            .map_err(|error| graph_access(&self.name, error))?;
        Ok(self.admit(article.language(), raw))
    }

    /// Returns the union of out- and in-neighbours, ignoring direction.
    ///
    /// # Errors
    /// Returns [`ConceptAlignError::GraphAccess`] when either store query fails.
    pub fn neighbors(&self, vertex: VertexId) -> Result<Vec<VertexId>> {
        let mut merged = self.neighbors_out(vertex)?;
        merged.extend(self.neighbors_in(vertex)?);
        merged.sort_unstable();
        merged.dedup();
        Ok(merged)
    }

    pub(crate) fn resolve(&self, vertex: VertexId) -> Result<ArticleId> {
        self.article(vertex).ok_or_else(|| {
            ConceptAlignError::invariant(
                "vertex must belong to the graph",
                format!("vertex {} of {}", vertex.get(), self.articles.len()),
            )
        })
    }

    pub(crate) fn language(&self, vertex: VertexId) -> Result<Language> {
        self.resolve(vertex).map(ArticleId::language)
    }

    fn admit(&self, own_language: Language, raw: Vec<ArticleId>) -> Vec<VertexId> {
        let mut admitted: Vec<VertexId> = raw
            .into_iter()
            .filter(|neighbour| neighbour.language() != own_language)
            .filter_map(|neighbour| self.vertex(neighbour))
            .collect();
        admitted.sort_unstable();
        admitted.dedup();
        admitted
    }
}

fn graph_access(name: &Arc<str>, error: EdgeSourceError) -> ConceptAlignError {
    ConceptAlignError::GraphAccess {
        data_source: Arc::clone(name),
        error,
    }
}
