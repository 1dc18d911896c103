//! Collaborator abstractions over the external inter-language link store.

use crate::{article::ArticleId, error::EdgeSourceError};

/// Iterator over the articles a store considers valid.
pub type ArticleIter<'a> = Box<dyn Iterator<Item = ArticleId> + 'a>;

/// Read access to a store of inter-language link assertions.
///
/// Both edge queries are total: an unknown article yields an empty set rather
/// than an error. Errors are reserved for genuine store failures and abort the
/// resolution run. Retries, if any, belong inside the implementation.
///
/// # Examples
/// ```
/// use conceptalign_core::{ArticleId, ArticleIter, EdgeSource, EdgeSourceError};
///
/// struct Pair(ArticleId, ArticleId);
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
///         Ok(Box::new([self.0, self.1].into_iter()))
///     }
/// }
///
/// let en: ArticleId = "en:1".parse()?;
/// let de: ArticleId = "de:5".parse()?;
/// let store = Pair(en, de);
/// assert_eq!(store.edges_from(en)?, [de]);
/// assert!(store.edges_from(de)?.is_empty());
/// assert_eq!(store.valid_articles()?.count(), 2);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait EdgeSource {
    /// Returns a human-readable name used in diagnostics and error context.
    fn name(&self) -> &str;

    /// Returns the destinations `article` links to.
    ///
    /// # Errors
    /// Returns [`EdgeSourceError`] when the store cannot answer the query.
    fn edges_from(&self, article: ArticleId) -> Result<Vec<ArticleId>, EdgeSourceError>;

    /// Returns the sources linking to `article`.
    ///
    /// # Errors
    /// Returns [`EdgeSourceError`] when the store cannot answer the query.
    fn edges_to(&self, article: ArticleId) -> Result<Vec<ArticleId>, EdgeSourceError>;

    /// Enumerates every valid article in a stable order.
    ///
    /// The order must be identical across calls for a fixed store; concept ids
    /// are only reproducible when it is.
    ///
    /// # Errors
    /// Returns [`EdgeSourceError`] when the store cannot be enumerated.
    fn valid_articles(&self) -> Result<ArticleIter<'_>, EdgeSourceError>;
}
