//! Entry point tying configuration to resolution runs.

use crate::{
    Result,
    edge_source::EdgeSource,
    engine::{ConceptResolutionEngine, RunSummary},
    sink::ConceptSink,
    splitter::SplitThresholds,
};

/// Validated configuration for concept resolution.
///
/// A `Resolver` is cheap to copy and can start any number of independent
/// runs; each run owns its own [`ConceptResolutionEngine`].
///
/// # Examples
/// ```
/// use conceptalign_core::{ArticleId, ArticleIter, ConceptCluster, EdgeSource, EdgeSourceError, ResolverBuilder};
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
/// let resolver = ResolverBuilder::new().build()?;
/// let mut clusters: Vec<ConceptCluster> = Vec::new();
/// let summary = resolver.resolve(&Pair("en:1".parse()?, "de:5".parse()?), &mut clusters)?;
/// assert_eq!(summary.clusters_emitted, 1);
/// assert_eq!(clusters.first().map(ConceptCluster::len), Some(2));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Resolver {
    thresholds: SplitThresholds,
    print_diagnostics: bool,
}

impl Resolver {
    pub(crate) const fn new(thresholds: SplitThresholds, print_diagnostics: bool) -> Self {
        Self {
            thresholds,
            print_diagnostics,
        }
    }

    /// Returns the vote thresholds applied to ambiguous components.
    #[must_use]
    pub const fn thresholds(&self) -> SplitThresholds {
        self.thresholds
    }

    /// Returns whether runs dump every resolved cluster.
    #[must_use]
    pub const fn print_diagnostics(&self) -> bool {
        self.print_diagnostics
    }

    /// Creates a fresh engine over `source`.
    #[must_use]
    pub fn engine<'a, S: EdgeSource + ?Sized>(
        &self,
        source: &'a S,
    ) -> ConceptResolutionEngine<'a, S> {
        ConceptResolutionEngine::new(source, self.thresholds, self.print_diagnostics)
    }

    /// Runs one complete resolution over `source`, publishing to `sink`.
    ///
    /// # Errors
    /// Returns any error raised by [`ConceptResolutionEngine::run`]. Runs with
    /// diagnostics enabled need a title lookup and must go through
    /// [`Self::engine`] instead.
    pub fn resolve<S, K>(&self, source: &S, sink: &mut K) -> Result<RunSummary>
    where
        S: EdgeSource + ?Sized,
        K: ConceptSink + ?Sized,
    {
        self.engine(source).run(sink)
    }
}
