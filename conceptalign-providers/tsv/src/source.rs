//! In-memory link store populated from tab-separated records.
use std::collections::{HashMap, HashSet};
use std::io::BufRead;

use conceptalign_core::{ArticleId, ArticleIter, Edge, EdgeSource, EdgeSourceError};
use tracing::{debug, info, instrument};

use crate::errors::TsvProviderError;
use crate::ingest::{for_each_record, parse_article, split_fields};

/// Counters describing what ingestion kept and dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Record lines read from the edge file.
    pub records: usize,
    /// Distinct cross-language links stored.
    pub links: usize,
    /// Records linking two articles of the same language.
    pub self_language: usize,
    /// Records repeating an already stored link.
    pub duplicates: usize,
}

/// [`EdgeSource`] backed by adjacency maps built from tab-separated records.
///
/// Edge lines read `src_lang<TAB>src_id<TAB>dst_lang<TAB>dst_id`. Without an
/// explicit article list the universe is every endpoint of a stored link in
/// first-seen order; same-language records are counted and contribute nothing.
///
/// # Examples
/// ```
/// use std::io::Cursor;
/// use conceptalign_core::EdgeSource;
/// use conceptalign_providers_tsv::TsvEdgeSource;
///
/// let records = "# wiki links\nen\t1\tde\t5\nen\t1\ten\t2\nen\t1\tde\t5\n";
/// let store = TsvEdgeSource::try_from_reader("demo", Cursor::new(records))?;
/// assert_eq!(store.name(), "demo");
/// assert_eq!(store.len(), 2);
/// assert_eq!(store.stats().links, 1);
/// assert_eq!(store.stats().self_language, 1);
/// assert_eq!(store.stats().duplicates, 1);
/// # Ok::<(), conceptalign_providers_tsv::TsvProviderError>(())
/// ```
#[derive(Clone, Debug)]
pub struct TsvEdgeSource {
    name: String,
    articles: Vec<ArticleId>,
    outgoing: HashMap<ArticleId, Vec<ArticleId>>,
    incoming: HashMap<ArticleId, Vec<ArticleId>>,
    stats: IngestStats,
}

impl TsvEdgeSource {
    /// Builds a store from pre-parsed edges.
    #[must_use]
    pub fn from_edges(name: impl Into<String>, edges: impl IntoIterator<Item = Edge>) -> Self {
        let mut builder = StoreBuilder::default();
        for edge in edges {
            builder.stats.records += 1;
            builder.insert(edge.source(), edge.dest());
        }
        builder.finish(name.into())
    }

    /// Ingests edge records from `reader`.
    ///
    /// # Errors
    /// Returns [`TsvProviderError`] on I/O failure or on the first malformed
    /// record.
    #[instrument(
        name = "tsv.ingest_edges",
        err,
        skip(name, reader),
        fields(name = %name.as_ref()),
    )]
    pub fn try_from_reader<N, R>(name: N, reader: R) -> Result<Self, TsvProviderError>
    where
        N: AsRef<str> + Into<String>,
        R: BufRead,
    {
        let mut builder = StoreBuilder::default();
        for_each_record(reader, |line, record| {
            let [src_lang, src_id, dst_lang, dst_id] = split_fields::<4>(line, record)?;
            let source = parse_article(line, src_lang, src_id)?;
            let dest = parse_article(line, dst_lang, dst_id)?;
            builder.stats.records += 1;
            builder.insert(source, dest);
            Ok(())
        })?;
        let store = builder.finish(name.into());
        info!(
            articles = store.articles.len(),
            links = store.stats.links,
            self_language = store.stats.self_language,
            duplicates = store.stats.duplicates,
            "edge records ingested"
        );
        Ok(store)
    }

    /// Replaces the article universe with the `lang<TAB>id` records read from
    /// `reader`, in file order.
    ///
    /// Links touching articles outside the new universe stay stored but are
    /// ignored by the resolver.
    ///
    /// # Errors
    /// Returns [`TsvProviderError`] on I/O failure or on the first malformed
    /// record.
    #[instrument(name = "tsv.ingest_articles", err, skip(self, reader), fields(name = %self.name))]
    pub fn with_articles_from_reader<R: BufRead>(
        mut self,
        reader: R,
    ) -> Result<Self, TsvProviderError> {
        let mut seen = HashSet::new();
        let mut articles = Vec::new();
        for_each_record(reader, |line, record| {
            let [language, local_id] = split_fields::<2>(line, record)?;
            let article = parse_article(line, language, local_id)?;
            if seen.insert(article) {
                articles.push(article);
            }
            Ok(())
        })?;
        let unlisted = self
            .articles
            .iter()
            .filter(|article| !seen.contains(*article))
            .count();
        if unlisted > 0 {
            debug!(unlisted, "link endpoints outside the article universe");
        }
        self.articles = articles;
        Ok(self)
    }

    /// Returns the number of articles in the universe.
    #[must_use]
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    /// Returns whether the universe is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Returns ingestion counters.
    #[must_use]
    pub const fn stats(&self) -> IngestStats {
        self.stats
    }
}

impl EdgeSource for TsvEdgeSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn edges_from(&self, article: ArticleId) -> Result<Vec<ArticleId>, EdgeSourceError> {
        Ok(self.outgoing.get(&article).cloned().unwrap_or_default())
    }

    fn edges_to(&self, article: ArticleId) -> Result<Vec<ArticleId>, EdgeSourceError> {
        Ok(self.incoming.get(&article).cloned().unwrap_or_default())
    }

    fn valid_articles(&self) -> Result<ArticleIter<'_>, EdgeSourceError> {
        Ok(Box::new(self.articles.iter().copied()))
    }
}

#[derive(Default)]
struct StoreBuilder {
    articles: Vec<ArticleId>,
    known: HashSet<ArticleId>,
    links: HashSet<(ArticleId, ArticleId)>,
    outgoing: HashMap<ArticleId, Vec<ArticleId>>,
    incoming: HashMap<ArticleId, Vec<ArticleId>>,
    stats: IngestStats,
}

impl StoreBuilder {
    fn insert(&mut self, source: ArticleId, dest: ArticleId) {
        let Some(edge) = Edge::new(source, dest) else {
            self.stats.self_language += 1;
            return;
        };
        self.enlist(source);
        self.enlist(dest);
        if !self.links.insert((edge.source(), edge.dest())) {
            self.stats.duplicates += 1;
            return;
        }
        self.outgoing.entry(source).or_default().push(dest);
        self.incoming.entry(dest).or_default().push(source);
        self.stats.links += 1;
    }

    fn enlist(&mut self, article: ArticleId) {
        if self.known.insert(article) {
            self.articles.push(article);
        }
    }

    fn finish(self, name: String) -> TsvEdgeSource {
        TsvEdgeSource {
            name,
            articles: self.articles,
            outgoing: self.outgoing,
            incoming: self.incoming,
            stats: self.stats,
        }
    }
}
