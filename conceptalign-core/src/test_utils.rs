//! Shared test utilities for `conceptalign-core`.

use std::collections::{BTreeSet, HashMap};

use conceptalign_test_support::ci::property_test_profile::ProptestRunProfile;
use proptest::test_runner::Config as ProptestConfig;

use crate::{
    article::ArticleId,
    edge_source::{ArticleIter, EdgeSource},
    error::EdgeSourceError,
};

/// Builds a standard proptest configuration from the shared CI profile.
///
/// This keeps property suites aligned on the same `PROGTEST_CASES` and
/// `CONCEPTALIGN_PBT_FORK` interpretation.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

/// Parses `lang:id` fixtures, panicking on malformed input.
pub(crate) fn article(raw: &str) -> ArticleId {
    raw.parse()
        .unwrap_or_else(|err| panic!("invalid fixture article {raw:?}: {err}"))
}

/// In-memory [`EdgeSource`] built from `lang:id` link pairs.
///
/// The universe is every endpoint in first-seen order, followed by any extra
/// articles. Duplicates collapse; same-language pairs are stored as given so
/// graph-level filtering can be observed.
#[derive(Clone, Debug, Default)]
pub(crate) struct MemorySource {
    articles: Vec<ArticleId>,
    out: HashMap<ArticleId, BTreeSet<ArticleId>>,
    inbound: HashMap<ArticleId, BTreeSet<ArticleId>>,
    failing: Option<ArticleId>,
}

impl MemorySource {
    pub(crate) fn from_links(links: &[(&str, &str)]) -> Self {
        let mut source = Self::default();
        for (from, to) in links {
            let (from, to) = (article(from), article(to));
            source.enlist(from);
            source.enlist(to);
            source.link(from, to);
        }
        source
    }

    /// Appends articles to the universe without linking them.
    pub(crate) fn with_articles(mut self, extra: &[&str]) -> Self {
        for raw in extra {
            self.enlist(article(raw));
        }
        self
    }

    /// Adds a link whose destination is not part of the universe.
    pub(crate) fn with_unlisted_link(mut self, from: &str, to: &str) -> Self {
        self.link(article(from), article(to));
        self
    }

    /// Makes every neighbour query touching `target` fail.
    pub(crate) fn failing_on(mut self, target: ArticleId) -> Self {
        self.failing = Some(target);
        self
    }

    fn enlist(&mut self, article: ArticleId) {
        if !self.articles.contains(&article) {
            self.articles.push(article);
        }
    }

    fn link(&mut self, from: ArticleId, to: ArticleId) {
        self.out.entry(from).or_default().insert(to);
        self.inbound.entry(to).or_default().insert(from);
    }

    fn check(&self, article: ArticleId) -> Result<(), EdgeSourceError> {
        if self.failing == Some(article) {
            return Err(EdgeSourceError::Backend {
                message: format!("injected failure for {article}").into(),
            });
        }
        Ok(())
    }
}

impl EdgeSource for MemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    fn edges_from(&self, article: ArticleId) -> Result<Vec<ArticleId>, EdgeSourceError> {
        self.check(article)?;
        Ok(self
            .out
            .get(&article)
            .map(|targets| targets.iter().copied().collect())
            .unwrap_or_default())
    }

    fn edges_to(&self, article: ArticleId) -> Result<Vec<ArticleId>, EdgeSourceError> {
        self.check(article)?;
        Ok(self
            .inbound
            .get(&article)
            .map(|sources| sources.iter().copied().collect())
            .unwrap_or_default())
    }

    fn valid_articles(&self) -> Result<ArticleIter<'_>, EdgeSourceError> {
        Ok(Box::new(self.articles.iter().copied()))
    }
}
