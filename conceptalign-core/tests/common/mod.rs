use std::collections::HashMap;

use conceptalign_core::{ArticleId, ArticleIter, EdgeSource, EdgeSourceError};

/// Adjacency-list store built from `"lang:id"` pairs.
#[derive(Clone, Debug, Default)]
pub struct LinkTable {
    articles: Vec<ArticleId>,
    outgoing: HashMap<ArticleId, Vec<ArticleId>>,
    incoming: HashMap<ArticleId, Vec<ArticleId>>,
}

impl LinkTable {
    #[must_use]
    pub fn new(links: &[(&str, &str)]) -> Self {
        let mut table = Self::default();
        for (from, to) in links {
            let (from, to) = (parse(from), parse(to));
            table.enlist(from);
            table.enlist(to);
            table.outgoing.entry(from).or_default().push(to);
            table.incoming.entry(to).or_default().push(from);
        }
        table
    }

    fn enlist(&mut self, article: ArticleId) {
        if !self.articles.contains(&article) {
            self.articles.push(article);
        }
    }
}

#[must_use]
pub fn parse(raw: &str) -> ArticleId {
    raw.parse().expect("fixture articles must be valid")
}

impl EdgeSource for LinkTable {
    fn name(&self) -> &str {
        "table"
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
