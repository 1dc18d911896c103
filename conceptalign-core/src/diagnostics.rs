//! Human-readable cluster dumps.

use std::{collections::HashMap, fmt::Write as _};

use crate::{article::ArticleId, concept::ConceptCluster};

/// Resolves article titles for diagnostic output.
pub trait TitleLookup {
    /// Returns the title of `article`, or `None` when unknown.
    fn title(&self, article: ArticleId) -> Option<String>;
}

impl TitleLookup for HashMap<ArticleId, String> {
    fn title(&self, article: ArticleId) -> Option<String> {
        self.get(&article).cloned()
    }
}

/// Renders `cluster` as one header line followed by one line per member.
///
/// Members without a known title are shown with a `?` placeholder.
///
/// # Examples
/// ```
/// use std::collections::HashMap;
/// use conceptalign_core::{ArticleId, ConceptCluster, ConceptId, render_cluster};
///
/// let en: ArticleId = "en:1".parse()?;
/// let de: ArticleId = "de:5".parse()?;
/// let titles = HashMap::from([(en, "Tree".to_owned())]);
/// let cluster = ConceptCluster::new(ConceptId::new(7), [en, de]).expect("non-empty");
/// assert_eq!(
///     render_cluster(&cluster, &titles),
///     "concept 7 (2 articles, 2 languages)\n  de:5\t?\n  en:1\tTree\n",
/// );
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[must_use]
pub fn render_cluster(cluster: &ConceptCluster, titles: &(impl TitleLookup + ?Sized)) -> String {
    let mut rendered = format!(
        "concept {} ({} articles, {} languages)\n",
        cluster.id().get(),
        cluster.len(),
        cluster.language_count()
    );
    for article in cluster.articles() {
        let title = titles.title(article);
        // Writing into a String cannot fail.
        let _ = writeln!(rendered, "  {article}\t{}", title.as_deref().unwrap_or("?"));
    }
    rendered
}
