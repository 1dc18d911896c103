//! Concept identifiers and the clusters emitted by a resolution run.

use std::collections::{BTreeMap, BTreeSet};

use crate::article::{ArticleId, Language};

/// Identifier assigned to a cross-lingual concept.
///
/// Identifiers start at 1 and strictly increase within a run.
///
/// # Examples
/// ```
/// use conceptalign_core::ConceptId;
///
/// let id = ConceptId::new(4);
/// assert_eq!(id.get(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConceptId(u64);

impl ConceptId {
    /// Creates a new concept identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn new(id: u64) -> Self { Self(id) }

    /// Returns the underlying numeric identifier.
    #[rustfmt::skip]
    #[must_use]
    pub const fn get(self) -> u64 { self.0 }
}

/// A set of same-topic articles across languages sharing one [`ConceptId`].
///
/// Members are grouped by language. A language may hold more than one article
/// when disambiguation could not separate them.
///
/// # Examples
/// ```
/// use conceptalign_core::{ArticleId, ConceptCluster, ConceptId};
///
/// let members: Vec<ArticleId> = ["en:1", "de:5"]
///     .iter()
///     .map(|raw| raw.parse())
///     .collect::<Result<_, _>>()?;
/// let cluster = ConceptCluster::new(ConceptId::new(1), members)
///     .expect("cluster has members");
/// assert_eq!(cluster.len(), 2);
/// assert_eq!(cluster.language_count(), 2);
/// assert!(!cluster.is_ambiguous());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConceptCluster {
    id: ConceptId,
    members: BTreeMap<Language, BTreeSet<u32>>,
    len: usize,
}

impl ConceptCluster {
    /// Groups `articles` into a cluster, returning `None` when no articles are
    /// supplied. Repeated articles are stored once.
    #[must_use]
    pub fn new(id: ConceptId, articles: impl IntoIterator<Item = ArticleId>) -> Option<Self> {
        let mut members: BTreeMap<Language, BTreeSet<u32>> = BTreeMap::new();
        let mut len = 0;
        for article in articles {
            if members
                .entry(article.language())
                .or_default()
                .insert(article.local_id())
            {
                len += 1;
            }
        }
        (len > 0).then_some(Self { id, members, len })
    }

    /// Returns the concept identifier.
    #[must_use]
    pub const fn id(&self) -> ConceptId {
        self.id
    }

    /// Returns the number of member articles.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Clusters are never empty; provided for API symmetry with [`Self::len`].
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of distinct languages represented.
    #[must_use]
    pub fn language_count(&self) -> usize {
        self.members.len()
    }

    /// Returns whether some language contributes more than one article.
    #[must_use]
    pub fn is_ambiguous(&self) -> bool {
        self.len > self.members.len()
    }

    /// Returns the local ids held for `language`, if any.
    #[must_use]
    pub fn local_ids(&self, language: Language) -> Option<&BTreeSet<u32>> {
        self.members.get(&language)
    }

    /// Returns whether `article` belongs to this cluster.
    #[must_use]
    pub fn contains(&self, article: ArticleId) -> bool {
        self.members
            .get(&article.language())
            .is_some_and(|ids| ids.contains(&article.local_id()))
    }

    /// Iterates over the members grouped by language.
    pub fn languages(&self) -> impl Iterator<Item = (Language, &BTreeSet<u32>)> {
        self.members.iter().map(|(language, ids)| (*language, ids))
    }

    /// Iterates over every member in `(language, local id)` order.
    pub fn articles(&self) -> impl Iterator<Item = ArticleId> + '_ {
        self.members.iter().flat_map(|(language, ids)| {
            ids.iter().map(|local_id| ArticleId::new(*language, *local_id))
        })
    }
}
