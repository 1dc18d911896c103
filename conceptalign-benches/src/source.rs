//! Seeded synthetic inter-language link stores.
//!
//! Each generated concept owns at most one article per language, numbered by
//! the concept index, and every pair of its articles is linked both ways.
//! Noise links then join random articles of different concepts, producing
//! the ambiguous components the vote filter has to split.

use std::collections::HashMap;

use conceptalign_core::{
    ArticleId, ArticleIter, Edge, EdgeSource, EdgeSourceError, Language, LanguageError,
};
use rand::{Rng, SeedableRng, rngs::SmallRng};

const LANGUAGE_CODES: [&str; 8] = ["en", "de", "fr", "it", "ja", "es", "pt", "nl"];

/// Draws allowed per requested noise link before generation gives up.
const NOISE_ATTEMPTS_PER_LINK: usize = 16;

/// Errors raised while generating a synthetic link store.
#[derive(Debug, thiserror::Error)]
pub enum SyntheticError {
    /// The requested concept count was zero.
    #[error("concept count must be greater than zero")]
    ZeroConcepts,
    /// Local ids are `u32`, capping the concept count.
    #[error("concept count {concept_count} exceeds the local id range")]
    TooManyConcepts {
        /// Number of concepts requested.
        concept_count: usize,
    },
    /// Concepts need at least two languages and at most the built-in set.
    #[error("language count must be in 2..={max} (got {got})")]
    InvalidLanguageCount {
        /// Number of languages requested.
        got: usize,
        /// Number of built-in language codes.
        max: usize,
    },
    /// Coverage must lie in `(0, 1]`.
    #[error("coverage must be in (0, 1] (got {got})")]
    InvalidCoverage {
        /// The rejected coverage.
        got: f64,
    },
    /// A built-in language code was rejected.
    #[error("invalid language code: {0}")]
    Language(#[from] LanguageError),
}

/// Configuration for [`SyntheticLinks::generate`].
#[derive(Clone, Debug)]
pub struct SyntheticLinkConfig {
    /// Number of concepts to generate.
    pub concept_count: usize,
    /// Number of languages drawn from the built-in code list.
    pub language_count: usize,
    /// Probability that a concept has an article in a given language.
    pub coverage: f64,
    /// Number of random cross-concept links to add. Fewer are added when the
    /// store has too few candidate pairs.
    pub noise_links: usize,
    /// RNG seed.
    pub seed: u64,
}

/// In-memory [`EdgeSource`] holding generated links.
#[derive(Clone, Debug)]
pub struct SyntheticLinks {
    articles: Vec<ArticleId>,
    outgoing: HashMap<ArticleId, Vec<ArticleId>>,
    incoming: HashMap<ArticleId, Vec<ArticleId>>,
    link_count: usize,
}

impl SyntheticLinks {
    /// Generates a link store from `config`.
    ///
    /// # Errors
    /// Returns [`SyntheticError`] when the configuration is out of range.
    ///
    /// # Examples
    /// ```
    /// use conceptalign_benches::source::{SyntheticLinkConfig, SyntheticLinks};
    /// use conceptalign_core::EdgeSource;
    ///
    /// let links = SyntheticLinks::generate(&SyntheticLinkConfig {
    ///     concept_count: 10,
    ///     language_count: 3,
    ///     coverage: 1.0,
    ///     noise_links: 0,
    ///     seed: 7,
    /// })?;
    /// assert_eq!(links.valid_articles()?.count(), 30);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn generate(config: &SyntheticLinkConfig) -> Result<Self, SyntheticError> {
        let languages = validate(config)?;
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let mut links = Self {
            articles: Vec::new(),
            outgoing: HashMap::new(),
            incoming: HashMap::new(),
            link_count: 0,
        };

        let mut members = Vec::with_capacity(languages.len());
        for concept in 0..config.concept_count {
            let local_id = u32::try_from(concept).map_err(|_| SyntheticError::TooManyConcepts {
                concept_count: config.concept_count,
            })?;
            members.clear();
            for language in &languages {
                if rng.gen_bool(config.coverage) {
                    members.push(ArticleId::new(*language, local_id));
                }
            }
            if members.is_empty() {
                let index = rng.gen_range(0..languages.len());
                if let Some(language) = languages.get(index) {
                    members.push(ArticleId::new(*language, local_id));
                }
            }
            links.articles.extend(members.iter().copied());
            for source in &members {
                for dest in &members {
                    links.insert(*source, *dest);
                }
            }
        }

        let mut added = 0;
        let attempts = config.noise_links.saturating_mul(NOISE_ATTEMPTS_PER_LINK);
        for _ in 0..attempts {
            if added == config.noise_links {
                break;
            }
            let from = rng.gen_range(0..links.articles.len());
            let to = rng.gen_range(0..links.articles.len());
            let (Some(&source), Some(&dest)) = (links.articles.get(from), links.articles.get(to))
            else {
                continue;
            };
            if source.local_id() == dest.local_id() || source.language() == dest.language() {
                continue;
            }
            links.insert(source, dest);
            added += 1;
        }
        Ok(links)
    }

    /// Returns the number of stored links.
    #[must_use]
    pub const fn link_count(&self) -> usize {
        self.link_count
    }

    fn insert(&mut self, source: ArticleId, dest: ArticleId) {
        if Edge::new(source, dest).is_none() {
            return;
        }
        let targets = self.outgoing.entry(source).or_default();
        if targets.contains(&dest) {
            return;
        }
        targets.push(dest);
        self.incoming.entry(dest).or_default().push(source);
        self.link_count += 1;
    }
}

fn validate(config: &SyntheticLinkConfig) -> Result<Vec<Language>, SyntheticError> {
    if config.concept_count == 0 {
        return Err(SyntheticError::ZeroConcepts);
    }
    if u32::try_from(config.concept_count).is_err() {
        return Err(SyntheticError::TooManyConcepts {
            concept_count: config.concept_count,
        });
    }
    if !(2..=LANGUAGE_CODES.len()).contains(&config.language_count) {
        return Err(SyntheticError::InvalidLanguageCount {
            got: config.language_count,
            max: LANGUAGE_CODES.len(),
        });
    }
    if !(config.coverage > 0.0 && config.coverage <= 1.0) {
        return Err(SyntheticError::InvalidCoverage {
            got: config.coverage,
        });
    }
    LANGUAGE_CODES
        .iter()
        .take(config.language_count)
        .map(|code| Language::new(code).map_err(SyntheticError::from))
        .collect()
}

impl EdgeSource for SyntheticLinks {
    fn name(&self) -> &str {
        "synthetic"
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
