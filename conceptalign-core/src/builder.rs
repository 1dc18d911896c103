//! Builder utilities for configuring concept resolution.
//!
//! Exposes the threshold surface and the validation performed before a
//! [`Resolver`] is constructed, so misconfiguration fails before any
//! traversal starts.

use std::num::NonZeroUsize;

use crate::{Result, error::ConceptAlignError, resolver::Resolver, splitter::SplitThresholds};

/// Default corroboration fraction.
pub const DEFAULT_MIN_VOTES_RATIO: f64 = 0.5;
/// Default per-language fan-out tolerance.
pub const DEFAULT_MAX_VOTES_PER_LANG: usize = 1;

/// Configures and constructs [`Resolver`] instances.
///
/// # Examples
/// ```
/// use conceptalign_core::ResolverBuilder;
///
/// let resolver = ResolverBuilder::new()
///     .with_min_votes_ratio(0.75)
///     .with_max_votes_per_lang(2)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(resolver.thresholds().min_votes_ratio(), 0.75);
/// assert_eq!(resolver.thresholds().max_votes_per_lang().get(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct ResolverBuilder {
    min_votes_ratio: f64,
    max_votes_per_lang: usize,
    print_diagnostics: bool,
}

impl Default for ResolverBuilder {
    fn default() -> Self {
        Self {
            min_votes_ratio: DEFAULT_MIN_VOTES_RATIO,
            max_votes_per_lang: DEFAULT_MAX_VOTES_PER_LANG,
            print_diagnostics: false,
        }
    }
}

impl ResolverBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use conceptalign_core::ResolverBuilder;
    ///
    /// let builder = ResolverBuilder::new();
    /// assert_eq!(builder.min_votes_ratio(), 0.5);
    /// assert_eq!(builder.max_votes_per_lang(), 1);
    /// assert!(!builder.print_diagnostics());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the fraction of a component's languages that must
    /// corroborate a destination.
    #[must_use]
    pub fn with_min_votes_ratio(mut self, ratio: f64) -> Self {
        self.min_votes_ratio = ratio;
        self
    }

    /// Returns the configured corroboration fraction.
    #[must_use]
    pub fn min_votes_ratio(&self) -> f64 {
        self.min_votes_ratio
    }

    /// Overrides how many same-language candidates one article may link to, or
    /// be linked from, before those links are distrusted.
    #[must_use]
    pub fn with_max_votes_per_lang(mut self, votes: usize) -> Self {
        self.max_votes_per_lang = votes;
        self
    }

    /// Returns the configured fan-out tolerance.
    #[must_use]
    pub fn max_votes_per_lang(&self) -> usize {
        self.max_votes_per_lang
    }

    /// Enables human-readable cluster dumps. Runs then require a
    /// [`crate::TitleLookup`].
    #[must_use]
    pub fn with_print_diagnostics(mut self, enabled: bool) -> Self {
        self.print_diagnostics = enabled;
        self
    }

    /// Returns whether cluster dumps are enabled.
    #[must_use]
    pub fn print_diagnostics(&self) -> bool {
        self.print_diagnostics
    }

    /// Validates the configuration and constructs a [`Resolver`].
    ///
    /// # Errors
    /// Returns [`ConceptAlignError::InvalidMinVotesRatio`] unless the ratio is
    /// in `(0, 1]`, and [`ConceptAlignError::InvalidMaxVotesPerLang`] when the
    /// tolerance is zero.
    ///
    /// # Examples
    /// ```
    /// use conceptalign_core::{ConceptAlignError, ResolverBuilder};
    ///
    /// let err = ResolverBuilder::new()
    ///     .with_min_votes_ratio(0.0)
    ///     .build()
    ///     .expect_err("zero ratio is invalid");
    /// assert!(matches!(err, ConceptAlignError::InvalidMinVotesRatio { .. }));
    /// ```
    pub fn build(self) -> Result<Resolver> {
        let ratio = self.min_votes_ratio;
        if !(ratio > 0.0 && ratio <= 1.0) {
            return Err(ConceptAlignError::InvalidMinVotesRatio { got: ratio });
        }
        let max_votes_per_lang = NonZeroUsize::new(self.max_votes_per_lang).ok_or(
            ConceptAlignError::InvalidMaxVotesPerLang {
                got: self.max_votes_per_lang,
            },
        )?;

        Ok(Resolver::new(
            SplitThresholds::new(ratio, max_votes_per_lang),
            self.print_diagnostics,
        ))
    }
}
