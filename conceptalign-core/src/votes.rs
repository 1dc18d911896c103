//! Per-language vote accumulation.

use std::collections::BTreeMap;

use crate::article::Language;

/// Running count of distinct neighbours per language.
///
/// # Examples
/// ```
/// use conceptalign_core::{Language, VoteTally};
///
/// let en = Language::new("en")?;
/// let de = Language::new("de")?;
/// let mut tally = VoteTally::default();
/// tally.add(en, 2);
/// tally.add(en, 1);
/// tally.add(de, 1);
/// assert_eq!(tally.get(en), 3);
/// assert_eq!(tally.get(Language::new("fr")?), 0);
/// assert_eq!(tally.language_count(), 2);
/// # Ok::<(), conceptalign_core::LanguageError>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VoteTally {
    counts: BTreeMap<Language, usize>,
}

impl VoteTally {
    /// Adds `votes` to the running count for `language`. Adding zero is a
    /// no-op and does not register the language.
    pub fn add(&mut self, language: Language, votes: usize) {
        if votes == 0 {
            return;
        }
        let count = self.counts.entry(language).or_default();
        *count = count.saturating_add(votes);
    }

    /// Returns the count for `language`, or zero when it never voted.
    #[must_use]
    pub fn get(&self, language: Language) -> usize {
        self.counts.get(&language).copied().unwrap_or_default()
    }

    /// Returns the number of distinct languages with at least one vote.
    #[must_use]
    pub fn language_count(&self) -> usize {
        self.counts.len()
    }

    /// Iterates over `(language, count)` pairs in language order.
    pub fn iter(&self) -> impl Iterator<Item = (Language, usize)> + '_ {
        self.counts.iter().map(|(language, count)| (*language, *count))
    }
}

impl Extend<Language> for VoteTally {
    fn extend<I: IntoIterator<Item = Language>>(&mut self, iter: I) {
        for language in iter {
            self.add(language, 1);
        }
    }
}

impl FromIterator<Language> for VoteTally {
    fn from_iter<I: IntoIterator<Item = Language>>(iter: I) -> Self {
        let mut tally = Self::default();
        tally.extend(iter);
        tally
    }
}
