//! Article identities and inter-language link records.
//!
//! An [`ArticleId`] names one article inside one language edition. It is
//! `Copy` so vertex bookkeeping never clones heap data; language codes are
//! stored inline.

use std::{cmp::Ordering, fmt, num::ParseIntError, str::FromStr};

use thiserror::Error;

/// Longest language-edition code accepted by [`Language`].
pub const MAX_LANGUAGE_CODE_LEN: usize = 15;

/// Errors raised while parsing a [`Language`] code.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum LanguageError {
    /// The code was empty.
    #[error("language code must not be empty")]
    Empty,
    /// The code exceeded [`MAX_LANGUAGE_CODE_LEN`] bytes.
    #[error("language code `{code}` is longer than {MAX_LANGUAGE_CODE_LEN} bytes")]
    TooLong {
        /// The rejected code.
        code: String,
    },
    /// The code contained a character outside `[a-z0-9_-]`.
    #[error("language code `{code}` contains invalid character {character:?}")]
    InvalidCharacter {
        /// The rejected code.
        code: String,
        /// First offending character.
        character: char,
    },
}

/// A Wikipedia language-edition code such as `en` or `zh-min-nan`.
///
/// Codes are normalised to ASCII lowercase on construction and ordered
/// lexicographically.
///
/// # Examples
/// ```
/// use conceptalign_core::Language;
///
/// let en: Language = "EN".parse()?;
/// assert_eq!(en.as_str(), "en");
/// assert!(en < Language::new("fr")?);
/// # Ok::<(), conceptalign_core::LanguageError>(())
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Language {
    len: u8,
    bytes: [u8; MAX_LANGUAGE_CODE_LEN],
}

impl Language {
    /// Parses and normalises a language code.
    ///
    /// # Errors
    /// Returns [`LanguageError`] when the code is empty, too long, or contains
    /// characters other than ASCII letters, digits, `-` and `_`.
    pub fn new(code: &str) -> Result<Self, LanguageError> {
        let trimmed = code.trim();
        if trimmed.is_empty() {
            return Err(LanguageError::Empty);
        }
        if trimmed.len() > MAX_LANGUAGE_CODE_LEN {
            return Err(LanguageError::TooLong {
                code: trimmed.to_owned(),
            });
        }
        if let Some(character) = trimmed
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(LanguageError::InvalidCharacter {
                code: trimmed.to_owned(),
                character,
            });
        }

        let mut bytes = [0_u8; MAX_LANGUAGE_CODE_LEN];
        for (slot, byte) in bytes.iter_mut().zip(trimmed.bytes()) {
            *slot = byte.to_ascii_lowercase();
        }
        let len = u8::try_from(trimmed.len()).map_err(|_| LanguageError::TooLong {
            code: trimmed.to_owned(),
        })?;
        Ok(Self { len, bytes })
    }

    /// Returns the normalised code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Construction only stores ASCII, so the slice is always valid UTF-8.
        self.bytes
            .get(..usize::from(self.len))
            .and_then(|raw| std::str::from_utf8(raw).ok())
            .unwrap_or_default()
    }
}

impl Ord for Language {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl PartialOrd for Language {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for Language {
    type Err = LanguageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Language").field(&self.as_str()).finish()
    }
}

/// Errors raised while parsing an [`ArticleId`] from `lang:id` form.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ParseArticleIdError {
    /// The input did not contain a `:` separator.
    #[error("article id `{input}` must have the form `lang:id`")]
    MissingSeparator {
        /// The rejected input.
        input: String,
    },
    /// The language half was invalid.
    #[error(transparent)]
    Language(#[from] LanguageError),
    /// The numeric half was invalid.
    #[error("invalid local id: {0}")]
    LocalId(#[from] ParseIntError),
}

/// One article in one language edition.
///
/// Ordered by language code, then local id.
///
/// # Examples
/// ```
/// use conceptalign_core::{ArticleId, Language};
///
/// let id: ArticleId = "de:5".parse()?;
/// assert_eq!(id.language(), Language::new("de")?);
/// assert_eq!(id.local_id(), 5);
/// assert_eq!(id.to_string(), "de:5");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArticleId {
    language: Language,
    local_id: u32,
}

impl ArticleId {
    /// Creates an article identifier.
    #[must_use]
    pub const fn new(language: Language, local_id: u32) -> Self {
        Self { language, local_id }
    }

    /// Returns the language edition.
    #[must_use]
    pub const fn language(self) -> Language {
        self.language
    }

    /// Returns the edition-local page id.
    #[must_use]
    pub const fn local_id(self) -> u32 {
        self.local_id
    }
}

impl FromStr for ArticleId {
    type Err = ParseArticleIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (language, local_id) =
            s.rsplit_once(':')
                .ok_or_else(|| ParseArticleIdError::MissingSeparator {
                    input: s.to_owned(),
                })?;
        Ok(Self::new(
            Language::new(language)?,
            local_id.trim().parse()?,
        ))
    }
}

impl fmt::Display for ArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.language, self.local_id)
    }
}

/// A directed inter-language link asserting topic equivalence.
///
/// Links between two articles of the same language are invalid and cannot be
/// constructed.
///
/// # Examples
/// ```
/// use conceptalign_core::{ArticleId, Edge};
///
/// let en: ArticleId = "en:1".parse()?;
/// let de: ArticleId = "de:5".parse()?;
/// let other_en: ArticleId = "en:2".parse()?;
/// assert!(Edge::new(en, de).is_some());
/// assert!(Edge::new(en, other_en).is_none());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    source: ArticleId,
    dest: ArticleId,
}

impl Edge {
    /// Creates a link, returning `None` for same-language pairs.
    #[must_use]
    pub fn new(source: ArticleId, dest: ArticleId) -> Option<Self> {
        (source.language() != dest.language()).then_some(Self { source, dest })
    }

    /// Returns the linking article.
    #[must_use]
    pub const fn source(self) -> ArticleId {
        self.source
    }

    /// Returns the linked article.
    #[must_use]
    pub const fn dest(self) -> ArticleId {
        self.dest
    }
}
