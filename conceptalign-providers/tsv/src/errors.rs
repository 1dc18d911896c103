use std::num::ParseIntError;

use conceptalign_core::LanguageError;
use thiserror::Error;

/// Errors raised while ingesting tab-separated records.
///
/// Line numbers are 1-based and count every physical line, including blank
/// lines and comments.
#[derive(Debug, Error)]
pub enum TsvProviderError {
    #[error("line {line}: expected {expected} tab-separated fields but found {found}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("line {line}: invalid language code: {source}")]
    InvalidLanguage {
        line: usize,
        #[source]
        source: LanguageError,
    },
    #[error("line {line}: invalid local id `{raw}`: {source}")]
    InvalidLocalId {
        line: usize,
        raw: String,
        #[source]
        source: ParseIntError,
    },
    #[error("line {line}: empty title")]
    EmptyTitle { line: usize },
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl TsvProviderError {
    /// Returns the offending line, when the error is tied to one.
    #[must_use]
    pub const fn line(&self) -> Option<usize> {
        match self {
            Self::FieldCount { line, .. }
            | Self::InvalidLanguage { line, .. }
            | Self::InvalidLocalId { line, .. }
            | Self::EmptyTitle { line } => Some(*line),
            Self::Io(_) => None,
        }
    }
}
