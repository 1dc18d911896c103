//! Error types for the conceptalign core library.
//!
//! Defines the error enums exposed by the public API, their stable
//! machine-readable codes, and a convenient result alias.

use std::{fmt, sync::Arc};

use thiserror::Error;

use crate::article::ArticleId;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced by [`crate::EdgeSource`] implementations.
///
/// Edge queries are total: unknown articles yield empty neighbour sets, so
/// these variants describe genuine store failures only.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum EdgeSourceError {
    /// The backing store could not answer the query.
    #[error("edge store failure: {message}")]
    Backend {
        /// Description supplied by the store implementation.
        message: Arc<str>,
    },
    /// The store returned a record it could not decode.
    #[error("corrupt link record for {article}: {reason}")]
    Corrupt {
        /// Article whose links were being read.
        article: ArticleId,
        /// Why the record was rejected.
        reason: Arc<str>,
    },
}

define_error_codes! {
    /// Stable codes describing [`EdgeSourceError`] variants.
    enum EdgeSourceErrorCode for EdgeSourceError {
        /// The backing store could not answer the query.
        Backend => Backend { .. } => "EDGE_SOURCE_BACKEND",
        /// The store returned a record it could not decode.
        Corrupt => Corrupt { .. } => "EDGE_SOURCE_CORRUPT",
    }
}

/// An error produced by [`crate::ConceptSink`] implementations.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum SinkError {
    /// The sink refused a cluster.
    #[error("sink rejected concept {concept}: {message}")]
    Rejected {
        /// Identifier of the rejected concept.
        concept: u64,
        /// Description supplied by the sink implementation.
        message: Arc<str>,
    },
}

/// Coarse classification of [`ConceptAlignError`] variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// Thresholds or collaborators were misconfigured; raised before traversal.
    Configuration,
    /// The edge store failed; the run was aborted and nothing was published.
    GraphAccess,
    /// An internal defect was detected.
    InvariantViolation,
    /// The concept sink refused output.
    Sink,
    /// The engine was cancelled or reused after finishing.
    Lifecycle,
}

/// Error type produced when configuring or running concept resolution.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConceptAlignError {
    /// `min_votes_ratio` must lie in `(0, 1]`.
    #[error("min_votes_ratio must be in (0, 1] (got {got})")]
    InvalidMinVotesRatio {
        /// The rejected ratio.
        got: f64,
    },
    /// `max_votes_per_lang` must be at least one.
    #[error("max_votes_per_lang must be at least 1 (got {got})")]
    InvalidMaxVotesPerLang {
        /// The rejected tolerance.
        got: usize,
    },
    /// Diagnostics were requested without a title lookup.
    #[error("print_diagnostics requires a title lookup")]
    MissingTitleLookup,
    /// An [`crate::EdgeSource`] query failed while running the algorithm.
    #[error("edge source `{data_source}` failed: {error}")]
    GraphAccess {
        /// Identifier for the edge source that produced the error.
        data_source: Arc<str>,
        #[source]
        /// Underlying store error.
        error: EdgeSourceError,
    },
    /// An internal invariant was broken.
    #[error("invariant violated: {invariant} ({detail})")]
    InvariantViolation {
        /// The invariant that failed.
        invariant: &'static str,
        /// Context describing the failing values.
        detail: String,
    },
    /// The sink refused a finished cluster.
    #[error("concept sink failed: {error}")]
    Sink {
        #[source]
        /// Underlying sink error.
        error: SinkError,
    },
    /// The run was cancelled between components.
    #[error("concept resolution cancelled after {components_processed} components")]
    Cancelled {
        /// Components fully processed before the cancellation was observed.
        components_processed: usize,
    },
    /// [`crate::ConceptResolutionEngine::run`] was called on a finished engine.
    #[error("concept resolution engine has already finished")]
    AlreadyFinished,
}

define_error_codes! {
    /// Stable codes describing [`ConceptAlignError`] variants.
    enum ConceptAlignErrorCode for ConceptAlignError {
        /// `min_votes_ratio` must lie in `(0, 1]`.
        InvalidMinVotesRatio => InvalidMinVotesRatio { .. } => "CONCEPTALIGN_INVALID_MIN_VOTES_RATIO",
        /// `max_votes_per_lang` must be at least one.
        InvalidMaxVotesPerLang => InvalidMaxVotesPerLang { .. } => "CONCEPTALIGN_INVALID_MAX_VOTES_PER_LANG",
        /// Diagnostics were requested without a title lookup.
        MissingTitleLookup => MissingTitleLookup => "CONCEPTALIGN_MISSING_TITLE_LOOKUP",
        /// An edge source query failed.
        GraphAccess => GraphAccess { .. } => "CONCEPTALIGN_GRAPH_ACCESS",
        /// An internal invariant was broken.
        InvariantViolation => InvariantViolation { .. } => "CONCEPTALIGN_INVARIANT_VIOLATION",
        /// The sink refused a finished cluster.
        Sink => Sink { .. } => "CONCEPTALIGN_SINK_FAILURE",
        /// The run was cancelled between components.
        Cancelled => Cancelled { .. } => "CONCEPTALIGN_CANCELLED",
        /// The engine was reused after finishing.
        AlreadyFinished => AlreadyFinished => "CONCEPTALIGN_ALREADY_FINISHED",
    }
}

impl ConceptAlignError {
    /// Classify this error into the coarse [`ErrorKind`] taxonomy.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidMinVotesRatio { .. }
            | Self::InvalidMaxVotesPerLang { .. }
            | Self::MissingTitleLookup => ErrorKind::Configuration,
            Self::GraphAccess { .. } => ErrorKind::GraphAccess,
            Self::InvariantViolation { .. } => ErrorKind::InvariantViolation,
            Self::Sink { .. } => ErrorKind::Sink,
            Self::Cancelled { .. } | Self::AlreadyFinished => ErrorKind::Lifecycle,
        }
    }

    /// Retrieve the inner [`EdgeSourceErrorCode`] when the error originated in an edge store.
    #[must_use]
    pub const fn edge_source_code(&self) -> Option<EdgeSourceErrorCode> {
        match self {
            Self::GraphAccess { error, .. } => Some(error.code()),
            _ => None,
        }
    }

    pub(crate) fn invariant(invariant: &'static str, detail: impl Into<String>) -> Self {
        Self::InvariantViolation {
            invariant,
            detail: detail.into(),
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, ConceptAlignError>;
