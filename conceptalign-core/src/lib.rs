//! Conceptalign core library.
//!
//! Groups Wikipedia articles connected by inter-language links into
//! language-independent concepts. Weak components of the link graph are
//! accepted whole when they hold one article per language, and otherwise
//! split by a per-language vote filter.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod article;
mod assigner;
mod builder;
mod concept;
mod diagnostics;
mod edge_source;
mod engine;
mod error;
mod graph;
mod resolver;
mod sink;
mod splitter;
mod traversal;
mod votes;

#[cfg(test)]
mod test_utils;

pub use crate::{
    article::{ArticleId, Edge, Language, LanguageError, MAX_LANGUAGE_CODE_LEN, ParseArticleIdError},
    assigner::ConceptAssigner,
    builder::{DEFAULT_MAX_VOTES_PER_LANG, DEFAULT_MIN_VOTES_RATIO, ResolverBuilder},
    concept::{ConceptCluster, ConceptId},
    diagnostics::{TitleLookup, render_cluster},
    edge_source::{ArticleIter, EdgeSource},
    engine::{ConceptResolutionEngine, EngineState, RunSummary},
    error::{
        ConceptAlignError, ConceptAlignErrorCode, EdgeSourceError, EdgeSourceErrorCode, ErrorKind,
        Result, SinkError,
    },
    graph::{LinkGraph, VertexId},
    resolver::Resolver,
    sink::ConceptSink,
    splitter::{ClusterSplitter, ComponentKind, RejectReason, SplitOutcome, SplitThresholds},
    traversal::{ComponentTraversal, Discovery},
    votes::VoteTally,
};
