//! Orchestration of one concept-resolution run.
//!
//! The engine drives [`ComponentTraversal`] over the whole article universe,
//! hands each component to the [`ClusterSplitter`], and gives every resulting
//! subset a concept id through the [`ConceptAssigner`]. Output is held back
//! until the traversal completes; a run that fails or is cancelled during the
//! traversal publishes nothing.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tracing::{info, instrument, warn};

use crate::{
    Result,
    assigner::ConceptAssigner,
    concept::ConceptCluster,
    diagnostics::{TitleLookup, render_cluster},
    edge_source::EdgeSource,
    error::ConceptAlignError,
    graph::{LinkGraph, VertexId},
    sink::ConceptSink,
    splitter::{ClusterSplitter, ComponentKind, SplitThresholds},
    traversal::{ComponentTraversal, Discovery},
};

/// Lifecycle of a [`ConceptResolutionEngine`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    /// The engine has not run yet.
    Running,
    /// The engine has run, successfully or not, and cannot be resumed.
    Finished,
}

/// Counters describing a completed run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Valid articles enumerated by the edge source.
    pub articles: usize,
    /// Components with at least one link that were processed.
    pub components_processed: usize,
    /// Components holding exactly one article per language.
    pub clean_components: usize,
    /// Components needing vote-based disambiguation.
    pub ambiguous_components: usize,
    /// Ambiguous components that produced more than one cluster.
    pub ambiguous_components_split: usize,
    /// Articles without any admissible link, each given its own concept.
    pub isolated_articles: usize,
    /// Clusters published to the sink.
    pub clusters_emitted: usize,
    /// Induced links dropped by the vote filter.
    pub rejected_links: usize,
}

/// Single-threaded driver for one resolution run.
///
/// The visited set and the id counter live inside one run and are never
/// shared; the engine is not meant to be sent across threads mid-run.
///
/// # Examples
/// ```
/// use std::collections::HashMap;
/// use conceptalign_core::{ArticleId, ArticleIter, ConceptCluster, EdgeSource, EdgeSourceError, EngineState, ResolverBuilder};
///
/// struct Pair(ArticleId, ArticleId);
///
/// impl EdgeSource for Pair {
///     fn name(&self) -> &str { "pair" }
///     fn edges_from(&self, article: ArticleId) -> Result<Vec<ArticleId>, EdgeSourceError> {
///         Ok(if article == self.0 { vec![self.1] } else { Vec::new() })
///     }
///     fn edges_to(&self, article: ArticleId) -> Result<Vec<ArticleId>, EdgeSourceError> {
///         Ok(if article == self.1 { vec![self.0] } else { Vec::new() })
///     }
///     fn valid_articles(&self) -> Result<ArticleIter<'_>, EdgeSourceError> {
///         Ok(Box::new([self.0, self.1].into_iter()))
///     }
/// }
///
/// let en: ArticleId = "en:1".parse()?;
/// let titles = HashMap::from([(en, "Tree".to_owned())]);
/// let store = Pair(en, "de:5".parse()?);
/// let resolver = ResolverBuilder::new().with_print_diagnostics(true).build()?;
/// let mut engine = resolver.engine(&store).with_title_lookup(&titles);
/// assert_eq!(engine.state(), EngineState::Running);
///
/// let mut clusters: Vec<ConceptCluster> = Vec::new();
/// let summary = engine.run(&mut clusters)?;
/// assert_eq!(summary.components_processed, 1);
/// assert_eq!(engine.state(), EngineState::Finished);
/// assert!(engine.run(&mut clusters).is_err());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct ConceptResolutionEngine<'a, S: EdgeSource + ?Sized> {
    source: &'a S,
    splitter: ClusterSplitter,
    print_diagnostics: bool,
    titles: Option<&'a dyn TitleLookup>,
    cancellation: Option<Arc<AtomicBool>>,
    state: EngineState,
}

/// Output accumulated while a run is in progress.
struct RunState {
    assigner: ConceptAssigner,
    clusters: Vec<ConceptCluster>,
    summary: RunSummary,
}

impl<'a, S: EdgeSource + ?Sized> ConceptResolutionEngine<'a, S> {
    pub(crate) fn new(source: &'a S, thresholds: SplitThresholds, print_diagnostics: bool) -> Self {
        Self {
            source,
            splitter: ClusterSplitter::new(thresholds),
            print_diagnostics,
            titles: None,
            cancellation: None,
            state: EngineState::Running,
        }
    }

    /// Supplies the title lookup used by cluster dumps.
    #[must_use]
    pub fn with_title_lookup(mut self, titles: &'a dyn TitleLookup) -> Self {
        self.titles = Some(titles);
        self
    }

    /// Installs a cancellation flag polled between components.
    ///
    /// Setting the flag makes [`Self::run`] return
    /// [`ConceptAlignError::Cancelled`] without publishing anything.
    #[must_use]
    pub fn with_cancellation(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancellation = Some(flag);
        self
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> EngineState {
        self.state
    }

    /// Resolves every article into a concept and publishes the clusters to
    /// `sink` in traversal order.
    ///
    /// Clusters reach the sink only after the whole traversal succeeded. When
    /// the sink refuses a cluster, publication stops there and the clusters
    /// it already accepted remain; callers must discard them. The engine is
    /// finished afterwards, whatever the outcome.
    ///
    /// # Errors
    /// Returns [`ConceptAlignError::AlreadyFinished`] on reuse,
    /// [`ConceptAlignError::MissingTitleLookup`] when diagnostics lack titles,
    /// [`ConceptAlignError::GraphAccess`] when the edge source fails,
    /// [`ConceptAlignError::Cancelled`] when the cancellation flag is set,
    /// [`ConceptAlignError::Sink`] when the sink refuses a cluster, and
    /// [`ConceptAlignError::InvariantViolation`] on internal defects.
    #[instrument(
        name = "core.run",
        err,
        skip(self, sink),
        fields(
            data_source = %self.source.name(),
            min_votes_ratio = self.splitter.thresholds().min_votes_ratio(),
            max_votes_per_lang = self.splitter.thresholds().max_votes_per_lang().get(),
        ),
    )]
    pub fn run<K: ConceptSink + ?Sized>(&mut self, sink: &mut K) -> Result<RunSummary> {
        if self.state == EngineState::Finished {
            return Err(ConceptAlignError::AlreadyFinished);
        }
        self.state = EngineState::Finished;
        if self.print_diagnostics && self.titles.is_none() {
            return Err(ConceptAlignError::MissingTitleLookup);
        }

        let RunState {
            clusters,
            mut summary,
            ..
        } = self.resolve()?;

        for cluster in clusters {
            sink.emit(cluster)
                .map_err(|error| ConceptAlignError::Sink { error })?;
            summary.clusters_emitted += 1;
            record_cluster_emitted();
        }

        info!(
            articles = summary.articles,
            components = summary.components_processed,
            ambiguous = summary.ambiguous_components,
            split = summary.ambiguous_components_split,
            isolated = summary.isolated_articles,
            clusters = summary.clusters_emitted,
            rejected_links = summary.rejected_links,
            "concept resolution completed"
        );
        Ok(summary)
    }

    fn resolve(&self) -> Result<RunState> {
        let graph = LinkGraph::try_new(self.source)?;
        if graph.is_empty() {
            warn!(data_source = graph.name(), "edge source has no valid articles");
        }

        let mut traversal = ComponentTraversal::new(graph.len());
        let mut state = RunState {
            assigner: ConceptAssigner::new(graph.len()),
            clusters: Vec::new(),
            summary: RunSummary {
                articles: graph.len(),
                ..RunSummary::default()
            },
        };

        loop {
            self.check_cancelled(&state.summary)?;
            let Some(discovery) = traversal.next_discovery(&graph)? else {
                break;
            };
            match discovery {
                Discovery::Isolated(vertex) => {
                    state.summary.isolated_articles += 1;
                    let cluster = state.assigner.assign(&graph, &[vertex])?;
                    state.clusters.push(cluster);
                }
                Discovery::Component(vertices) => {
                    self.process_component(&graph, vertices, &mut state)?;
                }
            }
        }

        if state.assigner.assigned() != graph.len() {
            return Err(ConceptAlignError::invariant(
                "every article belongs to exactly one concept",
                format!(
                    "{} of {} articles were assigned",
                    state.assigner.assigned(),
                    graph.len()
                ),
            ));
        }
        Ok(state)
    }

    fn process_component(
        &self,
        graph: &LinkGraph<'_, S>,
        vertices: &[VertexId],
        state: &mut RunState,
    ) -> Result<()> {
        let outcome = self.splitter.split(graph, vertices)?;
        let summary = &mut state.summary;
        summary.components_processed += 1;
        match outcome.kind() {
            ComponentKind::Clean => summary.clean_components += 1,
            ComponentKind::Ambiguous => summary.ambiguous_components += 1,
        }
        let split = outcome.subsets().len() > 1;
        if split {
            summary.ambiguous_components_split += 1;
        }
        summary.rejected_links += outcome.rejected_links();
        record_component(split, outcome.rejected_links());

        let ambiguous = outcome.kind() == ComponentKind::Ambiguous;
        for subset in outcome.into_subsets() {
            let cluster = state.assigner.assign(graph, &subset)?;
            if let Some(titles) = self.diagnostic_titles() {
                info!(
                    target: "conceptalign::diagnostics",
                    concept = cluster.id().get(),
                    ambiguous,
                    "{}",
                    render_cluster(&cluster, titles)
                );
            }
            state.clusters.push(cluster);
        }
        Ok(())
    }

    fn diagnostic_titles(&self) -> Option<&'a dyn TitleLookup> {
        self.titles.filter(|_| self.print_diagnostics)
    }

    fn check_cancelled(&self, summary: &RunSummary) -> Result<()> {
        let cancelled = self
            .cancellation
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Acquire));
        if cancelled {
            warn!(
                components = summary.components_processed,
                "concept resolution cancelled; discarding partial output"
            );
            return Err(ConceptAlignError::Cancelled {
                components_processed: summary.components_processed,
            });
        }
        Ok(())
    }
}

#[cfg(feature = "metrics")]
fn record_component(split: bool, rejected_links: usize) {
    metrics::counter!("concept_components_processed").increment(1);
    if split {
        metrics::counter!("concept_ambiguous_components_split").increment(1);
    }
    metrics::counter!("concept_edges_rejected").increment(rejected_links as u64);
}

#[cfg(not(feature = "metrics"))]
fn record_component(_split: bool, _rejected_links: usize) {}

#[cfg(feature = "metrics")]
fn record_cluster_emitted() {
    metrics::counter!("concept_clusters_emitted").increment(1);
}

#[cfg(not(feature = "metrics"))]
fn record_cluster_emitted() {}


#[cfg(test)]
mod property;
