//! Vote-based disambiguation of weak components.
//!
//! A component holding exactly one article per language is accepted whole.
//! Otherwise each link in the component's induced sub-graph is kept only when
//! it is corroborated by votes:
//!
//! - the source does not link to more than `max_votes_per_lang` articles in
//!   the destination's language,
//! - at least `min_lang_votes` distinct languages link to the destination,
//! - the destination is not linked by more than `max_votes_per_lang` articles
//!   from the source's language.
//!
//! The weak components of the surviving links become the output clusters.
//! `min_lang_votes` is `floor(min_votes_ratio * language_count) - 1`, clamped
//! at zero; the `- 1` discounts the destination's own language. Both the bias
//! and the reuse of one tolerance for outgoing and incoming tallies are an
//! empirically tuned heuristic, reproduced as-is.

use std::{
    collections::{BTreeSet, HashMap},
    fmt,
    num::NonZeroUsize,
};

use tracing::{debug, instrument};

use crate::{
    Result,
    article::Language,
    edge_source::EdgeSource,
    graph::{LinkGraph, VertexId},
    traversal::local_components,
    votes::VoteTally,
};

/// Validated thresholds controlling the vote filter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitThresholds {
    min_votes_ratio: f64,
    max_votes_per_lang: NonZeroUsize,
}

impl SplitThresholds {
    pub(crate) const fn new(min_votes_ratio: f64, max_votes_per_lang: NonZeroUsize) -> Self {
        Self {
            min_votes_ratio,
            max_votes_per_lang,
        }
    }

    /// Returns the corroboration fraction in `(0, 1]`.
    #[must_use]
    pub const fn min_votes_ratio(&self) -> f64 {
        self.min_votes_ratio
    }

    /// Returns the per-language fan-out tolerance.
    #[must_use]
    pub const fn max_votes_per_lang(&self) -> NonZeroUsize {
        self.max_votes_per_lang
    }

    /// Returns how many distinct languages must link to a destination before
    /// links to it are trusted.
    ///
    /// # Examples
    /// ```
    /// use conceptalign_core::ResolverBuilder;
    ///
    /// let resolver = ResolverBuilder::new().with_min_votes_ratio(0.5).build()?;
    /// assert_eq!(resolver.thresholds().min_lang_votes(10), 4);
    /// assert_eq!(resolver.thresholds().min_lang_votes(1), 0);
    /// # Ok::<(), conceptalign_core::ConceptAlignError>(())
    /// ```
    #[must_use]
    pub fn min_lang_votes(&self, language_count: usize) -> usize {
        let corroborating = (self.min_votes_ratio * language_count as f64).floor();
        // Float-to-int casts saturate, so the ratio bound keeps this non-negative.
        (corroborating as usize).saturating_sub(1)
    }
}

/// Why the vote filter dropped a link.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// The source links to too many articles in the destination's language.
    SourceFanOut,
    /// Too few distinct languages link to the destination.
    WeakCorroboration,
    /// Too many articles in the source's language link to the destination.
    DestinationFanIn,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SourceFanOut => "source_fan_out",
            Self::WeakCorroboration => "weak_corroboration",
            Self::DestinationFanIn => "destination_fan_in",
        })
    }
}

/// Whether a component needed disambiguation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComponentKind {
    /// Exactly one article per language.
    Clean,
    /// Some language contributed several articles.
    Ambiguous,
}

/// Result of splitting one component.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitOutcome {
    kind: ComponentKind,
    language_count: usize,
    vertex_count: usize,
    min_lang_votes: usize,
    rejected_links: usize,
    subsets: Vec<Vec<VertexId>>,
}

impl SplitOutcome {
    /// Returns whether the component was clean or ambiguous.
    #[must_use]
    pub const fn kind(&self) -> ComponentKind {
        self.kind
    }

    /// Returns the ratio of distinct languages to vertices.
    #[must_use]
    pub fn clarity(&self) -> f64 {
        if self.vertex_count == 0 {
            return 0.0;
        }
        self.language_count as f64 / self.vertex_count as f64
    }

    /// Returns the number of distinct languages in the component.
    #[must_use]
    pub const fn language_count(&self) -> usize {
        self.language_count
    }

    /// Returns the corroboration threshold applied, zero for clean components.
    #[must_use]
    pub const fn min_lang_votes(&self) -> usize {
        self.min_lang_votes
    }

    /// Returns how many induced links the vote filter dropped.
    #[must_use]
    pub const fn rejected_links(&self) -> usize {
        self.rejected_links
    }

    /// Returns the output vertex subsets in discovery order.
    #[must_use]
    pub fn subsets(&self) -> &[Vec<VertexId>] {
        &self.subsets
    }

    /// Consumes the outcome, returning the subsets.
    #[must_use]
    pub fn into_subsets(self) -> Vec<Vec<VertexId>> {
        self.subsets
    }
}

/// Decides whether a component is one concept or must be split.
#[derive(Clone, Copy, Debug)]
pub struct ClusterSplitter {
    thresholds: SplitThresholds,
}

/// Induced sub-graph of one component over local indices.
struct Induced {
    vertices: Vec<VertexId>,
    languages: Vec<Language>,
    out: Vec<Vec<usize>>,
}

impl ClusterSplitter {
    /// Creates a splitter applying `thresholds`.
    #[must_use]
    pub const fn new(thresholds: SplitThresholds) -> Self {
        Self { thresholds }
    }

    /// Returns the configured thresholds.
    #[must_use]
    pub const fn thresholds(&self) -> SplitThresholds {
        self.thresholds
    }

    /// Splits `component` into one or more vertex subsets.
    ///
    /// Neighbour lists are fetched once per vertex and cached for the
    /// duration of the call.
    ///
    /// # Errors
    /// Propagates [`crate::ConceptAlignError::GraphAccess`] from neighbour
    /// queries.
    #[instrument(
        name = "core.split",
        level = "debug",
        err,
        skip(self, graph, component),
        fields(vertices = component.len()),
    )]
    pub fn split<S: EdgeSource + ?Sized>(
        &self,
        graph: &LinkGraph<'_, S>,
        component: &[VertexId],
    ) -> Result<SplitOutcome> {
        let languages = component
            .iter()
            .map(|vertex| graph.language(*vertex))
            .collect::<Result<Vec<_>>>()?;
        let language_count = languages.iter().collect::<BTreeSet<_>>().len();

        if language_count == component.len() {
            return Ok(SplitOutcome {
                kind: ComponentKind::Clean,
                language_count,
                vertex_count: component.len(),
                min_lang_votes: 0,
                rejected_links: 0,
                subsets: vec![component.to_vec()],
            });
        }

        let induced = induce(graph, component, languages)?;
        let min_lang_votes = self.thresholds.min_lang_votes(language_count);
        let (adjacency, rejected_links) = self.filter(graph, &induced, min_lang_votes);

        let subsets: Vec<Vec<VertexId>> = local_components(&adjacency)
            .into_iter()
            .map(|members| {
                members
                    .into_iter()
                    .filter_map(|local| induced.vertices.get(local).copied())
                    .collect()
            })
            .collect();

        debug!(
            language_count,
            min_lang_votes,
            rejected_links,
            subsets = subsets.len(),
            "split ambiguous component"
        );

        Ok(SplitOutcome {
            kind: ComponentKind::Ambiguous,
            language_count,
            vertex_count: component.len(),
            min_lang_votes,
            rejected_links,
            subsets,
        })
    }

    /// Applies the vote predicates, returning the undirected adjacency of the
    /// surviving links and the number of links dropped.
    fn filter<S: EdgeSource + ?Sized>(
        &self,
        graph: &LinkGraph<'_, S>,
        induced: &Induced,
        min_lang_votes: usize,
    ) -> (Vec<Vec<usize>>, usize) {
        let language_of = |local: usize| induced.languages.get(local).copied();

        let out_votes: Vec<VoteTally> = induced
            .out
            .iter()
            .map(|targets| targets.iter().filter_map(|w| language_of(*w)).collect())
            .collect();
        let mut in_votes = vec![VoteTally::default(); induced.vertices.len()];
        for (source, targets) in induced.out.iter().enumerate() {
            let Some(source_language) = language_of(source) else {
                continue;
            };
            for target in targets {
                if let Some(tally) = in_votes.get_mut(*target) {
                    tally.add(source_language, 1);
                }
            }
        }

        let max_votes = self.thresholds.max_votes_per_lang.get();
        let mut adjacency = vec![Vec::new(); induced.vertices.len()];
        let mut rejected = 0;
        for (source, targets) in induced.out.iter().enumerate() {
            let (Some(source_language), Some(source_votes)) =
                (language_of(source), out_votes.get(source))
            else {
                continue;
            };
            for &target in targets {
                let (Some(target_language), Some(target_votes)) =
                    (language_of(target), in_votes.get(target))
                else {
                    continue;
                };
                let verdict = if source_votes.get(target_language) > max_votes {
                    Some(RejectReason::SourceFanOut)
                } else if target_votes.language_count() < min_lang_votes {
                    Some(RejectReason::WeakCorroboration)
                } else if target_votes.get(source_language) > max_votes {
                    Some(RejectReason::DestinationFanIn)
                } else {
                    None
                };

                match verdict {
                    None => {
                        push_link(&mut adjacency, source, target);
                        push_link(&mut adjacency, target, source);
                    }
                    Some(reason) => {
                        rejected += 1;
                        debug!(
                            source = %display_vertex(graph, induced, source),
                            dest = %display_vertex(graph, induced, target),
                            %reason,
                            "dropping uncorroborated link"
                        );
                    }
                }
            }
        }
        (adjacency, rejected)
    }
}

fn induce<S: EdgeSource + ?Sized>(
    graph: &LinkGraph<'_, S>,
    component: &[VertexId],
    languages: Vec<Language>,
) -> Result<Induced> {
    let positions: HashMap<VertexId, usize> = component
        .iter()
        .enumerate()
        .map(|(local, vertex)| (*vertex, local))
        .collect();
    let out = component
        .iter()
        .map(|vertex| {
            graph.neighbors_out(*vertex).map(|targets| {
                targets
                    .into_iter()
                    .filter_map(|target| positions.get(&target).copied())
                    .collect()
            })
        })
        .collect::<Result<Vec<Vec<usize>>>>()?;
    Ok(Induced {
        vertices: component.to_vec(),
        languages,
        out,
    })
}

fn push_link(adjacency: &mut [Vec<usize>], from: usize, to: usize) {
    if let Some(links) = adjacency.get_mut(from) {
        links.push(to);
    }
}

fn display_vertex<S: EdgeSource + ?Sized>(
    graph: &LinkGraph<'_, S>,
    induced: &Induced,
    local: usize,
) -> String {
    induced
        .vertices
        .get(local)
        .and_then(|vertex| graph.article(*vertex))
        .map_or_else(|| format!("#{local}"), |article| article.to_string())
}
