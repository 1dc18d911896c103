//! Property tests for whole resolution runs over generated link graphs.
//!
//! Properties verified:
//! 1. **Partition**: every article lands in exactly one cluster and ids run
//!    from 1 without gaps.
//! 2. **Determinism**: repeated runs over the same store agree exactly.
//! 3. **Refinement**: clusters never straddle weak components, and components
//!    holding one article per language are emitted whole.
//! 4. **Monotonicity**: loosening either threshold never yields more clusters.

use std::collections::{BTreeSet, HashMap};

use proptest::{
    prelude::*,
    test_runner::{TestCaseError, TestCaseResult},
};
use test_strategy::Arbitrary;

use crate::{
    ArticleId, ConceptCluster, ResolverBuilder,
    test_utils::{MemorySource, suite_proptest_config},
};

const LANGUAGES: [&str; 5] = ["en", "de", "fr", "it", "ja"];

/// Generated link store: raw `(lang, id, lang, id)` tuples plus a few
/// unlinked articles.
#[derive(Clone, Debug, Arbitrary)]
struct LinkFixture {
    #[strategy(proptest::collection::vec((0..5_usize, 0..3_u32, 0..5_usize, 0..3_u32), 0..32))]
    links: Vec<(usize, u32, usize, u32)>,
    #[strategy(proptest::collection::vec((0..5_usize, 3..6_u32), 0..4))]
    loners: Vec<(usize, u32)>,
}

impl LinkFixture {
    fn render(language: usize, id: u32) -> String {
        format!("{}:{id}", LANGUAGES.get(language).copied().unwrap_or("en"))
    }

    fn source(&self) -> MemorySource {
        let owned: Vec<(String, String)> = self
            .links
            .iter()
            .map(|&(sl, si, dl, di)| (Self::render(sl, si), Self::render(dl, di)))
            .collect();
        let pairs: Vec<(&str, &str)> = owned
            .iter()
            .map(|(from, to)| (from.as_str(), to.as_str()))
            .collect();
        let loners: Vec<String> = self
            .loners
            .iter()
            .map(|&(language, id)| Self::render(language, id))
            .collect();
        let loner_refs: Vec<&str> = loners.iter().map(String::as_str).collect();
        MemorySource::from_links(&pairs).with_articles(&loner_refs)
    }

    /// Weak components over cross-language links, computed independently of
    /// the traversal under test.
    fn components(&self, universe: &[ArticleId]) -> Vec<BTreeSet<ArticleId>> {
        let mut parent: HashMap<ArticleId, ArticleId> =
            universe.iter().map(|article| (*article, *article)).collect();
        fn find(parent: &mut HashMap<ArticleId, ArticleId>, article: ArticleId) -> ArticleId {
            let mut root = article;
            while let Some(&next) = parent.get(&root) {
                if next == root {
                    break;
                }
                root = next;
            }
            parent.insert(article, root);
            root
        }
        for &(sl, si, dl, di) in &self.links {
            if sl == dl {
                continue;
            }
            let (Ok(from), Ok(to)) = (
                Self::render(sl, si).parse::<ArticleId>(),
                Self::render(dl, di).parse::<ArticleId>(),
            ) else {
                continue;
            };
            let (a, b) = (find(&mut parent, from), find(&mut parent, to));
            if a != b {
                parent.insert(a, b);
            }
        }
        let mut grouped: HashMap<ArticleId, BTreeSet<ArticleId>> = HashMap::new();
        for article in universe {
            let root = find(&mut parent, *article);
            grouped.entry(root).or_default().insert(*article);
        }
        grouped.into_values().collect()
    }
}

fn resolve(
    source: &MemorySource,
    ratio: f64,
    max_votes: usize,
) -> Result<Vec<ConceptCluster>, TestCaseError> {
    let resolver = ResolverBuilder::new()
        .with_min_votes_ratio(ratio)
        .with_max_votes_per_lang(max_votes)
        .build()
        .map_err(|err| TestCaseError::fail(format!("invalid thresholds: {err}")))?;
    let mut clusters = Vec::new();
    resolver
        .resolve(source, &mut clusters)
        .map_err(|err| TestCaseError::fail(format!("run failed: {err}")))?;
    Ok(clusters)
}

fn universe(clusters: &[ConceptCluster]) -> Vec<ArticleId> {
    clusters.iter().flat_map(ConceptCluster::articles).collect()
}

fn run_partition_property(fixture: &LinkFixture, ratio: f64, max_votes: usize) -> TestCaseResult {
    let source = fixture.source();
    let clusters = resolve(&source, ratio, max_votes)?;

    let ids: Vec<u64> = clusters.iter().map(|cluster| cluster.id().get()).collect();
    let expected: Vec<u64> = (1..=clusters.len() as u64).collect();
    prop_assert_eq!(ids, expected);
    prop_assert!(clusters.iter().all(|cluster| !cluster.is_empty()));

    let members = universe(&clusters);
    let distinct: BTreeSet<ArticleId> = members.iter().copied().collect();
    prop_assert_eq!(distinct.len(), members.len(), "an article appeared twice");

    let mut expected_universe = BTreeSet::new();
    for &(sl, si, dl, di) in &fixture.links {
        for raw in [LinkFixture::render(sl, si), LinkFixture::render(dl, di)] {
            if let Ok(article) = raw.parse::<ArticleId>() {
                expected_universe.insert(article);
            }
        }
    }
    for &(language, id) in &fixture.loners {
        if let Ok(article) = LinkFixture::render(language, id).parse::<ArticleId>() {
            expected_universe.insert(article);
        }
    }
    prop_assert_eq!(distinct, expected_universe);
    Ok(())
}

fn run_refinement_property(fixture: &LinkFixture, ratio: f64, max_votes: usize) -> TestCaseResult {
    let source = fixture.source();
    let clusters = resolve(&source, ratio, max_votes)?;
    let components = fixture.components(&universe(&clusters));

    for cluster in &clusters {
        let members: BTreeSet<ArticleId> = cluster.articles().collect();
        let containing = components
            .iter()
            .filter(|component| component.is_superset(&members))
            .count();
        prop_assert_eq!(containing, 1, "cluster {} straddles components", cluster.id().get());
    }

    for component in &components {
        let languages: BTreeSet<_> = component.iter().map(|article| article.language()).collect();
        if languages.len() != component.len() {
            continue;
        }
        let whole = clusters
            .iter()
            .any(|cluster| cluster.articles().collect::<BTreeSet<_>>() == *component);
        prop_assert!(whole, "clean component {component:?} was split");
    }
    Ok(())
}

fn run_determinism_property(fixture: &LinkFixture, ratio: f64, max_votes: usize) -> TestCaseResult {
    let source = fixture.source();
    let first = resolve(&source, ratio, max_votes)?;
    let second = resolve(&source, ratio, max_votes)?;
    prop_assert_eq!(first, second);
    Ok(())
}

fn run_monotonicity_property(fixture: &LinkFixture, ratio: f64, max_votes: usize) -> TestCaseResult {
    let source = fixture.source();
    let baseline = resolve(&source, ratio, max_votes)?.len();
    let tolerant = resolve(&source, ratio, max_votes + 1)?.len();
    let lenient = resolve(&source, ratio / 2.0, max_votes)?.len();
    prop_assert!(tolerant <= baseline, "raising max_votes_per_lang grew {baseline} to {tolerant}");
    prop_assert!(lenient <= baseline, "lowering min_votes_ratio grew {baseline} to {lenient}");
    Ok(())
}

proptest! {
    #![proptest_config(suite_proptest_config(128))]

    #[test]
    fn resolution_partitions_articles(
        fixture in any::<LinkFixture>(),
        ratio in 0.05_f64..=1.0,
        max_votes in 1_usize..4,
    ) {
        run_partition_property(&fixture, ratio, max_votes)?;
    }

    #[test]
    fn resolution_refines_weak_components(
        fixture in any::<LinkFixture>(),
        ratio in 0.05_f64..=1.0,
        max_votes in 1_usize..4,
    ) {
        run_refinement_property(&fixture, ratio, max_votes)?;
    }

    #[test]
    fn resolution_is_deterministic(
        fixture in any::<LinkFixture>(),
        ratio in 0.05_f64..=1.0,
        max_votes in 1_usize..4,
    ) {
        run_determinism_property(&fixture, ratio, max_votes)?;
    }

    #[test]
    fn loosening_thresholds_never_adds_clusters(
        fixture in any::<LinkFixture>(),
        ratio in 0.05_f64..=1.0,
        max_votes in 1_usize..4,
    ) {
        run_monotonicity_property(&fixture, ratio, max_votes)?;
    }
}
