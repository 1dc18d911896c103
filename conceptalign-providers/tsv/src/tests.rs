//! Unit tests for record parsing and store construction.
use std::io::Cursor;

use conceptalign_core::{ArticleId, Edge, EdgeSource, LanguageError};
use rstest::rstest;

use conceptalign_core::TitleLookup;

use crate::{TsvEdgeSource, TsvProviderError, TsvTitleLookup};

fn article(raw: &str) -> ArticleId {
    raw.parse()
        .unwrap_or_else(|err| panic!("invalid fixture article {raw:?}: {err}"))
}

fn universe(store: &TsvEdgeSource) -> Vec<String> {
    store
        .valid_articles()
        .expect("enumeration must succeed")
        .map(|a| a.to_string())
        .collect()
}

#[rstest]
fn universe_follows_first_seen_order() {
    let records = "fr\t3\ten\t1\nen\t1\tde\t2\n";
    let store = TsvEdgeSource::try_from_reader("demo", Cursor::new(records)).expect("store");
    assert_eq!(universe(&store), ["fr:3", "en:1", "de:2"]);
    assert_eq!(
        store.edges_to(article("en:1")).expect("query"),
        [article("fr:3")]
    );
    assert_eq!(
        store.edges_from(article("en:1")).expect("query"),
        [article("de:2")]
    );
}

#[rstest]
#[case::blank_and_comments("\n# header\n  \nen\t1\tde\t2\n", 1)]
#[case::crlf("en\t1\tde\t2\r\nde\t2\ten\t1\r\n", 2)]
#[case::padded_fields(" en \t 1 \tDE\t2\n", 1)]
fn records_are_normalised(#[case] raw: &str, #[case] expected_links: usize) {
    let store = TsvEdgeSource::try_from_reader("demo", Cursor::new(raw)).expect("store");
    assert_eq!(store.stats().links, expected_links);
    assert_eq!(universe(&store), ["en:1", "de:2"]);
}

#[rstest]
fn self_language_records_are_counted_and_dropped() {
    let records = "en\t1\ten\t2\nen\t1\tde\t2\n";
    let store = TsvEdgeSource::try_from_reader("demo", Cursor::new(records)).expect("store");
    assert_eq!(store.stats().records, 2);
    assert_eq!(store.stats().self_language, 1);
    assert_eq!(universe(&store), ["en:1", "de:2"]);
    assert!(
        store
            .edges_from(article("en:1"))
            .expect("query")
            .iter()
            .all(|dest| dest.language() != article("en:1").language())
    );
}

#[rstest]
#[case::too_few("# links\nen\t1\tde\n", 3)]
#[case::too_many("en\t1\tde\t2\nen\t1\tde\t2\tx\n", 5)]
fn field_counts_are_checked(#[case] raw: &str, #[case] found: usize) {
    let err = TsvEdgeSource::try_from_reader("demo", Cursor::new(raw)).expect_err("must fail");
    assert!(matches!(
        err,
        TsvProviderError::FieldCount { line: 2, expected: 4, found: f } if f == found
    ));
}

#[rstest]
fn invalid_languages_report_their_line() {
    let err = TsvEdgeSource::try_from_reader("demo", Cursor::new("# c\nen\t1\tde!\t2\n"))
        .expect_err("must fail");
    assert_eq!(err.line(), Some(2));
    assert!(matches!(
        err,
        TsvProviderError::InvalidLanguage {
            source: LanguageError::InvalidCharacter { character: '!', .. },
            ..
        }
    ));
}

#[rstest]
#[case("-1")]
#[case("x")]
#[case("4294967296")]
fn invalid_local_ids_are_rejected(#[case] raw_id: &str) {
    let record = format!("en\t{raw_id}\tde\t2\n");
    let err = TsvEdgeSource::try_from_reader("demo", Cursor::new(record)).expect_err("must fail");
    assert!(matches!(
        err,
        TsvProviderError::InvalidLocalId { line: 1, ref raw, .. } if raw == raw_id
    ));
}

#[rstest]
fn article_file_replaces_the_universe() {
    let store = TsvEdgeSource::try_from_reader("demo", Cursor::new("en\t1\tde\t2\n"))
        .expect("store")
        .with_articles_from_reader(Cursor::new("it\t9\nen\t1\nit\t9\n"))
        .expect("articles");
    assert_eq!(universe(&store), ["it:9", "en:1"]);
    assert_eq!(store.len(), 2);
}

#[rstest]
fn from_edges_deduplicates() {
    let edge = Edge::new(article("en:1"), article("de:2")).expect("cross-language");
    let store = TsvEdgeSource::from_edges("edges", [edge, edge]);
    assert_eq!(store.stats().links, 1);
    assert_eq!(store.stats().duplicates, 1);
    assert_eq!(store.name(), "edges");
}

#[rstest]
fn titles_keep_embedded_tabs() {
    let titles = TsvTitleLookup::try_from_reader(Cursor::new("en\t1\tTree\t(plant)\nde\t2\tBaum\n"))
        .expect("titles");
    assert_eq!(titles.len(), 2);
    assert_eq!(titles.title(article("en:1")).as_deref(), Some("Tree\t(plant)"));
    assert_eq!(titles.title(article("fr:1")), None);
}

#[rstest]
#[case::missing_title("en\t1\n", 1)]
#[case::blank_title("# t\nen\t1\t  \n", 2)]
fn malformed_titles_are_rejected(#[case] raw: &str, #[case] line: usize) {
    let err = TsvTitleLookup::try_from_reader(Cursor::new(raw)).expect_err("must fail");
    assert_eq!(err.line(), Some(line));
}
