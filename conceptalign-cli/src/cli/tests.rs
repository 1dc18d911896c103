//! Unit tests for argument parsing, input loading, and summary rendering.

use super::commands::{derive_data_source_name, open_reader, resolve_command};
use super::{Cli, CliError, Command, ExecutionSummary, ResolveCommand, render_summary, run_cli};

use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use conceptalign_core::{ConceptAlignError, RunSummary};
use conceptalign_providers_tsv::TsvProviderError;
use rstest::{fixture, rstest};
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

use conceptalign_test_support::tracing::RecordingLayer;

type TestResult = Result<(), Box<dyn std::error::Error>>;

const WORKED_EXAMPLE: &str = "en\t1\tde\t5\nen\t2\tde\t5\nde\t5\ten\t1\n";

#[fixture]
fn workspace() -> TempDir {
    tempfile::tempdir().expect("temporary directory must be creatable")
}

fn write_file(dir: &TempDir, name: &str, contents: &str) -> io::Result<PathBuf> {
    let path = dir.path().join(name);
    std::fs::write(&path, contents)?;
    Ok(path)
}

fn command(edges: PathBuf) -> ResolveCommand {
    ResolveCommand {
        edges,
        articles: None,
        titles: None,
        min_votes_ratio: 0.5,
        max_votes_per_lang: 1,
        diagnostics: false,
        name: None,
    }
}

fn rendered(summary: &ExecutionSummary) -> Result<String, Box<dyn std::error::Error>> {
    let mut buffer = Vec::new();
    render_summary(summary, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

#[rstest]
#[case::override_name("/tmp/links.tsv", Some("wiki"), "wiki")]
#[case::stem_with_extension("/tmp/links-2024.tsv", None, "links-2024")]
#[case::stem_without_extension("/tmp/dump", None, "dump")]
#[case::missing_stem("", None, "links")]
fn derive_data_source_name_selects_expected_name(
    #[case] raw_path: &str,
    #[case] override_name: Option<&'static str>,
    #[case] expected: &str,
) {
    assert_eq!(derive_data_source_name(Path::new(raw_path), override_name), expected);
}

#[rstest]
fn resolve_splits_the_worked_example(workspace: TempDir) -> TestResult {
    let edges = write_file(&workspace, "wiki.tsv", WORKED_EXAMPLE)?;
    let summary = run_cli(Cli {
        command: Command::Resolve(command(edges)),
    })?;

    assert_eq!(summary.data_source, "wiki");
    assert_eq!(summary.run.articles, 3);
    assert_eq!(summary.run.clusters_emitted, 2);
    assert_eq!(summary.run.rejected_links, 2);
    assert_eq!(
        rendered(&summary)?,
        "data source: wiki\nconcepts: 2\n1\tde:5\n1\ten:1\n2\ten:2\n"
    );
    Ok(())
}

#[rstest]
fn raised_tolerance_keeps_the_ambiguous_cluster(workspace: TempDir) -> TestResult {
    let edges = write_file(&workspace, "wiki.tsv", WORKED_EXAMPLE)?;
    let summary = resolve_command(ResolveCommand {
        max_votes_per_lang: 2,
        ..command(edges)
    })?;
    assert_eq!(
        rendered(&summary)?,
        "data source: wiki\nconcepts: 1\n1\tde:5\n1\ten:1\n1\ten:2\n"
    );
    Ok(())
}

#[rstest]
fn article_file_adds_unlinked_articles(workspace: TempDir) -> TestResult {
    let edges = write_file(&workspace, "links.tsv", "en\t1\tde\t5\n")?;
    let articles = write_file(&workspace, "articles.tsv", "ja\t4\nen\t1\nde\t5\n")?;
    let summary = resolve_command(ResolveCommand {
        articles: Some(articles),
        name: Some("sample".into()),
        ..command(edges)
    })?;

    assert_eq!(summary.run.isolated_articles, 1);
    assert_eq!(
        rendered(&summary)?,
        "data source: sample\nconcepts: 2\n1\tja:4\n2\tde:5\n2\ten:1\n"
    );
    Ok(())
}

#[rstest]
fn titles_are_rendered_and_enable_diagnostics(workspace: TempDir) -> TestResult {
    let edges = write_file(&workspace, "links.tsv", "en\t1\tde\t5\n")?;
    let titles = write_file(&workspace, "titles.tsv", "en\t1\tTree\nde\t5\tBaum\n")?;
    let summary = resolve_command(ResolveCommand {
        titles: Some(titles),
        diagnostics: true,
        ..command(edges)
    })?;

    assert_eq!(
        rendered(&summary)?,
        "data source: links\nconcepts: 1\n1\tde:5\tBaum\n1\ten:1\tTree\n"
    );
    Ok(())
}

#[rstest]
fn diagnostics_without_titles_are_rejected(workspace: TempDir) -> TestResult {
    let edges = write_file(&workspace, "links.tsv", WORKED_EXAMPLE)?;
    let err = resolve_command(ResolveCommand {
        diagnostics: true,
        ..command(edges)
    })
    .expect_err("diagnostics need titles");
    assert!(matches!(
        err,
        CliError::Core(ConceptAlignError::MissingTitleLookup)
    ));
    Ok(())
}

#[rstest]
#[case(0.0)]
#[case(1.5)]
#[case(f64::NAN)]
fn invalid_ratios_are_rejected(workspace: TempDir, #[case] ratio: f64) -> TestResult {
    let edges = write_file(&workspace, "links.tsv", WORKED_EXAMPLE)?;
    let err = resolve_command(ResolveCommand {
        min_votes_ratio: ratio,
        ..command(edges)
    })
    .expect_err("ratio must be rejected");
    assert!(matches!(
        err,
        CliError::Core(ConceptAlignError::InvalidMinVotesRatio { .. })
    ));
    Ok(())
}

#[rstest]
fn zero_tolerance_is_rejected(workspace: TempDir) -> TestResult {
    let edges = write_file(&workspace, "links.tsv", WORKED_EXAMPLE)?;
    let err = resolve_command(ResolveCommand {
        max_votes_per_lang: 0,
        ..command(edges)
    })
    .expect_err("tolerance must be rejected");
    assert!(matches!(
        err,
        CliError::Core(ConceptAlignError::InvalidMaxVotesPerLang { got: 0 })
    ));
    Ok(())
}

#[rstest]
fn missing_edge_file_reports_path(workspace: TempDir) {
    let missing = workspace.path().join("absent.tsv");
    let err = resolve_command(command(missing.clone())).expect_err("file is missing");
    match err {
        CliError::Io { path, source } => {
            assert_eq!(path, missing);
            assert_eq!(source.kind(), io::ErrorKind::NotFound);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[rstest]
#[case::field_count("en\t1\tde\t5\nen\t2\tde\n", 2)]
#[case::bad_language("# header\n\nen!\t1\tde\t5\n", 3)]
#[case::bad_local_id("en\tone\tde\t5\n", 1)]
fn malformed_edge_records_report_their_line(
    workspace: TempDir,
    #[case] contents: &str,
    #[case] expected_line: usize,
) -> TestResult {
    let edges = write_file(&workspace, "links.tsv", contents)?;
    let err = resolve_command(command(edges.clone())).expect_err("record is malformed");
    match err {
        CliError::Ingest { path, source } => {
            assert_eq!(path, edges);
            assert_eq!(source.line(), Some(expected_line));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[rstest]
fn malformed_title_records_name_the_title_file(workspace: TempDir) -> TestResult {
    let edges = write_file(&workspace, "links.tsv", WORKED_EXAMPLE)?;
    let titles = write_file(&workspace, "titles.tsv", "en\t1\t  \n")?;
    let err = resolve_command(ResolveCommand {
        titles: Some(titles.clone()),
        ..command(edges)
    })
    .expect_err("blank titles are malformed");
    match err {
        CliError::Ingest {
            path,
            source: TsvProviderError::EmptyTitle { line },
        } => {
            assert_eq!(path, titles);
            assert_eq!(line, 1);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}

#[test]
fn render_summary_handles_empty_runs() -> TestResult {
    let summary = ExecutionSummary {
        data_source: "empty".into(),
        run: RunSummary::default(),
        clusters: Vec::new(),
        titles: None,
    };
    assert_eq!(rendered(&summary)?, "data source: empty\nconcepts: 0\n");
    Ok(())
}

#[test]
fn parse_applies_defaults() -> TestResult {
    let cli = Cli::try_parse_from(["conceptalign", "resolve", "links.tsv"])?;
    let Command::Resolve(resolve) = cli.command;
    assert_eq!(resolve.edges, PathBuf::from("links.tsv"));
    assert!((resolve.min_votes_ratio - 0.5).abs() < f64::EPSILON);
    assert_eq!(resolve.max_votes_per_lang, 1);
    assert!(!resolve.diagnostics);
    assert!(resolve.articles.is_none());
    assert!(resolve.titles.is_none());
    assert!(resolve.name.is_none());
    Ok(())
}

#[test]
fn parse_reads_every_option() -> TestResult {
    let cli = Cli::try_parse_from([
        "conceptalign",
        "resolve",
        "links.tsv",
        "--articles",
        "articles.tsv",
        "--titles",
        "titles.tsv",
        "--min-votes-ratio",
        "0.25",
        "--max-votes-per-lang",
        "3",
        "--diagnostics",
        "--name",
        "wiki",
    ])?;
    let Command::Resolve(resolve) = cli.command;
    assert_eq!(resolve.articles, Some(PathBuf::from("articles.tsv")));
    assert_eq!(resolve.titles, Some(PathBuf::from("titles.tsv")));
    assert!((resolve.min_votes_ratio - 0.25).abs() < f64::EPSILON);
    assert_eq!(resolve.max_votes_per_lang, 3);
    assert!(resolve.diagnostics);
    assert_eq!(resolve.name.as_deref(), Some("wiki"));
    Ok(())
}

#[rstest]
#[case::non_numeric_ratio(&["conceptalign", "resolve", "links.tsv", "--min-votes-ratio", "half"])]
#[case::negative_tolerance(&["conceptalign", "resolve", "links.tsv", "--max-votes-per-lang=-1"])]
#[case::missing_edges(&["conceptalign", "resolve"])]
#[case::unknown_command(&["conceptalign", "cluster", "links.tsv"])]
fn parse_rejects_invalid_arguments(#[case] args: &[&str]) {
    assert!(Cli::try_parse_from(args).is_err());
}

#[rstest]
fn resolve_records_span_fields(workspace: TempDir) -> TestResult {
    let edges = write_file(&workspace, "wiki.tsv", WORKED_EXAMPLE)?;
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    let summary = tracing::subscriber::with_default(subscriber, || {
        resolve_command(ResolveCommand {
            name: Some("override".into()),
            ..command(edges)
        })
    })?;
    assert_eq!(summary.data_source, "override");

    let resolve = layer.span("cli.resolve").expect("cli.resolve span must exist");
    assert!(
        resolve
            .fields
            .get("path")
            .is_some_and(|value| value.ends_with("wiki.tsv"))
    );
    assert_eq!(resolve.fields.get("min_votes_ratio"), Some(&"0.5".to_owned()));
    assert_eq!(resolve.fields.get("max_votes_per_lang"), Some(&"1".to_owned()));
    assert_eq!(resolve.fields.get("override_name"), Some(&"override".to_owned()));

    let store = layer.span("cli.load_store").expect("cli.load_store span must exist");
    assert_eq!(store.fields.get("articles"), Some(&"false".to_owned()));
    assert!(layer.span("core.run").is_some());
    assert!(layer.has_message(Level::INFO, "command completed"));
    Ok(())
}

#[rstest]
fn open_reader_failure_is_logged(workspace: TempDir) {
    let missing = workspace.path().join("absent.tsv");
    let layer = RecordingLayer::default();
    let subscriber = tracing_subscriber::registry().with(layer.clone());

    let err = tracing::subscriber::with_default(subscriber, || open_reader(&missing))
        .expect_err("file is missing");
    assert!(matches!(err, CliError::Io { .. }));

    let span = layer
        .span("cli.open_reader")
        .expect("cli.open_reader span must exist");
    assert!(
        span.fields
            .get("path")
            .is_some_and(|value| value.ends_with("absent.tsv"))
    );
    assert!(
        layer
            .events()
            .iter()
            .any(|event| event.level == Level::ERROR)
    );
}
