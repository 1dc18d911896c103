//! Command implementations and argument parsing for the conceptalign CLI.

use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use conceptalign_core::{
    ConceptAlignError, ConceptCluster, DEFAULT_MAX_VOTES_PER_LANG, DEFAULT_MIN_VOTES_RATIO,
    EdgeSource, ResolverBuilder, RunSummary, TitleLookup,
};
use conceptalign_providers_tsv::{TsvEdgeSource, TsvProviderError, TsvTitleLookup};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "conceptalign",
    about = "Group inter-language linked articles into concepts."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Resolve a tab-separated link file into concepts.
    Resolve(ResolveCommand),
}

/// Options accepted by the `resolve` command.
#[derive(Debug, Args, Clone)]
pub struct ResolveCommand {
    /// Link file with `src_lang<TAB>src_id<TAB>dst_lang<TAB>dst_id` records.
    pub edges: PathBuf,

    /// Optional article universe with `lang<TAB>id` records.
    #[arg(long)]
    pub articles: Option<PathBuf>,

    /// Optional title table with `lang<TAB>id<TAB>title` records.
    #[arg(long)]
    pub titles: Option<PathBuf>,

    /// Fraction of a component's languages that must link to a destination.
    #[arg(long = "min-votes-ratio", default_value_t = DEFAULT_MIN_VOTES_RATIO)]
    pub min_votes_ratio: f64,

    /// Same-language candidates one article may link to, or be linked from.
    #[arg(long = "max-votes-per-lang", default_value_t = DEFAULT_MAX_VOTES_PER_LANG)]
    pub max_votes_per_lang: usize,

    /// Log a human-readable dump of every resolved cluster; needs `--titles`.
    #[arg(long)]
    pub diagnostics: bool,

    /// Override name for the link store (defaults to the file stem).
    #[arg(long)]
    pub name: Option<String>,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// File I/O failed while opening an input.
    #[error("failed to open `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// An input file held malformed records.
    #[error("failed to read `{path}`: {source}")]
    Ingest {
        /// Path of the malformed file.
        path: PathBuf,
        /// Parsing failure with its line number.
        #[source]
        source: TsvProviderError,
    },
    /// Concept resolution failed.
    #[error(transparent)]
    Core(#[from] ConceptAlignError),
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub struct ExecutionSummary {
    /// Name reported by the link store.
    pub data_source: String,
    /// Counters reported by the resolver.
    pub run: RunSummary,
    /// Resolved clusters in emission order.
    pub clusters: Vec<ConceptCluster>,
    /// Titles loaded for rendering, when supplied.
    pub titles: Option<TsvTitleLookup>,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading inputs or resolution fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use conceptalign_cli::cli::{Cli, Command, ResolveCommand, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), "en\t1\tde\t5\nen\t2\tde\t5\nde\t5\ten\t1\n")?;
/// let cli = Cli {
///     command: Command::Resolve(ResolveCommand {
///         edges: file.path().to_path_buf(),
///         articles: None,
///         titles: None,
///         min_votes_ratio: 0.5,
///         max_votes_per_lang: 1,
///         diagnostics: false,
///         name: Some("wiki".into()),
///     }),
/// };
/// let summary = run_cli(cli)?;
/// assert_eq!(summary.clusters.len(), 2);
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Resolve(resolve) => {
            Span::current().record("command", field::display("resolve"));
            resolve_command(resolve)
        }
    }
}

#[instrument(
    name = "cli.resolve",
    err,
    skip(command),
    fields(
        path = %command.edges.display(),
        min_votes_ratio = command.min_votes_ratio,
        max_votes_per_lang = command.max_votes_per_lang,
        override_name = field::Empty,
    ),
)]
pub(super) fn resolve_command(command: ResolveCommand) -> Result<ExecutionSummary, CliError> {
    let ResolveCommand {
        edges,
        articles,
        titles,
        min_votes_ratio,
        max_votes_per_lang,
        diagnostics,
        name,
    } = command;
    Span::current().record(
        "override_name",
        field::display(name.as_deref().unwrap_or("<derived>")),
    );

    let resolver = ResolverBuilder::new()
        .with_min_votes_ratio(min_votes_ratio)
        .with_max_votes_per_lang(max_votes_per_lang)
        .with_print_diagnostics(diagnostics)
        .build()?;

    let store = load_store(&edges, articles.as_deref(), name.as_deref())?;
    let titles = titles.as_deref().map(load_titles).transpose()?;

    let mut clusters = Vec::new();
    let run = {
        let mut engine = resolver.engine(&store);
        if let Some(lookup) = titles.as_ref() {
            engine = engine.with_title_lookup(lookup);
        }
        engine.run(&mut clusters)?
    };

    info!(
        data_source = store.name(),
        concepts = run.clusters_emitted,
        articles = run.articles,
        "command completed"
    );
    Ok(ExecutionSummary {
        data_source: store.name().to_owned(),
        run,
        clusters,
        titles,
    })
}

#[instrument(
    name = "cli.load_store",
    err,
    skip(edges, articles, name),
    fields(path = %edges.display(), articles = articles.is_some()),
)]
pub(super) fn load_store(
    edges: &Path,
    articles: Option<&Path>,
    name: Option<&str>,
) -> Result<TsvEdgeSource, CliError> {
    let chosen_name = derive_data_source_name(edges, name);
    let store = TsvEdgeSource::try_from_reader(chosen_name, open_reader(edges)?)
        .map_err(|source| ingest_error(edges, source))?;
    match articles {
        Some(path) => store
            .with_articles_from_reader(open_reader(path)?)
            .map_err(|source| ingest_error(path, source)),
        None => Ok(store),
    }
}

fn load_titles(path: &Path) -> Result<TsvTitleLookup, CliError> {
    TsvTitleLookup::try_from_reader(open_reader(path)?)
        .map_err(|source| ingest_error(path, source))
}

#[instrument(name = "cli.open_reader", err, skip(path), fields(path = %path.display()))]
pub(super) fn open_reader(path: &Path) -> Result<BufReader<File>, CliError> {
    let file = File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BufReader::new(file))
}

fn ingest_error(path: &Path, source: TsvProviderError) -> CliError {
    CliError::Ingest {
        path: path.to_path_buf(),
        source,
    }
}

pub(super) fn derive_data_source_name(path: &Path, override_name: Option<&str>) -> String {
    if let Some(name) = override_name {
        return name.to_owned();
    }

    path.file_stem()
        .and_then(|value| value.to_str())
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| "links".to_owned())
}

/// Renders `summary` to `writer` as a header followed by one
/// `concept<TAB>article[<TAB>title]` line per resolved article.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use conceptalign_cli::cli::{ExecutionSummary, render_summary};
/// # use conceptalign_core::{ArticleId, ConceptCluster, ConceptId, RunSummary};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let en: ArticleId = "en:1".parse()?;
/// let de: ArticleId = "de:5".parse()?;
/// let cluster = ConceptCluster::new(ConceptId::new(1), [en, de]).ok_or("empty cluster")?;
/// let summary = ExecutionSummary {
///     data_source: "demo".into(),
///     run: RunSummary::default(),
///     clusters: vec![cluster],
///     titles: None,
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, &mut buffer)?;
/// assert_eq!(String::from_utf8(buffer)?, "data source: demo\nconcepts: 1\n1\tde:5\n1\ten:1\n");
/// # Ok(())
/// # }
/// ```
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    writeln!(writer, "data source: {}", summary.data_source)?;
    writeln!(writer, "concepts: {}", summary.clusters.len())?;
    for cluster in &summary.clusters {
        let concept = cluster.id().get();
        for article in cluster.articles() {
            match summary.titles.as_ref().and_then(|titles| titles.title(article)) {
                Some(title) => writeln!(writer, "{concept}\t{article}\t{title}")?,
                None => writeln!(writer, "{concept}\t{article}")?,
            }
        }
    }
    Ok(())
}
