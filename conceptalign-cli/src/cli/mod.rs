//! Command-line interface for concept resolution.
//!
//! The `resolve` command loads a tab-separated link file, optionally narrows
//! the article universe and attaches titles, runs the resolver, and renders
//! one line per resolved article.

mod commands;

pub use commands::{
    Cli, CliError, Command, ExecutionSummary, ResolveCommand, render_summary, run_cli,
};

#[cfg(test)]
mod tests;
