//! `conceptalign` binary: resolves an inter-language link file into concepts.
//!
//! Prints one `concept<TAB>article` line per article on stdout; diagnostics
//! and errors go through `tracing` on stderr.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use conceptalign_cli::{
    cli::{Cli, CliError, render_summary, run_cli},
    logging::{self, LoggingError},
};
use tracing::{error, field};

fn try_main() -> Result<()> {
    let cli = Cli::parse();
    let summary = run_cli(cli).context("failed to resolve concepts")?;
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    render_summary(&summary, &mut writer).context("failed to write concepts")?;
    writer.flush().context("failed to flush output")?;
    Ok(())
}

fn main() -> ExitCode {
    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    let Err(err) = try_main() else {
        return ExitCode::SUCCESS;
    };

    let core = err
        .downcast_ref::<CliError>()
        .and_then(|cli_error| match cli_error {
            CliError::Core(core) => Some(core),
            _ => None,
        });
    let code = core.map(|core| field::display(core.code().as_str()));
    let edge_source_code = core
        .and_then(|core| core.edge_source_code())
        .map(|code| field::display(code.as_str()));

    let message = format!("{err:#}");
    error!(
        error = %message,
        code,
        edge_source_code,
        "command execution failed"
    );
    ExitCode::FAILURE
}

fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialise logging: {err}");
}
