//! Treeview CLI Binary
//!
//! Renders repository tree views to stdout.

use anyhow::Context;
use clap::Parser;
use std::io::Write;
use treeview::logging::init_logging;
use treeview::tooling::cli::{Cli, CliContext};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let context = if cli.snapshot {
        CliContext::snapshot(cli.repo.clone(), cli.config.clone())
    } else {
        CliContext::new(cli.repo.clone(), cli.config.clone())
    }
    .with_context(|| format!("opening repository {}", cli.repo.display()))?;

    let mut logging = context.config().logging.clone();
    logging.apply_env().context("reading logging environment")?;
    let logging = cli.logging_config(&logging);
    init_logging(&logging, Some(&cli.repo)).context("initializing logging")?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = context.execute_to(&cli.command, &mut out);
    out.flush().context("flushing output")?;
    result?;
    Ok(())
}
