use std::io;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use tweetmunger::cli::Cli;
use tweetmunger::{FilterConfig, Pipeline};

fn main() -> Result<()> {
    // logs go to stderr, stdout is reserved for the CSV stream
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.archives.is_empty() {
        Cli::command().print_help()?;
        return Ok(());
    }

    let config = FilterConfig::new(&cli.country, &cli.search_expr, &cli.location_expr)
        .context("invalid filter expression")?;

    let stdout = io::stdout();
    let mut pipeline = Pipeline::new(config, stdout.lock());
    pipeline.run(&cli.archives)
}
