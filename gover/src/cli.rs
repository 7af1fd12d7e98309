///
/// This module implements the CLI interface for gover: argument parsing and
/// the async `run` entrypoint shared by `main()` and the integration tests.
///
/// All scraping logic (fetching, extraction, merging) lives in the
/// [`gover-core`] crate. This module only wires config, fetcher, pipeline and
/// output together.
///
/// ## Exit behaviour
/// - Version resolution or release history failures abort the run before any
///   output is written.
/// - Individual release notes pages that fail are logged and left out; the run
///   still writes the file and succeeds.
///
/// [`gover-core`]: ../../gover-core/
use crate::load_config::load_config;
use crate::output::write_versions;
use anyhow::{Context, Result};
use clap::Parser;
use gover_core::config::ScrapeConfig;
use gover_core::fetch::HttpFetcher;
use gover_core::pipeline::scrape;
use std::path::PathBuf;
use std::sync::Arc;

pub const DEFAULT_OUTPUT: &str = "go_version_data.json";

/// CLI for gover: scrape Go release notes into JSON.
#[derive(Parser, Debug)]
#[clap(
    name = "gover",
    version,
    about = "Scrape go.dev release notes for every Go 1.x release into a JSON file"
)]
pub struct Cli {
    /// Output JSON file path
    #[clap(long, short, default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Optional YAML file overriding endpoints, limits and timeouts
    #[clap(long)]
    pub config: Option<PathBuf>,
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ScrapeConfig::default(),
    };
    config.trace_loaded();

    let fetcher = HttpFetcher::new(&config).context("Failed to construct HTTP fetcher")?;
    tracing::info!(output = %cli.output.display(), "Scrape starting");

    let report = match scrape(&config, Arc::new(fetcher)).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(error = %e, "Scrape failed");
            return Err(anyhow::Error::new(e));
        }
    };

    for failure in &report.failures {
        tracing::warn!(version = %failure.version(), error = %failure, "Version left out of output");
    }
    tracing::info!(
        processed = report.processed(),
        requested = report.requested,
        "Finished scraping. Found data for {} of {} versions.",
        report.processed(),
        report.requested
    );

    write_versions(&cli.output, &report.versions)?;
    tracing::info!(path = %cli.output.display(), "Successfully wrote scraped data");
    Ok(())
}
