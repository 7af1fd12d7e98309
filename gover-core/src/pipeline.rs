//! High-level pipeline: resolve → release history → version pages → aggregate.
//!
//! # Responsibilities
//! - Resolve the version range and fetch release dates. Both are prerequisites:
//!   any failure there aborts the run before a single page is fetched.
//! - Fan out one page fetch per version. Individual page failures are
//!   best-effort: they are reported in [`ScrapeReport::failures`] and the run
//!   still succeeds with the remaining versions.
//! - Sort the merged records newest first.
//! - Bound the whole run by [`ScrapeConfig::run_timeout`]. When the deadline
//!   passes the run future is dropped, which aborts every in-flight page task.
//!
//! # Navigation
//! - Main entrypoint: [`scrape`]
//! - Output: [`ScrapeReport`]

use std::sync::Arc;
use tracing::{error, info};

use crate::aggregate::aggregate;
use crate::config::ScrapeConfig;
use crate::contract::PageFetcher;
use crate::error::{PageError, PipelineError};
use crate::history::fetch_release_dates;
use crate::model::{GoVersion, VersionData};
use crate::pages::PageDispatcher;
use crate::resolve::resolve;

/// Result of a successful run.
#[derive(Debug)]
pub struct ScrapeReport {
    /// Raw current version string, e.g. `go1.24.0`.
    pub current: String,
    pub latest: GoVersion,
    /// Number of versions whose pages were requested.
    pub requested: usize,
    pub release_dates: usize,
    /// Successfully scraped versions, newest first.
    pub versions: Vec<VersionData>,
    /// Versions that were dropped, with the reason.
    pub failures: Vec<PageError>,
}

impl ScrapeReport {
    pub fn processed(&self) -> usize {
        self.versions.len()
    }
}

async fn run<F>(config: &ScrapeConfig, fetcher: Arc<F>) -> Result<ScrapeReport, PipelineError>
where
    F: PageFetcher + ?Sized + 'static,
{
    let resolved = resolve(&*fetcher, &config.version_url).await?;
    let dates = fetch_release_dates(&*fetcher, &config.release_history_url).await?;

    info!(count = resolved.versions.len(), "[SCRAPE] Starting scraping for version details");
    let dispatcher = PageDispatcher::new(fetcher, config);
    let pages = dispatcher.fetch_all(&resolved.versions, &dates).await;

    let versions = aggregate(pages.versions);
    Ok(ScrapeReport {
        current: resolved.current,
        latest: resolved.latest,
        requested: resolved.versions.len(),
        release_dates: dates.len(),
        versions,
        failures: pages.failures,
    })
}

/// Runs the whole pipeline against `fetcher` under the configured deadline.
pub async fn scrape<F>(config: &ScrapeConfig, fetcher: Arc<F>) -> Result<ScrapeReport, PipelineError>
where
    F: PageFetcher + ?Sized + 'static,
{
    let deadline = config.run_timeout();
    info!(deadline_secs = deadline.as_secs(), "[SCRAPE] Starting scrape run");

    let report = match tokio::time::timeout(deadline, run(config, fetcher)).await {
        Ok(Ok(report)) => report,
        Ok(Err(e)) => {
            error!(error = %e, "[SCRAPE][ERROR] Scrape run failed");
            return Err(e);
        }
        Err(_) => {
            error!(deadline_secs = deadline.as_secs(), "[SCRAPE][ERROR] Run deadline exceeded, cancelling in-flight fetches");
            return Err(PipelineError::DeadlineExceeded(deadline));
        }
    };

    info!(
        processed = report.processed(),
        requested = report.requested,
        "[SCRAPE] Finished scraping"
    );
    Ok(report)
}
