//! Concurrent fetch of one release notes page per version.
//!
//! Every version gets its own task. Tasks never share mutable state: each one
//! sends exactly one outcome onto a results channel drained by a single
//! collector loop in [`PageDispatcher::fetch_all`]. The channel closes once the
//! last task drops its sender, which is the fan-in barrier. Concurrency against
//! the documentation host is bounded by the dispatcher's [`DomainLimiter`].
//!
//! A failed version is logged and recorded in [`PageResults::failures`]; it is
//! never fatal for the batch.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error, info, warn};

use crate::config::ScrapeConfig;
use crate::contract::{FetchedPage, PageFetcher};
use crate::error::PageError;
use crate::extract::{extract_categories, version_from_url};
use crate::fetch::domain_of;
use crate::model::{GoVersion, ReleaseDateIndex, VersionData};
use crate::rate_limit::DomainLimiter;

type PageOutcome = Result<VersionData, PageError>;

/// Collected output of one dispatch, in completion order.
#[derive(Debug, Default)]
pub struct PageResults {
    pub versions: Vec<VersionData>,
    pub failures: Vec<PageError>,
}

/// Builds the record for one fetched page: release date merge plus extraction.
pub fn build_version_data(
    version: GoVersion,
    page: &FetchedPage,
    dates: &ReleaseDateIndex,
) -> VersionData {
    match version_from_url(&page.url) {
        Some(found) if found != version.to_string() => {
            warn!(requested = %version, found = %found, url = %page.url, "[PAGES] Page URL names a different version");
        }
        Some(_) => {}
        None => debug!(url = %page.url, "[PAGES] Could not extract version from URL"),
    }

    info!(version = %version, "[PAGES] Processing content for Go version");
    let mut data = VersionData::new(version);

    match dates.get(&version) {
        Some(date) => data.release_date = Some(date.clone()),
        None => warn!(version = %version, "[PAGES] Release date not found"),
    }

    data.changes = extract_categories(&page.body);
    for category in &data.changes {
        debug!(version = %version, category = %category.category, "[PAGES] Found category");
    }
    data
}

async fn fetch_version<F>(
    fetcher: &F,
    limiter: &DomainLimiter,
    version: GoVersion,
    url: &str,
    dates: &ReleaseDateIndex,
) -> PageOutcome
where
    F: PageFetcher + ?Sized,
{
    let domain = domain_of(url).map_err(|source| PageError::Fetch { version, source })?;

    let page = {
        let _permit = limiter
            .acquire(&domain)
            .await
            .map_err(|e| PageError::Task {
                version,
                reason: e.to_string(),
            })?;
        debug!(version = %version, url = %url, "[PAGES] Request started");
        fetcher
            .fetch(url)
            .await
            .map_err(|source| PageError::Fetch { version, source })?
    };

    Ok(build_version_data(version, &page, dates))
}

fn join_error_reason(e: JoinError) -> String {
    if e.is_panic() {
        let payload = e.into_panic();
        if let Some(message) = payload.downcast_ref::<&str>() {
            format!("panicked: {message}")
        } else if let Some(message) = payload.downcast_ref::<String>() {
            format!("panicked: {message}")
        } else {
            "panicked".to_string()
        }
    } else {
        e.to_string()
    }
}

/// Owns the fetcher and the rate limiter for the per-version fan-out.
pub struct PageDispatcher<F: ?Sized> {
    fetcher: Arc<F>,
    limiter: Arc<DomainLimiter>,
    config: ScrapeConfig,
}

impl<F> PageDispatcher<F>
where
    F: PageFetcher + ?Sized + 'static,
{
    pub fn new(fetcher: Arc<F>, config: &ScrapeConfig) -> Self {
        Self {
            fetcher,
            limiter: Arc::new(DomainLimiter::new(config.parallelism, config.delay())),
            config: config.clone(),
        }
    }

    /// Fetches every version's page and returns once all of them finished.
    pub async fn fetch_all(&self, versions: &[GoVersion], dates: &ReleaseDateIndex) -> PageResults {
        let requested = versions.len();
        let (tx, mut rx) = mpsc::channel::<PageOutcome>(requested.max(1));
        let dates = Arc::new(dates.clone());
        let mut tasks = JoinSet::new();
        let mut task_versions = HashMap::with_capacity(requested);

        for &version in versions {
            let url = self.config.doc_url(&version);
            info!(version = %version, url = %url, "[PAGES] Visiting");

            let tx = tx.clone();
            let fetcher = Arc::clone(&self.fetcher);
            let limiter = Arc::clone(&self.limiter);
            let dates = Arc::clone(&dates);
            let handle = tasks.spawn(async move {
                let outcome = fetch_version(&*fetcher, &limiter, version, &url, &dates).await;
                // The collector only stops receiving after every sender is gone.
                let _ = tx.send(outcome).await;
            });
            task_versions.insert(handle.id(), version);
        }
        drop(tx);

        let mut results = PageResults::default();
        let mut reported = HashSet::with_capacity(requested);
        while let Some(outcome) = rx.recv().await {
            match outcome {
                Ok(data) => {
                    reported.insert(data.version);
                    results.versions.push(data);
                    info!(
                        completed = results.versions.len() + results.failures.len(),
                        requested,
                        "[PAGES] Version processed"
                    );
                }
                Err(e) => {
                    error!(version = %e.version(), error = %e, "[PAGES][ERROR] Request failed, dropping version");
                    reported.insert(e.version());
                    results.failures.push(e);
                }
            }
        }

        let mut task_errors = HashMap::new();
        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                let version = task_versions.get(&e.id()).copied();
                let reason = join_error_reason(e);
                error!(version = ?version, reason = %reason, "[PAGES][ERROR] Page task did not complete");
                if let Some(version) = version {
                    task_errors.insert(version, reason);
                }
            }
        }
        for &version in versions {
            if reported.insert(version) {
                let reason = task_errors
                    .remove(&version)
                    .unwrap_or_else(|| "task ended without reporting".to_string());
                results.failures.push(PageError::Task { version, reason });
            }
        }

        info!(
            succeeded = results.versions.len(),
            failed = results.failures.len(),
            requested,
            "[PAGES] Finished scraping version pages"
        );
        results
    }
}
