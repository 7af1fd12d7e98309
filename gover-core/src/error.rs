//! Error taxonomy for the scraping pipeline.
//!
//! `ResolveError` and `HistoryError` are fatal for a run. `PageError` is only
//! ever recorded per version and never escapes the page dispatcher.

use std::time::Duration;
use thiserror::Error;

use crate::model::GoVersion;

/// Failure reported by a [`crate::contract::PageFetcher`].
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("domain {domain:?} is not in the allowed domains for {url}")]
    DomainNotAllowed { url: String, domain: String },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },
}

/// Establishing the version range failed.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("failed to fetch current Go version: {0}")]
    Fetch(#[from] FetchError),

    #[error("could not parse major version from {0:?}")]
    Parse(String),
}

/// Fetching or reading the release history page failed.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("failed to visit release history page: {0}")]
    Fetch(#[from] FetchError),

    #[error("no release dates found on {url}")]
    NotFound { url: String },
}

/// One version's documentation page could not be processed.
#[derive(Debug, Error)]
pub enum PageError {
    #[error("{version}: {source}")]
    Fetch {
        version: GoVersion,
        #[source]
        source: FetchError,
    },

    #[error("{version}: page task aborted: {reason}")]
    Task { version: GoVersion, reason: String },
}

impl PageError {
    pub fn version(&self) -> GoVersion {
        match self {
            PageError::Fetch { version, .. } | PageError::Task { version, .. } => *version,
        }
    }
}

/// Fatal errors for a whole run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to resolve versions: {0}")]
    Resolve(#[from] ResolveError),

    #[error("error scraping release history: {0}")]
    History(#[from] HistoryError),

    #[error("run exceeded its deadline of {0:?}")]
    DeadlineExceeded(Duration),
}
