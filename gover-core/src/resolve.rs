//! Determines the latest Go 1.x minor release and the range to scrape.

use regex::Regex;
use std::sync::LazyLock;
use tracing::{error, info};

use crate::contract::PageFetcher;
use crate::error::ResolveError;
use crate::model::GoVersion;

static MAJOR_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"go1\.(\d+)").expect("major version regex is valid"));

/// Outcome of version resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVersions {
    /// Raw first line of the version endpoint, e.g. `go1.24.0`.
    pub current: String,
    pub latest: GoVersion,
    /// `go1.1 ..= latest`, ascending.
    pub versions: Vec<GoVersion>,
}

/// First line of the version endpoint body, trimmed.
pub fn first_line(body: &str) -> &str {
    body.lines().next().unwrap_or_default().trim()
}

/// Parses the minor number out of a string like `go1.24.0`.
pub fn parse_major_version(version: &str) -> Result<u32, ResolveError> {
    MAJOR_VERSION_RE
        .captures(version)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .ok_or_else(|| ResolveError::Parse(version.to_string()))
}

/// `go1.1` through `go1.<latest>` inclusive, ascending.
pub fn generate_versions(latest: u32) -> Vec<GoVersion> {
    (1..=latest).map(GoVersion::new).collect()
}

/// Fetches the current Go version and expands it into the full minor range.
pub async fn resolve<F>(fetcher: &F, version_url: &str) -> Result<ResolvedVersions, ResolveError>
where
    F: PageFetcher + ?Sized,
{
    info!(url = %version_url, "[RESOLVE] Fetching current Go version");
    let page = fetcher.fetch(version_url).await.map_err(|e| {
        error!(error = %e, url = %version_url, "[RESOLVE][ERROR] Failed to fetch Go versions");
        ResolveError::from(e)
    })?;

    let current = first_line(&page.body).to_string();
    info!(current = %current, "[RESOLVE] Latest Go version");

    let latest = parse_major_version(&current).map_err(|e| {
        error!(error = %e, "[RESOLVE][ERROR] Unparseable version string");
        e
    })?;
    info!(latest, "[RESOLVE] Latest major version");

    let versions = generate_versions(latest);
    info!(
        count = versions.len(),
        first = %versions.first().map(ToString::to_string).unwrap_or_default(),
        last = %versions.last().map(ToString::to_string).unwrap_or_default(),
        "[RESOLVE] Will scrape versions"
    );

    Ok(ResolvedVersions {
        current,
        latest: GoVersion::new(latest),
        versions,
    })
}
