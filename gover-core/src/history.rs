//! Release history: version → initial release date.

use tracing::{debug, error, info};

use crate::contract::PageFetcher;
use crate::error::HistoryError;
use crate::extract::{heading_texts, release_heading_dates, Heading};
use crate::model::{GoVersion, ReleaseDateIndex};

/// Builds the index from `(version, date)` pairs, keeping the first date seen
/// per version. The history page lists patch releases after the initial one,
/// so first-wins retains the `.0` release date.
pub fn build_release_index<I>(entries: I) -> ReleaseDateIndex
where
    I: IntoIterator<Item = (GoVersion, String)>,
{
    let mut index = ReleaseDateIndex::new();
    for (version, date) in entries {
        if !index.contains_key(&version) {
            debug!(version = %version, date = %date, "[HISTORY] Found release");
            index.insert(version, date);
        }
    }
    index
}

/// Release dates parsed from the second-level headings of a history page body.
pub fn parse_release_history(html: &str) -> ReleaseDateIndex {
    build_release_index(release_heading_dates(heading_texts(html, Heading::H2)))
}

/// Fetches the release history page and indexes its release dates.
///
/// Zero matches is an error: it means the page structure drifted.
pub async fn fetch_release_dates<F>(fetcher: &F, url: &str) -> Result<ReleaseDateIndex, HistoryError>
where
    F: PageFetcher + ?Sized,
{
    info!(url = %url, "[HISTORY] Scraping release history for dates");
    let page = fetcher.fetch(url).await.map_err(|e| {
        error!(error = %e, url = %url, "[HISTORY][ERROR] Release history request failed");
        HistoryError::from(e)
    })?;

    let index = parse_release_history(&page.body);
    if index.is_empty() {
        error!(url = %url, "[HISTORY][ERROR] No release dates found");
        return Err(HistoryError::NotFound {
            url: url.to_string(),
        });
    }

    info!(count = index.len(), "[HISTORY] Found release dates");
    Ok(index)
}
