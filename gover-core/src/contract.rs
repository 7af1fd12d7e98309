//! # contract: the fetch collaborator
//!
//! The pipeline never talks to the network directly. Every page (the version
//! endpoint, the release history and each documentation page) is obtained
//! through the [`PageFetcher`] trait defined here.
//!
//! ## Implementations
//! - [`crate::fetch::HttpFetcher`] is the reqwest-backed production fetcher.
//! - `MockPageFetcher` is generated by `mockall` for tests (enabled by the
//!   default `test-export-mocks` feature so integration tests can use it).
//!
//! ## Contract
//! - A successful fetch returns the final URL (after redirects) and the body.
//! - Transport failures, non-success statuses and timeouts are reported as
//!   [`FetchError`]; the trait has no retry semantics.

use async_trait::async_trait;

use mockall::automock;

use crate::error::FetchError;

/// A fetched response body together with the URL it was finally served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub url: String,
    pub body: String,
}

impl FetchedPage {
    pub fn new(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: body.into(),
        }
    }
}

/// Trait for fetching a single URL.
///
/// The trait is `Send` + `Sync` so one fetcher can be shared by every
/// concurrent page task.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url` and return its body, or the reason it could not be fetched.
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError>;
}
