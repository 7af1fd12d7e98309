use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

pub const DEFAULT_VERSION_URL: &str = "https://go.dev/VERSION?m=text";
pub const DEFAULT_RELEASE_HISTORY_URL: &str = "https://go.dev/doc/devel/release";
pub const DEFAULT_DOC_URL_TEMPLATE: &str = "https://go.dev/doc/{version}";
pub const DEFAULT_USER_AGENT: &str = "gover-scraper/1.0 (+https://github.com/paulstuart/gover)";

/// Placeholder substituted with the version identifier in `doc_url_template`.
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// Endpoints, limits and timeouts for one scrape run.
///
/// Every field has a default, so an empty YAML document is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// Plaintext endpoint whose first line holds the current Go version.
    pub version_url: String,
    /// Page listing every release with its date.
    pub release_history_url: String,
    /// Per-version documentation URL; `{version}` is replaced by e.g. `go1.22`.
    pub doc_url_template: String,
    /// Hosts the fetcher may contact. Empty means any host.
    pub allowed_domains: Vec<String>,
    pub user_agent: String,
    /// In-flight requests allowed per domain.
    pub parallelism: usize,
    /// Minimum delay between request starts against the same domain.
    pub delay_ms: u64,
    pub request_timeout_secs: u64,
    /// Deadline for the whole run; in-flight fetches are cancelled past it.
    pub run_timeout_secs: u64,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            version_url: DEFAULT_VERSION_URL.to_string(),
            release_history_url: DEFAULT_RELEASE_HISTORY_URL.to_string(),
            doc_url_template: DEFAULT_DOC_URL_TEMPLATE.to_string(),
            allowed_domains: vec!["go.dev".to_string()],
            user_agent: DEFAULT_USER_AGENT.to_string(),
            parallelism: 2,
            delay_ms: 1_000,
            request_timeout_secs: 30,
            run_timeout_secs: 15 * 60,
        }
    }
}

impl ScrapeConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn run_timeout(&self) -> Duration {
        Duration::from_secs(self.run_timeout_secs)
    }

    /// Documentation URL for one version.
    pub fn doc_url(&self, version: &impl std::fmt::Display) -> String {
        self.doc_url_template
            .replace(VERSION_PLACEHOLDER, &version.to_string())
    }

    pub fn trace_loaded(&self) {
        info!(
            version_url = %self.version_url,
            release_history_url = %self.release_history_url,
            parallelism = self.parallelism,
            delay_ms = self.delay_ms,
            "Loaded ScrapeConfig"
        );
        debug!(config = ?self, "ScrapeConfig loaded (full debug)");
    }
}
