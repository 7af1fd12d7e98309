//! reqwest-backed [`PageFetcher`].

use async_trait::async_trait;
use reqwest::redirect::{Attempt, Policy};
use reqwest::{Client, Url};
use std::error::Error as _;
use std::time::Duration;
use tracing::{debug, error};

use crate::config::ScrapeConfig;
use crate::contract::{FetchedPage, PageFetcher};
use crate::error::FetchError;

/// Host part of `url`, lowercased. Used both for the allowed-domain filter and
/// as the rate limiter key.
pub fn domain_of(url: &str) -> Result<String, FetchError> {
    let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    parsed
        .host_str()
        .map(|h| h.to_ascii_lowercase())
        .ok_or_else(|| FetchError::InvalidUrl {
            url: url.to_string(),
            reason: "url has no host".to_string(),
        })
}

const MAX_REDIRECTS: usize = 10;

/// Carried out of the redirect policy so the refusal surfaces as
/// [`FetchError::DomainNotAllowed`].
#[derive(Debug, thiserror::Error)]
#[error("redirect to {url} leaves the allowed domains")]
struct OffListRedirect {
    url: String,
    domain: String,
}

fn is_allowed(allowed_domains: &[String], domain: &str) -> bool {
    allowed_domains.is_empty() || allowed_domains.iter().any(|d| d == domain)
}

/// Follows at most [`MAX_REDIRECTS`] hops, all of them inside `allowed_domains`.
fn redirect_policy(allowed_domains: Vec<String>) -> Policy {
    Policy::custom(move |attempt: Attempt<'_>| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            return attempt.error("too many redirects");
        }
        let domain = attempt
            .url()
            .host_str()
            .map(|h| h.to_ascii_lowercase())
            .unwrap_or_default();
        if is_allowed(&allowed_domains, &domain) {
            attempt.follow()
        } else {
            let url = attempt.url().to_string();
            attempt.error(OffListRedirect { url, domain })
        }
    })
}

pub struct HttpFetcher {
    client: Client,
    allowed_domains: Vec<String>,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(config: &ScrapeConfig) -> Result<Self, FetchError> {
        let timeout = config.request_timeout();
        let allowed_domains: Vec<String> = config
            .allowed_domains
            .iter()
            .map(|d| d.to_ascii_lowercase())
            .collect();
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(timeout)
            .redirect(redirect_policy(allowed_domains.clone()))
            .build()
            .map_err(|e| {
                error!(error = ?e, "Failed to build HTTP client");
                FetchError::Client(e)
            })?;
        Ok(Self {
            client,
            allowed_domains,
            timeout,
        })
    }

    fn check_domain(&self, url: &str) -> Result<(), FetchError> {
        let domain = domain_of(url)?;
        if is_allowed(&self.allowed_domains, &domain) {
            Ok(())
        } else {
            Err(FetchError::DomainNotAllowed {
                url: url.to_string(),
                domain,
            })
        }
    }

    fn map_reqwest_error(&self, url: &str, e: reqwest::Error) -> FetchError {
        if let Some(refused) = off_list_redirect(&e) {
            error!(url = %url, target = %refused.url, "Refused redirect outside allowed domains");
            return FetchError::DomainNotAllowed {
                url: refused.url.clone(),
                domain: refused.domain.clone(),
            };
        }
        if e.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                timeout: self.timeout,
            }
        } else {
            FetchError::Transport {
                url: url.to_string(),
                source: Box::new(e),
            }
        }
    }
}

fn off_list_redirect(e: &reqwest::Error) -> Option<&OffListRedirect> {
    if !e.is_redirect() {
        return None;
    }
    let mut source = e.source();
    while let Some(inner) = source {
        if let Some(refused) = inner.downcast_ref::<OffListRedirect>() {
            return Some(refused);
        }
        source = inner.source();
    }
    None
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        self.check_domain(url)?;
        debug!(url = %url, "Fetching page");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_reqwest_error(url, e))?;

        let status = response.status();
        let final_url = response.url().to_string();
        if !status.is_success() {
            error!(url = %url, status = %status, "Request returned non-success status");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| self.map_reqwest_error(url, e))?;
        debug!(url = %final_url, bytes = body.len(), "Fetched page");
        Ok(FetchedPage::new(final_url, body))
    }
}
