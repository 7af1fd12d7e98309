use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

use gover_core::config::ScrapeConfig;
use gover_core::contract::{FetchedPage, PageFetcher};
use gover_core::error::FetchError;
use gover_core::model::{GoVersion, ReleaseDateIndex};
use gover_core::pages::PageDispatcher;
use gover_core::rate_limit::DomainLimiter;
use gover_core::resolve::generate_versions;

/// Records when each request started and how many overlapped.
struct RecordingFetcher {
    latency: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    starts: Mutex<Vec<Instant>>,
}

impl RecordingFetcher {
    fn new(latency: Duration) -> Self {
        Self {
            latency,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            starts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl PageFetcher for RecordingFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let now_in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now_in_flight, Ordering::SeqCst);
        self.starts.lock().unwrap().push(Instant::now());

        tokio::time::sleep(self.latency).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(FetchedPage::new(url, "<h1>Release Notes</h1>"))
    }
}

fn config(parallelism: usize, delay_ms: u64) -> ScrapeConfig {
    ScrapeConfig {
        parallelism,
        delay_ms,
        ..ScrapeConfig::default()
    }
}

#[tokio::test(start_paused = true)]
async fn test_dispatch_never_exceeds_parallelism_per_domain() {
    let fetcher = Arc::new(RecordingFetcher::new(Duration::from_millis(500)));
    let dispatcher = PageDispatcher::new(Arc::clone(&fetcher), &config(2, 0));

    let versions = generate_versions(6);
    let results = dispatcher.fetch_all(&versions, &ReleaseDateIndex::new()).await;

    assert_eq!(results.versions.len(), 6);
    assert!(results.failures.is_empty());
    assert_eq!(fetcher.max_in_flight.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn test_dispatch_spaces_request_starts_by_delay() {
    let fetcher = Arc::new(RecordingFetcher::new(Duration::from_millis(100)));
    let dispatcher = PageDispatcher::new(Arc::clone(&fetcher), &config(2, 1_000));

    let versions = generate_versions(4);
    let results = dispatcher.fetch_all(&versions, &ReleaseDateIndex::new()).await;
    assert_eq!(results.versions.len(), 4);

    let mut starts = fetcher.starts.lock().unwrap().clone();
    starts.sort();
    assert_eq!(starts.len(), 4);
    for pair in starts.windows(2) {
        assert!(
            pair[1] - pair[0] >= Duration::from_secs(1),
            "requests started {:?} apart",
            pair[1] - pair[0]
        );
    }
}

#[tokio::test(start_paused = true)]
async fn test_limiter_budgets_are_per_domain() {
    let limiter = DomainLimiter::new(1, Duration::from_secs(5));
    let started = Instant::now();

    let a = limiter.acquire("go.dev").await.unwrap();
    let b = limiter.acquire("example.org").await.unwrap();
    assert_eq!(Instant::now() - started, Duration::ZERO);
    drop((a, b));

    let _again = limiter.acquire("go.dev").await.unwrap();
    assert!(Instant::now() - started >= Duration::from_secs(5));
}

#[tokio::test(start_paused = true)]
async fn test_limiter_zero_parallelism_is_clamped() {
    let limiter = DomainLimiter::new(0, Duration::ZERO);
    let permit = tokio::time::timeout(Duration::from_secs(1), limiter.acquire("go.dev")).await;
    assert!(permit.is_ok(), "a zero parallelism limiter must still admit one request");
}

#[tokio::test]
async fn test_dispatch_invalid_template_reports_failure() {
    let fetcher = Arc::new(RecordingFetcher::new(Duration::ZERO));
    let bad = ScrapeConfig {
        doc_url_template: "not a url/{version}".to_string(),
        ..config(2, 0)
    };
    let dispatcher = PageDispatcher::new(fetcher, &bad);

    let results = dispatcher
        .fetch_all(&[GoVersion::new(1)], &ReleaseDateIndex::new())
        .await;

    assert!(results.versions.is_empty());
    assert_eq!(results.failures.len(), 1);
    assert_eq!(results.failures[0].version(), GoVersion::new(1));
}
