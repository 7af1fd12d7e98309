//! Per-domain request limiting for the page dispatcher.
//!
//! Each domain gets its own slot: a semaphore bounding in-flight requests and
//! the earliest instant the next request may start. All URLs on one host share
//! a single budget regardless of path.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{AcquireError, Mutex as AsyncMutex, OwnedSemaphorePermit, Semaphore};
use tokio::time::{sleep_until, Instant};
use tracing::debug;

struct DomainSlot {
    permits: Arc<Semaphore>,
    next_start: AsyncMutex<Instant>,
}

pub struct DomainLimiter {
    parallelism: usize,
    delay: Duration,
    slots: Mutex<HashMap<String, Arc<DomainSlot>>>,
}

/// Held for the duration of one request; dropping it frees the domain slot.
#[derive(Debug)]
pub struct DomainPermit {
    _permit: OwnedSemaphorePermit,
}

impl DomainLimiter {
    /// `parallelism` is clamped to at least one in-flight request.
    pub fn new(parallelism: usize, delay: Duration) -> Self {
        Self {
            parallelism: parallelism.max(1),
            delay,
            slots: Mutex::new(HashMap::new()),
        }
    }

    fn slot(&self, domain: &str) -> Arc<DomainSlot> {
        let mut slots = self
            .slots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        slots
            .entry(domain.to_string())
            .or_insert_with(|| {
                Arc::new(DomainSlot {
                    permits: Arc::new(Semaphore::new(self.parallelism)),
                    next_start: AsyncMutex::new(Instant::now()),
                })
            })
            .clone()
    }

    /// Waits for a free slot on `domain` and for the inter-request delay.
    pub async fn acquire(&self, domain: &str) -> Result<DomainPermit, AcquireError> {
        let slot = self.slot(domain);
        let permit = slot.permits.clone().acquire_owned().await?;

        let mut next_start = slot.next_start.lock().await;
        let now = Instant::now();
        if *next_start > now {
            debug!(domain = %domain, wait_ms = (*next_start - now).as_millis() as u64, "Rate limit delay");
            sleep_until(*next_start).await;
        }
        *next_start = Instant::now() + self.delay;
        drop(next_start);

        Ok(DomainPermit { _permit: permit })
    }
}
