//! Exponential backoff for feed sources.
//!
//! # Retry Strategy
//!
//! - Only [`FeedError::is_transient`] failures are retried
//! - Delay starts at `base_delay` and doubles per attempt
//! - Delay capped at 30 seconds
//! - Random jitter (0-250ms) added to every delay

use crate::feeds::{FeedError, FeedSource};
use crate::models::FeedEntry;
use rand::{Rng, rng};
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{error, instrument, warn};

/// Wrapper that adds exponential backoff retry logic to any [`FeedSource`].
///
/// The delay between retries follows:
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct Retry<T> {
    inner: T,
    max_retries: usize,
    base_delay: StdDuration,
    max_delay: StdDuration,
}

impl<T> Retry<T>
where
    T: FeedSource,
{
    /// Wrap `inner`, retrying transient failures up to `max_retries` times.
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }

    /// Un-jittered delay before retry number `attempt` (1-based).
    fn backoff(&self, attempt: usize) -> StdDuration {
        let shift = (attempt.saturating_sub(1)).min(16) as u32;
        self.base_delay
            .saturating_mul(1u32 << shift)
            .min(self.max_delay)
    }
}

impl<T> fmt::Debug for Retry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Retry")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> FeedSource for Retry<T>
where
    T: FeedSource,
{
    fn describe(&self) -> String {
        self.inner.describe()
    }

    #[instrument(level = "info", skip_all, fields(source = %self.inner.describe()))]
    async fn entries(&self) -> Result<Vec<FeedEntry>, FeedError> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let attempt_t0 = Instant::now();
            match self.inner.entries().await {
                Ok(entries) => return Ok(entries),
                Err(e) => {
                    attempt += 1;
                    let elapsed_ms_attempt = attempt_t0.elapsed().as_millis();
                    let elapsed_ms_total = total_t0.elapsed().as_millis();

                    if !e.is_transient() || attempt > self.max_retries {
                        error!(
                            attempt,
                            max = self.max_retries,
                            transient = e.is_transient(),
                            elapsed_ms_attempt,
                            elapsed_ms_total,
                            error = %e,
                            "Feed fetch failed"
                        );
                        return Err(e);
                    }

                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = self.backoff(attempt) + StdDuration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_attempt,
                        elapsed_ms_total,
                        ?delay,
                        error = %e,
                        "Feed fetch attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Fails `failures` times with `status`, then succeeds.
    struct Flaky {
        failures: usize,
        status: reqwest::StatusCode,
        calls: Cell<usize>,
    }

    impl Flaky {
        fn new(failures: usize, status: reqwest::StatusCode) -> Self {
            Self {
                failures,
                status,
                calls: Cell::new(0),
            }
        }
    }

    impl FeedSource for Flaky {
        fn describe(&self) -> String {
            "flaky".to_string()
        }

        async fn entries(&self) -> Result<Vec<FeedEntry>, FeedError> {
            let n = self.calls.get();
            self.calls.set(n + 1);
            if n < self.failures {
                Err(FeedError::Status {
                    url: "https://example.com/rss".into(),
                    status: self.status,
                })
            } else {
                Ok(vec![FeedEntry::default()])
            }
        }
    }

    const BAD_GATEWAY: reqwest::StatusCode = reqwest::StatusCode::BAD_GATEWAY;

    #[tokio::test]
    async fn test_retries_transient_failures() {
        let retry = Retry::new(
            Flaky::new(2, BAD_GATEWAY),
            3,
            StdDuration::from_millis(1),
        );
        let entries = retry.entries().await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(retry.inner.calls.get(), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let retry = Retry::new(
            Flaky::new(3, BAD_GATEWAY),
            1,
            StdDuration::from_millis(1),
        );
        assert!(retry.entries().await.is_err());
        assert_eq!(retry.inner.calls.get(), 2);
    }

    #[tokio::test]
    async fn test_permanent_failure_is_not_retried() {
        let retry = Retry::new(Flaky::new(1, reqwest::StatusCode::NOT_FOUND), 5, StdDuration::from_millis(1));
        assert!(retry.entries().await.is_err());
        assert_eq!(retry.inner.calls.get(), 1);
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let retry = Retry::new(Flaky::new(0, BAD_GATEWAY), 5, StdDuration::from_secs(1));
        assert_eq!(retry.backoff(1), StdDuration::from_secs(1));
        assert_eq!(retry.backoff(2), StdDuration::from_secs(2));
        assert_eq!(retry.backoff(3), StdDuration::from_secs(4));
        assert_eq!(retry.backoff(10), StdDuration::from_secs(30));
    }
}
