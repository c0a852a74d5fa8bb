//! Request pacing and rate-limit retries for PR lookups
//!
//! The platforms meter API usage by the amount of data returned, so only
//! successful lookups spend budget. [`Throttle`] is a single-token bucket:
//! a successful lookup takes the token and it refills after `interval`.
//! Lookups that find nothing leave the token in place.

use crate::error::Result;
use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, sleep, sleep_until};
use tracing::{debug, warn};

/// Single-token bucket pacing sequential lookups
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    refill_at: Option<Instant>,
}

impl Throttle {
    /// Create a throttle that refills one token every `interval`
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            refill_at: None,
        }
    }

    /// Refill interval
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until a token is available
    pub async fn acquire(&mut self) {
        if let Some(at) = self.refill_at.take()
            && at > Instant::now()
        {
            debug!(wait_ms = (at - Instant::now()).as_millis(), "pacing PR lookups");
            sleep_until(at).await;
        }
    }

    /// Spend the token; the next [`acquire`](Self::acquire) waits a full interval
    pub fn consume(&mut self) {
        if !self.interval.is_zero() {
            self.refill_at = Some(Instant::now() + self.interval);
        }
    }
}

/// Retry policy for requests rejected by rate limiting
///
/// Only [`Error::RateLimited`](crate::error::Error::RateLimited) is
/// retried; every other error is returned untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt (0 disables retrying)
    pub max_retries: u32,
    /// Delay before the first retry; doubles on every further retry
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Never retry
    pub const fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    /// Backoff before retry number `attempt` (zero-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Run `op`, retrying on rate limiting with exponential backoff
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Err(e) if e.is_rate_limited() && attempt < self.max_retries => {
                    let delay = self.delay_for(attempt);
                    warn!(attempt = attempt + 1, delay_ms = delay.as_millis(), error = %e, "rate limited, retrying");
                    sleep(delay).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_secs(2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_delay_doubles() {
        let policy = RetryPolicy {
            max_retries: 3,
            base_delay: Duration::from_millis(100),
        };
        assert_eq!(policy.delay_for(0), Duration::from_millis(100));
        assert_eq!(policy.delay_for(1), Duration::from_millis(200));
        assert_eq!(policy.delay_for(2), Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn test_throttle_waits_only_after_consume() {
        let mut throttle = Throttle::new(Duration::from_secs(1));

        let start = Instant::now();
        throttle.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(10));

        throttle.consume();
        throttle.acquire().await;
        let after_wait = start.elapsed();
        assert!(after_wait >= Duration::from_secs(1));

        // No consume: no wait
        throttle.acquire().await;
        assert_eq!(start.elapsed(), after_wait);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_on_rate_limit_then_success() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy {
            max_retries: 2,
            base_delay: Duration::from_secs(1),
        };

        let start = Instant::now();
        let result = policy
            .run(|| async {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(Error::RateLimited("slow down".to_string()))
                } else {
                    Ok(7)
                }
            })
            .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // 1s before the first retry, 2s before the second
        assert!(start.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test]
    async fn test_other_errors_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = RetryPolicy::default()
            .run(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(Error::Platform("boom".to_string()))
            })
            .await;

        assert!(matches!(result, Err(Error::Platform(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_exhausted_returns_rate_limit() {
        let calls = AtomicU32::new(0);
        let policy = RetryPolicy {
            max_retries: 1,
            base_delay: Duration::from_millis(10),
        };
        let result: Result<()> = policy
            .run(|| async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(Error::RateLimited("still".to_string()))
            })
            .await;

        assert!(matches!(result, Err(Error::RateLimited(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
