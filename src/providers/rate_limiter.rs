// Token-bucket rate limiter for prompt pacing.
//
// One influence run costs 2(N+1) API requests for an N-word prompt, so
// back-to-back prompts burn through free-tier quotas fast. The batch and
// paragraph drivers acquire from this limiter before each prompt; the
// scoring core never sleeps on its own. Minimum-interval token bucket:
// each acquire waits out whatever remains of the configured interval.

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// A simple rate limiter that enforces a minimum interval between requests.
#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<Mutex<RateLimiterInner>>,
}

struct RateLimiterInner {
    /// Minimum time between requests
    interval: Duration,
    /// When the last request was allowed through
    last_request: Option<Instant>,
}

impl RateLimiter {
    /// Create a rate limiter that allows `requests_per_second` requests per second.
    pub fn new(requests_per_second: f64) -> Self {
        Self::from_interval(Duration::from_secs_f64(1.0 / requests_per_second))
    }

    /// Create a rate limiter with an explicit minimum interval between
    /// requests. This is the form the batch driver uses; prompt pacing is
    /// configured as seconds-between-prompts, not a rate.
    pub fn from_interval(interval: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RateLimiterInner {
                interval,
                last_request: None,
            })),
        }
    }

    /// Wait until a request is allowed, then return.
    ///
    /// If we're within the rate limit, this returns immediately.
    /// If we need to wait, it sleeps for the appropriate duration.
    pub async fn acquire(&self) {
        let mut inner = self.inner.lock().await;
        let now = Instant::now();

        if let Some(last) = inner.last_request {
            let elapsed = now.duration_since(last);
            if elapsed < inner.interval {
                let sleep_time = inner.interval - elapsed;
                // Drop the lock before sleeping so other tasks aren't blocked
                drop(inner);
                tokio::time::sleep(sleep_time).await;
                // Re-acquire after sleeping
                inner = self.inner.lock().await;
            }
        }

        inner.last_request = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_acquire_is_immediate() {
        let limiter = RateLimiter::from_interval(Duration::from_secs(30));
        let start = Instant::now();
        limiter.acquire().await;
        let elapsed = start.elapsed();
        // First prompt should never wait
        assert!(elapsed < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn second_acquire_waits_out_the_interval() {
        let limiter = RateLimiter::from_interval(Duration::from_millis(500));
        limiter.acquire().await;
        let start = Instant::now();
        limiter.acquire().await;
        let elapsed = start.elapsed();
        assert!(
            elapsed >= Duration::from_millis(400),
            "Expected ~500ms delay, got {:?}",
            elapsed
        );
    }

    #[tokio::test]
    async fn rate_constructor_matches_interval_constructor() {
        // 2 QPS = 500ms between requests
        let limiter = RateLimiter::new(2.0);
        limiter.acquire().await;
        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(400));
    }
}
