use governor::{DefaultDirectRateLimiter, Quota, RateLimiter as Governor};
use std::num::NonZeroU32;

use crate::domain::models::RateLimitConfig;

/// Token-bucket throttle in front of the chat-completion endpoint
///
/// Refills at `requests_per_second` and allows bursts of up to
/// `burst_size` requests.
pub struct RateLimiter {
    inner: DefaultDirectRateLimiter,
}

impl RateLimiter {
    /// Build a limiter; zero values are raised to one
    pub fn new(requests_per_second: u32, burst_size: u32) -> Self {
        let rate = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(burst_size).unwrap_or(NonZeroU32::MIN);

        Self {
            inner: Governor::direct(Quota::per_second(rate).allow_burst(burst)),
        }
    }

    /// Wait until a request may be sent
    pub async fn acquire(&self) {
        self.inner.until_ready().await;
    }

    /// Take a permit without waiting; false when the bucket is empty
    pub fn try_acquire(&self) -> bool {
        self.inner.check().is_ok()
    }
}

impl From<&RateLimitConfig> for RateLimiter {
    fn from(config: &RateLimitConfig) -> Self {
        Self::new(config.requests_per_second, config.burst_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    #[test]
    fn test_burst_then_empty() {
        let limiter = RateLimiter::new(1, 3);
        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(limiter.try_acquire());
        assert!(!limiter.try_acquire());
    }

    #[tokio::test]
    async fn test_acquire_waits_for_refill() {
        let limiter = RateLimiter::new(4, 1);

        let start = Instant::now();
        for _ in 0..3 {
            limiter.acquire().await;
        }

        // First permit is immediate, the next two wait ~250ms each
        assert!(
            start.elapsed() >= Duration::from_millis(400),
            "Rate limiting should enforce delays"
        );
    }

    #[test]
    fn test_zero_values_are_clamped() {
        let limiter = RateLimiter::new(0, 0);
        assert!(limiter.try_acquire());
    }
}
