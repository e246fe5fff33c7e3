use backoff::backoff::Backoff;
use backoff::ExponentialBackoffBuilder;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use super::errors::LlmApiError;
use crate::domain::models::RetryConfig;

/// Retry policy for transient transport errors
///
/// Delays double from `initial_backoff_ms` up to `max_backoff_ms`; only
/// errors for which [`LlmApiError::is_transient`] holds are retried, at
/// most `max_retries` times.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    initial_backoff: Duration,
    max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self::new(
            config.max_retries,
            config.initial_backoff_ms,
            config.max_backoff_ms,
        )
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, initial_backoff_ms: u64, max_backoff_ms: u64) -> Self {
        Self {
            max_retries,
            initial_backoff: Duration::from_millis(initial_backoff_ms),
            max_backoff: Duration::from_millis(max_backoff_ms.max(initial_backoff_ms)),
        }
    }

    pub const fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Delay schedule: initial, doubled each step, capped, without jitter
    pub fn schedule(&self) -> impl Backoff {
        ExponentialBackoffBuilder::new()
            .with_initial_interval(self.initial_backoff)
            .with_multiplier(2.0)
            .with_randomization_factor(0.0)
            .with_max_interval(self.max_backoff)
            .with_max_elapsed_time(None)
            .build()
    }

    /// Execute an operation, retrying transient failures
    ///
    /// # Returns
    /// * `Ok(T)` - Operation succeeded
    /// * `Err(LlmApiError)` - Permanent error, or the last transient error
    ///   once retries are exhausted
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T, LlmApiError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, LlmApiError>>,
    {
        let mut schedule = self.schedule();
        let mut retries = 0;

        loop {
            match operation().await {
                Ok(result) => {
                    if retries > 0 {
                        debug!(retries, "request succeeded after retries");
                    }
                    return Ok(result);
                }
                Err(err) if err.is_transient() && retries < self.max_retries => {
                    let delay = schedule.next_backoff().unwrap_or(self.max_backoff);
                    retries += 1;
                    warn!(
                        attempt = retries,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "transient error, retrying"
                    );
                    sleep(delay).await;
                }
                Err(err) => {
                    if err.is_transient() {
                        warn!(attempts = retries + 1, error = %err, "giving up after retries");
                    } else {
                        debug!(error = %err, "permanent error, not retrying");
                    }
                    return Err(err);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_schedule_doubles_and_caps() {
        let policy = RetryPolicy::new(5, 100, 350);
        let mut schedule = policy.schedule();

        let delays: Vec<u128> = (0..4)
            .filter_map(|_| schedule.next_backoff())
            .map(|delay| delay.as_millis())
            .collect();
        assert_eq!(delays, vec![100, 200, 350, 350]);
    }

    #[tokio::test]
    async fn test_retries_transient_then_succeeds() {
        let policy = RetryPolicy::new(3, 1, 5);
        let calls = Arc::new(AtomicU32::new(0));

        let result = policy
            .execute(|| {
                let calls = Arc::clone(&calls);
                async move {
                    if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                        Err(LlmApiError::RateLimitExceeded)
                    } else {
                        Ok("done")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_error_not_retried() {
        let policy = RetryPolicy::new(3, 1, 5);
        let calls = Arc::new(AtomicU32::new(0));

        let result: Result<(), _> = policy
            .execute(|| {
                let calls = Arc::clone(&calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(LlmApiError::InvalidApiKey)
                }
            })
            .await;

        assert!(matches!(result, Err(LlmApiError::InvalidApiKey)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let policy = RetryPolicy::new(2, 1, 5);
        let calls = Arc::new(AtomicU32::new(0));

        let result: Result<(), _> = policy
            .execute(|| {
                let calls = Arc::clone(&calls);
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err(LlmApiError::Timeout)
                }
            })
            .await;

        assert!(matches!(result, Err(LlmApiError::Timeout)));
        assert_eq!(calls.load(Ordering::SeqCst), 3, "one try plus two retries");
    }
}
