use std::future::Future;
use std::time::Duration;

use tracing::warn;

use super::ProviderError;

/// Retries after the first attempt on HTTP 429.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: DEFAULT_INITIAL_DELAY,
        }
    }
}

impl RetryPolicy {
    /// Wait before retry number `retry` (0-based): `initial_delay * 2^retry`.
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.initial_delay
            .saturating_mul(2u32.saturating_pow(retry))
    }
}

/// Run `op` until it succeeds, fails with a non-retryable error, or the
/// retry budget is spent. Only [`ProviderError::RateLimited`] is retried.
pub async fn with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    mut op: F,
) -> Result<T, ProviderError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let mut retry = 0;
    loop {
        match op().await {
            Err(err) if err.is_retryable() && retry < policy.max_retries => {
                let delay = policy.delay_for(retry);
                warn!(
                    label,
                    retries_left = policy.max_retries - retry,
                    delay_ms = delay.as_millis() as u64,
                    "rate limit hit, retrying"
                );
                tokio::time::sleep(delay).await;
                retry += 1;
            }
            other => return other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tokio::time::Instant;

    fn rate_limited() -> ProviderError {
        ProviderError::RateLimited {
            message: "Rate limit reached".into(),
        }
    }

    #[test]
    fn delays_double_from_initial() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(1), Duration::from_millis(2000));
        assert_eq!(policy.delay_for(2), Duration::from_millis(4000));
    }

    #[test]
    fn delay_saturates_on_large_retry_counts() {
        let policy = RetryPolicy {
            max_retries: 100,
            initial_delay: Duration::from_secs(1),
        };
        assert_eq!(policy.delay_for(64), Duration::from_secs(u64::from(u32::MAX)));
    }

    #[tokio::test]
    async fn succeeds_after_two_rate_limits() {
        let policy = RetryPolicy {
            max_retries: 3,
            initial_delay: Duration::from_millis(20),
        };
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let started = Instant::now();

        let out = with_backoff(&policy, "Montag", || async move {
            match counter.fetch_add(1, Ordering::SeqCst) {
                0 | 1 => Err(rate_limited()),
                _ => Ok("Bericht"),
            }
        })
        .await;

        assert_eq!(out, Ok("Bericht"));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // 20ms + 40ms of backoff
        assert!(started.elapsed() >= Duration::from_millis(60));
    }

    #[tokio::test]
    async fn gives_up_after_budget() {
        let policy = RetryPolicy {
            max_retries: 3,
            initial_delay: Duration::from_millis(1),
        };
        let calls = AtomicU32::new(0);
        let counter = &calls;

        let out: Result<(), _> = with_backoff(&policy, "Dienstag", || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(rate_limited())
        })
        .await;

        assert_eq!(out, Err(rate_limited()));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn other_errors_are_not_retried() {
        let policy = RetryPolicy::default();
        let calls = AtomicU32::new(0);
        let counter = &calls;

        let out: Result<(), _> = with_backoff(&policy, "Mittwoch", || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(ProviderError::Status {
                status: 500,
                message: "internal".into(),
            })
        })
        .await;

        assert!(matches!(out, Err(ProviderError::Status { status: 500, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn zero_budget_returns_first_rate_limit() {
        let policy = RetryPolicy {
            max_retries: 0,
            initial_delay: Duration::from_secs(10),
        };
        let calls = AtomicU32::new(0);
        let counter = &calls;
        let out: Result<(), _> = with_backoff(&policy, "Freitag", || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(rate_limited())
        })
        .await;
        assert!(out.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
