//! Bounded retry of transient failures.
//!
//! Only errors reporting [`FetchError::is_retryable`] (5xx and transport
//! failures) are retried, after a fixed delay, at most
//! [`RetryPolicy::max_retries`] times on top of the first attempt.

use std::future::Future;
use std::time::Duration;

use stock_core::{FetchError, Result};
use tracing::warn;

/// Fixed-delay retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the first attempt.
    pub max_retries: u32,
    /// Delay before each retry.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with an explicit ceiling and delay.
    #[must_use]
    pub const fn new(max_retries: u32, delay: Duration) -> Self {
        Self { max_retries, delay }
    }

    /// A policy that never retries.
    #[must_use]
    pub const fn none() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Returns true if `error` should be retried after `retries_done` retries.
    #[must_use]
    pub const fn should_retry(&self, error: &FetchError, retries_done: u32) -> bool {
        error.is_retryable() && retries_done < self.max_retries
    }

    /// Runs `op` until it succeeds, fails permanently, or the ceiling is reached.
    ///
    /// `label` identifies the request in logs.
    pub async fn run<T, F, Fut>(&self, label: &str, op: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut retries = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if self.should_retry(&e, retries) => {
                    retries += 1;
                    warn!(
                        request = label,
                        attempt = retries,
                        max_retries = self.max_retries,
                        delay_ms = self.delay.as_millis() as u64,
                        error = %e,
                        "Transient failure, retrying"
                    );
                    tokio::time::sleep(self.delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use stock_core::classify_status;

    fn fast() -> RetryPolicy {
        RetryPolicy::new(2, Duration::from_millis(1))
    }

    #[test]
    fn test_defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 2);
        assert_eq!(policy.delay, Duration::from_secs(5));
    }

    #[test]
    fn test_should_retry() {
        let policy = fast();
        let server = classify_status(503, "");
        assert!(policy.should_retry(&server, 0));
        assert!(policy.should_retry(&server, 1));
        assert!(!policy.should_retry(&server, 2));
        assert!(!policy.should_retry(&classify_status(402, ""), 0));
        assert!(!policy.should_retry(&FetchError::Validation("bad".into()), 0));
        assert!(policy.should_retry(&FetchError::Network("reset".into()), 0));
    }

    #[tokio::test]
    async fn test_succeeds_within_ceiling() {
        let calls = &AtomicU32::new(0);
        let result = fast()
            .run("quote AAPL", move || async move {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(classify_status(503, "Service Unavailable"))
                } else {
                    Ok(150.0)
                }
            })
            .await;

        assert_eq!(result, Ok(150.0));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_ceiling() {
        let calls = &AtomicU32::new(0);
        let result: Result<()> = fast()
            .run("quote AAPL", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(classify_status(500, ""))
            })
            .await;

        assert_eq!(result.unwrap_err().status(), Some(500));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_failure_is_not_retried() {
        let calls = &AtomicU32::new(0);
        let result: Result<()> = fast()
            .run("history AAPL", move || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(classify_status(404, ""))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
