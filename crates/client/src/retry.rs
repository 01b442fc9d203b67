//! Retry with exponential backoff for transient API failures.

use satinv_core::constants::{DEFAULT_BASE_DELAY_MS, DEFAULT_MAX_ATTEMPTS};
use satinv_core::{Error, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Maximum delay between attempts regardless of backoff growth
const MAX_DELAY: Duration = Duration::from_secs(10);

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total number of attempts, including the first one
    pub max_attempts: u32,
    /// Base delay for exponential backoff
    pub base_delay: Duration,
    /// Maximum delay between attempts
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(DEFAULT_BASE_DELAY_MS),
            max_delay: MAX_DELAY,
        }
    }
}

impl RetryConfig {
    /// Delay before the retry following `attempt` (zero-based), doubling per
    /// attempt and capped at `max_delay`
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponential = self.base_delay * 2u32.saturating_pow(attempt);
        exponential.min(self.max_delay)
    }
}

/// Execute an operation, retrying transient errors with backoff.
///
/// Authentication and malformed-response errors are returned immediately;
/// only errors reporting endpoint unavailability are retried.
pub async fn retry<F, Fut, T>(config: &RetryConfig, operation: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    tracing::info!(attempt = attempt + 1, "operation succeeded after retry");
                }
                return Ok(result);
            }
            Err(error) if attempt + 1 < config.max_attempts && error.is_transient() => {
                let delay = config.delay_for(attempt);
                tracing::warn!(
                    attempt = attempt + 1,
                    max_attempts = config.max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    %error,
                    "transient API failure, retrying"
                );
                sleep(delay).await;
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}

/// Classify an error for the given endpoint, used by callers wrapping I/O
pub(crate) fn unavailable(endpoint: &url::Url, error: impl std::fmt::Display) -> Error {
    Error::api_unavailable(endpoint.as_str(), error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_config() -> RetryConfig {
        RetryConfig {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
        }
    }

    #[tokio::test]
    async fn transient_errors_are_retried_to_success() {
        let calls = AtomicU32::new(0);
        let result = retry(&fast_config(), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(Error::api_unavailable("https://sat.example.com", "503"))
                } else {
                    Ok(42)
                }
            }
        })
        .await
        .unwrap();
        assert_eq!(result, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn attempts_are_bounded() {
        let calls = AtomicU32::new(0);
        let err = retry(&fast_config(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(Error::api_unavailable("https://sat.example.com", "503")) }
        })
        .await
        .unwrap_err();
        assert!(err.is_transient());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn authentication_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let err = retry(&fast_config(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(Error::authentication("https://sat.example.com", "401")) }
        })
        .await
        .unwrap_err();
        assert!(matches!(err, Error::Authentication { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let config = fast_config();
        assert_eq!(config.delay_for(0), Duration::from_millis(1));
        assert_eq!(config.delay_for(1), Duration::from_millis(2));
        assert_eq!(config.delay_for(2), Duration::from_millis(4));
        assert_eq!(config.delay_for(5), Duration::from_millis(4));
    }
}
