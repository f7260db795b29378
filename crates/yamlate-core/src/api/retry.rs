//! Retry logic with exponential backoff for translation requests
//!
//! A failed attempt waits, doubles the delay, and tries again until the
//! attempt budget is spent or the error is not worth retrying.

use std::time::Duration;

use backoff::{backoff::Backoff, ExponentialBackoff};

use super::ApiError;

/// Retry policy configuration
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts allowed (the first call counts as one).
    pub max_attempts: u32,
    /// Base delay for exponential backoff (in seconds)
    pub base_delay_secs: u64,
    /// Maximum delay between retries (in seconds)
    pub max_delay_secs: u64,
    /// Whether to add jitter; off by default so delays follow the plain
    /// base-times-two-per-attempt schedule.
    pub jitter: bool,
    /// Multiplier for exponential backoff
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 1,
            max_delay_secs: 30,
            jitter: false,
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Create a new retry policy with a custom attempt budget
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            ..Default::default()
        }
    }

    /// Set the base delay
    pub fn with_base_delay(mut self, seconds: u64) -> Self {
        self.base_delay_secs = seconds;
        self
    }

    /// Set the maximum delay
    pub fn with_max_delay(mut self, seconds: u64) -> Self {
        self.max_delay_secs = seconds;
        self
    }

    /// Enable or disable jitter
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Create an exponential backoff instance
    pub fn create_backoff(&self) -> ExponentialBackoff {
        let mut backoff = ExponentialBackoff {
            initial_interval: Duration::from_secs(self.base_delay_secs),
            max_interval: Duration::from_secs(self.max_delay_secs),
            multiplier: self.multiplier,
            max_elapsed_time: None, // attempt budget handled separately
            ..Default::default()
        };

        if !self.jitter {
            backoff.randomization_factor = 0.0;
        }

        backoff
    }
}

/// Execute a request with retry logic.
///
/// Every retryable [`ApiError`] is retried after a backoff delay until the
/// attempt budget is exhausted; the last error is returned to the caller.
pub async fn execute_with_retry<F, Fut, T>(
    mut request_fn: F,
    policy: RetryPolicy,
) -> Result<T, ApiError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, ApiError>>,
{
    let mut backoff = policy.create_backoff();
    let mut attempts: u32 = 0;

    loop {
        match request_fn().await {
            Ok(response) => return Ok(response),
            Err(error) => {
                attempts += 1;
                if attempts >= policy.max_attempts.max(1) || !error.is_retryable() {
                    tracing::error!(
                        attempts,
                        "translation request failed, giving up: {}",
                        error
                    );
                    return Err(error);
                }

                let delay = backoff
                    .next_backoff()
                    .unwrap_or(Duration::from_secs(policy.max_delay_secs));
                tracing::warn!(
                    attempt = attempts,
                    delay_ms = delay.as_millis() as u64,
                    "translation request failed, retrying: {}",
                    error
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[test]
    fn test_default_retry_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay_secs, 1);
        assert_eq!(policy.max_delay_secs, 30);
        assert!(!policy.jitter);
    }

    #[test]
    fn test_backoff_doubles_without_jitter() {
        let mut backoff = RetryPolicy::default().create_backoff();
        let first = backoff.next_backoff().unwrap();
        let second = backoff.next_backoff().unwrap();
        let third = backoff.next_backoff().unwrap();
        assert_eq!(first, Duration::from_secs(1));
        assert_eq!(second, Duration::from_secs(2));
        assert_eq!(third, Duration::from_secs(4));
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_until_budget_spent() {
        let calls = AtomicU32::new(0);
        let result: Result<(), ApiError> = execute_with_retry(
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ApiError::Transport("connection reset".into()))
            },
            RetryPolicy::new(3),
        )
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let started = tokio::time::Instant::now();
        let result = execute_with_retry(
            || async {
                let attempt = calls.fetch_add(1, Ordering::SeqCst);
                if attempt < 2 {
                    Err(ApiError::Timeout(30))
                } else {
                    Ok("done".to_string())
                }
            },
            RetryPolicy::new(5),
        )
        .await;
        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // Two backoff delays: 1s then 2s
        assert!(started.elapsed() >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_error_fails_fast() {
        let calls = AtomicU32::new(0);
        let result: Result<(), ApiError> = execute_with_retry(
            || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ApiError::Status {
                    status: 401,
                    message: "unauthorized".into(),
                })
            },
            RetryPolicy::new(5),
        )
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
