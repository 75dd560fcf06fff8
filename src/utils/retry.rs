use backoff::backoff::Backoff;
use backoff::ExponentialBackoff;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// What to do after a failed attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryAction {
    /// Give up and return the error
    Stop,
    /// Wait the policy's next exponential delay
    Backoff,
    /// Wait exactly this long (rate limits)
    After(Duration),
}

/// Retry policy configuration
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_interval: Duration,
    pub max_interval: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_interval: Duration::from_millis(100),
            max_interval: Duration::from_secs(10),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    /// Same delay between every attempt
    pub fn fixed(max_retries: u32, delay: Duration) -> Self {
        Self {
            max_retries,
            initial_interval: delay,
            max_interval: delay,
            multiplier: 1.0,
        }
    }

    /// Delay generator only; the attempt bound is enforced by `retry_async`
    pub fn to_exponential_backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            current_interval: self.initial_interval,
            initial_interval: self.initial_interval,
            randomization_factor: 0.0,
            multiplier: self.multiplier,
            max_interval: self.max_interval,
            max_elapsed_time: None,
            ..Default::default()
        }
    }

    /// Run `operation` until it succeeds, `classify` says stop, or `max_retries`
    /// retries have been spent. At most `max_retries + 1` calls are made.
    pub async fn retry_async<F, Fut, T, E, C>(&self, mut operation: F, classify: C) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, E>>,
        E: std::fmt::Display,
        C: Fn(&E) -> RetryAction,
    {
        let mut backoff = self.to_exponential_backoff();
        let mut retries = 0u32;

        loop {
            let err = match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => e,
            };

            if retries >= self.max_retries {
                return Err(err);
            }

            let delay = match classify(&err) {
                RetryAction::Stop => return Err(err),
                RetryAction::Backoff => backoff.next_backoff().unwrap_or(self.max_interval),
                RetryAction::After(delay) => delay,
            };

            retries += 1;
            warn!(
                "Operation failed, retry {}/{} in {:?}: {}",
                retries, self.max_retries, delay, err
            );
            sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_retry_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 3);
    }

    #[tokio::test]
    async fn test_retries_are_bounded() {
        let policy = RetryPolicy::fixed(2, Duration::ZERO);
        let calls = AtomicU32::new(0);

        let result: Result<(), String> = policy
            .retry_async(
                || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err("down".to_string())
                },
                |_| RetryAction::Backoff,
            )
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_stop_returns_immediately() {
        let policy = RetryPolicy::fixed(5, Duration::ZERO);
        let calls = AtomicU32::new(0);

        let result: Result<(), String> = policy
            .retry_async(
                || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Err("rejected".to_string())
                },
                |_| RetryAction::Stop,
            )
            .await;

        assert_eq!(result, Err("rejected".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_recovers_after_transient_failure() {
        let policy = RetryPolicy::fixed(3, Duration::ZERO);
        let calls = AtomicU32::new(0);

        let result: Result<u32, String> = policy
            .retry_async(
                || async {
                    let n = calls.fetch_add(1, Ordering::SeqCst);
                    if n < 2 {
                        Err(format!("attempt {}", n))
                    } else {
                        Ok(n)
                    }
                },
                |_| RetryAction::After(Duration::ZERO),
            )
            .await;

        assert_eq!(result, Ok(2));
    }

    #[test]
    fn test_exponential_delays_grow_and_cap() {
        let policy = RetryPolicy {
            max_retries: 5,
            initial_interval: Duration::from_millis(100),
            max_interval: Duration::from_millis(300),
            multiplier: 2.0,
        };
        let mut backoff = policy.to_exponential_backoff();
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(100)));
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(200)));
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(300)));
        assert_eq!(backoff.next_backoff(), Some(Duration::from_millis(300)));
    }
}
