use crate::error::Result;
use std::future::Future;
use std::time::Duration;
use tokio_retry::strategy::ExponentialBackoff;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Waits between attempts: `base`, `2 * base`, `4 * base`, ...
    /// One fewer than the attempt budget.
    pub fn delays(&self) -> impl Iterator<Item = Duration> {
        let base_ms = u64::try_from(self.base_delay.as_millis()).unwrap_or(u64::MAX);
        // 2^n * base / 2, so the first delay is exactly `base`.
        ExponentialBackoff::from_millis(2)
            .factor(base_ms)
            .map(|d| d / 2)
            .take(self.max_attempts.max(1) as usize - 1)
    }
}

/// Runs `op` until it succeeds or the policy's attempt budget is spent.
/// The closure receives the zero-based attempt index. The last error is returned.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    mut op: F,
) -> Result<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut delays = policy.delays();
    let mut attempt = 0;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) => match delays.next() {
                Some(delay) => {
                    tracing::warn!(
                        operation,
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                None => {
                    tracing::error!(
                        operation,
                        attempts = attempt + 1,
                        error = %e,
                        "retry budget exhausted"
                    );
                    return Err(e);
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast() -> RetryPolicy {
        RetryPolicy::new(3, Duration::from_millis(1))
    }

    #[test]
    fn backoff_doubles_from_base() {
        let delays: Vec<Duration> = RetryPolicy::default().delays().collect();
        assert_eq!(delays, vec![Duration::from_millis(500), Duration::from_millis(1000)]);

        let policy = RetryPolicy::new(4, Duration::from_millis(1));
        let delays: Vec<Duration> = policy.delays().collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_millis(1),
                Duration::from_millis(2),
                Duration::from_millis(4)
            ]
        );
    }

    #[test]
    fn single_attempt_never_waits() {
        assert_eq!(RetryPolicy::new(0, Duration::from_secs(1)).delays().count(), 0);
    }

    #[tokio::test]
    async fn gives_up_after_budget() {
        let calls = AtomicU32::new(0);
        let res: Result<()> = retry_with_backoff(&fast(), "test", |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(Error::Provider("boom".into())) }
        })
        .await;
        assert!(matches!(res, Err(Error::Provider(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn stops_on_first_success() {
        let calls = AtomicU32::new(0);
        let res = retry_with_backoff(&fast(), "test", |attempt| {
            calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 0 {
                    Err(Error::Provider("flaky".into()))
                } else {
                    Ok(attempt)
                }
            }
        })
        .await;
        assert_eq!(res.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
