//! Exponential backoff for rate-limited requests.

use std::future::Future;
use std::time::Duration;

use rand::Rng;
use tracing::debug;

/// Backoff schedule applied while the provider answers HTTP 429.
///
/// Retry `n` (0-based) waits `initial_backoff * 2^n`, capped at
/// `max_backoff`, plus a uniform jitter in `[0, max_jitter)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub max_jitter: Duration,
    /// Retries after the first attempt. `0` disables retrying.
    pub max_retries: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_backoff: Duration::from_millis(1000),
            max_backoff: Duration::from_secs(60),
            max_jitter: Duration::from_millis(500),
            max_retries: 8,
        }
    }
}

impl RetryPolicy {
    pub fn with_initial_backoff(mut self, d: Duration) -> Self {
        self.initial_backoff = d;
        self
    }

    pub fn with_max_backoff(mut self, d: Duration) -> Self {
        self.max_backoff = d;
        self
    }

    pub fn with_max_jitter(mut self, d: Duration) -> Self {
        self.max_jitter = d;
        self
    }

    pub fn with_max_retries(mut self, n: u32) -> Self {
        self.max_retries = n;
        self
    }

    /// Delay before retry `retry`, without jitter.
    pub fn base_delay(&self, retry: u32) -> Duration {
        2u32.checked_pow(retry)
            .and_then(|factor| self.initial_backoff.checked_mul(factor))
            .map_or(self.max_backoff, |d| d.min(self.max_backoff))
    }

    /// Delay before retry `retry`, including jitter.
    pub fn delay(&self, retry: u32) -> Duration {
        self.base_delay(retry) + self.jitter()
    }

    fn jitter(&self) -> Duration {
        let max_ms = self.max_jitter.as_millis() as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..max_ms))
    }
}

/// Result of a single request attempt.
#[derive(Debug)]
pub enum Attempt<T> {
    Done(T),
    RateLimited,
}

/// Result of the whole retry loop.
#[derive(Debug, PartialEq, Eq)]
pub enum RetryOutcome<T> {
    Done(T),
    Exhausted { attempts: u32 },
}

/// Call `send` until it stops reporting rate limiting or the policy runs out.
///
/// Errors from `send` end the loop immediately; they are never retried.
pub async fn retry_on_rate_limit<T, E, F, Fut>(
    policy: &RetryPolicy,
    mut send: F,
) -> Result<RetryOutcome<T>, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Attempt<T>, E>>,
{
    let mut retry = 0;
    loop {
        match send().await? {
            Attempt::Done(value) => return Ok(RetryOutcome::Done(value)),
            Attempt::RateLimited if retry >= policy.max_retries => {
                return Ok(RetryOutcome::Exhausted {
                    attempts: retry + 1,
                });
            }
            Attempt::RateLimited => {
                let delay = policy.delay(retry);
                debug!(
                    retry,
                    delay_ms = delay.as_millis() as u64,
                    "rate limited, backing off"
                );
                tokio::time::sleep(delay).await;
                retry += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::future::ready;
    use tokio::time::Instant;

    #[test]
    fn default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.initial_backoff, Duration::from_millis(1000));
        assert_eq!(policy.max_jitter, Duration::from_millis(500));
        assert_eq!(policy.max_retries, 8);
    }

    #[test]
    fn base_delay_doubles() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.base_delay(0), Duration::from_millis(1000));
        assert_eq!(policy.base_delay(1), Duration::from_millis(2000));
        assert_eq!(policy.base_delay(2), Duration::from_millis(4000));
        assert_eq!(policy.base_delay(1), policy.base_delay(0) * 2);
    }

    #[test]
    fn base_delay_is_capped() {
        let policy = RetryPolicy::default().with_max_backoff(Duration::from_secs(5));
        assert_eq!(policy.base_delay(3), Duration::from_secs(5));
        assert_eq!(policy.base_delay(40), Duration::from_secs(5));
    }

    #[test]
    fn jitter_is_bounded() {
        let policy = RetryPolicy::default();
        for _ in 0..100 {
            let d = policy.delay(0);
            assert!(d >= Duration::from_millis(1000));
            assert!(d < Duration::from_millis(1500));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn second_retry_waits_twice_as_long() {
        let policy = RetryPolicy::default().with_max_jitter(Duration::ZERO);
        let mut script = VecDeque::from([
            Attempt::RateLimited,
            Attempt::RateLimited,
            Attempt::Done(7),
        ]);
        let mut times = Vec::new();

        let outcome = retry_on_rate_limit(&policy, || {
            times.push(Instant::now());
            ready(Ok::<_, ()>(script.pop_front().unwrap()))
        })
        .await;

        assert_eq!(outcome, Ok(RetryOutcome::Done(7)));
        assert_eq!(times.len(), 3);
        let first = times[1] - times[0];
        let second = times[2] - times[1];
        // The paused clock advances to each timer deadline, give or take a tick
        assert!(first >= Duration::from_millis(1000) && first < Duration::from_millis(1005));
        assert!(second >= Duration::from_millis(2000) && second < Duration::from_millis(2005));
    }

    #[tokio::test(start_paused = true)]
    async fn gives_up_after_max_retries() {
        let policy = RetryPolicy::default()
            .with_max_jitter(Duration::ZERO)
            .with_max_retries(2);
        let mut calls = 0;

        let outcome = retry_on_rate_limit(&policy, || {
            calls += 1;
            ready(Ok::<Attempt<u32>, ()>(Attempt::RateLimited))
        })
        .await;

        assert_eq!(outcome, Ok(RetryOutcome::Exhausted { attempts: 3 }));
        assert_eq!(calls, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn errors_are_not_retried() {
        let policy = RetryPolicy::default();
        let mut calls = 0;

        let outcome = retry_on_rate_limit(&policy, || {
            calls += 1;
            ready(Err::<Attempt<u32>, _>("connection refused"))
        })
        .await;

        assert_eq!(outcome, Err("connection refused"));
        assert_eq!(calls, 1);
    }
}
