//! Bounded exponential-backoff retry.
//!
//! [`retry_with_backoff`] wraps any fallible async operation. It takes the
//! failure classifier as a parameter so the policy can be exercised without
//! a network.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

/// How a failed attempt is treated by the retry loop.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FailureClass {
    /// No response arrived: connection refused, timeout, aborted request.
    Transient,
    /// A response arrived with a 5xx status.
    ServerError,
    /// Anything else. Propagated after the first attempt.
    Permanent,
}

impl FailureClass {
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Transient | Self::ServerError)
    }
}

/// Retry ceiling and backoff base.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of retries after the initial attempt.
    pub max_retries: usize,
    /// Delay before the first retry; doubled for each following one.
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Delay to wait before retry number `attempt` (0-indexed).
    ///
    /// `base_delay * 2^attempt`, with the exponent capped at 16.
    pub fn delay_for(&self, attempt: usize) -> Duration {
        let exp = attempt.min(16) as u32;
        let multiplier = 1u64 << exp;
        let base_ms = u64::try_from(self.base_delay.as_millis()).unwrap_or(u64::MAX);
        Duration::from_millis(base_ms.saturating_mul(multiplier))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

/// Retry bookkeeping for a single logical call.
///
/// Owned by the caller and threaded through [`retry_with_backoff`]. The
/// counter never goes past the policy's `max_retries`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RetryState {
    retries: usize,
}

impl RetryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of retries performed so far.
    pub fn retries(&self) -> usize {
        self.retries
    }

    /// Total attempts issued so far, counting the initial one.
    pub fn attempts(&self) -> usize {
        self.retries + 1
    }
}

/// Runs `operation` until it succeeds, fails permanently, or the retry
/// budget in `state` is spent.
///
/// On a retryable failure the loop sleeps `policy.delay_for(retries)`,
/// bumps the counter and calls `operation` again. The error from the last
/// attempt is returned as-is.
pub async fn retry_with_backoff<T, E, F, Fut, C>(
    policy: &RetryPolicy,
    state: &mut RetryState,
    classify: C,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    C: Fn(&E) -> FailureClass,
{
    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };

        let class = classify(&err);
        if !class.is_retryable() {
            return Err(err);
        }

        if state.retries >= policy.max_retries {
            #[cfg(feature = "tracing")]
            tracing::warn!(
                retries = state.retries,
                max_retries = policy.max_retries,
                "maximum retry attempts reached"
            );
            return Err(err);
        }

        let delay = policy.delay_for(state.retries);
        state.retries += 1;

        #[cfg(feature = "tracing")]
        tracing::warn!(
            retry = state.retries,
            max_retries = policy.max_retries,
            delay_ms = delay.as_millis() as u64,
            failure = ?class,
            "retrying request"
        );

        sleep(delay).await;
    }
}
