//! Bounded polling with a per-attempt timeout.
//!
//! Each attempt sleeps for the policy interval, then races the operation
//! against the attempt timeout. The first successful attempt ends the loop.
//! A timeout, or an error from the operation, consumes one attempt. The
//! losing future of a timed-out race is dropped, not awaited.

use std::fmt;
use std::future::Future;
use std::time::Duration;

/// Default number of attempts.
pub const DEFAULT_ATTEMPTS: u32 = 5;

/// Default delay before each attempt, also used as the attempt timeout.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Polling policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first.
    pub attempts: u32,
    /// Sleep before every attempt.
    pub interval: Duration,
    /// Upper bound on a single attempt.
    pub attempt_timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            interval: DEFAULT_INTERVAL,
            attempt_timeout: DEFAULT_INTERVAL,
        }
    }
}

impl RetryPolicy {
    /// Upper bound on the total time spent polling.
    pub fn max_duration(&self) -> Duration {
        (self.interval + self.attempt_timeout) * self.attempts
    }
}

/// Why a single attempt did not succeed.
#[derive(Debug)]
pub enum AttemptFailure<E> {
    /// The attempt did not finish within the attempt timeout.
    TimedOut(Duration),
    /// The operation returned an error.
    Failed(E),
}

impl<E: fmt::Display> fmt::Display for AttemptFailure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimedOut(limit) => write!(f, "timed out after {limit:?}"),
            Self::Failed(e) => write!(f, "{e}"),
        }
    }
}

/// The retry budget was used up without a success.
#[derive(Debug)]
pub struct Exhausted<E> {
    /// Attempts made.
    pub attempts: u32,
    /// Outcome of the final attempt; `None` only for a zero-attempt policy.
    pub last: Option<AttemptFailure<E>>,
}

impl<E: fmt::Display> fmt::Display for Exhausted<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gave up after {} attempts", self.attempts)?;
        if let Some(last) = &self.last {
            write!(f, " (last: {last})")?;
        }
        Ok(())
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for Exhausted<E> {}

/// Run `op` until it succeeds or `policy.attempts` attempts have been made.
///
/// `op` receives the 1-based attempt number. On success returns the value
/// together with the attempt number that produced it.
pub async fn poll_with_timeout<F, Fut, T, E>(
    policy: &RetryPolicy,
    mut op: F,
) -> Result<(T, u32), Exhausted<E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let mut last = None;
    for attempt in 1..=policy.attempts {
        tokio::time::sleep(policy.interval).await;
        let failure = match tokio::time::timeout(policy.attempt_timeout, op(attempt)).await {
            Ok(Ok(value)) => return Ok((value, attempt)),
            Ok(Err(e)) => AttemptFailure::Failed(e),
            Err(_) => AttemptFailure::TimedOut(policy.attempt_timeout),
        };
        tracing::warn!(
            attempt,
            max_attempts = policy.attempts,
            "attempt failed: {failure}"
        );
        last = Some(failure);
    }
    Err(Exhausted {
        attempts: policy.attempts,
        last,
    })
}
