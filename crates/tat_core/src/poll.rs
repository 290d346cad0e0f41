//! Bounded retry for assertions that wait for the page to converge.

use crate::config::RetryConfig;
use crate::error::{Result, TatError};
use std::time::{Duration, Instant};

/// Timeout and interval for polling assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub timeout: Duration,
    pub interval: Duration,
}

impl RetryPolicy {
    /// Check once, never wait.
    pub fn none() -> Self {
        Self {
            timeout: Duration::ZERO,
            interval: Duration::ZERO,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            timeout: config.timeout(),
            interval: config.interval(),
        }
    }
}

/// State that may change on its own while an assertion waits.
pub trait Settle {
    /// Apply whatever became due. Returns whether waiting longer could
    /// still change the state.
    fn settle(&mut self) -> Result<bool>;
}

/// Errors that may resolve themselves if the page keeps settling.
fn is_retryable(err: &TatError) -> bool {
    matches!(
        err,
        TatError::AssertionFailed { .. } | TatError::SelectorNotFound(_)
    )
}

/// Re-run `check` until it passes, the timeout elapses, or the state can no
/// longer change. Returns the number of attempts on success.
pub fn poll_until<T, C>(policy: &RetryPolicy, state: &mut T, check: C) -> Result<u32>
where
    T: Settle,
    C: Fn(&T) -> Result<()>,
{
    let deadline = Instant::now() + policy.timeout;
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        let can_change = state.settle()?;
        match check(state) {
            Ok(()) => return Ok(attempts),
            Err(err) if is_retryable(&err) => {
                let now = Instant::now();
                if !can_change || now >= deadline {
                    return Err(err);
                }
                std::thread::sleep(policy.interval.min(deadline - now));
            }
            Err(err) => return Err(err),
        }
    }
}
