//! Bounded retry for collaborator calls.
//!
//! An explicit attempt loop with an injectable delay so tests run
//! without real waiting. Retries never continue past `max_attempts`;
//! the last error is returned and the caller decides what the failure
//! scopes to (a page, a batch), never the whole run.

use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backoff {
    #[default]
    Fixed,
    Exponential,
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
    pub backoff: Backoff,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_attempts: 3,
            delay: Duration::from_secs(2),
            backoff: Backoff::Fixed,
        }
    }
}

impl RetryPolicy {
    /// Delay before the attempt following `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed => self.delay,
            Backoff::Exponential => self.delay * 2u32.saturating_pow(attempt.saturating_sub(1)),
        }
    }
}

/// Injectable delay strategy.
pub trait Delay {
    fn sleep(&self, duration: Duration);
}

/// Production delay: blocks the calling thread.
pub struct ThreadSleep;

impl Delay for ThreadSleep {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Run `op` up to `policy.max_attempts` times, sleeping between
/// attempts. Returns the first success or the last error.
pub fn with_retry<T, F>(
    policy: &RetryPolicy,
    delay: &dyn Delay,
    label: &str,
    mut op: F,
) -> Result<T>
where
    F: FnMut() -> Result<T>,
{
    let attempts = policy.max_attempts.max(1);

    for attempt in 1..attempts {
        match op() {
            Ok(value) => return Ok(value),
            Err(e) => {
                warn!(label, attempt, attempts, error = %e, "collaborator call failed");
                delay.sleep(policy.delay_for(attempt));
            }
        }
    }

    // Final attempt; its error is the caller's to scope.
    op()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PageTranslateError;
    use std::cell::RefCell;

    /// Records requested sleeps instead of waiting.
    pub struct RecordingDelay(pub RefCell<Vec<Duration>>);

    impl Delay for RecordingDelay {
        fn sleep(&self, duration: Duration) {
            self.0.borrow_mut().push(duration);
        }
    }

    #[test]
    fn succeeds_without_retry() {
        let delay = RecordingDelay(RefCell::new(Vec::new()));
        let result = with_retry(&RetryPolicy::default(), &delay, "op", || Ok(7));
        assert_eq!(result.unwrap(), 7);
        assert!(delay.0.borrow().is_empty());
    }

    #[test]
    fn retries_then_succeeds() {
        let delay = RecordingDelay(RefCell::new(Vec::new()));
        let mut calls = 0;
        let result = with_retry(&RetryPolicy::default(), &delay, "op", || {
            calls += 1;
            if calls < 3 {
                Err(PageTranslateError::detect("transient"))
            } else {
                Ok(calls)
            }
        });
        assert_eq!(result.unwrap(), 3);
        assert_eq!(delay.0.borrow().len(), 2);
    }

    #[test]
    fn exhausts_after_max_attempts() {
        let delay = RecordingDelay(RefCell::new(Vec::new()));
        let mut calls = 0;
        let result: Result<()> = with_retry(&RetryPolicy::default(), &delay, "op", || {
            calls += 1;
            Err(PageTranslateError::translate("down"))
        });
        assert!(result.is_err());
        assert_eq!(calls, 3);
        assert_eq!(delay.0.borrow().len(), 2);
    }

    #[test]
    fn exponential_backoff_doubles() {
        let policy = RetryPolicy {
            max_attempts: 4,
            delay: Duration::from_millis(100),
            backoff: Backoff::Exponential,
        };
        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3), Duration::from_millis(400));
    }
}
