//! Bounded retry policy with a fixed delay between attempts.
//!
//! Call sites parameterise their own policy instead of hand-rolling
//! retry-with-sleep loops. The default policy performs a single attempt,
//! which keeps the fetcher's at-most-once behaviour unless a caller opts in.

use std::thread;
use std::time::Duration;

/// Maximum attempts and the fixed delay between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// A single attempt, no retries.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_attempts: 1,
            delay: Duration::ZERO,
        }
    }

    /// Creates a policy with the given attempt bound and inter-attempt delay.
    ///
    /// An attempt bound of 0 is treated as 1; every operation runs at least
    /// once.
    #[must_use]
    pub const fn new(max_attempts: u32, delay: Duration) -> Self {
        let bounded = if max_attempts == 0 { 1 } else { max_attempts };
        Self {
            max_attempts: bounded,
            delay,
        }
    }

    /// Returns the maximum number of attempts.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the delay between attempts.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Runs `operation` until it succeeds, the error is not retryable, or
    /// the attempt bound is exhausted. The last error is returned verbatim.
    ///
    /// # Errors
    ///
    /// Propagates the final error from `operation`.
    pub fn run<T, E>(
        &self,
        mut operation: impl FnMut() -> Result<T, E>,
        is_retryable: impl Fn(&E) -> bool,
    ) -> Result<T, E> {
        let mut attempt = 1;
        loop {
            match operation() {
                Ok(value) => return Ok(value),
                Err(error) if attempt < self.max_attempts && is_retryable(&error) => {
                    tracing::debug!(
                        attempt,
                        max_attempts = self.max_attempts,
                        delay_ms = u64::try_from(self.delay.as_millis()).unwrap_or(u64::MAX),
                        "attempt failed; retrying after delay"
                    );
                    thread::sleep(self.delay);
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}
