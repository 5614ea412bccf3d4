//! Exponential backoff for GitHub calls that fail transiently.
//!
//! Callers pass the predicate deciding which errors are retried: usually
//! [`GitHubError::is_retriable`], or [`GitHubError::is_rate_limited`] for
//! requests that must not be repeated once GitHub may have acted on them. A
//! `Retry-After` from the server replaces the computed delay, capped at
//! `max_delay`.

use std::time::Duration;

use tracing::warn;

use crate::error::GitHubError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryConfig {
    /// Attempts after the first one.
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub backoff_multiplier: f64,
}

impl RetryConfig {
    pub const DEFAULT: Self = Self {
        max_retries: 3,
        initial_delay: Duration::from_secs(2),
        max_delay: Duration::from_secs(60),
        backoff_multiplier: 2.0,
    };

    pub const NONE: Self = Self {
        max_retries: 0,
        initial_delay: Duration::ZERO,
        max_delay: Duration::ZERO,
        backoff_multiplier: 1.0,
    };

    /// Delay before retry number `attempt` (0-indexed).
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let secs = self.initial_delay.as_secs_f64() * self.backoff_multiplier.powi(exponent);
        Duration::from_secs_f64(secs.min(self.max_delay.as_secs_f64()))
    }

    fn delay_for(&self, attempt: u32, error: &GitHubError) -> Duration {
        error
            .retry_after()
            .map_or_else(|| self.delay_for_attempt(attempt), |d| d.min(self.max_delay))
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Runs `operation` until it succeeds, fails with an error `retry_on`
/// rejects, or runs out of retries.
///
/// # Errors
///
/// Returns the last error when it is not retried or retries are exhausted.
pub(crate) fn retry_with_backoff<T, F>(
    config: RetryConfig,
    what: &str,
    retry_on: fn(&GitHubError) -> bool,
    mut operation: F,
) -> Result<T, GitHubError>
where
    F: FnMut() -> Result<T, GitHubError>,
{
    let mut attempt = 0;

    loop {
        match operation() {
            Ok(value) => return Ok(value),
            Err(e) if retry_on(&e) && attempt < config.max_retries => {
                let delay = config.delay_for(attempt, &e);
                warn!(
                    operation = what,
                    attempt = attempt + 1,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %e,
                    "transient GitHub error, retrying"
                );
                std::thread::sleep(delay);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
