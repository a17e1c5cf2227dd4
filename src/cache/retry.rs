//! Retry policies for cached reads and mutations

use std::future::Future;
use std::time::Duration;

use log::debug;

use crate::error::{ApiError, Error, Result};

/// Bounded retry with exponential backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: u32,
    /// Delay before the first retry; doubles on each further retry
    pub base_delay: Duration,
    /// Upper bound for a single delay, and for an honoured `Retry-After`
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Policy for ordinary reads and mutations.
    pub const DEFAULT: RetryPolicy = RetryPolicy {
        max_attempts: 3,
        base_delay: Duration::from_secs(1),
        max_delay: Duration::from_secs(30),
    };

    /// Longer, more patient policy for endpoints backed by services that
    /// can be briefly unavailable.
    pub const SERVER_ERROR: RetryPolicy = RetryPolicy {
        max_attempts: 5,
        base_delay: Duration::from_secs(2),
        max_delay: Duration::from_secs(60),
    };

    /// Single attempt.
    pub const NEVER: RetryPolicy = RetryPolicy {
        max_attempts: 1,
        base_delay: Duration::ZERO,
        max_delay: Duration::ZERO,
    };

    /// Backoff before retry number `retry` (0-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Delay before the next attempt, or `None` to give up.
    ///
    /// `attempt` is the 1-based number of the attempt that just failed.
    pub fn next_delay(&self, error: &Error, attempt: u32) -> Option<Duration> {
        if attempt >= self.max_attempts {
            return None;
        }

        match error {
            Error::Api(ApiError::RateLimit(retry_after)) => {
                (*retry_after <= self.max_delay).then_some(*retry_after)
            }
            Error::Api(e) if e.is_server_error() || matches!(e, ApiError::Network(_)) => {
                Some(self.backoff(attempt - 1))
            }
            // Client errors, undecodable bodies and local failures do not
            // improve on retry
            _ => None,
        }
    }

    /// Run `op` until it succeeds or the policy gives up.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) => match self.next_delay(&e, attempt) {
                    Some(delay) => {
                        debug!(
                            "Attempt {}/{} failed ({}), retrying in {:?}",
                            attempt, self.max_attempts, e, delay
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                    None => return Err(e),
                },
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::DEFAULT
    }
}
