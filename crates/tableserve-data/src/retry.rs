//! Retry policies for menu fetches.
//!
//! Only errors for which [`FetchError::is_retriable`] holds are retried;
//! everything else is returned after the first attempt.

use std::time::Duration;

use tableserve_core::config::RetryConfig;

use crate::FetchError;

/// Backoff strategy between retry attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackoffStrategy {
    /// No delay between retries.
    None,
    /// Exponential backoff with base and max.
    Exponential {
        /// Initial delay.
        base: Duration,
        /// Maximum delay.
        max: Duration,
    },
}

impl BackoffStrategy {
    /// Calculate delay for a given attempt number (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        match self {
            Self::None => Duration::ZERO,
            Self::Exponential { base, max } => {
                let multiplier = 2u32.saturating_pow(attempt);
                std::cmp::min(base.saturating_mul(multiplier), *max)
            }
        }
    }
}

impl Default for BackoffStrategy {
    fn default() -> Self {
        Self::Exponential {
            base: Duration::from_millis(200),
            max: Duration::from_millis(2000),
        }
    }
}

/// How many times to retry and how long to wait in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub backoff: BackoffStrategy,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl RetryPolicy {
    /// Create a policy with the default backoff.
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            backoff: BackoffStrategy::default(),
        }
    }

    /// Create a policy with no retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            backoff: BackoffStrategy::None,
        }
    }

    /// Exponential backoff from the `retry` config section.
    ///
    /// `max_retries = 0` disables retries; `base_delay_ms = 0` retries
    /// without waiting.
    pub fn from_config(config: &RetryConfig) -> Self {
        if config.max_retries == 0 {
            return Self::none();
        }
        let backoff = if config.base_delay_ms == 0 {
            BackoffStrategy::None
        } else {
            BackoffStrategy::Exponential {
                base: Duration::from_millis(config.base_delay_ms),
                max: Duration::from_millis(config.max_delay_ms),
            }
        };
        Self {
            max_retries: config.max_retries,
            backoff,
        }
    }

    /// Whether a failure on `attempt` (0-indexed) should be retried.
    pub fn should_retry(&self, error: &FetchError, attempt: u32) -> bool {
        attempt < self.max_retries && error.is_retriable()
    }

    /// Run `operation`, sleeping with `sleep` between retriable failures.
    pub fn run<T>(
        &self,
        label: &str,
        sleep: &dyn Fn(Duration),
        mut operation: impl FnMut() -> Result<T, FetchError>,
    ) -> Result<T, FetchError> {
        let mut attempt = 0;
        loop {
            match operation() {
                Ok(value) => return Ok(value),
                Err(err) if self.should_retry(&err, attempt) => {
                    let delay = self.backoff.delay_for_attempt(attempt);
                    tracing::warn!(
                        label,
                        attempt,
                        max_retries = self.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "fetch failed; retrying after back-off"
                    );
                    sleep(delay);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
