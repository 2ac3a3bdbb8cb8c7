//! Retry policy for vision requests.

use std::time::Duration;

use crate::error::VisionError;

/// Configuration for request retry behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (0 = no retries).
    pub max_retries: u32,
    /// Initial delay before first retry.
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Multiplier for exponential backoff.
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Create a config with no retries.
    #[must_use]
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    /// Delay before retry number `attempt` (0-indexed).
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_possible_wrap
    )]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay_ms =
            self.initial_delay.as_millis() as f64 * self.backoff_multiplier.powi(attempt as i32);
        Duration::from_millis(delay_ms as u64).min(self.max_delay)
    }

    /// Delay before retrying after `err`, honoring `Retry-After` on rate limits.
    #[must_use]
    pub fn delay_for_error(&self, err: &VisionError, attempt: u32) -> Duration {
        if let VisionError::RateLimit {
            retry_after: Some(delay),
            ..
        } = err
        {
            return (*delay).min(self.max_delay);
        }
        self.delay_for_attempt(attempt)
    }

    /// Whether `err` on retry number `attempt` should be retried.
    #[must_use]
    pub const fn should_retry(&self, err: &VisionError, attempt: u32) -> bool {
        attempt < self.max_retries && err.is_retryable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_until_cap() {
        let config = RetryConfig::default();
        assert_eq!(config.delay_for_attempt(0), Duration::from_millis(500));
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(1000));
        assert_eq!(config.delay_for_attempt(2), Duration::from_millis(2000));
        assert_eq!(config.delay_for_attempt(10), Duration::from_secs(30));
    }

    #[test]
    fn retry_after_is_capped() {
        let config = RetryConfig::default();
        let err = VisionError::RateLimit {
            status: 429,
            retry_after: Some(Duration::from_secs(120)),
        };
        assert_eq!(config.delay_for_error(&err, 0), Duration::from_secs(30));

        let err = VisionError::RateLimit {
            status: 429,
            retry_after: Some(Duration::from_secs(2)),
        };
        assert_eq!(config.delay_for_error(&err, 0), Duration::from_secs(2));
    }

    #[test]
    fn only_transient_errors_are_retried() {
        let config = RetryConfig::default();
        let server = VisionError::ServerError {
            status: 503,
            body: String::new(),
        };
        let rejected = VisionError::Api {
            status: 401,
            body: "bad key".into(),
        };

        assert!(config.should_retry(&server, 0));
        assert!(!config.should_retry(&server, 3));
        assert!(!config.should_retry(&rejected, 0));
        assert!(!config.should_retry(&VisionError::EmptyResponse, 0));
        assert!(!RetryConfig::none().should_retry(&server, 0));
    }
}
