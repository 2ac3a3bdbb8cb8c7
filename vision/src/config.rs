//! Connection settings for the vision client.

use std::time::Duration;

use crate::retry::RetryConfig;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Settings for an OpenAI-compatible vision endpoint.
#[derive(Clone)]
pub struct VisionConfig {
    /// Model identifier sent with every request.
    pub model: String,
    /// Bearer token.
    pub api_key: String,
    /// Base URL, without the `/chat/completions` suffix.
    pub base_url: String,
    /// Whole-request timeout.
    pub timeout: Duration,
    /// Retry behavior for transient failures.
    pub retry: RetryConfig,
}

impl std::fmt::Debug for VisionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisionConfig")
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("retry", &self.retry)
            .finish()
    }
}

impl VisionConfig {
    /// Creates a configuration with the default timeout and retry policy.
    pub fn new(
        model: impl Into<String>,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            api_key: api_key.into(),
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryConfig::default(),
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Full URL of the chat completions endpoint.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let a = VisionConfig::new("m", "k", "https://api.example.com/v1");
        let b = VisionConfig::new("m", "k", "https://api.example.com/v1/");
        assert_eq!(a.endpoint(), "https://api.example.com/v1/chat/completions");
        assert_eq!(a.endpoint(), b.endpoint());
    }

    #[test]
    fn debug_hides_api_key() {
        let config = VisionConfig::new("m", "sk-secret", "https://x");
        let printed = format!("{config:?}");
        assert!(!printed.contains("sk-secret"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn defaults() {
        let config = VisionConfig::new("m", "k", "u").with_timeout(Duration::from_secs(5));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.retry.max_retries, 3);
    }
}
