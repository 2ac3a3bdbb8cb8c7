//! Error types for the vision crate.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors that can arise when describing images with a vision model.
#[derive(Debug, Error)]
pub enum VisionError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider throttled the request.
    #[error("rate limited (status {status})")]
    RateLimit {
        /// HTTP status code.
        status: u16,
        /// Delay requested through `Retry-After`, if any.
        retry_after: Option<Duration>,
    },

    /// The provider failed internally.
    #[error("server error {status}: {body}")]
    ServerError {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// The provider rejected the request (bad key, bad model, bad payload).
    #[error("API error {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// The response carried no choices or no text.
    #[error("model returned an empty response")]
    EmptyResponse,

    /// Encoded image exceeds what the provider accepts.
    #[error("encoded image is {size} bytes, over the {limit} byte limit")]
    ImageTooLarge {
        /// Base64 payload size.
        size: usize,
        /// Accepted maximum.
        limit: usize,
    },

    /// JSON serialization or deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The cache file could not be written.
    #[error("cache error at {path}: {source}")]
    Cache {
        /// Cache file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl VisionError {
    /// Whether retrying the same request may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Http(_) | Self::RateLimit { .. } | Self::ServerError { .. }
        )
    }
}

/// Result type alias for vision operations.
pub type Result<T> = std::result::Result<T, VisionError>;
