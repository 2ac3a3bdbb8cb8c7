//! OpenAI-compatible vision client.

use std::future::Future;
use std::time::Duration;

use reqwest::{StatusCode, header};
use tracing::{debug, warn};

use crate::config::VisionConfig;
use crate::error::{Result, VisionError};
use crate::request::VisionRequest;
use crate::response::VisionResponse;

/// A model that turns an image plus a prompt into text.
pub trait VisionModel: Send + Sync {
    /// Describes a base64-encoded JPEG image according to `prompt`.
    fn describe(
        &self,
        image_b64: &str,
        prompt: &str,
    ) -> impl Future<Output = Result<String>> + Send;
}

/// Vision model served through a `/chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiVision {
    client: reqwest::Client,
    config: VisionConfig,
}

impl OpenAiVision {
    /// Builds a client with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns [`VisionError::Http`] if the HTTP client cannot be created.
    pub fn new(config: VisionConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    /// The configuration this client was built with.
    #[must_use]
    pub const fn config(&self) -> &VisionConfig {
        &self.config
    }

    async fn send_once(&self, body: &VisionRequest<'_>) -> Result<String> {
        let response = self
            .client
            .post(self.config.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(parse_retry_after);
            return Err(VisionError::RateLimit {
                status: status.as_u16(),
                retry_after,
            });
        }
        if status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(VisionError::ServerError {
                status: status.as_u16(),
                body,
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VisionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        let parsed: VisionResponse = serde_json::from_slice(&bytes)?;
        parsed.into_text().ok_or(VisionError::EmptyResponse)
    }
}

impl VisionModel for OpenAiVision {
    async fn describe(&self, image_b64: &str, prompt: &str) -> Result<String> {
        let body = VisionRequest::new(&self.config.model, image_b64, prompt);
        let retry = &self.config.retry;
        let mut attempt = 0;

        loop {
            match self.send_once(&body).await {
                Ok(text) => {
                    debug!(model = %self.config.model, chars = text.len(), "vision response");
                    return Ok(text);
                }
                Err(err) if retry.should_retry(&err, attempt) => {
                    let delay = retry.delay_for_error(&err, attempt);
                    warn!(
                        attempt = attempt + 1,
                        max_retries = retry.max_retries,
                        delay_ms = delay.as_millis(),
                        error = %err,
                        "Request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Parses a `Retry-After` value given in whole seconds.
fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}
