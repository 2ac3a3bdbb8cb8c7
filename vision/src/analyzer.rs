//! Batch image analysis on top of a [`VisionModel`].

use std::sync::atomic::{AtomicUsize, Ordering};

use base64::{Engine, engine::general_purpose::STANDARD};
use futures::stream::{self, StreamExt};
use parking_lot::Mutex;
use tracing::{error, info, warn};

use crate::cache::ImageCache;
use crate::client::VisionModel;
use crate::error::{Result, VisionError};

/// Prompt used when the caller supplies none.
pub const DEFAULT_PROMPT: &str = "Describe the content of this page. Transcribe all text \
exactly, keep tables as Markdown tables and code as fenced code blocks.";

/// Text substituted for a page whose analysis failed.
pub const FAILED_PAGE_TEXT: &str = "[image analysis failed]";

/// Largest accepted base64 payload, in bytes.
pub const MAX_ENCODED_IMAGE_BYTES: usize = 4 * 1024 * 1024;

/// Prompt sent by [`probe_api_key`].
pub const PROBE_PROMPT: &str = "Describe this image.";

/// Default number of in-flight requests.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Describes page images with a vision model, caching the answers.
#[derive(Debug)]
pub struct ImageAnalyzer<M> {
    model: M,
    cache: Mutex<ImageCache>,
    concurrency: usize,
}

impl<M: VisionModel> ImageAnalyzer<M> {
    /// Creates an analyzer with the given cache.
    pub const fn new(model: M, cache: ImageCache) -> Self {
        Self {
            model,
            cache: Mutex::new(cache),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Sets how many pages are analyzed at once (at least one).
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// The underlying model.
    #[must_use]
    pub const fn model(&self) -> &M {
        &self.model
    }

    /// Number of cached descriptions.
    #[must_use]
    pub fn cached(&self) -> usize {
        self.cache.lock().len()
    }

    /// Describes one JPEG image.
    ///
    /// A cached answer is returned without calling the model. A failed call
    /// flushes the cache so earlier answers survive a crash.
    ///
    /// # Errors
    ///
    /// Returns [`VisionError::ImageTooLarge`] for oversized images, or the
    /// model's error.
    pub async fn analyze_image(&self, jpeg: &[u8], prompt: Option<&str>) -> Result<String> {
        let prompt = prompt.unwrap_or(DEFAULT_PROMPT);
        let key = ImageCache::key(jpeg, prompt);

        let cached = self.cache.lock().get(&key).map(str::to_owned);
        if let Some(hit) = cached {
            return Ok(hit);
        }

        let encoded = STANDARD.encode(jpeg);
        if encoded.len() > MAX_ENCODED_IMAGE_BYTES {
            return Err(VisionError::ImageTooLarge {
                size: encoded.len(),
                limit: MAX_ENCODED_IMAGE_BYTES,
            });
        }

        match self.model.describe(&encoded, prompt).await {
            Ok(text) => {
                self.cache.lock().insert(key, text.clone());
                Ok(text)
            }
            Err(err) => {
                self.flush_cache();
                Err(err)
            }
        }
    }

    /// Describes every image, returning one text per image in input order.
    ///
    /// Up to `concurrency` requests run at once. A page that fails is logged
    /// and replaced by [`FAILED_PAGE_TEXT`]. The cache is flushed when the
    /// batch completes.
    pub async fn analyze_images<I>(&self, images: &[I], prompt: Option<&str>) -> Vec<String>
    where
        I: AsRef<[u8]>,
    {
        let total = images.len();
        let done = AtomicUsize::new(0);
        info!(total, concurrency = self.concurrency, "analyzing page images");

        let results = stream::iter(images.iter().enumerate())
            .map(|(index, image)| {
                let done = &done;
                async move {
                    let result = self.analyze_image(image.as_ref(), prompt).await;
                    let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
                    info!(done = finished, total, "page analyzed");
                    result.unwrap_or_else(|err| {
                        warn!(page = index + 1, error = %err, "image analysis failed");
                        FAILED_PAGE_TEXT.to_string()
                    })
                }
            })
            .buffered(self.concurrency)
            .collect::<Vec<_>>()
            .await;

        self.flush_cache();
        results
    }

    /// Writes pending cache entries, logging any failure.
    pub fn flush_cache(&self) {
        if let Err(err) = self.cache.lock().flush() {
            error!(error = %err, "failed to save image cache");
        }
    }
}

/// Checks credentials by sending a tiny image to the model.
///
/// Returns true iff the model answered with non-empty text.
pub async fn probe_api_key<M: VisionModel>(model: &M, probe_jpeg: &[u8]) -> bool {
    let encoded = STANDARD.encode(probe_jpeg);
    match model.describe(&encoded, PROBE_PROMPT).await {
        Ok(text) if !text.trim().is_empty() => {
            info!("API key verified");
            true
        }
        Ok(_) => {
            warn!("API key probe returned an empty answer");
            false
        }
        Err(err) => {
            error!(error = %err, "API key probe failed");
            false
        }
    }
}
