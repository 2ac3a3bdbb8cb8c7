//! Vision model access for the folio pipeline.
//!
//! [`OpenAiVision`] talks to any OpenAI-compatible `/chat/completions`
//! endpoint that accepts `image_url` content parts. [`ImageAnalyzer`] wraps a
//! [`VisionModel`] with a persistent [`ImageCache`] and bounded concurrency,
//! and returns one description per page in page order.
//!
//! ```rust,no_run
//! use folio_vision::{ImageAnalyzer, ImageCache, OpenAiVision, VisionConfig};
//!
//! # async fn run(pages: Vec<Vec<u8>>) -> folio_vision::Result<()> {
//! let config = VisionConfig::new("qwen-vl-max", "sk-...", "https://example.com/v1");
//! let analyzer = ImageAnalyzer::new(
//!     OpenAiVision::new(config)?,
//!     ImageCache::load("cache/image_cache.json", 100),
//! );
//! let texts = analyzer.analyze_images(&pages, None).await;
//! assert_eq!(texts.len(), pages.len());
//! # Ok(())
//! # }
//! ```

pub mod analyzer;
pub mod cache;
mod client;
mod config;
mod error;
mod request;
mod response;
mod retry;

pub use analyzer::{DEFAULT_PROMPT, FAILED_PAGE_TEXT, ImageAnalyzer, probe_api_key};
pub use cache::ImageCache;
pub use client::{OpenAiVision, VisionModel};
pub use config::{DEFAULT_TIMEOUT, VisionConfig};
pub use error::{Result, VisionError};
pub use retry::RetryConfig;
