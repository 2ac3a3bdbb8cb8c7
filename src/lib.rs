//! # folio
//!
//! Façade crate for the folio ingestion pipeline. Chunking is always
//! available; the PDF renderer and the vision client are behind features.
//!
//! ## What's inside?
//!
//! - [`TextChunker`] with fixed-length, sentence, paragraph and table
//!   strategies, all of which keep fenced code blocks intact.
//! - [`save_chunks`] for JSON and CSV output.
//! - `pdf` (feature `pdf-process`): rasterise PDF pages to JPEG.
//! - `vision` (feature `vision`): describe page images with an
//!   OpenAI-compatible vision model, with a persistent cache.
//!
//! ## Example
//!
//! ```rust
//! use folio::{ChunkingConfig, TextChunker};
//!
//! let mut chunker = TextChunker::from_config(&ChunkingConfig::default()).unwrap();
//! chunker.select("paragraph").unwrap();
//! let chunks = chunker.chunk("First.\n\nSecond.\n\nThird.").unwrap();
//! assert_eq!(chunks, ["First.\n\nSecond.", "Third."]);
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub use folio_chunking::*;

/// PDF page rendering.
#[cfg(feature = "pdf-process")]
#[cfg_attr(docsrs, doc(cfg(feature = "pdf-process")))]
pub mod pdf {
    pub use folio_pdf_process::*;
}

/// Vision model client and image analysis.
#[cfg(feature = "vision")]
#[cfg_attr(docsrs, doc(cfg(feature = "vision")))]
pub mod vision {
    pub use folio_vision::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reexports_chunking() {
        let mut chunker = TextChunker::new();
        assert!(matches!(chunker.chunk("x"), Err(ChunkError::InvalidState)));
        chunker.select("table").unwrap();
        assert_eq!(chunker.chunk("|a|\n|b|\nend").unwrap(), ["|a|\n|b|"]);
    }

    #[cfg(feature = "vision")]
    #[tokio::test]
    async fn vision_reexported() {
        struct Fixed;
        impl vision::VisionModel for Fixed {
            async fn describe(&self, _: &str, _: &str) -> vision::Result<String> {
                Ok("ok".into())
            }
        }
        let analyzer = vision::ImageAnalyzer::new(Fixed, vision::ImageCache::in_memory(2));
        assert_eq!(analyzer.analyze_images(&[b"img"], None).await, ["ok"]);
    }
}
