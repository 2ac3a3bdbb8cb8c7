//! Paragraph-count chunking.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ChunkError, Result};

use super::ChunkStrategy;

static PARAGRAPH_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n\s*\n|\r\n\s*\r\n").expect("paragraph break pattern is valid")
});

/// Groups a fixed number of blank-line separated paragraphs into each chunk.
#[derive(Debug, Clone)]
pub struct ParagraphChunker {
    paragraphs_per_chunk: usize,
}

impl ParagraphChunker {
    /// Creates a chunker emitting `paragraphs_per_chunk` paragraphs per chunk.
    ///
    /// # Errors
    /// Returns [`ChunkError::InvalidConfig`] if `paragraphs_per_chunk` is zero.
    pub fn new(paragraphs_per_chunk: usize) -> Result<Self> {
        if paragraphs_per_chunk == 0 {
            return Err(ChunkError::InvalidConfig(
                "paragraphs_per_chunk must be greater than zero".into(),
            ));
        }
        Ok(Self {
            paragraphs_per_chunk,
        })
    }

    fn paragraphs(text: &str) -> Vec<&str> {
        PARAGRAPH_BREAK
            .split(text)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect()
    }
}

impl Default for ParagraphChunker {
    fn default() -> Self {
        Self {
            paragraphs_per_chunk: 2,
        }
    }
}

impl ChunkStrategy for ParagraphChunker {
    fn split(&self, text: &str) -> Result<Vec<String>> {
        Ok(Self::paragraphs(text)
            .chunks(self.paragraphs_per_chunk)
            .map(|window| window.join("\n\n"))
            .collect())
    }

    fn name(&self) -> &'static str {
        "paragraph"
    }
}
