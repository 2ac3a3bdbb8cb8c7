//! Sentence-count chunking.

use std::sync::Arc;

use crate::error::{ChunkError, Result};

use super::{ChunkStrategy, SentenceSegmenter, UnicodeSegmenter};

/// Groups a fixed number of consecutive sentences into each chunk.
///
/// Sentence detection is delegated to a [`SentenceSegmenter`], so callers can
/// plug in a language-specific backend. The default is [`UnicodeSegmenter`].
///
/// # Example
///
/// ```rust
/// use folio_chunking::strategy::{ChunkStrategy, SentenceChunker};
///
/// let chunker = SentenceChunker::new(2).unwrap();
/// let chunks = chunker.split("One. Two. Three.").unwrap();
/// assert_eq!(chunks, vec!["One. Two.".to_string(), "Three.".to_string()]);
/// ```
#[derive(Debug, Clone)]
pub struct SentenceChunker {
    sentences_per_chunk: usize,
    segmenter: Arc<dyn SentenceSegmenter>,
}

impl SentenceChunker {
    /// Creates a chunker emitting `sentences_per_chunk` sentences per chunk.
    ///
    /// # Errors
    /// Returns [`ChunkError::InvalidConfig`] if `sentences_per_chunk` is zero.
    pub fn new(sentences_per_chunk: usize) -> Result<Self> {
        if sentences_per_chunk == 0 {
            return Err(ChunkError::InvalidConfig(
                "sentences_per_chunk must be greater than zero".into(),
            ));
        }
        Ok(Self {
            sentences_per_chunk,
            segmenter: Arc::new(UnicodeSegmenter),
        })
    }

    /// Replaces the sentence segmenter.
    #[must_use]
    pub fn with_segmenter(mut self, segmenter: impl SentenceSegmenter + 'static) -> Self {
        self.segmenter = Arc::new(segmenter);
        self
    }
}

impl Default for SentenceChunker {
    fn default() -> Self {
        Self {
            sentences_per_chunk: 3,
            segmenter: Arc::new(UnicodeSegmenter),
        }
    }
}

impl ChunkStrategy for SentenceChunker {
    fn split(&self, text: &str) -> Result<Vec<String>> {
        let sentences = self.segmenter.segment(text)?;

        Ok(sentences
            .chunks(self.sentences_per_chunk)
            .map(|window| window.concat().trim().to_string())
            .filter(|chunk| !chunk.is_empty())
            .collect())
    }

    fn name(&self) -> &'static str {
        "sentence"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::PunctuationSegmenter;

    #[derive(Debug)]
    struct FailingSegmenter;

    impl SentenceSegmenter for FailingSegmenter {
        fn segment<'a>(&self, _text: &'a str) -> Result<Vec<&'a str>> {
            Err(ChunkError::Segmentation("model unavailable".into()))
        }
    }

    #[test]
    fn groups_three_sentences_by_default() {
        let text = "S1. S2. S3. S4. S5. S6. S7.";
        let chunks = SentenceChunker::default().split(text).unwrap();
        assert_eq!(chunks, vec!["S1. S2. S3.", "S4. S5. S6.", "S7."]);
    }

    #[test]
    fn sentences_are_preserved_in_order() {
        let text = "Alpha beta. Gamma delta!\nEpsilon? Zeta eta. Theta.";
        let chunks = SentenceChunker::new(2).unwrap().split(text).unwrap();

        let strip = |s: &str| s.split_whitespace().collect::<String>();
        assert_eq!(strip(&chunks.concat()), strip(text));
    }

    #[test]
    fn uses_injected_segmenter() {
        let chunker = SentenceChunker::new(1)
            .unwrap()
            .with_segmenter(PunctuationSegmenter::new([';']));
        let chunks = chunker.split("a; b; c").unwrap();
        assert_eq!(chunks, vec!["a;", "b;", "c"]);
    }

    #[test]
    fn segmentation_failure_is_fatal() {
        let chunker = SentenceChunker::default().with_segmenter(FailingSegmenter);
        let err = chunker.split("Anything.").unwrap_err();
        assert!(matches!(err, ChunkError::Segmentation(_)));
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(SentenceChunker::default().split("   ").unwrap().is_empty());
    }

    #[test]
    fn zero_sentences_rejected() {
        assert!(SentenceChunker::new(0).is_err());
    }
}
