//! Fixed-length chunking with sentence-boundary snapping.

use crate::config::ChunkingConfig;
use crate::error::{ChunkError, Result};

use super::ChunkStrategy;

/// Splits text into windows of roughly `chunk_size` characters.
///
/// Instead of cutting exactly at `start + chunk_size`, the chunker looks for
/// the first sentence terminator within `snap_window` characters of that
/// point and cuts just after it. Consecutive chunks share `overlap`
/// characters. Offsets count `char`s, not bytes.
///
/// # Example
///
/// ```rust
/// use folio_chunking::strategy::{ChunkStrategy, FixedLengthChunker};
///
/// let chunker = FixedLengthChunker::new(100, 10).unwrap();
/// let chunks = chunker.split("Short text.").unwrap();
/// assert_eq!(chunks, vec!["Short text.".to_string()]);
/// ```
#[derive(Debug, Clone)]
pub struct FixedLengthChunker {
    chunk_size: usize,
    overlap: usize,
    terminator: char,
    snap_window: usize,
}

impl FixedLengthChunker {
    /// Creates a chunker cutting near `chunk_size` characters with `overlap`
    /// characters shared between neighbours.
    ///
    /// # Errors
    /// Returns [`ChunkError::InvalidConfig`] if `chunk_size` is zero or
    /// `overlap >= chunk_size`, either of which would stall the window.
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(ChunkError::InvalidConfig(
                "chunk_size must be greater than zero".into(),
            ));
        }
        if overlap >= chunk_size {
            return Err(ChunkError::InvalidConfig(format!(
                "overlap ({overlap}) must be less than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self {
            chunk_size,
            overlap,
            terminator: '.',
            snap_window: 50,
        })
    }

    /// Builds a chunker from the fixed-length fields of `config`.
    ///
    /// # Errors
    /// Same conditions as [`FixedLengthChunker::new`].
    pub fn from_config(config: &ChunkingConfig) -> Result<Self> {
        Ok(Self::new(config.chunk_size, config.overlap)?
            .with_terminator(config.terminator)
            .with_snap_window(config.snap_window))
    }

    /// Sets the sentence terminator to snap to, e.g. `'。'` for Chinese text.
    #[must_use]
    pub const fn with_terminator(mut self, terminator: char) -> Self {
        self.terminator = terminator;
        self
    }

    /// Sets how far around the target cut a terminator is searched for.
    #[must_use]
    pub const fn with_snap_window(mut self, snap_window: usize) -> Self {
        self.snap_window = snap_window;
        self
    }

    /// First terminator in `[end - window, end + window)`.
    ///
    /// The lower bound never drops below `start + overlap`, so the next
    /// window always starts after the current one.
    fn snap(&self, chars: &[char], start: usize, end: usize) -> Option<usize> {
        let lo = end
            .saturating_sub(self.snap_window)
            .max(start + self.overlap);
        let hi = (end + self.snap_window).min(chars.len());
        if lo >= hi {
            return None;
        }
        chars[lo..hi]
            .iter()
            .position(|&c| c == self.terminator)
            .map(|pos| lo + pos)
    }
}

impl Default for FixedLengthChunker {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            overlap: 50,
            terminator: '.',
            snap_window: 50,
        }
    }
}

impl ChunkStrategy for FixedLengthChunker {
    fn split(&self, text: &str) -> Result<Vec<String>> {
        let chars: Vec<char> = text.chars().collect();
        let offsets: Vec<usize> = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        let len = chars.len();

        let mut chunks = Vec::new();
        let mut start = 0;

        while start < len {
            let mut end = start + self.chunk_size;
            if end >= len {
                chunks.push(text[offsets[start]..].to_string());
                break;
            }

            if let Some(pos) = self.snap(&chars, start, end) {
                end = pos + 1;
            }

            chunks.push(text[offsets[start]..offsets[end]].to_string());
            start = end - self.overlap;
        }

        Ok(chunks)
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_returned_unchanged() {
        let chunker = FixedLengthChunker::default();
        let chunks = chunker.split("Short text. Another one.").unwrap();
        assert_eq!(chunks, vec!["Short text. Another one.".to_string()]);
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        let chunker = FixedLengthChunker::default();
        assert!(chunker.split("").unwrap().is_empty());
    }

    #[test]
    fn two_chunks_when_second_window_reaches_the_end() {
        let text = "a".repeat(950);
        let chunks = FixedLengthChunker::default().split(&text).unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], text[..500]);
        assert_eq!(chunks[1], text[450..]);
    }

    #[test]
    fn second_chunk_starts_at_overlap_offset() {
        let text: String = (0..1000)
            .map(|i| char::from(b'a' + (i % 26) as u8))
            .collect();
        let chunks = FixedLengthChunker::default().split(&text).unwrap();

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], text[..500]);
        assert_eq!(chunks[1], text[450..950]);
        assert_eq!(chunks[2], text[900..]);
    }

    #[test]
    fn cut_snaps_to_first_terminator_in_window() {
        let mut text = "x".repeat(1200);
        text.replace_range(460..461, ".");
        text.replace_range(540..541, ".");
        let chunks = FixedLengthChunker::default().split(&text).unwrap();

        assert_eq!(chunks[0].chars().count(), 461);
        assert!(chunks[0].ends_with('.'));
        // Next window starts `overlap` characters before the cut.
        assert_eq!(chunks[1], text[411..911]);
    }

    #[test]
    fn terminator_outside_window_is_ignored() {
        let mut text = "x".repeat(1200);
        text.replace_range(300..301, ".");
        let chunks = FixedLengthChunker::default().split(&text).unwrap();
        assert_eq!(chunks[0].chars().count(), 500);
    }

    #[test]
    fn full_width_terminator_with_multibyte_text() {
        let sentence = "这是一个用于测试的中文句子。";
        let text = sentence.repeat(80);
        let chunker = FixedLengthChunker::new(100, 10)
            .unwrap()
            .with_terminator('。');
        let chunks = chunker.split(&text).unwrap();

        assert!(chunks.len() > 1);
        for chunk in &chunks[..chunks.len() - 1] {
            assert!(chunk.ends_with('。'));
        }
        assert!(text.ends_with(chunks.last().unwrap().as_str()));
    }

    #[test]
    fn rechunking_a_chunk_is_idempotent() {
        let text = "Sentence number one. ".repeat(60);
        let chunker = FixedLengthChunker::default();
        let chunks = chunker.split(&text).unwrap();
        let again = chunker.split(&chunks[0]).unwrap();
        assert_eq!(again, vec![chunks[0].clone()]);
    }

    #[test]
    fn tiny_windows_still_make_progress() {
        let chunker = FixedLengthChunker::new(3, 2).unwrap();
        let chunks = chunker.split("a.b.c.d.e.").unwrap();
        assert_eq!(chunks, vec!["a.b.", "b.c.", "c.d.", "d.e.", "e."]);
    }

    #[test]
    fn overlap_must_be_less_than_chunk_size() {
        let err = FixedLengthChunker::new(50, 50).unwrap_err();
        assert!(matches!(err, ChunkError::InvalidConfig(_)));
        assert!(FixedLengthChunker::new(0, 0).is_err());
    }

    #[test]
    fn from_config_applies_terminator() {
        let config = ChunkingConfig::builder()
            .chunk_size(20)
            .overlap(5)
            .terminator('!')
            .build();
        let chunker = FixedLengthChunker::from_config(&config).unwrap();
        assert_eq!(chunker.chunk_size, 20);
        assert_eq!(chunker.terminator, '!');
    }
}
