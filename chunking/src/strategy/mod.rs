//! Chunking strategies.
//!
//! Every strategy implements [`ChunkStrategy`], a single `split` capability
//! turning text into an ordered list of chunks:
//!
//! - [`FixedLengthChunker`]: character windows with overlap, snapped to a nearby sentence end
//! - [`SentenceChunker`]: groups of sentences from an injected [`SentenceSegmenter`]
//! - [`ParagraphChunker`]: groups of blank-line separated paragraphs
//! - [`TableChunker`]: extracts runs of Markdown table rows and nothing else

mod fixed;
mod paragraph;
mod segmenter;
mod sentence;
mod table;

pub use fixed::FixedLengthChunker;
pub use paragraph::ParagraphChunker;
pub use segmenter::{PunctuationSegmenter, SentenceSegmenter, UnicodeSegmenter};
pub use sentence::SentenceChunker;
pub use table::TableChunker;

use std::fmt::Debug;

use crate::error::Result;

/// A text chunking algorithm.
///
/// Implementations are parameterised at construction and keep no state
/// between calls, so one instance can serve any number of documents.
pub trait ChunkStrategy: Send + Sync + Debug {
    /// Splits text into ordered chunks.
    fn split(&self, text: &str) -> Result<Vec<String>>;

    /// Returns the registry name of this strategy.
    fn name(&self) -> &'static str;

    /// Whether fenced code blocks should be shielded from this strategy.
    fn shields_code_blocks(&self) -> bool {
        true
    }
}
