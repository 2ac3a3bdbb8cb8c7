//! Error types for the chunking crate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while chunking or persisting chunks.
#[derive(Debug, Error)]
pub enum ChunkError {
    /// `chunk` was called before any strategy was activated.
    #[error("no chunking strategy has been set")]
    InvalidState,

    /// A strategy was constructed with unusable parameters.
    #[error("invalid chunking configuration: {0}")]
    InvalidConfig(String),

    /// Strategy token not recognised (strict policy only).
    #[error("unknown chunking strategy `{0}`; expected one of fixed, sentence, paragraph, table")]
    UnknownStrategy(String),

    /// The sentence segmenter could not process the input.
    #[error("sentence segmentation failed: {0}")]
    Segmentation(String),

    /// A chunk still held a code-block placeholder after every block was consumed
    /// (strict policy only).
    #[error("code block placeholder in chunk {chunk_index} has no block left to restore")]
    PlaceholderExhausted {
        /// Zero-based position of the offending chunk.
        chunk_index: usize,
    },

    /// Writing chunks to disk failed.
    #[error("persistence error at {path}: {source}")]
    Persistence {
        /// Path where the error occurred.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// IO operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ChunkError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for chunking operations.
pub type Result<T> = std::result::Result<T, ChunkError>;
