//! Text chunking for the folio ingestion pipeline.
//!
//! The crate turns one assembled document text into an ordered list of
//! chunks ready to be persisted or indexed:
//!
//! - [`strategy`] – the [`ChunkStrategy`] trait and the fixed-length,
//!   sentence, paragraph and table strategies.
//! - [`shield`] – reversible extraction of fenced code blocks so strategies
//!   never cut through them.
//! - [`TextChunker`] – holds the active strategy, selects it by name and
//!   applies shielding around it.
//! - [`storage`] – JSON and CSV writers for chunk sequences.
//!
//! ```rust
//! use folio_chunking::{ChunkingConfig, TextChunker};
//!
//! let config = ChunkingConfig::builder().chunk_size(120).overlap(10).build();
//! let mut chunker = TextChunker::from_config(&config).unwrap();
//! chunker.select("fixed").unwrap();
//! let chunks = chunker.chunk("Some text. ```\nlet x = 1;\n``` More text.").unwrap();
//! assert_eq!(chunks.len(), 1);
//! ```

mod chunker;
pub mod config;
mod error;
pub mod registry;
pub mod shield;
pub mod storage;
pub mod strategy;

pub use chunker::TextChunker;
pub use config::{ChunkingConfig, ChunkingConfigBuilder, Policy};
pub use error::{ChunkError, Result};
pub use registry::{StrategyKind, StrategyRegistry};
pub use shield::{CodeShield, RestoreCursor, ShieldedText};
pub use storage::{SaveFormat, save_chunks, unique_output_path};
pub use strategy::ChunkStrategy;
