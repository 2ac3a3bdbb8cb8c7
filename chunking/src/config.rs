//! Configuration for chunking.

use serde::{Deserialize, Serialize};

/// How the chunker treats its lossy corner cases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// Unknown strategy tokens fall back to fixed-length, surplus code-block
    /// placeholders are dropped, and a table touching end-of-text is not emitted.
    #[default]
    Legacy,
    /// Unknown tokens and surplus placeholders are errors; trailing tables are emitted.
    Strict,
}

impl Policy {
    /// Returns true for [`Policy::Strict`].
    #[must_use]
    pub const fn is_strict(self) -> bool {
        matches!(self, Self::Strict)
    }
}

/// Tunables for every chunking strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Target chunk length in characters for the fixed-length strategy.
    pub chunk_size: usize,
    /// Characters shared by consecutive fixed-length chunks.
    pub overlap: usize,
    /// Sentence terminator the fixed-length strategy snaps to.
    pub terminator: char,
    /// Half-width of the window searched for a terminator around the target cut.
    pub snap_window: usize,
    /// Sentences grouped into one chunk by the sentence strategy.
    pub sentences_per_chunk: usize,
    /// Paragraphs grouped into one chunk by the paragraph strategy.
    pub paragraphs_per_chunk: usize,
    /// Handling of lossy corner cases.
    pub policy: Policy,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            overlap: 50,
            terminator: '.',
            snap_window: 50,
            sentences_per_chunk: 3,
            paragraphs_per_chunk: 2,
            policy: Policy::Legacy,
        }
    }
}

impl ChunkingConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder for custom configuration.
    #[must_use]
    pub fn builder() -> ChunkingConfigBuilder {
        ChunkingConfigBuilder::new()
    }
}

/// Builder for [`ChunkingConfig`].
#[derive(Debug, Default)]
pub struct ChunkingConfigBuilder {
    config: ChunkingConfig,
}

impl ChunkingConfigBuilder {
    /// Creates a builder seeded with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: ChunkingConfig::default(),
        }
    }

    /// Sets the fixed-length chunk size.
    #[must_use]
    pub const fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Sets the fixed-length overlap.
    #[must_use]
    pub const fn overlap(mut self, overlap: usize) -> Self {
        self.config.overlap = overlap;
        self
    }

    /// Sets the sentence terminator used for boundary snapping.
    #[must_use]
    pub const fn terminator(mut self, terminator: char) -> Self {
        self.config.terminator = terminator;
        self
    }

    /// Sets the boundary snapping window.
    #[must_use]
    pub const fn snap_window(mut self, window: usize) -> Self {
        self.config.snap_window = window;
        self
    }

    /// Sets how many sentences form one chunk.
    #[must_use]
    pub const fn sentences_per_chunk(mut self, n: usize) -> Self {
        self.config.sentences_per_chunk = n;
        self
    }

    /// Sets how many paragraphs form one chunk.
    #[must_use]
    pub const fn paragraphs_per_chunk(mut self, n: usize) -> Self {
        self.config.paragraphs_per_chunk = n;
        self
    }

    /// Sets the corner-case policy.
    #[must_use]
    pub const fn policy(mut self, policy: Policy) -> Self {
        self.config.policy = policy;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> ChunkingConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ChunkingConfig::default();
        assert_eq!(config.chunk_size, 500);
        assert_eq!(config.overlap, 50);
        assert_eq!(config.terminator, '.');
        assert_eq!(config.sentences_per_chunk, 3);
        assert_eq!(config.paragraphs_per_chunk, 2);
        assert_eq!(config.policy, Policy::Legacy);
    }

    #[test]
    fn builder_config() {
        let config = ChunkingConfig::builder()
            .chunk_size(200)
            .overlap(20)
            .terminator('。')
            .sentences_per_chunk(5)
            .paragraphs_per_chunk(1)
            .policy(Policy::Strict)
            .build();

        assert_eq!(config.chunk_size, 200);
        assert_eq!(config.overlap, 20);
        assert_eq!(config.terminator, '。');
        assert_eq!(config.sentences_per_chunk, 5);
        assert_eq!(config.paragraphs_per_chunk, 1);
        assert!(config.policy.is_strict());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: ChunkingConfig =
            serde_json::from_str(r#"{"chunk_size": 300, "policy": "strict"}"#).unwrap();
        assert_eq!(config.chunk_size, 300);
        assert_eq!(config.overlap, 50);
        assert_eq!(config.policy, Policy::Strict);
    }
}
