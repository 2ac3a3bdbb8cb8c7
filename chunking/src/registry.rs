//! Strategy names and the registry mapping them to configured instances.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::ChunkingConfig;
use crate::error::{ChunkError, Result};
use crate::strategy::{
    ChunkStrategy, FixedLengthChunker, ParagraphChunker, SentenceChunker, TableChunker,
};

/// The four selectable chunking strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// [`FixedLengthChunker`].
    Fixed,
    /// [`SentenceChunker`].
    Sentence,
    /// [`ParagraphChunker`].
    Paragraph,
    /// [`TableChunker`].
    Table,
}

impl StrategyKind {
    /// All kinds in registry order.
    pub const ALL: [Self; 4] = [Self::Fixed, Self::Sentence, Self::Paragraph, Self::Table];

    /// The configuration token for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Sentence => "sentence",
            Self::Paragraph => "paragraph",
            Self::Table => "table",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = ChunkError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ChunkError::UnknownStrategy(s.to_string()))
    }
}

/// One instance of every strategy, built once and read-only afterwards.
#[derive(Debug, Clone)]
pub struct StrategyRegistry {
    fixed: Arc<dyn ChunkStrategy>,
    sentence: Arc<dyn ChunkStrategy>,
    paragraph: Arc<dyn ChunkStrategy>,
    table: Arc<dyn ChunkStrategy>,
}

impl StrategyRegistry {
    /// Builds every strategy from `config`.
    ///
    /// # Errors
    /// Returns [`ChunkError::InvalidConfig`] if any strategy rejects its parameters.
    pub fn new(config: &ChunkingConfig) -> Result<Self> {
        Ok(Self {
            fixed: Arc::new(FixedLengthChunker::from_config(config)?),
            sentence: Arc::new(SentenceChunker::new(config.sentences_per_chunk)?),
            paragraph: Arc::new(ParagraphChunker::new(config.paragraphs_per_chunk)?),
            table: Arc::new(TableChunker::with_policy(config.policy)),
        })
    }

    /// Returns the instance registered for `kind`.
    #[must_use]
    pub fn get(&self, kind: StrategyKind) -> Arc<dyn ChunkStrategy> {
        let strategy = match kind {
            StrategyKind::Fixed => &self.fixed,
            StrategyKind::Sentence => &self.sentence,
            StrategyKind::Paragraph => &self.paragraph,
            StrategyKind::Table => &self.table,
        };
        Arc::clone(strategy)
    }

    /// Replaces the instance registered for `kind`, e.g. to inject a custom
    /// sentence segmenter.
    #[must_use]
    pub fn with(mut self, kind: StrategyKind, strategy: impl ChunkStrategy + 'static) -> Self {
        let strategy: Arc<dyn ChunkStrategy> = Arc::new(strategy);
        match kind {
            StrategyKind::Fixed => self.fixed = strategy,
            StrategyKind::Sentence => self.sentence = strategy,
            StrategyKind::Paragraph => self.paragraph = strategy,
            StrategyKind::Table => self.table = strategy,
        }
        self
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self {
            fixed: Arc::new(FixedLengthChunker::default()),
            sentence: Arc::new(SentenceChunker::default()),
            paragraph: Arc::new(ParagraphChunker::default()),
            table: Arc::new(TableChunker::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::PunctuationSegmenter;

    #[test]
    fn parses_known_tokens() {
        for kind in StrategyKind::ALL {
            assert_eq!(kind.as_str().parse::<StrategyKind>().unwrap(), kind);
        }
    }

    #[test]
    fn tokens_are_case_sensitive() {
        assert!("Fixed".parse::<StrategyKind>().is_err());
        assert!("bogus".parse::<StrategyKind>().is_err());
    }

    #[test]
    fn registry_names_match_kinds() {
        let registry = StrategyRegistry::default();
        for kind in StrategyKind::ALL {
            assert_eq!(registry.get(kind).name(), kind.as_str());
        }
    }

    #[test]
    fn registry_rejects_bad_config() {
        let config = ChunkingConfig::builder().chunk_size(10).overlap(10).build();
        assert!(StrategyRegistry::new(&config).is_err());
    }

    #[test]
    fn registry_entry_can_be_replaced() {
        let sentence = SentenceChunker::new(1)
            .unwrap()
            .with_segmenter(PunctuationSegmenter::new([';']));
        let registry = StrategyRegistry::default().with(StrategyKind::Sentence, sentence);
        let chunks = registry.get(StrategyKind::Sentence).split("a; b").unwrap();
        assert_eq!(chunks, vec!["a;", "b"]);
    }
}
