//! The chunker context: active strategy, selection, and shielded dispatch.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::{ChunkingConfig, Policy};
use crate::error::{ChunkError, Result};
use crate::registry::{StrategyKind, StrategyRegistry};
use crate::shield::CodeShield;
use crate::strategy::{ChunkStrategy, FixedLengthChunker};

/// Holds the active chunking strategy and applies it to documents.
///
/// A chunker starts without an active strategy; pick one with
/// [`TextChunker::select`] or [`TextChunker::set_strategy`]. Swapping takes
/// `&mut self`, so documents processed in parallel each need their own
/// chunker (cloning is cheap, strategies are shared).
///
/// # Example
///
/// ```rust
/// use folio_chunking::TextChunker;
///
/// let mut chunker = TextChunker::new();
/// chunker.select("paragraph").unwrap();
/// let chunks = chunker.chunk("one\n\ntwo\n\nthree").unwrap();
/// assert_eq!(chunks, vec!["one\n\ntwo".to_string(), "three".to_string()]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextChunker {
    registry: StrategyRegistry,
    active: Option<Arc<dyn ChunkStrategy>>,
    policy: Policy,
}

impl TextChunker {
    /// Creates a chunker with default strategy parameters and the legacy policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a chunker whose registry is built from `config`.
    ///
    /// # Errors
    /// Returns [`ChunkError::InvalidConfig`] if any strategy rejects its parameters.
    pub fn from_config(config: &ChunkingConfig) -> Result<Self> {
        Ok(Self {
            registry: StrategyRegistry::new(config)?,
            active: None,
            policy: config.policy,
        })
    }

    /// Creates a chunker from an explicit registry and policy.
    #[must_use]
    pub const fn with_registry(registry: StrategyRegistry, policy: Policy) -> Self {
        Self {
            registry,
            active: None,
            policy,
        }
    }

    /// Creates a chunker with `strategy` already active.
    #[must_use]
    pub fn with_strategy(strategy: impl ChunkStrategy + 'static) -> Self {
        Self {
            active: Some(Arc::new(strategy)),
            ..Self::default()
        }
    }

    /// Replaces the active strategy.
    pub fn set_strategy(&mut self, strategy: Arc<dyn ChunkStrategy>) {
        self.active = Some(strategy);
    }

    /// Activates the registry entry named by `name`.
    ///
    /// Unrecognised names activate a default [`FixedLengthChunker`] under
    /// [`Policy::Legacy`].
    ///
    /// # Errors
    /// Returns [`ChunkError::UnknownStrategy`] for an unrecognised name under
    /// [`Policy::Strict`].
    pub fn select(&mut self, name: &str) -> Result<StrategyKind> {
        match name.parse::<StrategyKind>() {
            Ok(kind) => {
                self.active = Some(self.registry.get(kind));
                Ok(kind)
            }
            Err(err) if self.policy.is_strict() => Err(err),
            Err(_) => {
                warn!(strategy = name, "unknown chunk strategy, using fixed");
                self.active = Some(Arc::new(FixedLengthChunker::default()));
                Ok(StrategyKind::Fixed)
            }
        }
    }

    /// The active strategy, if any.
    #[must_use]
    pub fn strategy(&self) -> Option<&Arc<dyn ChunkStrategy>> {
        self.active.as_ref()
    }

    /// The registry backing [`TextChunker::select`].
    #[must_use]
    pub const fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    /// The corner-case policy in effect.
    #[must_use]
    pub const fn policy(&self) -> Policy {
        self.policy
    }

    /// Splits `text` with the active strategy.
    ///
    /// Fenced code blocks are shielded from every strategy that asks for it
    /// and restored verbatim into the produced chunks.
    ///
    /// # Errors
    /// Returns [`ChunkError::InvalidState`] if no strategy was ever set, and
    /// propagates strategy and restore errors.
    pub fn chunk(&self, text: &str) -> Result<Vec<String>> {
        let strategy = self.active.as_ref().ok_or(ChunkError::InvalidState)?;

        let chunks = if strategy.shields_code_blocks() {
            let shielded = CodeShield::extract(text);
            let chunks = strategy.split(shielded.text())?;
            shielded.restore_all(chunks, self.policy)?
        } else {
            strategy.split(text)?
        };

        debug!(
            strategy = strategy.name(),
            chunks = chunks.len(),
            "chunked text"
        );
        Ok(chunks)
    }
}
