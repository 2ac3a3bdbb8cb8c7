//! Fenced code block shielding.
//!
//! Strategies cut text at character offsets, sentence ends and blank lines,
//! all of which occur inside Markdown code fences. [`CodeShield::extract`]
//! swaps every fenced block for a one-character placeholder before a strategy
//! runs, and [`ShieldedText::restore`] puts the blocks back into the produced
//! chunks afterwards.
//!
//! Restoration walks a single [`RestoreCursor`] across all chunks of a
//! document, so the n-th placeholder seen in chunk order receives the n-th
//! extracted block no matter how the strategy distributed the placeholders.

use std::sync::LazyLock;

use regex::{NoExpand, Regex};
use tracing::debug;

use crate::config::Policy;
use crate::error::{ChunkError, Result};

/// Sentinel substituted for each extracted code block.
///
/// A single private-use code point, so no strategy can split it.
pub const PLACEHOLDER: &str = "\u{E000}";

static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```.*?```").expect("fenced block pattern is valid"));

/// Extracts fenced code blocks from text.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeShield;

impl CodeShield {
    /// Replaces every fenced code block with [`PLACEHOLDER`].
    ///
    /// Matching is non-greedy: a block ends at the first closing fence. An
    /// unterminated fence is left in place.
    #[must_use]
    pub fn extract(text: &str) -> ShieldedText {
        let blocks: Vec<String> = FENCED_BLOCK
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect();

        if blocks.is_empty() {
            return ShieldedText {
                text: text.to_string(),
                blocks,
            };
        }

        let shielded = FENCED_BLOCK.replace_all(text, NoExpand(PLACEHOLDER));
        debug!(blocks = blocks.len(), "shielded fenced code blocks");
        ShieldedText {
            text: shielded.into_owned(),
            blocks,
        }
    }
}

/// Text with its code blocks swapped out, plus the blocks in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShieldedText {
    text: String,
    blocks: Vec<String>,
}

impl ShieldedText {
    /// The text with placeholders in place of code blocks.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Extracted blocks, in the order they appeared.
    #[must_use]
    pub fn blocks(&self) -> &[String] {
        &self.blocks
    }

    /// Restores placeholders in one chunk, consuming blocks from `cursor`.
    ///
    /// Call this for every chunk of a document in chunk order with the same
    /// cursor. When blocks run out, [`Policy::Legacy`] deletes the leftover
    /// placeholder and [`Policy::Strict`] returns
    /// [`ChunkError::PlaceholderExhausted`].
    pub fn restore(
        &self,
        chunk: &str,
        cursor: &mut RestoreCursor,
        policy: Policy,
    ) -> Result<String> {
        let chunk_index = cursor.chunks;
        cursor.chunks += 1;

        if !chunk.contains(PLACEHOLDER) {
            return Ok(chunk.to_string());
        }

        let mut restored = String::with_capacity(chunk.len());
        let mut rest = chunk;
        while let Some(pos) = rest.find(PLACEHOLDER) {
            restored.push_str(&rest[..pos]);
            if let Some(block) = self.blocks.get(cursor.next) {
                restored.push_str(block);
                cursor.next += 1;
            } else if policy.is_strict() {
                return Err(ChunkError::PlaceholderExhausted { chunk_index });
            } else {
                debug!(chunk_index, "dropping placeholder with no block left");
            }
            rest = &rest[pos + PLACEHOLDER.len()..];
        }
        restored.push_str(rest);

        Ok(restored)
    }

    /// Restores an ordered chunk sequence with a fresh cursor.
    pub fn restore_all(&self, chunks: Vec<String>, policy: Policy) -> Result<Vec<String>> {
        let mut cursor = RestoreCursor::new();
        chunks
            .iter()
            .map(|chunk| self.restore(chunk, &mut cursor, policy))
            .collect()
    }
}

/// Document-wide position in the block list, shared by all chunks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestoreCursor {
    next: usize,
    chunks: usize,
}

impl RestoreCursor {
    /// Creates a cursor positioned at the first block.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0, chunks: 0 }
    }

    /// Number of blocks handed out so far.
    #[must_use]
    pub const fn consumed(&self) -> usize {
        self.next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_BLOCKS: &str =
        "Intro text.\n```rust\nfn a() {}\n```\nMiddle.\n```\nlet b = 1;\n```\nOutro.";

    #[test]
    fn extracts_blocks_in_order() {
        let shielded = CodeShield::extract(TWO_BLOCKS);
        assert_eq!(
            shielded.blocks(),
            &["```rust\nfn a() {}\n```", "```\nlet b = 1;\n```"]
        );
        assert_eq!(
            shielded.text(),
            format!("Intro text.\n{PLACEHOLDER}\nMiddle.\n{PLACEHOLDER}\nOutro.")
        );
    }

    #[test]
    fn matching_is_non_greedy() {
        let shielded = CodeShield::extract("```a``` x ```b```");
        assert_eq!(shielded.blocks().len(), 2);
        assert_eq!(shielded.text(), format!("{PLACEHOLDER} x {PLACEHOLDER}"));
    }

    #[test]
    fn unterminated_fence_is_left_alone() {
        let shielded = CodeShield::extract("before ```never closed");
        assert!(shielded.blocks().is_empty());
        assert_eq!(shielded.text(), "before ```never closed");
    }

    #[test]
    fn cursor_is_shared_across_chunks() {
        let shielded = CodeShield::extract(TWO_BLOCKS);
        let chunks = vec![
            format!("Intro text.\n{PLACEHOLDER}"),
            "Middle.".to_string(),
            format!("{PLACEHOLDER}\nOutro."),
        ];
        let restored = shielded.restore_all(chunks, Policy::Legacy).unwrap();

        assert_eq!(restored[0], "Intro text.\n```rust\nfn a() {}\n```");
        assert_eq!(restored[1], "Middle.");
        assert_eq!(restored[2], "```\nlet b = 1;\n```\nOutro.");
    }

    #[test]
    fn exhausted_placeholder_is_dropped_under_legacy() {
        let shielded = CodeShield::extract("```only```");
        let chunks = vec![
            PLACEHOLDER.to_string(),
            format!("tail {PLACEHOLDER}!"),
        ];
        let restored = shielded.restore_all(chunks, Policy::Legacy).unwrap();
        assert_eq!(restored, vec!["```only```".to_string(), "tail !".to_string()]);
    }

    #[test]
    fn exhausted_placeholder_errors_under_strict() {
        let shielded = CodeShield::extract("```only```");
        let chunks = vec![PLACEHOLDER.to_string(), PLACEHOLDER.to_string()];
        let err = shielded.restore_all(chunks, Policy::Strict).unwrap_err();
        assert!(matches!(err, ChunkError::PlaceholderExhausted { chunk_index: 1 }));
    }

    #[test]
    fn cursor_counts_consumed_blocks() {
        let shielded = CodeShield::extract(TWO_BLOCKS);
        let mut cursor = RestoreCursor::new();
        shielded
            .restore(&format!("{PLACEHOLDER}{PLACEHOLDER}"), &mut cursor, Policy::Legacy)
            .unwrap();
        assert_eq!(cursor.consumed(), 2);
    }
}
