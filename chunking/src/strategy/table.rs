//! Markdown table extraction.

use tracing::debug;

use crate::config::Policy;
use crate::error::Result;

use super::ChunkStrategy;

/// Emits each run of consecutive Markdown table rows as one chunk.
///
/// A row is a line that, once trimmed, starts and ends with `|`. Everything
/// outside table runs is discarded. A run is emitted when the first non-row
/// line after it is seen; under [`Policy::Legacy`] a run that reaches the end
/// of the text is therefore never emitted.
#[derive(Debug, Clone, Default)]
pub struct TableChunker {
    flush_trailing: bool,
}

impl TableChunker {
    /// Creates a table chunker with legacy end-of-text handling.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            flush_trailing: false,
        }
    }

    /// Creates a table chunker honouring `policy`; strict mode emits a
    /// trailing run.
    #[must_use]
    pub const fn with_policy(policy: Policy) -> Self {
        Self {
            flush_trailing: policy.is_strict(),
        }
    }

    fn is_row(line: &str) -> bool {
        line.starts_with('|') && line.ends_with('|')
    }
}

impl ChunkStrategy for TableChunker {
    fn split(&self, text: &str) -> Result<Vec<String>> {
        let mut chunks = Vec::new();
        let mut rows: Vec<&str> = Vec::new();

        for line in text.lines().map(str::trim) {
            if Self::is_row(line) {
                rows.push(line);
            } else if !rows.is_empty() {
                chunks.push(rows.join("\n"));
                rows.clear();
            }
        }

        if !rows.is_empty() {
            if self.flush_trailing {
                chunks.push(rows.join("\n"));
            } else {
                debug!(rows = rows.len(), "table run reaches end of text; not emitted");
            }
        }

        Ok(chunks)
    }

    fn name(&self) -> &'static str {
        "table"
    }

    fn shields_code_blocks(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_single_table() {
        let chunks = TableChunker::new().split("a\n|x|y|\n|1|2|\nb").unwrap();
        assert_eq!(chunks, vec!["|x|y|\n|1|2|"]);
    }

    #[test]
    fn separates_multiple_tables() {
        let text = "intro\n| h |\n|---|\n| v |\ntext\n\n|a|b|\n|c|d|\nend";
        let chunks = TableChunker::new().split(text).unwrap();
        assert_eq!(chunks, vec!["| h |\n|---|\n| v |", "|a|b|\n|c|d|"]);
    }

    #[test]
    fn indented_rows_are_trimmed() {
        let chunks = TableChunker::new().split("  |a|  \n\t|b|\nx").unwrap();
        assert_eq!(chunks, vec!["|a|\n|b|"]);
    }

    #[test]
    fn trailing_table_is_dropped_under_legacy() {
        let chunks = TableChunker::new().split("a\n|x|y|\n|1|2|").unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn trailing_table_is_kept_under_strict() {
        let chunks = TableChunker::with_policy(Policy::Strict)
            .split("a\n|x|y|\n|1|2|")
            .unwrap();
        assert_eq!(chunks, vec!["|x|y|\n|1|2|"]);
    }

    #[test]
    fn no_tables_yields_empty() {
        let chunks = TableChunker::new().split("plain | text\nno rows here").unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn tables_are_not_shielded() {
        assert!(!TableChunker::new().shields_code_blocks());
    }
}
