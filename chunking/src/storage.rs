//! Chunk persistence in JSON and CSV.

use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::error::{ChunkError, Result};

/// Output formats for a chunk sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SaveFormat {
    /// `{"chunks": [...], "total_chunks": n}`.
    #[default]
    Json,
    /// `chunk_id,content` header followed by one 1-indexed row per chunk.
    Csv,
}

#[derive(Serialize)]
struct ChunkRecord<'a> {
    chunks: &'a [String],
    total_chunks: usize,
}

impl SaveFormat {
    /// Parses a format token. `csv` (any case) selects CSV, anything else JSON.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        if token.eq_ignore_ascii_case("csv") {
            Self::Csv
        } else {
            Self::Json
        }
    }

    /// Infers the format from a file extension, defaulting to JSON.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map_or(Self::Json, Self::from_token)
    }

    /// File extension for this format, without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }

    /// Writes `chunks` to `writer` in this format.
    ///
    /// # Errors
    /// Returns an error if serialization or the underlying writer fails.
    pub fn write<W: Write>(self, chunks: &[String], mut writer: W) -> Result<()> {
        match self {
            Self::Json => {
                let record = ChunkRecord {
                    chunks,
                    total_chunks: chunks.len(),
                };
                serde_json::to_writer_pretty(&mut writer, &record)?;
            }
            Self::Csv => {
                writer.write_all(b"chunk_id,content\r\n")?;
                for (id, chunk) in chunks.iter().enumerate() {
                    write!(writer, "{},{}\r\n", id + 1, csv_field(chunk))?;
                }
            }
        }
        writer.flush()?;
        Ok(())
    }

    /// Renders `chunks` to a string in this format.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn render(self, chunks: &[String]) -> Result<String> {
        let mut buf = Vec::new();
        self.write(chunks, &mut buf)?;
        String::from_utf8(buf).map_err(|e| ChunkError::Serialization(e.to_string()))
    }
}

/// Quotes a CSV field when it holds a delimiter, quote, or line break.
fn csv_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\r', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// Saves `chunks` to `path`, creating parent directories as needed.
///
/// # Errors
/// Returns [`ChunkError::Persistence`] if the file cannot be written.
pub fn save_chunks(chunks: &[String], path: &Path, format: SaveFormat) -> Result<()> {
    let persistence = |source| ChunkError::Persistence {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(persistence)?;
    }
    let file = File::create(path).map_err(persistence)?;
    format
        .write(chunks, BufWriter::new(file))
        .map_err(|err| match err {
            ChunkError::Io(source) => persistence(source),
            other => other,
        })?;

    info!(
        path = %path.display(),
        chunks = chunks.len(),
        format = format.extension(),
        "saved chunks"
    );
    Ok(())
}

/// Returns `path`, or when `overwrite` is false and it exists, the first free
/// sibling named `<stem>_<n>.<ext>`.
#[must_use]
pub fn unique_output_path(path: &Path, overwrite: bool) -> PathBuf {
    if overwrite || !path.exists() {
        return path.to_path_buf();
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();

    (1..)
        .map(|n| path.with_file_name(format!("{stem}_{n}{suffix}")))
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| path.to_path_buf())
}
