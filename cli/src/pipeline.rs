//! End-to-end processing of one PDF: render, describe, chunk, save.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use folio_chunking::{SaveFormat, TextChunker, save_chunks, unique_output_path};
use folio_pdf_process::{PdfRenderOptions, PdfRenderer};
use folio_vision::{ImageAnalyzer, VisionModel};
use tracing::info;

use crate::config::AppConfig;

/// Number of chunks printed after a document is processed.
pub const PREVIEW_CHUNKS: usize = 3;

/// Per-document settings.
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    /// Where outputs are written; next to the PDF when unset.
    pub output_dir: Option<PathBuf>,
    /// Prompt text sent with every page.
    pub prompt: Option<String>,
    /// Strategy token handed to [`TextChunker::select`].
    pub strategy: String,
    /// Chunk file format.
    pub save_format: SaveFormat,
    /// Replace an existing chunk file instead of numbering a new one.
    pub overwrite_output: bool,
    /// Rasterisation settings.
    pub render: PdfRenderOptions,
}

impl ProcessOptions {
    /// Options taken from the application configuration.
    ///
    /// # Errors
    ///
    /// Fails if the configured prompt file cannot be found.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            output_dir: config.pdf.output_dir.clone(),
            prompt: config.prompt()?,
            strategy: config.pdf.chunk_strategy.clone(),
            save_format: config.save_format(),
            overwrite_output: config.pdf.overwrite_output,
            render: config.render_options(),
        })
    }
}

/// Files written for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Joined page descriptions.
    pub extracted_path: PathBuf,
    /// Saved chunk sequence.
    pub chunks_path: PathBuf,
    /// The chunks, in order.
    pub chunks: Vec<String>,
}

/// Ties rendering, image analysis, chunking and storage together.
#[derive(Debug)]
pub struct DocumentProcessor<M> {
    analyzer: ImageAnalyzer<M>,
    chunker: TextChunker,
    options: ProcessOptions,
}

impl<M: VisionModel> DocumentProcessor<M> {
    /// Creates a processor.
    pub const fn new(
        analyzer: ImageAnalyzer<M>,
        chunker: TextChunker,
        options: ProcessOptions,
    ) -> Self {
        Self {
            analyzer,
            chunker,
            options,
        }
    }

    /// The per-document options.
    #[must_use]
    pub const fn options(&self) -> &ProcessOptions {
        &self.options
    }

    /// Processes one PDF and prints a preview of its first chunks.
    ///
    /// # Errors
    ///
    /// Fails if the PDF cannot be rendered, the chunker rejects the text, or
    /// an output file cannot be written. Individual page analysis failures
    /// only leave a marker in the text.
    pub async fn process_document(&mut self, pdf: &Path) -> Result<ProcessOutput> {
        info!(path = %pdf.display(), "processing document");
        self.ensure_output_dir()?;

        let pages = PdfRenderer::from_path(pdf)
            .render_pages_async(self.options.render.clone())
            .await
            .with_context(|| format!("failed to render {}", pdf.display()))?;
        let images: Vec<Vec<u8>> = pages.into_iter().map(|page| page.jpeg).collect();

        let texts = self
            .analyzer
            .analyze_images(&images, self.options.prompt.as_deref())
            .await;

        let output = self.process_texts(pdf, &texts)?;
        println!("{}", preview(&output.chunks));
        Ok(output)
    }

    /// Joins page texts, writes the extracted text, chunks and saves it.
    ///
    /// # Errors
    ///
    /// Fails if the chunker rejects the text or an output file cannot be written.
    pub fn process_texts(&mut self, source: &Path, texts: &[String]) -> Result<ProcessOutput> {
        self.ensure_output_dir()?;
        let combined = texts.join("\n\n");

        let extracted_path = self.artifact_path(source, "_extracted_content.md");
        fs::write(&extracted_path, &combined)
            .with_context(|| format!("failed to write {}", extracted_path.display()))?;
        info!(path = %extracted_path.display(), "extracted text saved");

        let kind = self.chunker.select(&self.options.strategy)?;
        let chunks = self.chunker.chunk(&combined)?;
        info!(strategy = %kind, chunks = chunks.len(), "text chunked");

        let format = self.options.save_format;
        let target = self.artifact_path(source, &format!("_chunks.{}", format.extension()));
        let chunks_path = unique_output_path(&target, self.options.overwrite_output);
        save_chunks(&chunks, &chunks_path, format)?;
        info!(
            done = chunks.len(),
            total = chunks.len(),
            path = %chunks_path.display(),
            "chunks saved"
        );

        Ok(ProcessOutput {
            extracted_path,
            chunks_path,
            chunks,
        })
    }

    fn ensure_output_dir(&self) -> Result<()> {
        if let Some(dir) = &self.options.output_dir {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create output directory {}", dir.display()))?;
        }
        Ok(())
    }

    fn artifact_path(&self, source: &Path, suffix: &str) -> PathBuf {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let dir = self
            .options
            .output_dir
            .as_deref()
            .or_else(|| source.parent())
            .unwrap_or_else(|| Path::new("."));
        dir.join(format!("{stem}{suffix}"))
    }
}

/// Renders the first [`PREVIEW_CHUNKS`] chunks for the terminal.
#[must_use]
pub fn preview(chunks: &[String]) -> String {
    let mut out = String::from("\nPreview of the first chunks:\n");
    for (i, chunk) in chunks.iter().take(PREVIEW_CHUNKS).enumerate() {
        out.push_str(&format!("\nChunk {}:\n{chunk}\n{}\n", i + 1, "-".repeat(50)));
    }
    out
}

/// Lists `*.pdf` files in `dir`, sorted by name.
///
/// # Errors
///
/// Fails if the directory cannot be read.
pub fn find_pdfs(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read input directory {}", dir.display()))?;
    let mut pdfs = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf && path.is_file() {
            pdfs.push(path);
        }
    }
    pdfs.sort();
    Ok(pdfs)
}
