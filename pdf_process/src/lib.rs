//! PDF page rasterisation for vision-model ingestion.
//!
//! Pages are rendered through pdfium at a configurable DPI and encoded as
//! RGB JPEG, ready to be base64-wrapped into a multimodal request.

mod error;
mod model;
mod pdfium;
mod render;

pub use error::{PdfProcessError, Result};
pub use model::{PageImage, PdfRenderOptions};
pub use render::{blank_jpeg, encode_jpeg};

use std::path::{Path, PathBuf};

use tracing::info;

/// PDF renderer entrypoint.
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    source: PdfSource,
}

#[derive(Debug, Clone)]
enum PdfSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl PdfRenderer {
    /// Build a renderer from a PDF file path.
    #[must_use]
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            source: PdfSource::Path(path.into()),
        }
    }

    /// Build a renderer from PDF bytes.
    #[must_use]
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            source: PdfSource::Bytes(bytes.into()),
        }
    }

    /// Render the selected pages to JPEG, in page order.
    ///
    /// # Errors
    /// Fails if pdfium cannot be loaded, the PDF cannot be opened, or any
    /// page fails to render.
    pub fn render_pages(&self, options: &PdfRenderOptions) -> Result<Vec<PageImage>> {
        let pages = match &self.source {
            PdfSource::Path(path) => render::render_pages_from_path(path, options)?,
            PdfSource::Bytes(bytes) => render::render_pages_from_bytes(bytes, options)?,
        };
        info!(
            source = %self.source_label(),
            pages = pages.len(),
            dpi = options.dpi,
            "rendered PDF pages"
        );
        Ok(pages)
    }

    /// [`PdfRenderer::render_pages`] on the blocking thread pool.
    ///
    /// # Errors
    /// Same as [`PdfRenderer::render_pages`].
    pub async fn render_pages_async(&self, options: PdfRenderOptions) -> Result<Vec<PageImage>> {
        let renderer = self.clone();
        blocking::unblock(move || renderer.render_pages(&options)).await
    }

    /// Returns source path if available.
    #[must_use]
    pub fn source_path(&self) -> Option<&Path> {
        match &self.source {
            PdfSource::Path(path) => Some(path.as_path()),
            PdfSource::Bytes(_) => None,
        }
    }

    fn source_label(&self) -> String {
        self.source_path()
            .map_or_else(|| "memory".to_string(), |p| p.display().to_string())
    }
}
