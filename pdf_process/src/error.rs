use thiserror::Error;

/// Errors emitted while turning a PDF into page images.
#[derive(Debug, Error)]
pub enum PdfProcessError {
    /// Pdfium could not open the document.
    #[error("failed to parse PDF: {0}")]
    Parse(String),
    /// The source PDF could not be read from the filesystem.
    #[error("failed to read PDF: {0}")]
    Io(#[from] std::io::Error),
    /// Pdfium dynamic library could not be loaded.
    #[error("failed to load pdfium library: {0}")]
    PdfiumLoad(String),
    /// A page failed to rasterise.
    #[error("failed to render page {page}: {message}")]
    Render {
        /// 1-based page number.
        page: usize,
        /// Pdfium error text.
        message: String,
    },
    /// A rendered page could not be encoded.
    #[error("failed to encode page {page}: {message}")]
    Encode {
        /// 1-based page number.
        page: usize,
        /// Encoder error text.
        message: String,
    },
}

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, PdfProcessError>;
