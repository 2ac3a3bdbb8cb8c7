use std::ops::RangeInclusive;
use std::path::PathBuf;

/// Runtime options for rasterising a PDF.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfRenderOptions {
    /// Render resolution. Values below 72 are raised to 72.
    pub dpi: u16,
    /// JPEG quality, 1–100.
    pub jpeg_quality: u8,
    /// Optional inclusive 1-based page range.
    pub page_range: Option<RangeInclusive<usize>>,
    /// Path to the pdfium dynamic library (for example `/opt/lib/libpdfium.so`).
    /// The system library is used when unset.
    pub pdfium_library_path: Option<PathBuf>,
}

impl Default for PdfRenderOptions {
    fn default() -> Self {
        Self {
            dpi: 200,
            jpeg_quality: 95,
            page_range: None,
            pdfium_library_path: None,
        }
    }
}

impl PdfRenderOptions {
    /// Sets the render resolution.
    #[must_use]
    pub const fn with_dpi(mut self, dpi: u16) -> Self {
        self.dpi = dpi;
        self
    }

    /// Sets the JPEG quality.
    #[must_use]
    pub const fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    /// Restricts rendering to an inclusive 1-based page range.
    #[must_use]
    pub fn with_page_range(mut self, range: RangeInclusive<usize>) -> Self {
        self.page_range = Some(range);
        self
    }

    /// Sets the pdfium library path.
    #[must_use]
    pub fn with_pdfium_library_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.pdfium_library_path = Some(path.into());
        self
    }

    /// Whether 1-based `page` falls inside the configured range.
    pub(crate) fn includes(&self, page: usize) -> bool {
        self.page_range
            .as_ref()
            .is_none_or(|range| range.contains(&page))
    }
}

/// One rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageImage {
    /// 1-based page number in the source PDF.
    pub index: usize,
    /// Pixel width.
    pub width: u32,
    /// Pixel height.
    pub height: u32,
    /// RGB JPEG bytes.
    pub jpeg: Vec<u8>,
}
