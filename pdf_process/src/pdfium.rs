use pdfium_render::prelude::{Pdfium, PdfiumError};
use tracing::debug;

use crate::error::{PdfProcessError, Result};
use crate::model::PdfRenderOptions;

/// Binds pdfium from the configured library path, or the system library.
pub(crate) fn bind_pdfium(options: &PdfRenderOptions) -> Result<Pdfium> {
    let bindings = match options.pdfium_library_path.as_deref() {
        Some(path) => {
            debug!(path = %path.display(), "binding pdfium library");
            Pdfium::bind_to_library(path)
        }
        None => Pdfium::bind_to_system_library(),
    }
    .map_err(map_pdfium_load_error)?;
    Ok(Pdfium::new(bindings))
}

fn map_pdfium_load_error(error: PdfiumError) -> PdfProcessError {
    PdfProcessError::PdfiumLoad(error.to_string())
}
