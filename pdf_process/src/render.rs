use std::path::Path;

use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;
use pdfium_render::prelude::*;
use tracing::debug;

use crate::error::{PdfProcessError, Result};
use crate::model::{PageImage, PdfRenderOptions};
use crate::pdfium::bind_pdfium;

pub(crate) fn render_pages_from_path(
    source_pdf: &Path,
    options: &PdfRenderOptions,
) -> Result<Vec<PageImage>> {
    let pdfium = bind_pdfium(options)?;
    let doc = pdfium
        .load_pdf_from_file(source_pdf, None)
        .map_err(|e| PdfProcessError::Parse(e.to_string()))?;
    render_pages_impl(&doc, options)
}

pub(crate) fn render_pages_from_bytes(
    source_pdf: &[u8],
    options: &PdfRenderOptions,
) -> Result<Vec<PageImage>> {
    let pdfium = bind_pdfium(options)?;
    let doc = pdfium
        .load_pdf_from_byte_vec(source_pdf.to_vec(), None)
        .map_err(|e| PdfProcessError::Parse(e.to_string()))?;
    render_pages_impl(&doc, options)
}

fn render_pages_impl(doc: &PdfDocument<'_>, options: &PdfRenderOptions) -> Result<Vec<PageImage>> {
    let total = usize::from(doc.pages().len());
    let mut images = Vec::with_capacity(total);

    for (idx, pdf_page) in doc.pages().iter().enumerate() {
        let page = idx + 1;
        if !options.includes(page) {
            continue;
        }

        let render_config = PdfRenderConfig::new()
            .set_target_width(target_width(pdf_page.width().value, options.dpi))
            .rotate_if_landscape(PdfPageRenderRotation::None, true);

        let rgb = pdf_page
            .render_with_config(&render_config)
            .map_err(|e| PdfProcessError::Render {
                page,
                message: e.to_string(),
            })?
            .as_image()
            .into_rgb8();

        let jpeg = encode_jpeg(&rgb, options.jpeg_quality).map_err(|e| PdfProcessError::Encode {
            page,
            message: e.to_string(),
        })?;

        debug!(page, total, bytes = jpeg.len(), "rendered page");
        images.push(PageImage {
            index: page,
            width: rgb.width(),
            height: rgb.height(),
            jpeg,
        });
    }

    Ok(images)
}

/// Pixel width for a page `width_pt` points wide at `dpi`.
#[allow(clippy::cast_possible_truncation)]
fn target_width(width_pt: f32, dpi: u16) -> i32 {
    let dpi = dpi.max(72);
    ((width_pt.max(1.0) / 72.0) * f32::from(dpi)).round().max(256.0) as i32
}

/// Encodes an RGB image as JPEG.
///
/// # Errors
/// Returns the encoder error if the image cannot be written.
pub fn encode_jpeg(image: &RgbImage, quality: u8) -> image::ImageResult<Vec<u8>> {
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100)).encode_image(image)?;
    Ok(bytes)
}

/// Encodes a white `width`×`height` JPEG, used to probe vision endpoints.
///
/// # Errors
/// Returns the encoder error if the image cannot be written.
pub fn blank_jpeg(width: u32, height: u32) -> image::ImageResult<Vec<u8>> {
    let image = RgbImage::from_pixel(width.max(1), height.max(1), image::Rgb([255, 255, 255]));
    encode_jpeg(&image, 95)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_page_at_200_dpi() {
        assert_eq!(target_width(612.0, 200), 1700);
    }

    #[test]
    fn dpi_and_width_have_floors() {
        assert_eq!(target_width(612.0, 10), target_width(612.0, 72));
        assert_eq!(target_width(10.0, 72), 256);
    }

    #[test]
    fn jpeg_has_soi_marker() {
        let image = RgbImage::from_pixel(8, 8, image::Rgb([255, 255, 255]));
        let bytes = encode_jpeg(&image, 95).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn blank_jpeg_decodes_to_requested_size() {
        let bytes = blank_jpeg(16, 16).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 16));
    }
}
