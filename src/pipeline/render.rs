//! PDF rasterisation: render the first page to a `DynamicImage` via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! The `pdfium-render` crate wraps the pdfium C++ library, which uses
//! thread-local state internally and is not safe to call from async
//! contexts. `tokio::task::spawn_blocking` moves the work onto a thread
//! pool designed for blocking operations, so Tokio worker threads never
//! stall during CPU-heavy rendering.
//!
//! ## Why one error kind?
//!
//! A corrupt file, an encrypted file, and a zero-page file all end the
//! same way for the operator: the document cannot be named and must be
//! handled by hand. Every pdfium failure therefore collapses to
//! [`FileError::UnreadablePdf`]; the underlying detail is logged at debug
//! level for troubleshooting.

use crate::error::FileError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use tracing::{debug, warn};

/// Rasterise the first page of a PDF held in memory.
///
/// The longest edge is derived from `dpi` and capped at `max_pixels` so a
/// poster-sized page cannot exhaust memory.
pub async fn render_first_page(
    bytes: Vec<u8>,
    dpi: u32,
    max_pixels: u32,
) -> Result<DynamicImage, FileError> {
    tokio::task::spawn_blocking(move || render_first_page_blocking(&bytes, dpi, max_pixels))
        .await
        .unwrap_or_else(|e| {
            warn!("Render task panicked: {}", e);
            Err(FileError::UnreadablePdf)
        })
}

/// Blocking implementation of first-page rendering.
fn render_first_page_blocking(
    bytes: &[u8],
    dpi: u32,
    max_pixels: u32,
) -> Result<DynamicImage, FileError> {
    let pdfium = Pdfium::default();

    let document = pdfium.load_pdf_from_byte_slice(bytes, None).map_err(|e| {
        debug!("pdfium could not open document: {:?}", e);
        FileError::UnreadablePdf
    })?;

    let pages = document.pages();
    let page = pages.get(0).map_err(|e| {
        debug!("pdfium could not load page 1: {:?}", e);
        FileError::UnreadablePdf
    })?;

    // Points are 1/72 inch; scale the page width to the requested DPI and
    // let the cap bound the other dimension.
    let target_width = ((page.width().value / 72.0) * dpi as f32).round() as i32;
    let target_width = target_width.clamp(1, max_pixels as i32);

    let render_config = PdfRenderConfig::new()
        .set_target_width(target_width)
        .set_maximum_height(max_pixels as i32);

    let bitmap = page.render_with_config(&render_config).map_err(|e| {
        debug!("pdfium could not rasterise page 1: {:?}", e);
        FileError::UnreadablePdf
    })?;

    let image = bitmap.as_image();
    debug!(
        "Rendered first page → {}x{} px at {} dpi",
        image.width(),
        image.height(),
        dpi
    );

    Ok(image)
}
