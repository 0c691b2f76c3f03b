// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page-1 rasterization. The pipeline only ever sees the `PageRasterizer`
// trait; the PDFium-backed implementation is behind the `pdf-render` feature
// because it binds to a native library at runtime.

use lesewerk_core::error::LesewerkError;
use lesewerk_core::types::ImageSource;

/// Turns page 1 of a PDF into an encoded image.
pub trait PageRasterizer: Send + Sync {
    /// Render page 1 of `document` at `scale` (1.0 = 72 dpi) into a PNG
    /// payload tagged [`SourceOrigin::PdfPage`](lesewerk_core::SourceOrigin::PdfPage).
    ///
    /// Unparseable documents, documents with no pages, and render failures
    /// are all [`LesewerkError::DocumentLoadFailure`].
    fn render_first_page(&self, document: &[u8], scale: f32) -> Result<ImageSource, LesewerkError>;
}

#[cfg(feature = "pdf-render")]
pub use pdfium::PdfiumRasterizer;

#[cfg(feature = "pdf-render")]
mod pdfium {
    use std::path::PathBuf;

    use lesewerk_core::error::LesewerkError;
    use lesewerk_core::types::{ImageSource, SourceOrigin};
    use pdfium_render::prelude::*;
    use tracing::{debug, info, instrument};

    use super::PageRasterizer;
    use crate::image::ImageProcessor;
    use crate::pdf::reader::PdfReader;

    /// Largest edge we will render, whatever the scale. Keeps a poster-sized
    /// page from allocating gigabytes.
    const MAX_DIMENSION: u32 = 8000;

    /// Rasterizer backed by the PDFium library.
    ///
    /// PDFium is bound per call; no native handle outlives a render.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct PdfiumRasterizer {
        /// Extra directory searched for the PDFium shared library.
        library_dir: Option<PathBuf>,
    }

    impl PdfiumRasterizer {
        pub fn new() -> Self {
            Self::default()
        }

        /// Look for the PDFium shared library in `dir` before the usual places.
        pub fn with_library_dir(dir: impl Into<PathBuf>) -> Self {
            Self {
                library_dir: Some(dir.into()),
            }
        }

        /// Whether the PDFium shared library can be found.
        pub fn is_available(&self) -> bool {
            self.bind().is_ok()
        }

        fn bind(&self) -> Result<Pdfium, LesewerkError> {
            let mut search: Vec<PathBuf> = Vec::new();
            if let Some(dir) = &self.library_dir {
                search.push(dir.clone());
            }
            search.extend(["./", "/usr/lib", "/usr/local/lib", "/opt/homebrew/lib"].map(PathBuf::from));

            for dir in &search {
                let path = Pdfium::pdfium_platform_library_name_at_path(dir);
                if let Ok(bindings) = Pdfium::bind_to_library(path) {
                    debug!(dir = %dir.display(), "bound PDFium");
                    return Ok(Pdfium::new(bindings));
                }
            }

            Pdfium::bind_to_system_library()
                .map(Pdfium::new)
                .map_err(|err| {
                    LesewerkError::DocumentLoadFailure(format!(
                        "could not find the PDFium library: {}",
                        err
                    ))
                })
        }
    }

    impl PageRasterizer for PdfiumRasterizer {
        #[instrument(skip(self, document), fields(bytes_len = document.len()))]
        fn render_first_page(
            &self,
            document: &[u8],
            scale: f32,
        ) -> Result<ImageSource, LesewerkError> {
            // lopdf catches empty and broken documents before PDFium is loaded.
            let reader = PdfReader::from_bytes(document)?;
            let (width_px, height_px) = reader.first_page_pixels(scale)?;
            let ratio = if width_px.max(height_px) > MAX_DIMENSION {
                MAX_DIMENSION as f32 / width_px.max(height_px) as f32
            } else {
                1.0
            };

            let pdfium = self.bind()?;
            let pdf = pdfium.load_pdf_from_byte_slice(document, None).map_err(|err| {
                LesewerkError::DocumentLoadFailure(format!("PDFium could not open the PDF: {}", err))
            })?;

            let pages = pdf.pages();
            if pages.len() == 0 {
                return Err(LesewerkError::DocumentLoadFailure("PDF has no pages".into()));
            }
            let page = pages.get(0).map_err(|err| {
                LesewerkError::DocumentLoadFailure(format!("page 1 unavailable: {}", err))
            })?;

            let render_config = PdfRenderConfig::new()
                .scale_page_by_factor(scale * ratio)
                .render_form_data(true)
                .render_annotations(true);

            let bitmap = page.render_with_config(&render_config).map_err(|err| {
                LesewerkError::DocumentLoadFailure(format!("failed to render page 1: {}", err))
            })?;

            let image = bitmap.as_image();
            info!(
                width = image.width(),
                height = image.height(),
                "Rendered PDF page 1"
            );

            ImageProcessor::from_dynamic(image).into_source(SourceOrigin::PdfPage)
        }
    }
}
