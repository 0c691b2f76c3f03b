// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// lesewerk-document — Everything that touches image or document bytes.
//
// Provides image decoding and PNG encoding (camera frames, uploads), PDF
// inspection and page-1 rasterization, upload routing, and the text
// recognition capability with its `ocrs`-backed engine.

pub mod convert;
pub mod image;
pub mod pdf;
pub mod scan;

// Re-export the primary items so callers can use `lesewerk_document::PdfReader` etc.
pub use convert::classify_upload;
pub use image::processor::ImageProcessor;
pub use pdf::raster::PageRasterizer;
pub use pdf::reader::PdfReader;
pub use scan::recognizer::{ProgressSink, TextRecognizer};

#[cfg(feature = "pdf-render")]
pub use pdf::raster::PdfiumRasterizer;

#[cfg(feature = "ocr")]
pub use scan::ocr::OcrEngine;
