// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — inspecting uploaded PDFs and rasterizing their first page.

pub mod raster;
pub mod reader;

pub use raster::PageRasterizer;
pub use reader::PdfReader;

#[cfg(feature = "pdf-render")]
pub use raster::PdfiumRasterizer;
