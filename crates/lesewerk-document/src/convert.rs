// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Upload routing. A PDF goes through page-1 rasterization first; everything
// else is treated as an image and handed straight to recognition, where an
// undecodable payload surfaces as a recognition error.

use std::path::Path;

use lesewerk_core::types::UploadKind;
use tracing::debug;

use crate::pdf::reader::{is_pdf_bytes, is_pdf_path};

/// Decide how an uploaded file is routed.
///
/// The declared MIME type wins, then the file content, then the extension.
pub fn classify_upload(bytes: &[u8], mime: Option<&str>, file_name: Option<&str>) -> UploadKind {
    let kind = if mime.and_then(UploadKind::from_mime) == Some(UploadKind::Pdf)
        || is_pdf_bytes(bytes)
        || file_name.is_some_and(|name| is_pdf_path(Path::new(name)))
    {
        UploadKind::Pdf
    } else {
        UploadKind::Image
    };
    debug!(?kind, mime, file_name, bytes = bytes.len(), "upload classified");
    kind
}

/// Best-effort MIME type for a picked file, from its extension.
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "webp" => "image/webp",
        _ => return None,
    };
    Some(mime)
}
