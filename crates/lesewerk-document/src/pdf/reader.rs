// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — parses uploaded PDFs with `lopdf` to check they are usable
// before any rendering happens, and reports page-1 geometry.

use lopdf::{Dictionary, Document, Object, ObjectId};
use lesewerk_core::error::LesewerkError;
use tracing::{debug, instrument, warn};

/// US Letter in points, used when a page carries no MediaBox at all.
const DEFAULT_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

/// How many /Parent hops to follow when looking for an inherited MediaBox.
const MAX_INHERIT_DEPTH: usize = 32;

/// Read-only view of an uploaded PDF.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
}

impl PdfReader {
    /// Parse a PDF already in memory.
    ///
    /// Any parse failure is a [`LesewerkError::DocumentLoadFailure`].
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, LesewerkError> {
        let document = Document::load_mem(data).map_err(|err| {
            LesewerkError::DocumentLoadFailure(format!("failed to parse PDF: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self { document })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Fail with `DocumentLoadFailure` when the document has nothing to render.
    pub fn ensure_has_pages(&self) -> Result<(), LesewerkError> {
        if self.page_count() == 0 {
            return Err(LesewerkError::DocumentLoadFailure(
                "PDF has no pages".into(),
            ));
        }
        Ok(())
    }

    /// Width and height of page 1 in points, honouring MediaBox inheritance.
    pub fn first_page_size(&self) -> Result<(f32, f32), LesewerkError> {
        self.ensure_has_pages()?;
        let pages = self.document.get_pages();
        let page_id: ObjectId = *pages.get(&1).ok_or_else(|| {
            LesewerkError::DocumentLoadFailure("page 1 not found in page tree".into())
        })?;

        let mut current = Some(page_id);
        for _ in 0..MAX_INHERIT_DEPTH {
            let Some(id) = current else { break };
            let dict = self.document.get_dictionary(id).map_err(|err| {
                LesewerkError::DocumentLoadFailure(format!("broken page object: {}", err))
            })?;
            if let Some(size) = self.media_box_size(dict) {
                return Ok(size);
            }
            current = dict.get(b"Parent").and_then(Object::as_reference).ok();
        }

        warn!("page 1 has no MediaBox, assuming US Letter");
        Ok(DEFAULT_PAGE_SIZE)
    }

    /// Pixel dimensions page 1 will have when rendered at `scale`.
    pub fn first_page_pixels(&self, scale: f32) -> Result<(u32, u32), LesewerkError> {
        let (width, height) = self.first_page_size()?;
        Ok((
            (width * scale).round().max(1.0) as u32,
            (height * scale).round().max(1.0) as u32,
        ))
    }

    fn media_box_size(&self, dict: &Dictionary) -> Option<(f32, f32)> {
        let object = dict.get(b"MediaBox").ok()?;
        let array = match object {
            Object::Reference(id) => self.document.get_object(*id).ok()?.as_array().ok()?,
            other => other.as_array().ok()?,
        };
        if array.len() != 4 {
            return None;
        }
        let coords: Vec<f32> = array.iter().filter_map(|v| v.as_float().ok()).collect();
        if coords.len() != 4 {
            return None;
        }
        Some(((coords[2] - coords[0]).abs(), (coords[3] - coords[1]).abs()))
    }
}

/// Check if bytes represent a PDF file (magic bytes: %PDF).
pub fn is_pdf_bytes(bytes: &[u8]) -> bool {
    bytes.starts_with(b"%PDF")
}

/// Check if a file path has a PDF extension.
pub fn is_pdf_path(path: &std::path::Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::dictionary;

    /// Build a PDF with `pages` empty pages. The MediaBox sits on the page
    /// tree root so page 1 has to inherit it.
    pub(crate) fn build_pdf(pages: usize, media_box: [i64; 4]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let mut kids = Vec::new();
        for _ in 0..pages {
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
            });
            kids.push(Object::Reference(page_id));
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "MediaBox" => media_box.iter().map(|v| Object::Integer(*v)).collect::<Vec<_>>(),
            }),
        );

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut out = Vec::new();
        doc.save_to(&mut out).unwrap();
        out
    }

    #[test]
    fn counts_pages() {
        let reader = PdfReader::from_bytes(&build_pdf(3, [0, 0, 595, 842])).unwrap();
        assert_eq!(reader.page_count(), 3);
        assert!(reader.ensure_has_pages().is_ok());
    }

    #[test]
    fn zero_pages_is_a_load_failure() {
        let reader = PdfReader::from_bytes(&build_pdf(0, [0, 0, 595, 842])).unwrap();
        assert!(matches!(
            reader.ensure_has_pages(),
            Err(LesewerkError::DocumentLoadFailure(_))
        ));
    }

    #[test]
    fn first_page_inherits_media_box() {
        let reader = PdfReader::from_bytes(&build_pdf(1, [0, 0, 595, 842])).unwrap();
        assert_eq!(reader.first_page_size().unwrap(), (595.0, 842.0));
        assert_eq!(reader.first_page_pixels(2.0).unwrap(), (1190, 1684));
    }

    #[test]
    fn garbage_is_a_load_failure() {
        assert!(matches!(
            PdfReader::from_bytes(b"%PDF-1.4 truncated"),
            Err(LesewerkError::DocumentLoadFailure(_))
        ));
    }

    #[test]
    fn sniffing() {
        assert!(is_pdf_bytes(b"%PDF-1.7\n..."));
        assert!(!is_pdf_bytes(b"\x89PNG"));
        assert!(is_pdf_path(std::path::Path::new("scan.PDF")));
        assert!(!is_pdf_path(std::path::Path::new("scan.png")));
    }
}
