// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Lesewerk capture-to-text pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Run-identity token. Incremented on every submit; a callback carrying an
/// older token belongs to a superseded run and is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct RunId(pub u64);

impl RunId {
    /// The token that follows this one.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "run-{}", self.0)
    }
}

/// Which producer handed an image to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceOrigin {
    /// A frame grabbed from the live camera stream.
    Camera,
    /// An image file chosen by the user.
    Upload,
    /// Page 1 of an uploaded PDF, rasterized.
    PdfPage,
}

/// An encoded image (PNG, JPEG, ...) waiting to be recognised.
///
/// Lives only for the duration of one recognition run.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageSource {
    pub origin: SourceOrigin,
    pub data: Vec<u8>,
}

impl ImageSource {
    pub fn new(origin: SourceOrigin, data: Vec<u8>) -> Self {
        Self { origin, data }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }
}

impl std::fmt::Debug for ImageSource {
    // Payloads run to megabytes; show the size only.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageSource")
            .field("origin", &self.origin)
            .field("bytes", &self.data.len())
            .finish()
    }
}

/// A raw RGBA frame as delivered by a camera stream.
#[derive(Clone, PartialEq, Eq)]
pub struct RawFrame {
    pub width: u32,
    pub height: u32,
    /// Tightly packed RGBA8 pixels, `width * height * 4` bytes.
    pub rgba: Vec<u8>,
}

impl RawFrame {
    /// Whether the pixel buffer length matches the declared dimensions.
    pub fn is_well_formed(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.rgba.len() as u64 == u64::from(self.width) * u64::from(self.height) * 4
    }
}

impl std::fmt::Debug for RawFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RawFrame({}x{}, {} bytes)", self.width, self.height, self.rgba.len())
    }
}

/// Lifecycle states of a recognition run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunStatus {
    /// Nothing submitted yet.
    #[default]
    Idle,
    /// Recognition (or PDF rasterization) in flight.
    Running,
    /// Text published to the output slot.
    Succeeded,
    /// Error published to the output slot.
    Failed,
}

/// One in-flight or finished OCR operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognitionRun {
    pub id: RunId,
    pub origin: Option<SourceOrigin>,
    pub status: RunStatus,
    /// 0–100, never decreasing while running.
    pub progress: u8,
    /// Present only when `Succeeded`.
    pub text: Option<String>,
    /// Present only when `Failed`.
    pub error: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RecognitionRun {
    /// The placeholder run that exists before the first submit.
    pub fn idle() -> Self {
        Self {
            id: RunId::default(),
            origin: None,
            status: RunStatus::Idle,
            progress: 0,
            text: None,
            error: None,
            started_at: None,
            finished_at: None,
        }
    }

    /// A freshly started run.
    pub fn start(id: RunId, origin: SourceOrigin) -> Self {
        Self {
            id,
            origin: Some(origin),
            status: RunStatus::Running,
            progress: 0,
            text: None,
            error: None,
            started_at: Some(Utc::now()),
            finished_at: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == RunStatus::Running
    }

    pub fn succeed(&mut self, text: String) {
        self.status = RunStatus::Succeeded;
        self.progress = 100;
        self.text = Some(text);
        self.finished_at = Some(Utc::now());
    }

    pub fn fail(&mut self, detail: String) {
        self.status = RunStatus::Failed;
        self.error = Some(detail);
        self.finished_at = Some(Utc::now());
    }
}

impl Default for RecognitionRun {
    fn default() -> Self {
        Self::idle()
    }
}

/// Kinds of file the upload control accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UploadKind {
    /// A raster image handed straight to recognition.
    Image,
    /// A PDF whose first page is rasterized first.
    Pdf,
}

impl UploadKind {
    /// Infer the kind from a MIME type such as `application/pdf`.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let mime = mime.trim().to_ascii_lowercase();
        if mime == "application/pdf" {
            Some(Self::Pdf)
        } else if mime.starts_with("image/") {
            Some(Self::Image)
        } else {
            None
        }
    }

    /// Infer the kind from a file extension (without the dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "png" | "jpg" | "jpeg" | "gif" | "bmp" | "tif" | "tiff" | "webp" | "pnm" => {
                Some(Self::Image)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_ids_increase() {
        let first = RunId::default();
        let second = first.next();
        assert!(second > first);
        assert_eq!(second.to_string(), "run-1");
    }

    #[test]
    fn frame_shape_is_checked() {
        let good = RawFrame { width: 2, height: 2, rgba: vec![0; 16] };
        let short = RawFrame { width: 2, height: 2, rgba: vec![0; 15] };
        let empty = RawFrame { width: 0, height: 0, rgba: Vec::new() };
        assert!(good.is_well_formed());
        assert!(!short.is_well_formed());
        assert!(!empty.is_well_formed());
    }

    #[test]
    fn run_lifecycle_fields() {
        let mut run = RecognitionRun::start(RunId(3), SourceOrigin::Upload);
        assert!(run.is_running());
        run.succeed("HELLO".into());
        assert_eq!(run.status, RunStatus::Succeeded);
        assert_eq!(run.progress, 100);
        assert!(run.error.is_none());
        assert!(run.finished_at.is_some());
    }

    #[test]
    fn upload_kind_from_mime_and_extension() {
        assert_eq!(UploadKind::from_mime("application/pdf"), Some(UploadKind::Pdf));
        assert_eq!(UploadKind::from_mime("image/png"), Some(UploadKind::Image));
        assert_eq!(UploadKind::from_mime("text/plain"), None);
        assert_eq!(UploadKind::from_extension("JPG"), Some(UploadKind::Image));
        assert_eq!(UploadKind::from_extension("pdf"), Some(UploadKind::Pdf));
        assert_eq!(UploadKind::from_extension("docx"), None);
    }
}
