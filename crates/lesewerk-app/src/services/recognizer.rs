// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Picks the recognizer and rasterizer this build and machine can offer.
//
// A missing model or library never stops the app from starting: recognition
// then fails per run with the reason, which lands in the output slot.

use std::sync::Arc;

use lesewerk_core::config::AppConfig;
use lesewerk_core::error::LesewerkError;
use lesewerk_document::{PageRasterizer, ProgressSink, TextRecognizer};
use tracing::{info, warn};

/// Stands in for the OCR engine when it could not be loaded.
#[derive(Debug, Clone)]
pub struct UnavailableRecognizer {
    reason: String,
}

impl UnavailableRecognizer {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl TextRecognizer for UnavailableRecognizer {
    fn recognize(
        &self,
        _image: &[u8],
        _language: &str,
        _progress: ProgressSink<'_>,
    ) -> Result<String, LesewerkError> {
        Err(LesewerkError::RecognitionFailure(self.reason.clone()))
    }

    fn name(&self) -> &str {
        "unavailable"
    }
}

/// Load the OCR engine from the configured model directory.
#[cfg(feature = "ocr")]
pub fn build_recognizer(config: &AppConfig) -> Arc<dyn TextRecognizer> {
    use lesewerk_document::scan::ocr::{OcrConfig, OcrEngine};

    let ocr_config = match &config.model_dir {
        Some(dir) => OcrConfig::from_dir(dir),
        None => OcrConfig::default(),
    }
    .with_preprocessing(config.preprocess_images);

    match OcrEngine::new(ocr_config) {
        Ok(engine) => {
            info!("OCR engine loaded");
            Arc::new(engine)
        }
        Err(e) => {
            warn!(error = %e, "OCR engine unavailable");
            let reason = match e {
                LesewerkError::RecognitionFailure(detail) => detail,
                other => other.to_string(),
            };
            Arc::new(UnavailableRecognizer::new(reason))
        }
    }
}

#[cfg(not(feature = "ocr"))]
pub fn build_recognizer(_config: &AppConfig) -> Arc<dyn TextRecognizer> {
    warn!("built without the `ocr` feature");
    Arc::new(UnavailableRecognizer::new("this build has no OCR engine"))
}

/// PDFium, searched for in the configured folder first.
#[cfg(feature = "pdf-render")]
pub fn pdfium(config: &AppConfig) -> lesewerk_document::PdfiumRasterizer {
    match &config.pdfium_dir {
        Some(dir) => lesewerk_document::PdfiumRasterizer::with_library_dir(dir.clone()),
        None => lesewerk_document::PdfiumRasterizer::new(),
    }
}

/// The PDF page renderer, if this build has one.
#[cfg(feature = "pdf-render")]
pub fn build_rasterizer(config: &AppConfig) -> Option<Arc<dyn PageRasterizer>> {
    Some(Arc::new(pdfium(config)))
}

#[cfg(not(feature = "pdf-render"))]
pub fn build_rasterizer(_config: &AppConfig) -> Option<Arc<dyn PageRasterizer>> {
    info!("built without the `pdf-render` feature; PDF uploads will fail");
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_recognizer_reports_reason() {
        let recognizer = UnavailableRecognizer::new("models missing");
        let mut sink = |_: u8| {};
        let err = recognizer.recognize(b"png", "eng", &mut sink).unwrap_err();
        assert_eq!(err.to_string(), "text recognition failed: models missing");
    }

    #[cfg(feature = "pdf-render")]
    #[test]
    fn pdfium_searches_configured_dir_first() {
        use lesewerk_document::PdfiumRasterizer;

        let config = AppConfig {
            pdfium_dir: Some("/opt/pdfium/lib".into()),
            ..AppConfig::default()
        };
        assert_eq!(pdfium(&config), PdfiumRasterizer::with_library_dir("/opt/pdfium/lib"));
        assert_eq!(pdfium(&AppConfig::default()), PdfiumRasterizer::new());
    }

    #[cfg(feature = "ocr")]
    #[test]
    fn missing_models_fall_back_to_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            model_dir: Some(dir.path().to_path_buf()),
            ..AppConfig::default()
        };
        let recognizer = build_recognizer(&config);
        assert_eq!(recognizer.name(), "unavailable");

        let mut sink = |_: u8| {};
        let err = recognizer.recognize(b"png", "eng", &mut sink).unwrap_err();
        assert!(err.to_string().contains("model not found"));
    }
}
