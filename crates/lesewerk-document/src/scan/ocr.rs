// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR (Optical Character Recognition) module for Lesewerk.
//
// Provides text extraction from page images using the `ocrs` crate, a
// pure-Rust OCR engine backed by neural network models executed via `rten`.
//
// # Feature Gate
//
// This module is only available when the `ocr` feature is enabled:
//
// ```toml
// lesewerk-document = { path = "crates/lesewerk-document", features = ["ocr"] }
// ```
//
// # Model Setup
//
// The OCR engine requires two model files:
//
// - **Detection model** (`text-detection.rten`) — locates text regions in the image.
// - **Recognition model** (`text-recognition.rten`) — decodes characters from detected regions.
//
// Running `ocrs-cli` once downloads both into the default cache directory,
// `$XDG_CACHE_HOME/ocrs` (typically `~/.cache/ocrs`).

use std::path::{Path, PathBuf};

use lesewerk_core::error::LesewerkError;
use ocrs::{ImageSource as OcrsImage, OcrEngine as OcrsEngine, OcrEngineParams};
use rten::Model;
use tracing::{debug, info, instrument};

use super::recognizer::{ProgressSink, TextRecognizer};
use crate::image::ImageProcessor;

/// Language codes the bundled models can read.
pub const SUPPORTED_LANGUAGES: &[&str] = &["eng"];

/// Well-known filenames for the detection and recognition models.
const DETECTION_MODEL_FILENAME: &str = "text-detection.rten";
const RECOGNITION_MODEL_FILENAME: &str = "text-recognition.rten";

/// Progress reported after each engine stage.
const PROGRESS_DECODED: u8 = 10;
const PROGRESS_PREPARED: u8 = 25;
const PROGRESS_WORDS: u8 = 55;
const PROGRESS_LINES: u8 = 70;
const PROGRESS_DONE: u8 = 100;

/// Default directory for cached OCR model files.
///
/// Follows the XDG Base Directory specification: `$XDG_CACHE_HOME/ocrs`, falling
/// back to `~/.cache/ocrs` when `XDG_CACHE_HOME` is unset.
fn default_model_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
        PathBuf::from(xdg).join("ocrs")
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".cache").join("ocrs")
    } else {
        PathBuf::from("ocrs-models")
    }
}

/// Configuration for constructing an [`OcrEngine`].
#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Path to the text-detection model file (`.rten`).
    pub detection_model_path: PathBuf,
    /// Path to the text-recognition model file (`.rten`).
    pub recognition_model_path: PathBuf,
    /// Grayscale + equalise each image before recognition.
    pub preprocess: bool,
}

impl Default for OcrConfig {
    /// Returns a config pointing at the default model cache directory.
    fn default() -> Self {
        Self::from_dir(default_model_dir())
    }
}

impl OcrConfig {
    /// Create a config with explicit model directory.
    ///
    /// Expects the directory to contain `text-detection.rten` and
    /// `text-recognition.rten`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            detection_model_path: dir.join(DETECTION_MODEL_FILENAME),
            recognition_model_path: dir.join(RECOGNITION_MODEL_FILENAME),
            preprocess: false,
        }
    }

    pub fn with_preprocessing(mut self, preprocess: bool) -> Self {
        self.preprocess = preprocess;
        self
    }

    /// Verify that both model files exist.
    pub fn validate(&self) -> Result<(), LesewerkError> {
        for (role, path) in [
            ("detection", &self.detection_model_path),
            ("recognition", &self.recognition_model_path),
        ] {
            if !path.exists() {
                return Err(LesewerkError::RecognitionFailure(format!(
                    "{} model not found at {}; run `ocrs-cli` once to download models",
                    role,
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// Lesewerk OCR engine — extracts text from page images.
///
/// Model loading is the expensive step; build one engine at startup and
/// share it across runs.
pub struct OcrEngine {
    engine: OcrsEngine,
    preprocess: bool,
}

impl OcrEngine {
    /// Create a new OCR engine, loading models from the paths given in `config`.
    ///
    /// The `ocrs` and `rten` crates must be compiled with optimisations;
    /// debug builds are 10-100x slower.
    #[instrument(skip_all, fields(
        detection = %config.detection_model_path.display(),
        recognition = %config.recognition_model_path.display(),
    ))]
    pub fn new(config: OcrConfig) -> Result<Self, LesewerkError> {
        config.validate()?;

        info!("Loading OCR detection model");
        let detection_model = load_model(&config.detection_model_path)?;

        info!("Loading OCR recognition model");
        let recognition_model = load_model(&config.recognition_model_path)?;

        let engine = OcrsEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })
        .map_err(|err| {
            LesewerkError::RecognitionFailure(format!("failed to initialise OCR engine: {}", err))
        })?;

        info!("OCR engine initialised successfully");
        Ok(Self {
            engine,
            preprocess: config.preprocess,
        })
    }
}

impl TextRecognizer for OcrEngine {
    #[instrument(skip(self, image, progress), fields(bytes_len = image.len(), language = %language))]
    fn recognize(
        &self,
        image: &[u8],
        language: &str,
        progress: ProgressSink<'_>,
    ) -> Result<String, LesewerkError> {
        if !SUPPORTED_LANGUAGES.contains(&language) {
            return Err(LesewerkError::RecognitionFailure(format!(
                "unsupported language '{}' (available: {})",
                language,
                SUPPORTED_LANGUAGES.join(", ")
            )));
        }

        let decoded = ImageProcessor::from_bytes(image)
            .map_err(|err| LesewerkError::RecognitionFailure(err.to_string()))?
            .prepare_for_recognition(self.preprocess);
        progress(PROGRESS_DECODED);

        // ocrs expects RGB8.
        let rgb = decoded.into_dynamic().to_rgb8();
        let (width, height) = rgb.dimensions();
        let source = OcrsImage::from_bytes(rgb.as_raw(), (width, height)).map_err(|err| {
            LesewerkError::RecognitionFailure(format!(
                "failed to create image source ({}x{}): {}",
                width, height, err
            ))
        })?;

        let input = self.engine.prepare_input(source).map_err(|err| {
            LesewerkError::RecognitionFailure(format!("OCR preprocessing failed: {}", err))
        })?;
        progress(PROGRESS_PREPARED);

        let word_rects = self.engine.detect_words(&input).map_err(|err| {
            LesewerkError::RecognitionFailure(format!("word detection failed: {}", err))
        })?;
        debug!(word_count = word_rects.len(), "Words detected");
        progress(PROGRESS_WORDS);

        let line_rects = self.engine.find_text_lines(&input, &word_rects);
        debug!(line_count = line_rects.len(), "Text lines found");
        progress(PROGRESS_LINES);

        let line_texts = self
            .engine
            .recognize_text(&input, &line_rects)
            .map_err(|err| {
                LesewerkError::RecognitionFailure(format!("line recognition failed: {}", err))
            })?;

        let text = line_texts
            .iter()
            .flatten()
            .map(|line| line.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        progress(PROGRESS_DONE);

        debug!(
            line_count = text.lines().count(),
            char_count = text.len(),
            "OCR recognition complete"
        );
        Ok(text)
    }

    fn name(&self) -> &str {
        "ocrs"
    }
}

fn load_model(path: &Path) -> Result<Model, LesewerkError> {
    Model::load_file(path).map_err(|err| {
        LesewerkError::RecognitionFailure(format!(
            "failed to load model from {}: {}",
            path.display(),
            err
        ))
    })
}

/// Whether both OCR model files exist in the default cache location.
pub fn models_available() -> bool {
    OcrConfig::default().validate().is_ok()
}

/// Return the default model directory path (for display in UI / diagnostics).
pub fn model_directory() -> PathBuf {
    default_model_dir()
}
