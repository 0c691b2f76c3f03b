// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// File name of the persisted settings inside the data directory.
pub const CONFIG_FILE: &str = "config.json";

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Language code handed to the recognition engine (e.g. `eng`).
    pub language: String,
    /// BCP 47 tag used for read-aloud (e.g. `en-US`).
    pub speech_language: String,
    /// Scale factor applied when rasterizing page 1 of a PDF.
    pub pdf_scale: f32,
    /// How long the finished progress bar stays visible, in milliseconds.
    pub completion_linger_ms: u64,
    /// Name given to downloaded text files.
    pub download_file_name: String,
    /// Where downloads land. `None` means the platform downloads folder.
    pub download_dir: Option<PathBuf>,
    /// Grayscale + histogram equalisation before recognition.
    pub preprocess_images: bool,
    /// Directory holding the OCR model files. `None` means the model cache.
    pub model_dir: Option<PathBuf>,
    /// Extra directory searched for the PDFium shared library.
    pub pdfium_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            language: "eng".into(),
            speech_language: "en-US".into(),
            pdf_scale: 2.0,
            completion_linger_ms: 1500,
            download_file_name: "extracted-text.txt".into(),
            download_dir: None,
            preprocess_images: false,
            model_dir: None,
            pdfium_dir: None,
        }
    }
}

impl AppConfig {
    /// Load settings from `dir/config.json`.
    ///
    /// A missing or unreadable file yields the defaults, so a damaged config
    /// never keeps the app from starting.
    pub fn load(dir: &Path) -> Self {
        let path = dir.join(CONFIG_FILE);
        std::fs::read_to_string(&path)
            .ok()
            .and_then(|data| serde_json::from_str(&data).ok())
            .unwrap_or_default()
    }

    /// Write settings to `dir/config.json`.
    pub fn save(&self, dir: &Path) -> Result<()> {
        let path = dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reader_page() {
        let config = AppConfig::default();
        assert_eq!(config.language, "eng");
        assert_eq!(config.speech_language, "en-US");
        assert_eq!(config.pdf_scale, 2.0);
        assert_eq!(config.download_file_name, "extracted-text.txt");
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            completion_linger_ms: 200,
            preprocess_images: true,
            ..Default::default()
        };
        config.save(dir.path()).unwrap();
        assert_eq!(AppConfig::load(dir.path()), config);
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{ not json").unwrap();
        assert_eq!(AppConfig::load(dir.path()), AppConfig::default());
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), r#"{"pdf_scale": 3.0}"#).unwrap();
        let config = AppConfig::load(dir.path());
        assert_eq!(config.pdf_scale, 3.0);
        assert_eq!(config.language, "eng");
        assert_eq!(config.pdfium_dir, None);
    }

    #[test]
    fn pdfium_dir_is_read_from_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), r#"{"pdfium_dir": "/opt/pdfium/lib"}"#).unwrap();
        let config = AppConfig::load(dir.path());
        assert_eq!(config.pdfium_dir, Some(PathBuf::from("/opt/pdfium/lib")));
    }
}
