// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer — builds the reader session and keeps the settings,
// and answers the setup check.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use lesewerk_core::config::AppConfig;
use lesewerk_core::error::Result;
use lesewerk_pipeline::Session;
use tracing::info;

use super::data_dir;
use super::recognizer::{build_rasterizer, build_recognizer};

/// One line of the setup check.
#[derive(Debug, Clone, PartialEq)]
pub struct Check {
    pub name: &'static str,
    pub passed: bool,
    pub detail: String,
    /// What the user can do about a failed check.
    pub fix: Option<String>,
}

/// Shared application services accessible from all Dioxus components via
/// `use_context::<AppServices>()`.
///
/// Cheap to clone; everything inside is shared.
#[derive(Clone)]
pub struct AppServices {
    session: Arc<Session>,
    data_dir: PathBuf,
    config: Arc<Mutex<AppConfig>>,
}

impl AppServices {
    /// Initialise all services. Call once at app startup.
    ///
    /// Loads settings from the data directory, binds the platform bridge and
    /// loads the OCR engine.
    pub fn init() -> Self {
        Self::with_data_dir(data_dir::data_dir())
    }

    pub fn with_data_dir(dir: PathBuf) -> Self {
        info!(path = %dir.display(), "initialising app services");
        let config = AppConfig::load(&dir);

        let bridge = lesewerk_bridge::platform_bridge(config.download_dir.clone());
        let session = Session::init(bridge, build_recognizer(&config), build_rasterizer(&config), &config);

        info!("app services initialised");
        Self {
            session: Arc::new(session),
            data_dir: dir,
            config: Arc::new(Mutex::new(config)),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    // -- Config --------------------------------------------------------------

    /// Get a clone of the current config.
    pub fn config(&self) -> AppConfig {
        self.config
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Update and persist the config. Takes effect on next launch.
    pub fn save_config(&self, config: &AppConfig) -> Result<()> {
        config.save(&self.data_dir)?;
        *self.config.lock().unwrap_or_else(PoisonError::into_inner) = config.clone();
        info!("settings saved");
        Ok(())
    }

    // -- Setup check ---------------------------------------------------------

    /// Check each capability the reader page depends on.
    pub fn diagnostics(&self) -> Vec<Check> {
        let config = self.config();
        vec![
            recognition_check(&config),
            camera_check(),
            pdf_check(&config),
            speech_check(),
            download_check(&config),
        ]
    }
}

#[cfg(feature = "ocr")]
fn recognition_check(config: &AppConfig) -> Check {
    use lesewerk_document::scan::ocr::{model_directory, OcrConfig};

    let dir = config.model_dir.clone().unwrap_or_else(model_directory);
    match OcrConfig::from_dir(&dir).validate() {
        Ok(()) => Check {
            name: "Text recognition",
            passed: true,
            detail: format!("Models found in {}", dir.display()),
            fix: None,
        },
        Err(e) => Check {
            name: "Text recognition",
            passed: false,
            detail: e.to_string(),
            fix: Some(
                "Install the ocrs models (run `ocrs-cli` once) or point the model folder setting at them."
                    .into(),
            ),
        },
    }
}

#[cfg(not(feature = "ocr"))]
fn recognition_check(_config: &AppConfig) -> Check {
    Check {
        name: "Text recognition",
        passed: false,
        detail: "This build has no OCR engine.".into(),
        fix: Some("Rebuild with the `ocr` feature.".into()),
    }
}

#[cfg(feature = "camera")]
fn camera_check() -> Check {
    let fix = "Connect a camera and allow Lesewerk to use it, or upload a photo instead.";
    match lesewerk_bridge::camera::available_cameras() {
        Ok(names) if !names.is_empty() => Check {
            name: "Camera",
            passed: true,
            detail: format!("Found {}.", names.join(", ")),
            fix: None,
        },
        Ok(_) => Check {
            name: "Camera",
            passed: false,
            detail: "No camera found.".into(),
            fix: Some(fix.into()),
        },
        Err(e) => Check {
            name: "Camera",
            passed: false,
            detail: e.to_string(),
            fix: Some(fix.into()),
        },
    }
}

#[cfg(not(feature = "camera"))]
fn camera_check() -> Check {
    Check {
        name: "Camera",
        passed: false,
        detail: "This build has no camera support.".into(),
        fix: Some("Rebuild with the `camera` feature, or upload a photo instead.".into()),
    }
}

#[cfg(feature = "pdf-render")]
fn pdf_check(config: &AppConfig) -> Check {
    let available = super::recognizer::pdfium(config).is_available();
    Check {
        name: "PDF pages",
        passed: available,
        detail: if available {
            "PDFium library found.".into()
        } else {
            "The PDFium library could not be found.".into()
        },
        fix: (!available).then(|| {
            "Install PDFium, place libpdfium next to the app, or set the PDFium folder in Settings."
                .into()
        }),
    }
}

#[cfg(not(feature = "pdf-render"))]
fn pdf_check(_config: &AppConfig) -> Check {
    Check {
        name: "PDF pages",
        passed: false,
        detail: "This build cannot render PDFs.".into(),
        fix: Some("Rebuild with the `pdf-render` feature.".into()),
    }
}

fn speech_check() -> Check {
    match lesewerk_bridge::speech::detect_program() {
        Some(program) => Check {
            name: "Read aloud",
            passed: true,
            detail: format!("Using {program:?}."),
            fix: None,
        },
        None => Check {
            name: "Read aloud",
            passed: false,
            detail: "No speech program found.".into(),
            fix: Some("Install espeak-ng.".into()),
        },
    }
}

fn download_check(config: &AppConfig) -> Check {
    let dir = config
        .download_dir
        .clone()
        .unwrap_or_else(lesewerk_bridge::download::default_download_dir);
    match std::fs::create_dir_all(&dir) {
        Ok(()) => Check {
            name: "Downloads",
            passed: true,
            detail: format!("Text is saved to {}", dir.display()),
            fix: None,
        },
        Err(e) => Check {
            name: "Downloads",
            passed: false,
            detail: format!("{} is not writable: {e}", dir.display()),
            fix: Some("Choose another download folder in Settings.".into()),
        },
    }
}
