// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Global application state — reactive signals for the Dioxus UI.

use lesewerk_core::AppConfig;
use lesewerk_pipeline::{ControlContext, PipelineSnapshot};

use crate::services::app_services::AppServices;

/// Shared state accessible to all pages via `use_context`.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Latest pipeline state: run, output slot and progress bar.
    pub snapshot: PipelineSnapshot,
    /// Whether the camera stream is open.
    pub camera_open: bool,
    /// Status message for user feedback.
    pub notice: Option<String>,
    /// Application settings as edited on the settings page.
    pub config: AppConfig,
}

impl AppState {
    /// Create initial state from the backend services.
    pub fn new(svc: &AppServices) -> Self {
        Self {
            snapshot: svc.session().coordinator().snapshot(),
            camera_open: svc.session().camera_open(),
            notice: None,
            config: svc.config(),
        }
    }

    /// What the control preconditions see.
    pub fn controls(&self) -> ControlContext {
        ControlContext {
            camera_open: self.camera_open,
            output_present: !self.snapshot.output.is_empty(),
        }
    }
}
