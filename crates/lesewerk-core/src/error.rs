// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Lesewerk.

use thiserror::Error;

/// Top-level error type for all Lesewerk operations.
#[derive(Debug, Error)]
pub enum LesewerkError {
    // -- Capture --
    #[error("camera unavailable: {0}")]
    CameraUnavailable(String),

    #[error("camera is not open")]
    CameraClosed,

    // -- Documents --
    #[error("document could not be loaded: {0}")]
    DocumentLoadFailure(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    // -- Recognition --
    #[error("text recognition failed: {0}")]
    RecognitionFailure(String),

    // -- Output collaborators --
    #[error("speech synthesis failed: {0}")]
    Speech(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LesewerkError>;
