// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for native capabilities.
//
// The reader page needs three things from the host: a live camera, a speech
// voice, and somewhere to save text. Platforms that lack one return
// `LesewerkError::PlatformUnavailable` (or `CameraUnavailable` for the camera).

use std::path::PathBuf;

use lesewerk_core::error::Result;
use lesewerk_core::types::RawFrame;

/// Unified bridge that groups all native capabilities.
pub trait PlatformBridge: NativeCamera + NativeSpeech + NativeDownload {
    /// Human-readable platform name (e.g. "Linux desktop").
    fn platform_name(&self) -> &str;
}

/// Acquire live video from a camera.
pub trait NativeCamera: Send + Sync {
    /// Request a live stream. Permission refusal or a missing device is
    /// `LesewerkError::CameraUnavailable`.
    fn open_stream(&self) -> Result<Box<dyn CameraStream>>;
}

/// A live camera stream. Must be released with [`close`](Self::close) on
/// every path that stops using it.
pub trait CameraStream: Send {
    /// Grab the current frame.
    fn capture_frame(&mut self) -> Result<RawFrame>;

    /// Stop all tracks. Calling it twice is harmless.
    fn close(&mut self);

    fn is_open(&self) -> bool;
}

/// Speak text through the platform voice.
pub trait NativeSpeech: Send + Sync {
    /// Start speaking `text` in `language` (BCP 47, e.g. `en-US`).
    fn speak(&self, text: &str, language: &str) -> Result<()>;

    /// Stop any ongoing speech. A no-op when silent.
    fn cancel(&self) -> Result<()>;

    fn is_speaking(&self) -> bool;
}

/// Persist text where the user can find it.
pub trait NativeDownload: Send + Sync {
    /// Save `text` under `file_name` and return where it landed.
    fn save_text(&self, file_name: &str, text: &str) -> Result<PathBuf>;
}
