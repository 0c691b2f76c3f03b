// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Lesewerk — Native platform bridge abstractions.
//
// Defines the capability traits the pipeline talks to (camera, speech,
// downloads) and the implementation for the current target.

pub mod camera;
pub mod desktop;
pub mod download;
pub mod speech;
pub mod traits;

use std::path::PathBuf;
use std::sync::Arc;

pub use traits::{CameraStream, NativeCamera, NativeDownload, NativeSpeech, PlatformBridge};

/// The bridge implementation for the target operating system.
///
/// `download_dir` overrides where downloaded text lands.
pub fn platform_bridge(download_dir: Option<PathBuf>) -> Arc<dyn PlatformBridge> {
    let bridge = desktop::DesktopBridge::new(download_dir);
    tracing::info!(platform = bridge.platform_name(), "platform bridge ready");
    Arc::new(bridge)
}
