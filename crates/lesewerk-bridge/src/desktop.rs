// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Desktop bridge. Speech and downloads work through the OS. The camera needs
// the `camera` feature; without it, or without a device, opening the camera
// reports it unavailable and the user uploads a photo instead.

use std::path::PathBuf;

use lesewerk_core::error::Result;

use crate::download::DirectoryDownloader;
use crate::speech::SystemSpeech;
use crate::traits::*;

/// Bridge used on desktop and CI builds.
pub struct DesktopBridge {
    speech: SystemSpeech,
    downloads: DirectoryDownloader,
}

impl DesktopBridge {
    /// Build the bridge. `download_dir` overrides the user's downloads folder.
    pub fn new(download_dir: Option<PathBuf>) -> Self {
        Self {
            speech: SystemSpeech::detect(),
            downloads: download_dir
                .map(DirectoryDownloader::new)
                .unwrap_or_default(),
        }
    }
}

impl PlatformBridge for DesktopBridge {
    fn platform_name(&self) -> &str {
        "Desktop"
    }
}

/// The first camera the native backend lists.
#[cfg(feature = "camera")]
const DEFAULT_CAMERA: u32 = 0;

impl NativeCamera for DesktopBridge {
    #[cfg(feature = "camera")]
    fn open_stream(&self) -> Result<Box<dyn CameraStream>> {
        use crate::camera::{NokhwaDevice, WorkerStream};

        let stream = WorkerStream::spawn(|| NokhwaDevice::open(DEFAULT_CAMERA))?;
        Ok(Box::new(stream))
    }

    #[cfg(not(feature = "camera"))]
    fn open_stream(&self) -> Result<Box<dyn CameraStream>> {
        tracing::warn!("built without the `camera` feature");
        Err(lesewerk_core::error::LesewerkError::CameraUnavailable(
            "this build has no camera support".into(),
        ))
    }
}

impl NativeSpeech for DesktopBridge {
    fn speak(&self, text: &str, language: &str) -> Result<()> {
        self.speech.speak(text, language)
    }

    fn cancel(&self) -> Result<()> {
        self.speech.cancel()
    }

    fn is_speaking(&self) -> bool {
        self.speech.is_speaking()
    }
}

impl NativeDownload for DesktopBridge {
    fn save_text(&self, file_name: &str, text: &str) -> Result<PathBuf> {
        self.downloads.save_text(file_name, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(feature = "camera"))]
    #[test]
    fn camera_is_unavailable_without_feature() {
        use lesewerk_core::error::LesewerkError;

        let bridge = DesktopBridge::new(None);
        assert!(matches!(
            bridge.open_stream(),
            Err(LesewerkError::CameraUnavailable(_))
        ));
    }

    #[test]
    fn downloads_go_to_override_dir() {
        let dir = tempfile::tempdir().unwrap();
        let bridge = DesktopBridge::new(Some(dir.path().to_path_buf()));
        let path = bridge.save_text("extracted-text.txt", "HELLO").unwrap();
        assert!(path.starts_with(dir.path()));
    }
}
