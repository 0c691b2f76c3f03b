// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Reader session — binds the controls to the coordinator and the platform
// bridge, and owns the camera stream while it is open.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use lesewerk_bridge::{CameraStream, PlatformBridge};
use lesewerk_core::config::AppConfig;
use lesewerk_core::error::{LesewerkError, Result};
use lesewerk_core::types::{ImageSource, SourceOrigin, UploadKind};
use lesewerk_document::{classify_upload, ImageProcessor, PageRasterizer, TextRecognizer};
use tracing::{debug, info, instrument, warn};

use crate::controls::{Control, ControlContext};
use crate::coordinator::{PipelineConfig, PipelineCoordinator, RunTicket};

/// A control activation, with its payload where it has one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    OpenCamera,
    CloseCamera,
    Capture,
    Upload {
        data: Vec<u8>,
        mime: Option<String>,
        file_name: Option<String>,
    },
    ReadAloud,
    StopSpeech,
    Download,
}

impl Trigger {
    pub fn control(&self) -> Control {
        match self {
            Self::OpenCamera => Control::OpenCamera,
            Self::CloseCamera => Control::CloseCamera,
            Self::Capture => Control::Capture,
            Self::Upload { .. } => Control::Upload,
            Self::ReadAloud => Control::ReadAloud,
            Self::StopSpeech => Control::StopSpeech,
            Self::Download => Control::Download,
        }
    }
}

/// What the UI should show after a control fired.
#[derive(Debug)]
pub enum Feedback {
    None,
    /// A short message for the user.
    Notice(String),
    /// A recognition run was submitted.
    Started(RunTicket),
    /// Text was saved to this file.
    Saved(PathBuf),
}

/// One reader page's worth of state.
///
/// `handle` may submit runs and so must be called from within a Tokio
/// runtime. Dropping the session tears it down.
pub struct Session {
    bridge: Arc<dyn PlatformBridge>,
    coordinator: PipelineCoordinator,
    camera: Mutex<Option<Box<dyn CameraStream>>>,
    speech_language: String,
    download_file_name: String,
}

impl Session {
    pub fn init(
        bridge: Arc<dyn PlatformBridge>,
        recognizer: Arc<dyn TextRecognizer>,
        rasterizer: Option<Arc<dyn PageRasterizer>>,
        config: &AppConfig,
    ) -> Self {
        let coordinator = PipelineCoordinator::new(recognizer, rasterizer, PipelineConfig::from(config));
        info!(platform = bridge.platform_name(), "reader session started");
        Self {
            bridge,
            coordinator,
            camera: Mutex::new(None),
            speech_language: config.speech_language.clone(),
            download_file_name: config.download_file_name.clone(),
        }
    }

    pub fn coordinator(&self) -> &PipelineCoordinator {
        &self.coordinator
    }

    pub fn platform_name(&self) -> &str {
        self.bridge.platform_name()
    }

    pub fn camera_open(&self) -> bool {
        self.camera().as_ref().is_some_and(|stream| stream.is_open())
    }

    pub fn is_speaking(&self) -> bool {
        self.bridge.is_speaking()
    }

    /// State the control preconditions are checked against.
    pub fn context(&self) -> ControlContext {
        ControlContext {
            camera_open: self.camera_open(),
            output_present: !self.coordinator.output().is_empty(),
        }
    }

    /// Act on a control. Unmet preconditions come back as a notice.
    #[instrument(skip(self, trigger), fields(control = ?trigger.control()))]
    pub fn handle(&self, trigger: Trigger) -> Result<Feedback> {
        let control = trigger.control();
        if let Err(notice) = control.row().precondition.check(self.context()) {
            debug!(notice, "precondition not met");
            return Ok(Feedback::Notice(notice.to_owned()));
        }

        match trigger {
            Trigger::OpenCamera => Ok(self.open_camera()),
            Trigger::CloseCamera => {
                self.close_camera();
                Ok(Feedback::None)
            }
            Trigger::Capture => self.capture(),
            Trigger::Upload {
                data,
                mime,
                file_name,
            } => Ok(self.upload(data, mime.as_deref(), file_name.as_deref())),
            Trigger::ReadAloud => self.read_aloud(),
            Trigger::StopSpeech => {
                self.bridge.cancel()?;
                Ok(Feedback::None)
            }
            Trigger::Download => self.download(),
        }
    }

    fn open_camera(&self) -> Feedback {
        match self.bridge.open_stream() {
            Ok(stream) => {
                *self.camera() = Some(stream);
                info!("camera opened");
                Feedback::None
            }
            Err(e) => {
                warn!(error = %e, "camera could not be opened");
                let detail = match e {
                    LesewerkError::CameraUnavailable(detail) => detail,
                    other => other.to_string(),
                };
                Feedback::Notice(format!("Camera access denied or unavailable: {detail}"))
            }
        }
    }

    /// Stop and release the camera stream, if any.
    pub fn close_camera(&self) {
        if let Some(mut stream) = self.camera().take() {
            stream.close();
            info!("camera closed");
        }
    }

    fn capture(&self) -> Result<Feedback> {
        let frame = {
            let mut camera = self.camera();
            let stream = camera.as_mut().ok_or(LesewerkError::CameraClosed)?;
            stream.capture_frame()?
        };
        let source = ImageProcessor::from_frame(frame)?.into_source(SourceOrigin::Camera)?;
        Ok(Feedback::Started(self.coordinator.submit(source)))
    }

    fn upload(&self, data: Vec<u8>, mime: Option<&str>, file_name: Option<&str>) -> Feedback {
        let kind = classify_upload(&data, mime, file_name);
        info!(?kind, bytes = data.len(), file = file_name.unwrap_or("-"), "file uploaded");
        let ticket = match kind {
            UploadKind::Pdf => self.coordinator.submit_pdf(data),
            UploadKind::Image => self
                .coordinator
                .submit(ImageSource::new(SourceOrigin::Upload, data)),
        };
        Feedback::Started(ticket)
    }

    fn read_aloud(&self) -> Result<Feedback> {
        let Some(text) = self.coordinator.output().trimmed() else {
            return Ok(Feedback::Notice("No text to read.".into()));
        };
        self.bridge.speak(&text, &self.speech_language)?;
        Ok(Feedback::None)
    }

    fn download(&self) -> Result<Feedback> {
        let Some(text) = self.coordinator.output().trimmed() else {
            return Ok(Feedback::Notice("No text to download.".into()));
        };
        let path = self.bridge.save_text(&self.download_file_name, &text)?;
        Ok(Feedback::Saved(path))
    }

    /// Release the camera and silence speech. Safe to call repeatedly.
    pub fn teardown(&self) {
        self.close_camera();
        if let Err(e) = self.bridge.cancel() {
            warn!(error = %e, "could not cancel speech during teardown");
        }
        debug!("reader session torn down");
    }

    fn camera(&self) -> MutexGuard<'_, Option<Box<dyn CameraStream>>> {
        self.camera.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::testing::{FakeBridge, ScriptedRasterizer, ScriptedRecognizer};

    fn session(bridge: Arc<FakeBridge>) -> Session {
        let config = AppConfig {
            completion_linger_ms: 0,
            ..AppConfig::default()
        };
        Session::init(
            bridge,
            Arc::new(ScriptedRecognizer::default()),
            Some(Arc::new(ScriptedRasterizer::default())),
            &config,
        )
    }

    fn upload(data: &[u8], mime: Option<&str>) -> Trigger {
        Trigger::Upload {
            data: data.to_vec(),
            mime: mime.map(str::to_owned),
            file_name: None,
        }
    }

    async fn run(session: &Session, trigger: Trigger) {
        match session.handle(trigger).unwrap() {
            Feedback::Started(ticket) => ticket.finished().await,
            other => panic!("expected a run, got {other:?}"),
        }
    }

    fn notice(feedback: Feedback) -> String {
        match feedback {
            Feedback::Notice(text) => text,
            other => panic!("expected a notice, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn uploaded_word_is_read_and_downloaded() {
        let bridge = Arc::new(FakeBridge::default());
        let session = session(bridge.clone());
        run(&session, upload(b"HELLO", Some("image/png"))).await;
        assert_eq!(session.coordinator().output_text(), "HELLO");

        assert!(matches!(session.handle(Trigger::ReadAloud).unwrap(), Feedback::None));
        assert_eq!(bridge.spoken(), vec![("HELLO".to_owned(), "en-US".to_owned())]);

        let saved = session.handle(Trigger::Download).unwrap();
        assert!(matches!(saved, Feedback::Saved(_)));
        assert_eq!(
            bridge.saved(),
            vec![("extracted-text.txt".to_owned(), "HELLO".to_owned())]
        );
    }

    #[tokio::test]
    async fn empty_output_gets_notices() {
        let bridge = Arc::new(FakeBridge::default());
        let session = session(bridge.clone());

        assert_eq!(notice(session.handle(Trigger::ReadAloud).unwrap()), "No text to read.");
        assert_eq!(
            notice(session.handle(Trigger::Download).unwrap()),
            "No text to download."
        );
        assert!(bridge.spoken().is_empty());
        assert!(bridge.saved().is_empty());
    }

    #[tokio::test]
    async fn errors_can_be_downloaded_too() {
        let bridge = Arc::new(FakeBridge::default());
        let session = session(bridge.clone());
        run(&session, upload(b"CORRUPT", None)).await;

        session.handle(Trigger::Download).unwrap();
        let saved = bridge.saved();
        assert!(saved[0].1.starts_with("Error: "));
    }

    #[tokio::test]
    async fn pdf_uploads_go_through_the_rasterizer() {
        let bridge = Arc::new(FakeBridge::default());
        let session = session(bridge);
        run(&session, upload(b"%PDF-1.7 HELLO", None)).await;
        assert_eq!(session.coordinator().output_text(), "HELLO");
        assert_eq!(
            session.coordinator().current_run().origin,
            Some(SourceOrigin::PdfPage)
        );
    }

    #[tokio::test]
    async fn captured_frame_is_recognised() {
        let bridge = Arc::new(FakeBridge::default());
        let session = session(bridge.clone());

        assert!(matches!(session.handle(Trigger::OpenCamera).unwrap(), Feedback::None));
        assert!(session.camera_open());
        run(&session, Trigger::Capture).await;

        assert_eq!(session.coordinator().output_text(), "IMAGE 4x3");
        assert_eq!(
            session.coordinator().current_run().origin,
            Some(SourceOrigin::Camera)
        );
    }

    #[tokio::test]
    async fn capture_needs_an_open_camera() {
        let session = session(Arc::new(FakeBridge::default()));
        assert_eq!(
            notice(session.handle(Trigger::Capture).unwrap()),
            "Open the camera first."
        );
    }

    #[tokio::test]
    async fn denied_camera_is_reported() {
        let bridge = Arc::new(FakeBridge::denying_camera());
        let session = session(bridge.clone());
        let text = notice(session.handle(Trigger::OpenCamera).unwrap());
        assert_eq!(text, "Camera access denied or unavailable: permission denied");
        assert!(!session.camera_open());
    }

    #[tokio::test]
    async fn camera_is_released_on_close_and_teardown() {
        let bridge = Arc::new(FakeBridge::default());
        let session = session(bridge.clone());

        session.handle(Trigger::OpenCamera).unwrap();
        assert_eq!(bridge.streams_open(), 1);
        session.handle(Trigger::CloseCamera).unwrap();
        assert_eq!(bridge.streams_open(), 0);
        assert!(!session.camera_open());

        session.handle(Trigger::OpenCamera).unwrap();
        drop(session);
        assert_eq!(bridge.streams_open(), 0);
        assert!(bridge.cancels.load(Ordering::SeqCst) >= 1);
    }

    #[tokio::test]
    async fn opening_twice_is_refused() {
        let bridge = Arc::new(FakeBridge::default());
        let session = session(bridge.clone());
        session.handle(Trigger::OpenCamera).unwrap();
        assert_eq!(
            notice(session.handle(Trigger::OpenCamera).unwrap()),
            "The camera is already open."
        );
        assert_eq!(bridge.streams_open(), 1);
    }

    #[tokio::test]
    async fn stop_cancels_speech() {
        let bridge = Arc::new(FakeBridge::default());
        let session = session(bridge.clone());
        session.handle(Trigger::StopSpeech).unwrap();
        assert_eq!(bridge.cancels.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_upload_fails_in_output() {
        let session = session(Arc::new(FakeBridge::default()));
        run(&session, upload(b"", Some("image/jpeg"))).await;
        assert_eq!(
            session.coordinator().output_text(),
            "Error: text recognition failed: empty image payload"
        );
    }
}
