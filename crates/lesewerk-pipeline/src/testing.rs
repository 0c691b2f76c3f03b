// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory collaborators for pipeline and session tests.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::time::Duration;

use lesewerk_bridge::{CameraStream, NativeCamera, NativeDownload, NativeSpeech, PlatformBridge};
use lesewerk_core::error::{LesewerkError, Result};
use lesewerk_core::types::{ImageSource, RawFrame, SourceOrigin};
use lesewerk_document::{PageRasterizer, ProgressSink, TextRecognizer};

/// Holds a recognizer on its blocking thread until the test opens it.
#[derive(Clone, Default)]
pub struct Gate {
    entered: Arc<AtomicBool>,
    open: Arc<(Mutex<bool>, Condvar)>,
}

impl Gate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until a recognizer is parked at the gate.
    pub async fn entered(&self) {
        while !self.entered.load(Ordering::SeqCst) {
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    }

    pub fn open(&self) {
        let (lock, cvar) = &*self.open;
        *lock.lock().unwrap() = true;
        cvar.notify_all();
    }

    fn pass(&self) {
        self.entered.store(true, Ordering::SeqCst);
        let (lock, cvar) = &*self.open;
        let mut open = lock.lock().unwrap();
        while !*open {
            open = cvar.wait(open).unwrap();
        }
    }
}

/// Recognizer driven by the payload:
///
/// - `GATED:<rest>` waits at the gate, then handles `<rest>`
/// - `HALFWAY:<rest>` reports 0, 25 and 50%, waits at the gate, then finishes
/// - `PANIC` panics
/// - `CORRUPT` fails as an undecodable image
/// - `BLANK` returns only whitespace
/// - a real encoded image returns `IMAGE <w>x<h>`
/// - anything else is read back verbatim, padded with whitespace
#[derive(Default)]
pub struct ScriptedRecognizer {
    gate: Option<Gate>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedRecognizer {
    pub fn with_gate(gate: Gate) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl TextRecognizer for ScriptedRecognizer {
    fn recognize(&self, image: &[u8], _language: &str, progress: ProgressSink<'_>) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let mut payload = image;
        if let Some(rest) = payload.strip_prefix(b"GATED:".as_slice()) {
            if let Some(gate) = &self.gate {
                gate.pass();
            }
            payload = rest;
        }
        let halfway = match payload.strip_prefix(b"HALFWAY:".as_slice()) {
            Some(rest) => {
                payload = rest;
                true
            }
            None => false,
        };

        match payload {
            b"PANIC" => panic!("scripted recognizer panic"),
            b"CORRUPT" => {
                return Err(LesewerkError::RecognitionFailure(
                    "could not decode image payload".into(),
                ))
            }
            _ => {}
        }

        for percent in [0, 25, 50, 75, 100] {
            if halfway && percent == 75 {
                if let Some(gate) = &self.gate {
                    gate.pass();
                }
            }
            progress(percent);
        }

        if payload == b"BLANK" {
            return Ok("  \n\t ".into());
        }
        if let Ok(decoded) = image::load_from_memory(payload) {
            return Ok(format!("IMAGE {}x{}", decoded.width(), decoded.height()));
        }
        Ok(format!("  {}\n", String::from_utf8_lossy(payload)))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Rasterizer for fake PDFs of the form `%PDF-1.7 <page text>`.
///
/// `EMPTY` as page text means a document without pages.
#[derive(Default)]
pub struct ScriptedRasterizer {
    scales: Mutex<Vec<f32>>,
}

impl ScriptedRasterizer {
    pub fn scales(&self) -> Vec<f32> {
        self.scales.lock().unwrap().clone()
    }
}

impl PageRasterizer for ScriptedRasterizer {
    fn render_first_page(&self, document: &[u8], scale: f32) -> Result<ImageSource> {
        self.scales.lock().unwrap().push(scale);
        let page = document
            .strip_prefix(b"%PDF-1.7 ".as_slice())
            .ok_or_else(|| LesewerkError::DocumentLoadFailure("not a PDF".into()))?;
        if page == b"EMPTY" {
            return Err(LesewerkError::DocumentLoadFailure("PDF has no pages".into()));
        }
        Ok(ImageSource::new(SourceOrigin::PdfPage, page.to_vec()))
    }
}

/// Camera, speech and downloads that only record what happened.
#[derive(Default)]
pub struct FakeBridge {
    pub deny_camera: bool,
    pub open_streams: Arc<AtomicUsize>,
    pub spoken: Mutex<Vec<(String, String)>>,
    pub cancels: AtomicUsize,
    pub saved: Mutex<Vec<(String, String)>>,
}

impl FakeBridge {
    pub fn denying_camera() -> Self {
        Self {
            deny_camera: true,
            ..Self::default()
        }
    }

    pub fn streams_open(&self) -> usize {
        self.open_streams.load(Ordering::SeqCst)
    }

    pub fn spoken(&self) -> Vec<(String, String)> {
        self.spoken.lock().unwrap().clone()
    }

    pub fn saved(&self) -> Vec<(String, String)> {
        self.saved.lock().unwrap().clone()
    }
}

impl PlatformBridge for FakeBridge {
    fn platform_name(&self) -> &str {
        "Fake"
    }
}

impl NativeCamera for FakeBridge {
    fn open_stream(&self) -> Result<Box<dyn CameraStream>> {
        if self.deny_camera {
            return Err(LesewerkError::CameraUnavailable("permission denied".into()));
        }
        self.open_streams.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeStream {
            open: true,
            open_streams: Arc::clone(&self.open_streams),
        }))
    }
}

impl NativeSpeech for FakeBridge {
    fn speak(&self, text: &str, language: &str) -> Result<()> {
        self.spoken
            .lock()
            .unwrap()
            .push((text.to_owned(), language.to_owned()));
        Ok(())
    }

    fn cancel(&self) -> Result<()> {
        self.cancels.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn is_speaking(&self) -> bool {
        false
    }
}

impl NativeDownload for FakeBridge {
    fn save_text(&self, file_name: &str, text: &str) -> Result<PathBuf> {
        self.saved
            .lock()
            .unwrap()
            .push((file_name.to_owned(), text.to_owned()));
        Ok(PathBuf::from(file_name))
    }
}

/// Produces 4x3 grey frames.
pub struct FakeStream {
    open: bool,
    open_streams: Arc<AtomicUsize>,
}

impl CameraStream for FakeStream {
    fn capture_frame(&mut self) -> Result<RawFrame> {
        if !self.open {
            return Err(LesewerkError::CameraClosed);
        }
        Ok(RawFrame {
            width: 4,
            height: 3,
            rgba: vec![128; 4 * 3 * 4],
        })
    }

    fn close(&mut self) {
        if std::mem::take(&mut self.open) {
            self.open_streams.fetch_sub(1, Ordering::SeqCst);
        }
    }

    fn is_open(&self) -> bool {
        self.open
    }
}

impl Drop for FakeStream {
    fn drop(&mut self) {
        self.close();
    }
}
