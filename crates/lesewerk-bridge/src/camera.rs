// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Desktop camera stream.
//
// Capture devices are not `Send`, so each stream gets a worker thread that
// opens the device, serves frame requests and stops the device when the
// stream is closed or dropped.

use std::sync::mpsc::{self, Sender};
use std::thread::JoinHandle;

use lesewerk_core::error::{LesewerkError, Result};
use lesewerk_core::types::RawFrame;
use tracing::{debug, info, warn};

use crate::traits::CameraStream;

/// A capture device as seen from its worker thread.
pub trait FrameSource {
    fn frame(&mut self) -> Result<RawFrame>;

    /// Stop capturing and release the device.
    fn stop(&mut self);
}

type FrameReply = Sender<Result<RawFrame>>;

/// A [`CameraStream`] whose device lives on a dedicated thread.
pub struct WorkerStream {
    requests: Option<Sender<FrameReply>>,
    worker: Option<JoinHandle<()>>,
}

impl WorkerStream {
    /// Open a device on a new worker thread.
    ///
    /// Returns once `open` has run; its error is returned as is.
    pub fn spawn<D, F>(open: F) -> Result<Self>
    where
        D: FrameSource,
        F: FnOnce() -> Result<D> + Send + 'static,
    {
        let (ready_tx, ready_rx) = mpsc::channel::<Result<()>>();
        let (requests, inbox) = mpsc::channel::<FrameReply>();

        let worker = std::thread::Builder::new()
            .name("lesewerk-camera".into())
            .spawn(move || {
                let mut device = match open() {
                    Ok(device) => device,
                    Err(e) => {
                        let _ = ready_tx.send(Err(e));
                        return;
                    }
                };
                let _ = ready_tx.send(Ok(()));

                // Ends when the stream drops its sender.
                for reply in inbox {
                    let _ = reply.send(device.frame());
                }
                device.stop();
                debug!("camera worker finished");
            })
            .map_err(|e| LesewerkError::CameraUnavailable(format!("camera thread: {e}")))?;

        match ready_rx.recv() {
            Ok(Ok(())) => {
                info!("camera stream open");
                Ok(Self {
                    requests: Some(requests),
                    worker: Some(worker),
                })
            }
            Ok(Err(e)) => {
                let _ = worker.join();
                Err(e)
            }
            Err(_) => {
                let _ = worker.join();
                Err(LesewerkError::CameraUnavailable(
                    "camera thread stopped while opening".into(),
                ))
            }
        }
    }
}

impl CameraStream for WorkerStream {
    fn capture_frame(&mut self) -> Result<RawFrame> {
        let requests = self.requests.as_ref().ok_or(LesewerkError::CameraClosed)?;
        let (reply, frame) = mpsc::channel();
        requests.send(reply).map_err(|_| LesewerkError::CameraClosed)?;
        frame.recv().map_err(|_| LesewerkError::CameraClosed)?
    }

    fn close(&mut self) {
        self.requests = None;
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("camera worker panicked");
            }
            info!("camera stream closed");
        }
    }

    fn is_open(&self) -> bool {
        self.requests.is_some()
    }
}

impl Drop for WorkerStream {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(feature = "camera")]
pub use device::{available_cameras, NokhwaDevice};

#[cfg(feature = "camera")]
mod device {
    use nokhwa::pixel_format::RgbAFormat;
    use nokhwa::utils::{ApiBackend, CameraIndex, RequestedFormat, RequestedFormatType};
    use nokhwa::Camera;

    use super::*;

    /// A camera opened through nokhwa's native backend.
    pub struct NokhwaDevice {
        camera: Camera,
    }

    impl NokhwaDevice {
        pub fn open(index: u32) -> Result<Self> {
            let format =
                RequestedFormat::new::<RgbAFormat>(RequestedFormatType::AbsoluteHighestResolution);
            let mut camera = Camera::new(CameraIndex::Index(index), format)
                .map_err(|e| LesewerkError::CameraUnavailable(e.to_string()))?;
            camera
                .open_stream()
                .map_err(|e| LesewerkError::CameraUnavailable(e.to_string()))?;
            info!(index, name = %camera.info().human_name(), "camera device opened");
            Ok(Self { camera })
        }
    }

    impl FrameSource for NokhwaDevice {
        fn frame(&mut self) -> Result<RawFrame> {
            let buffer = self
                .camera
                .frame()
                .map_err(|e| LesewerkError::CameraUnavailable(format!("no frame: {e}")))?;
            let image = buffer
                .decode_image::<RgbAFormat>()
                .map_err(|e| LesewerkError::ImageError(format!("undecodable frame: {e}")))?;
            let (width, height) = image.dimensions();
            Ok(RawFrame {
                width,
                height,
                rgba: image.into_raw(),
            })
        }

        fn stop(&mut self) {
            if let Err(e) = self.camera.stop_stream() {
                warn!(error = %e, "camera did not stop cleanly");
            }
        }
    }

    /// Names of the cameras the native backend can see.
    pub fn available_cameras() -> Result<Vec<String>> {
        let cameras = nokhwa::query(ApiBackend::Auto)
            .map_err(|e| LesewerkError::CameraUnavailable(e.to_string()))?;
        Ok(cameras.iter().map(|info| info.human_name()).collect())
    }
}
