// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline coordinator — owns the recognition run lifecycle.
//
// Every submit mints a new `RunId` and makes it current. Recognition runs on
// a blocking thread; its progress is funnelled back over a channel and every
// update (progress, completion, failure) is applied only if its run is still
// the current one. Results from superseded runs are discarded, so the output
// slot always reflects the newest submission.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use lesewerk_core::config::AppConfig;
use lesewerk_core::error::{LesewerkError, Result};
use lesewerk_core::types::{ImageSource, RecognitionRun, RunId, SourceOrigin};
use lesewerk_document::{PageRasterizer, TextRecognizer};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::output::{normalize_text, OutputSlot, ProgressDisplay};

/// Coordinator settings, derived from [`AppConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Recognition language handed to the recognizer.
    pub language: String,
    /// Scale for PDF page-1 rasterization.
    pub pdf_scale: f32,
    /// How long "Done!" stays up before the progress bar hides.
    pub completion_linger: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for PipelineConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            language: config.language.clone(),
            pdf_scale: config.pdf_scale,
            completion_linger: Duration::from_millis(config.completion_linger_ms),
        }
    }
}

/// Everything the UI renders, published after each accepted update.
#[derive(Debug, Clone, Default)]
pub struct PipelineSnapshot {
    pub run: RecognitionRun,
    pub output: OutputSlot,
    pub progress: ProgressDisplay,
}

/// A submitted run. Dropping it does not cancel the run.
#[derive(Debug)]
pub struct RunTicket {
    id: RunId,
    task: JoinHandle<()>,
}

impl RunTicket {
    pub fn id(&self) -> RunId {
        self.id
    }

    /// Wait until the run's pipeline task has finished, whether or not its
    /// result was published.
    pub async fn finished(self) {
        if let Err(e) = self.task.await {
            warn!(run = %self.id, error = %e, "pipeline task ended abnormally");
        }
    }
}

enum Job {
    Image(ImageSource),
    Pdf(Vec<u8>),
}

struct State {
    latest: RunId,
    run: RecognitionRun,
    output: OutputSlot,
    progress: ProgressDisplay,
}

impl State {
    fn snapshot(&self) -> PipelineSnapshot {
        PipelineSnapshot {
            run: self.run.clone(),
            output: self.output.clone(),
            progress: self.progress.clone(),
        }
    }

    /// Whether an update for `run` may still change what is shown.
    fn accepts(&self, run: RunId) -> bool {
        self.latest == run && self.run.is_running()
    }
}

struct Shared {
    state: Mutex<State>,
    updates: watch::Sender<PipelineSnapshot>,
}

/// Drives image and PDF sources through recognition into the output slot.
///
/// Cheap to clone; clones share state. `submit` and `submit_pdf` spawn onto
/// the current Tokio runtime and must be called from within one.
#[derive(Clone)]
pub struct PipelineCoordinator {
    shared: Arc<Shared>,
    recognizer: Arc<dyn TextRecognizer>,
    rasterizer: Option<Arc<dyn PageRasterizer>>,
    config: Arc<PipelineConfig>,
}

impl PipelineCoordinator {
    pub fn new(
        recognizer: Arc<dyn TextRecognizer>,
        rasterizer: Option<Arc<dyn PageRasterizer>>,
        config: PipelineConfig,
    ) -> Self {
        let state = State {
            latest: RunId::default(),
            run: RecognitionRun::idle(),
            output: OutputSlot::Empty,
            progress: ProgressDisplay::hidden(),
        };
        let (updates, _) = watch::channel(state.snapshot());
        info!(
            recognizer = recognizer.name(),
            pdf = rasterizer.is_some(),
            language = %config.language,
            "pipeline coordinator ready"
        );
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                updates,
            }),
            recognizer,
            rasterizer,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn can_render_pdf(&self) -> bool {
        self.rasterizer.is_some()
    }

    // -- Submission ---------------------------------------------------------

    /// Start recognising an encoded image. Supersedes any run in flight.
    ///
    /// An empty payload still starts a run; it fails straight away.
    #[instrument(skip(self, source), fields(origin = ?source.origin, bytes = source.len()))]
    pub fn submit(&self, source: ImageSource) -> RunTicket {
        let id = self.begin_run(source.origin, ProgressDisplay::starting());
        self.spawn(id, Job::Image(source))
    }

    /// Start recognising page 1 of a PDF. Supersedes any run in flight.
    ///
    /// The page is rasterized inside the run; load and render failures are
    /// reported through the output slot like any recognition failure.
    #[instrument(skip(self, document), fields(bytes = document.len()))]
    pub fn submit_pdf(&self, document: Vec<u8>) -> RunTicket {
        let id = self.begin_run(SourceOrigin::PdfPage, ProgressDisplay::rendering());
        self.spawn(id, Job::Pdf(document))
    }

    fn begin_run(&self, origin: SourceOrigin, progress: ProgressDisplay) -> RunId {
        let mut state = self.lock();
        if state.run.is_running() {
            debug!(run = %state.latest, "superseding run in flight");
        }
        let id = state.latest.next();
        state.latest = id;
        state.run = RecognitionRun::start(id, origin);
        state.output = OutputSlot::Empty;
        state.progress = progress;
        self.publish(&state);
        info!(run = %id, ?origin, "recognition run started");
        id
    }

    fn spawn(&self, id: RunId, job: Job) -> RunTicket {
        let this = self.clone();
        let task = tokio::spawn(async move { this.drive(id, job).await });
        RunTicket { id, task }
    }

    async fn drive(self, run: RunId, job: Job) {
        let source = match job {
            Job::Image(source) => source,
            Job::Pdf(document) => match self.rasterize(document).await {
                Ok(source) => {
                    if !self.is_current(run) {
                        debug!(%run, "superseded during rasterization; skipping recognition");
                        return;
                    }
                    self.mark_recognizing(run);
                    source
                }
                Err(e) => {
                    self.on_error(run, &e.to_string());
                    return;
                }
            },
        };

        match self.recognize(run, source).await {
            Ok(text) => {
                self.on_complete(run, &text);
            }
            Err(e) => {
                self.on_error(run, &e.to_string());
            }
        }
    }

    async fn rasterize(&self, document: Vec<u8>) -> Result<ImageSource> {
        let rasterizer = self.rasterizer.clone().ok_or_else(|| {
            LesewerkError::DocumentLoadFailure("PDF rendering is not available in this build".into())
        })?;
        let scale = self.config.pdf_scale;
        tokio::task::spawn_blocking(move || rasterizer.render_first_page(&document, scale))
            .await
            .map_err(|e| LesewerkError::DocumentLoadFailure(format!("PDF renderer stopped: {e}")))?
    }

    async fn recognize(&self, run: RunId, source: ImageSource) -> Result<String> {
        if source.is_empty() {
            return Err(LesewerkError::RecognitionFailure("empty image payload".into()));
        }

        let (tx, mut rx) = mpsc::unbounded_channel::<u8>();
        let recognizer = Arc::clone(&self.recognizer);
        let language = self.config.language.clone();
        let task = tokio::task::spawn_blocking(move || {
            let mut report = |percent: u8| {
                // Receiver only goes away if the coordinator task was dropped.
                let _ = tx.send(percent);
            };
            recognizer.recognize(&source.data, &language, &mut report)
        });

        // The sender lives in the blocking closure, so this drains every
        // progress event before the terminal result is looked at.
        while let Some(percent) = rx.recv().await {
            self.on_progress(run, percent);
        }

        task.await
            .map_err(|e| LesewerkError::RecognitionFailure(format!("recognizer stopped: {e}")))?
    }

    // -- Run callbacks ------------------------------------------------------

    /// Record progress for `run`. Returns whether it was applied.
    ///
    /// Values above 100 are clamped and the shown percentage never moves
    /// backwards within a run.
    pub fn on_progress(&self, run: RunId, percent: u8) -> bool {
        let mut state = self.lock();
        if !state.accepts(run) {
            debug!(%run, percent, "dropping progress from stale run");
            return false;
        }
        let percent = percent.min(100).max(state.run.progress);
        state.run.progress = percent;
        state.progress = ProgressDisplay::reading(percent);
        self.publish(&state);
        true
    }

    /// Publish recognised text for `run`. Returns whether it was applied.
    ///
    /// Text is trimmed; nothing left means the "No text detected." placeholder.
    /// The progress bar shows "Done!" and hides after the configured linger.
    pub fn on_complete(&self, run: RunId, text: &str) -> bool {
        let text = normalize_text(text);
        {
            let mut state = self.lock();
            if !state.accepts(run) {
                debug!(%run, "discarding result from superseded run");
                return false;
            }
            state.run.succeed(text.clone());
            state.output = OutputSlot::Text(text);
            state.progress = ProgressDisplay::done();
            self.publish(&state);
        }
        info!(%run, "recognition succeeded");
        self.schedule_progress_hide(run);
        true
    }

    /// Publish a failure for `run`. Returns whether it was applied.
    ///
    /// The output shows `Error: <detail>` and the progress bar hides at once.
    pub fn on_error(&self, run: RunId, detail: &str) -> bool {
        let mut state = self.lock();
        if !state.accepts(run) {
            debug!(%run, detail, "discarding failure from superseded run");
            return false;
        }
        state.run.fail(detail.to_owned());
        state.output = OutputSlot::Error(detail.to_owned());
        state.progress = ProgressDisplay::hidden();
        self.publish(&state);
        warn!(%run, detail, "recognition failed");
        true
    }

    fn mark_recognizing(&self, run: RunId) {
        let mut state = self.lock();
        if state.accepts(run) {
            state.progress = ProgressDisplay::starting();
            self.publish(&state);
        }
    }

    fn schedule_progress_hide(&self, run: RunId) {
        let linger = self.config.completion_linger;
        match tokio::runtime::Handle::try_current() {
            Ok(handle) if !linger.is_zero() => {
                let this = self.clone();
                handle.spawn(async move {
                    tokio::time::sleep(linger).await;
                    this.hide_progress_if_current(run);
                });
            }
            _ => self.hide_progress_if_current(run),
        }
    }

    fn hide_progress_if_current(&self, run: RunId) {
        let mut state = self.lock();
        // A newer run owns the bar now.
        if state.latest != run {
            return;
        }
        state.progress = ProgressDisplay::hidden();
        self.publish(&state);
    }

    // -- Observation --------------------------------------------------------

    pub fn snapshot(&self) -> PipelineSnapshot {
        self.lock().snapshot()
    }

    /// Receive a snapshot after every applied update.
    pub fn subscribe(&self) -> watch::Receiver<PipelineSnapshot> {
        self.shared.updates.subscribe()
    }

    pub fn output(&self) -> OutputSlot {
        self.lock().output.clone()
    }

    /// The output slot exactly as displayed.
    pub fn output_text(&self) -> String {
        self.lock().output.display()
    }

    pub fn current_run(&self) -> RecognitionRun {
        self.lock().run.clone()
    }

    pub fn is_current(&self, run: RunId) -> bool {
        self.lock().latest == run
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &State) {
        self.shared.updates.send_replace(state.snapshot());
    }
}
