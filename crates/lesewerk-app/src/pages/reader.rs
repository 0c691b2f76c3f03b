// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Reader page — camera, upload, progress, output, read aloud, download.
//
// Every button goes through `Session::handle`; the page only mirrors the
// coordinator's snapshots and shows whatever notice comes back.

use dioxus::prelude::*;

use lesewerk_core::human_errors::humanize_error;
use lesewerk_document::convert::mime_for_path;
use lesewerk_pipeline::{Control, Feedback, Trigger};

use crate::services::app_services::AppServices;
use crate::state::AppState;

/// Run a control and reflect its feedback in the app state.
fn fire(svc: &AppServices, mut state: Signal<AppState>, trigger: Trigger) {
    let session = svc.session();
    let result = session.handle(trigger);
    let notice = match result {
        Ok(Feedback::None) | Ok(Feedback::Started(_)) => None,
        Ok(Feedback::Notice(text)) => Some(text),
        Ok(Feedback::Saved(path)) => Some(format!("Saved to {}", path.display())),
        Err(e) => {
            tracing::warn!(error = %e, "control failed");
            Some(humanize_error(&e).to_string())
        }
    };
    let mut state = state.write();
    state.camera_open = session.camera_open();
    state.notice = notice;
}

/// Let the user pick an image or PDF and hand it to the session.
fn pick_upload(svc: &AppServices, mut state: Signal<AppState>) {
    let Some(path) = rfd::FileDialog::new()
        .add_filter("Images and PDFs", &["png", "jpg", "jpeg", "gif", "bmp", "tif", "tiff", "webp", "pdf"])
        .pick_file()
    else {
        return;
    };

    match std::fs::read(&path) {
        Ok(data) => {
            tracing::info!(path = %path.display(), bytes = data.len(), "file selected");
            let trigger = Trigger::Upload {
                data,
                mime: mime_for_path(&path).map(str::to_owned),
                file_name: path.file_name().map(|n| n.to_string_lossy().into_owned()),
            };
            fire(svc, state, trigger);
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "could not read file");
            state.write().notice = Some(format!("Could not read {}: {e}", path.display()));
        }
    }
}

#[component]
pub fn Reader() -> Element {
    let svc = use_context::<AppServices>();
    let mut state = use_context::<Signal<AppState>>();

    // Mirror coordinator snapshots into the reactive state.
    let svc_updates = svc.clone();
    use_future(move || {
        let svc = svc_updates.clone();
        async move {
            let mut updates = svc.session().coordinator().subscribe();
            loop {
                let snapshot = updates.borrow_and_update().clone();
                state.write().snapshot = snapshot;
                if updates.changed().await.is_err() {
                    break;
                }
            }
        }
    });

    let controls = state.read().controls();
    let camera_open = controls.camera_open;
    let progress = state.read().snapshot.progress.clone();
    let output = state.read().snapshot.output.clone();
    let output_text = output.display();
    let output_color = if output.is_error() { "#c0392b" } else { "#222" };

    rsx! {
        div {
            h1 { "Lesewerk" }
            p { style: "color: #666;", "Photograph or upload a page and Lesewerk reads it for you." }

            // Capture and upload
            div { style: "display: flex; gap: 8px; margin: 16px 0; flex-wrap: wrap;",
                if camera_open {
                    button {
                        style: "flex: 1; padding: 14px; border-radius: 12px; border: none; background: #007aff; color: white; font-size: 16px;",
                        disabled: !Control::Capture.is_enabled(controls),
                        onclick: {
                            let svc = svc.clone();
                            move |_| fire(&svc, state, Trigger::Capture)
                        },
                        "{Control::Capture.label()}"
                    }
                    button {
                        style: "flex: 1; padding: 14px; border-radius: 12px; border: 1px solid #ccc; background: white; font-size: 16px;",
                        onclick: {
                            let svc = svc.clone();
                            move |_| fire(&svc, state, Trigger::CloseCamera)
                        },
                        "{Control::CloseCamera.label()}"
                    }
                } else {
                    button {
                        style: "flex: 1; padding: 14px; border-radius: 12px; border: 2px dashed #007aff; color: #007aff; background: white; font-size: 16px;",
                        onclick: {
                            let svc = svc.clone();
                            move |_| fire(&svc, state, Trigger::OpenCamera)
                        },
                        "{Control::OpenCamera.label()}"
                    }
                }
                button {
                    style: "flex: 1; padding: 14px; border-radius: 12px; border: 2px dashed #007aff; color: #007aff; background: white; font-size: 16px;",
                    onclick: {
                        let svc = svc.clone();
                        move |_| pick_upload(&svc, state)
                    },
                    "{Control::Upload.label()}"
                }
            }

            // Progress
            if progress.visible {
                div { style: "margin: 12px 0;",
                    div { style: "height: 8px; background: #e0e0e0; border-radius: 4px; overflow: hidden;",
                        div { style: "height: 100%; width: {progress.percent}%; background: #34c759; transition: width 0.2s;" }
                    }
                    p { style: "color: #666; font-size: 14px; margin: 4px 0;", "{progress.label}" }
                }
            }

            // Output
            textarea {
                style: "width: 100%; min-height: 240px; padding: 12px; border: 1px solid #ccc; border-radius: 8px; font-size: 16px; color: {output_color}; box-sizing: border-box;",
                readonly: true,
                placeholder: "Recognised text appears here.",
                value: "{output_text}",
            }

            // Speech and download
            div { style: "display: flex; gap: 8px; margin-top: 12px;",
                button {
                    style: "flex: 1; padding: 12px; border-radius: 8px; border: none; background: #007aff; color: white;",
                    onclick: {
                        let svc = svc.clone();
                        move |_| fire(&svc, state, Trigger::ReadAloud)
                    },
                    "{Control::ReadAloud.label()}"
                }
                button {
                    style: "flex: 1; padding: 12px; border-radius: 8px; border: 1px solid #ccc; background: white;",
                    onclick: {
                        let svc = svc.clone();
                        move |_| fire(&svc, state, Trigger::StopSpeech)
                    },
                    "{Control::StopSpeech.label()}"
                }
                button {
                    style: "flex: 1; padding: 12px; border-radius: 8px; border: 1px solid #ccc; background: white;",
                    onclick: {
                        let svc = svc.clone();
                        move |_| fire(&svc, state, Trigger::Download)
                    },
                    "{Control::Download.label()}"
                }
            }

            if let Some(ref msg) = state.read().notice {
                p { style: "color: #856404; background: #fff3cd; padding: 12px; border-radius: 8px; font-size: 14px; margin-top: 12px;",
                    "{msg}"
                }
                button {
                    style: "padding: 4px 12px; border-radius: 6px; border: 1px solid #ccc; background: white; font-size: 12px;",
                    onclick: move |_| state.write().notice = None,
                    "Dismiss"
                }
            }
        }
    }
}
