// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Settings page — persistent app configuration.

use std::path::PathBuf;

use dioxus::prelude::*;

use crate::services::app_services::AppServices;
use crate::state::AppState;

#[component]
pub fn Settings() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();
    let mut save_msg = use_signal(|| Option::<String>::None);

    let config = state.read().config.clone();
    let download_dir = path_label(config.download_dir.as_ref());
    let model_dir = path_label(config.model_dir.as_ref());
    let pdfium_dir = path_label(config.pdfium_dir.as_ref());

    rsx! {
        div {
            h1 { "Settings" }

            section { style: "margin: 16px 0;",
                h3 { "Recognition" }
                TextRow {
                    label: "Text language",
                    value: config.language.clone(),
                    on_change: move |v: String| { state.write().config.language = v.trim().to_owned(); },
                }
                TextRow {
                    label: "Model folder",
                    value: model_dir,
                    on_change: move |v: String| { state.write().config.model_dir = optional_path(&v); },
                }
                TextRow {
                    label: "PDFium folder",
                    value: pdfium_dir,
                    on_change: move |v: String| { state.write().config.pdfium_dir = optional_path(&v); },
                }
                SettingRow {
                    label: "Boost contrast before reading",
                    checked: config.preprocess_images,
                    on_toggle: move |v: bool| { state.write().config.preprocess_images = v; },
                }
                div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
                    span { "PDF render scale" }
                    input {
                        r#type: "number",
                        step: "0.5",
                        style: "width: 80px; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px; text-align: right;",
                        value: "{config.pdf_scale}",
                        onchange: move |evt| {
                            if let Ok(scale) = evt.value().parse::<f32>()
                                && scale > 0.0
                            {
                                state.write().config.pdf_scale = scale;
                            }
                        },
                    }
                }
                div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
                    span { "Keep \"Done!\" visible (ms)" }
                    input {
                        r#type: "number",
                        style: "width: 80px; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px; text-align: right;",
                        value: "{config.completion_linger_ms}",
                        onchange: move |evt| {
                            if let Ok(ms) = evt.value().parse::<u64>() {
                                state.write().config.completion_linger_ms = ms;
                            }
                        },
                    }
                }
            }

            section { style: "margin: 16px 0;",
                h3 { "Reading aloud and saving" }
                TextRow {
                    label: "Voice language",
                    value: config.speech_language.clone(),
                    on_change: move |v: String| { state.write().config.speech_language = v.trim().to_owned(); },
                }
                TextRow {
                    label: "Download file name",
                    value: config.download_file_name.clone(),
                    on_change: move |v: String| {
                        let name = v.trim();
                        if !name.is_empty() {
                            state.write().config.download_file_name = name.to_owned();
                        }
                    },
                }
                TextRow {
                    label: "Download folder",
                    value: download_dir,
                    on_change: move |v: String| { state.write().config.download_dir = optional_path(&v); },
                }
            }

            // Save button
            button {
                style: "width: 100%; padding: 12px; border-radius: 8px; border: none; background: #007aff; color: white; font-size: 16px; margin-top: 8px;",
                onclick: {
                    let svc = svc.clone();
                    move |_| {
                        let config = state.read().config.clone();
                        match svc.save_config(&config) {
                            Ok(()) => {
                                save_msg.set(Some("Settings saved. They apply the next time Lesewerk starts.".into()));
                            }
                            Err(e) => {
                                tracing::error!(error = %e, "failed to save settings");
                                save_msg.set(Some(format!("Save failed: {e}")));
                            }
                        }
                    }
                },
                "Save Settings"
            }
            if let Some(ref msg) = *save_msg.read() {
                p { style: "color: #34c759; font-size: 14px; text-align: center; margin-top: 8px;",
                    "{msg}"
                }
            }

            section { style: "margin: 24px 0;",
                h3 { "About" }
                p { style: "color: #666; font-size: 14px;",
                    "Lesewerk v0.1.0"
                    br {}
                    "Reads text from photos and PDFs"
                    br {}
                    "PMPL-1.0-or-later"
                }
            }
        }
    }
}

#[component]
fn SettingRow(label: &'static str, checked: bool, on_toggle: EventHandler<bool>) -> Element {
    rsx! {
        div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
            span { "{label}" }
            input {
                r#type: "checkbox",
                checked: checked,
                onchange: move |evt| {
                    on_toggle.call(evt.checked());
                },
            }
        }
    }
}

#[component]
fn TextRow(label: &'static str, value: String, on_change: EventHandler<String>) -> Element {
    rsx! {
        div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
            span { "{label}" }
            input {
                r#type: "text",
                style: "width: 220px; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px;",
                value: "{value}",
                onchange: move |evt| {
                    on_change.call(evt.value());
                },
            }
        }
    }
}

fn path_label(path: Option<&PathBuf>) -> String {
    path.map(|p| p.display().to_string()).unwrap_or_default()
}

/// Blank means "use the default location".
fn optional_path(value: &str) -> Option<PathBuf> {
    let value = value.trim();
    (!value.is_empty()).then(|| PathBuf::from(value))
}
