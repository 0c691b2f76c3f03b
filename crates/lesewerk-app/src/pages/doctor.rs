// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Setup check — tells the user which capabilities this machine can offer
// and what to do about the ones it cannot.

use dioxus::prelude::*;

use crate::services::app_services::{AppServices, Check};

#[component]
pub fn Doctor() -> Element {
    let svc = use_context::<AppServices>();
    let mut checks = use_signal(Vec::<Check>::new);
    let mut running = use_signal(|| false);

    let passed = checks.read().iter().filter(|c| c.passed).count();
    let total = checks.read().len();

    rsx! {
        div { style: "max-width: 600px; margin: 0 auto;",
            h1 { style: "text-align: center; font-size: 28px;", "Setup Check" }
            p { style: "text-align: center; color: #666; margin-bottom: 24px;",
                "See what Lesewerk can do on this computer."
            }

            button {
                style: "display: block; margin: 0 auto 24px auto; padding: 14px 40px; border-radius: 12px; border: none; background: #007aff; color: white; font-size: 18px; font-weight: bold;",
                disabled: *running.read(),
                onclick: {
                    let svc = svc.clone();
                    move |_| {
                        running.set(true);
                        let svc = svc.clone();
                        spawn(async move {
                            let result = tokio::task::spawn_blocking(move || svc.diagnostics()).await;
                            match result {
                                Ok(found) => checks.set(found),
                                Err(e) => tracing::error!(error = %e, "setup check failed"),
                            }
                            running.set(false);
                        });
                    }
                },
                if *running.read() { "Checking..." } else { "Run Check" }
            }

            if total > 0 {
                p { style: "text-align: center; font-size: 18px; font-weight: bold;",
                    "{passed} of {total} ready"
                }
            }

            for check in checks.read().iter() {
                {
                    let icon = if check.passed { "\u{2705}" } else { "\u{274C}" };
                    let border = if check.passed { "#d4edda" } else { "#f8d7da" };
                    rsx! {
                        div {
                            style: "padding: 16px; margin: 8px 0; border: 2px solid {border}; border-radius: 12px;",
                            div { style: "display: flex; align-items: center; gap: 12px;",
                                span { style: "font-size: 24px;", "{icon}" }
                                div {
                                    strong { style: "font-size: 16px;", "{check.name}" }
                                    p { style: "color: #666; font-size: 14px; margin: 4px 0 0 0;",
                                        "{check.detail}"
                                    }
                                }
                            }
                            if let Some(ref fix) = check.fix {
                                div { style: "margin-top: 12px; padding: 12px; background: #fff3cd; border-radius: 8px;",
                                    strong { style: "color: #856404; font-size: 14px;", "What to do: " }
                                    span { style: "color: #856404; font-size: 14px;", "{fix}" }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
