// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text recognition — the `TextRecognizer` capability and the `ocrs`-backed
// engine that implements it.

pub mod recognizer;

#[cfg(feature = "ocr")]
pub mod ocr;

pub use recognizer::{ProgressSink, TextRecognizer};

#[cfg(feature = "ocr")]
pub use ocr::OcrEngine;
