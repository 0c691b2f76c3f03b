// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The recognition capability as the pipeline sees it.

use lesewerk_core::error::LesewerkError;

/// Progress sink handed to a recognizer. Receives percentages in 0..=100.
pub type ProgressSink<'a> = &'a mut dyn FnMut(u8);

/// Something that turns an encoded image into text.
///
/// Implementations run on a blocking thread and may take seconds. They report
/// progress through `progress` in non-decreasing order and should finish with
/// 100 on success. Every failure (undecodable payload, unsupported language,
/// engine error) is returned as an error, never a panic.
pub trait TextRecognizer: Send + Sync {
    fn recognize(
        &self,
        image: &[u8],
        language: &str,
        progress: ProgressSink<'_>,
    ) -> Result<String, LesewerkError>;

    /// Short name for logs and diagnostics.
    fn name(&self) -> &str {
        "recognizer"
    }
}
