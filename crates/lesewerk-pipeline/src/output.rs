// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// What the reader page shows: the single output slot and the progress bar.

/// Shown instead of an empty recognition result.
pub const NO_TEXT_PLACEHOLDER: &str = "No text detected.";

/// Prefix that marks an error in the output slot.
pub const ERROR_PREFIX: &str = "Error: ";

/// The single-valued store holding the latest terminal outcome.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OutputSlot {
    #[default]
    Empty,
    /// Recognised text, already trimmed.
    Text(String),
    /// Failure detail, shown with [`ERROR_PREFIX`].
    Error(String),
}

impl OutputSlot {
    /// Text exactly as displayed.
    pub fn display(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(text) => text.clone(),
            Self::Error(detail) => format!("{ERROR_PREFIX}{detail}"),
        }
    }

    /// Displayed content, trimmed; `None` when there is nothing to act on.
    ///
    /// This is what read-aloud and download operate on.
    pub fn trimmed(&self) -> Option<String> {
        let shown = self.display();
        let trimmed = shown.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    }

    pub fn is_empty(&self) -> bool {
        self.trimmed().is_none()
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Trim recognised text, substituting the placeholder when nothing is left.
pub fn normalize_text(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        NO_TEXT_PLACEHOLDER.to_owned()
    } else {
        trimmed.to_owned()
    }
}

/// State of the progress bar.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressDisplay {
    pub visible: bool,
    /// 0–100.
    pub percent: u8,
    pub label: String,
}

impl ProgressDisplay {
    pub fn hidden() -> Self {
        Self::default()
    }

    /// Shown the moment an image run starts.
    pub fn starting() -> Self {
        Self {
            visible: true,
            percent: 0,
            label: "Starting OCR...".into(),
        }
    }

    /// Shown while page 1 of a PDF is rasterized.
    pub fn rendering() -> Self {
        Self {
            visible: true,
            percent: 0,
            label: "Rendering PDF page...".into(),
        }
    }

    pub fn reading(percent: u8) -> Self {
        let percent = percent.min(100);
        Self {
            visible: true,
            percent,
            label: format!("Reading text... {percent}%"),
        }
    }

    pub fn done() -> Self {
        Self {
            visible: true,
            percent: 100,
            label: "Done!".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_becomes_placeholder() {
        assert_eq!(normalize_text(""), NO_TEXT_PLACEHOLDER);
        assert_eq!(normalize_text(" \n\t  "), NO_TEXT_PLACEHOLDER);
        assert_eq!(normalize_text("\n HELLO \n"), "HELLO");
    }

    #[test]
    fn errors_display_with_prefix() {
        let slot = OutputSlot::Error("bad image".into());
        assert_eq!(slot.display(), "Error: bad image");
        assert!(slot.is_error());
        assert!(!slot.is_empty());
    }

    #[test]
    fn empty_slot_has_nothing_to_act_on() {
        assert_eq!(OutputSlot::Empty.trimmed(), None);
        assert_eq!(OutputSlot::Text("   ".into()).trimmed(), None);
        assert_eq!(OutputSlot::Text(" HELLO ".into()).trimmed().as_deref(), Some("HELLO"));
    }

    #[test]
    fn reading_label_is_clamped() {
        let display = ProgressDisplay::reading(250);
        assert_eq!(display.percent, 100);
        assert_eq!(display.label, "Reading text... 100%");
    }
}
