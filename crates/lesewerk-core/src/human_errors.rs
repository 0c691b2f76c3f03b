// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the notices the reader page shows.
//
// Every technical error is mapped to plain English with a clear suggestion.

use crate::error::LesewerkError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Trying again (better light, another file) may well work.
    Transient,
    /// User must do something first (grant camera access, pick a file).
    ActionRequired,
    /// Cannot be fixed by retrying — wrong format, missing platform feature.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary (shown as a heading).
    pub message: String,
    /// What the user should try (shown as body text).
    pub suggestion: String,
    /// Whether re-triggering the same action is worthwhile.
    pub retriable: bool,
    pub severity: Severity,
}

impl std::fmt::Display for HumanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.message, self.suggestion)
    }
}

/// Convert a `LesewerkError` into a `HumanError`.
pub fn humanize_error(err: &LesewerkError) -> HumanError {
    match err {
        LesewerkError::CameraUnavailable(detail) => {
            let lower = detail.to_ascii_lowercase();
            if lower.contains("denied") || lower.contains("permission") {
                HumanError {
                    message: "The camera can't be used.".into(),
                    suggestion: "Allow camera access for this app in your system settings, then try again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "No camera was found.".into(),
                    suggestion: "Connect a camera, or upload a photo or PDF of the page instead.".into(),
                    retriable: true,
                    severity: Severity::ActionRequired,
                }
            }
        }

        LesewerkError::CameraClosed => HumanError {
            message: "The camera is not open.".into(),
            suggestion: "Open the camera first, then capture the page.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        LesewerkError::DocumentLoadFailure(_) => HumanError {
            message: "This PDF couldn't be opened.".into(),
            suggestion: "The file may be damaged or empty. Try another file, or take a photo of the page instead.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        LesewerkError::ImageError(_) => HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try saving it as a JPEG or PNG first.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        LesewerkError::RecognitionFailure(_) => HumanError {
            message: "Text recognition didn't work on this image.".into(),
            suggestion: "Try again with better lighting, making sure the text is clear and in focus.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        LesewerkError::Speech(_) => HumanError {
            message: "The text couldn't be read aloud.".into(),
            suggestion: "Check that your speakers are on and a speech voice is installed.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        LesewerkError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "The app doesn't have permission to save there.".into(),
                    suggestion: "Choose a different folder for downloads in the settings.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your device's storage may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        LesewerkError::Serialization(_) => HumanError {
            message: "The app had an internal data problem.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        LesewerkError::Bridge(_) => HumanError {
            message: "A device-specific feature didn't work.".into(),
            suggestion: "Try restarting the app. Some features may not be available on all devices.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        LesewerkError::PlatformUnavailable => HumanError {
            message: "This feature isn't available on your device.".into(),
            suggestion: "Some features need a camera or a speech voice that this device doesn't have.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn denied_camera_needs_action() {
        let err = LesewerkError::CameraUnavailable("Permission denied by user".into());
        let human = humanize_error(&err);
        assert_eq!(human.severity, Severity::ActionRequired);
        assert!(!human.retriable);
    }

    #[test]
    fn recognition_failure_is_transient() {
        let human = humanize_error(&LesewerkError::RecognitionFailure("engine crashed".into()));
        assert_eq!(human.severity, Severity::Transient);
        assert!(human.retriable);
    }

    #[test]
    fn broken_pdf_is_permanent() {
        let human = humanize_error(&LesewerkError::DocumentLoadFailure("no pages".into()));
        assert_eq!(human.severity, Severity::Permanent);
    }
}
