// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The reader page's controls: what each one is called, when it may fire,
// and what the user is told when it may not.

/// A user-facing control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    OpenCamera,
    CloseCamera,
    Capture,
    Upload,
    ReadAloud,
    StopSpeech,
    Download,
}

/// What must hold before a control acts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    Always,
    CameraOpen,
    CameraClosed,
    /// The output slot must hold something; otherwise show `notice`.
    OutputPresent { notice: &'static str },
}

/// The parts of session state preconditions look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlContext {
    pub camera_open: bool,
    pub output_present: bool,
}

impl Precondition {
    /// `Err(notice)` when the precondition fails.
    pub fn check(self, context: ControlContext) -> Result<(), &'static str> {
        match self {
            Self::Always => Ok(()),
            Self::CameraOpen if context.camera_open => Ok(()),
            Self::CameraOpen => Err("Open the camera first."),
            Self::CameraClosed if !context.camera_open => Ok(()),
            Self::CameraClosed => Err("The camera is already open."),
            Self::OutputPresent { .. } if context.output_present => Ok(()),
            Self::OutputPresent { notice } => Err(notice),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlRow {
    pub control: Control,
    pub label: &'static str,
    pub precondition: Precondition,
}

pub const CONTROLS: &[ControlRow] = &[
    ControlRow {
        control: Control::OpenCamera,
        label: "Open Camera",
        precondition: Precondition::CameraClosed,
    },
    ControlRow {
        control: Control::CloseCamera,
        label: "Close Camera",
        precondition: Precondition::CameraOpen,
    },
    ControlRow {
        control: Control::Capture,
        label: "Capture",
        precondition: Precondition::CameraOpen,
    },
    ControlRow {
        control: Control::Upload,
        label: "Upload Image or PDF",
        precondition: Precondition::Always,
    },
    ControlRow {
        control: Control::ReadAloud,
        label: "Read Aloud",
        precondition: Precondition::OutputPresent {
            notice: "No text to read.",
        },
    },
    ControlRow {
        control: Control::StopSpeech,
        label: "Stop",
        precondition: Precondition::Always,
    },
    ControlRow {
        control: Control::Download,
        label: "Download Text",
        precondition: Precondition::OutputPresent {
            notice: "No text to download.",
        },
    },
];

impl Control {
    pub fn row(self) -> &'static ControlRow {
        // Rows are in declaration order.
        &CONTROLS[self as usize]
    }

    pub fn label(self) -> &'static str {
        self.row().label
    }

    /// Whether the control is shown as usable in `context`.
    pub fn is_enabled(self, context: ControlContext) -> bool {
        self.row().precondition.check(context).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Control; 7] = [
        Control::OpenCamera,
        Control::CloseCamera,
        Control::Capture,
        Control::Upload,
        Control::ReadAloud,
        Control::StopSpeech,
        Control::Download,
    ];

    #[test]
    fn every_control_has_one_row() {
        for control in ALL {
            let rows = CONTROLS.iter().filter(|s| s.control == control).count();
            assert_eq!(rows, 1, "{control:?}");
            assert_eq!(control.row().control, control);
        }
        assert_eq!(CONTROLS.len(), ALL.len());
    }

    #[test]
    fn camera_controls_follow_camera_state() {
        let closed = ControlContext::default();
        let open = ControlContext {
            camera_open: true,
            ..closed
        };
        assert!(Control::OpenCamera.is_enabled(closed));
        assert!(!Control::Capture.is_enabled(closed));
        assert!(!Control::OpenCamera.is_enabled(open));
        assert!(Control::Capture.is_enabled(open));
        assert!(Control::CloseCamera.is_enabled(open));
    }

    #[test]
    fn output_controls_explain_themselves() {
        let empty = ControlContext::default();
        assert_eq!(
            Control::ReadAloud.row().precondition.check(empty),
            Err("No text to read.")
        );
        assert_eq!(
            Control::Download.row().precondition.check(empty),
            Err("No text to download.")
        );
        let full = ControlContext {
            output_present: true,
            ..empty
        };
        assert!(Control::Download.is_enabled(full));
        assert!(Control::Upload.is_enabled(empty));
    }
}
