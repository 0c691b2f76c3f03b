// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// lesewerk-pipeline — The capture-to-text pipeline.
//
// `PipelineCoordinator` runs recognition and decides which results reach the
// output slot; `Session` wires the reader page's controls to it and to the
// platform bridge.

pub mod controls;
pub mod coordinator;
pub mod output;
pub mod session;

#[cfg(test)]
mod testing;

pub use controls::{Control, ControlContext, ControlRow, Precondition, CONTROLS};
pub use coordinator::{PipelineConfig, PipelineCoordinator, PipelineSnapshot, RunTicket};
pub use output::{OutputSlot, ProgressDisplay, ERROR_PREFIX, NO_TEXT_PLACEHOLDER};
pub use session::{Feedback, Session, Trigger};
