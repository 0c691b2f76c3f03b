// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Desktop speech through the platform text-to-speech command: `say` on
// macOS, `espeak-ng` or `espeak` elsewhere. One utterance at a time; a new
// `speak` replaces the previous one.

use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::Mutex;

use lesewerk_core::error::{LesewerkError, Result};
use tracing::{debug, info, warn};

use crate::traits::NativeSpeech;

/// Which command-line voice is driving speech.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechProgram {
    /// macOS `say`.
    Say,
    /// `espeak-ng`.
    EspeakNg,
    /// Classic `espeak`.
    Espeak,
}

impl SpeechProgram {
    fn binary(self) -> &'static str {
        match self {
            Self::Say => "say",
            Self::EspeakNg => "espeak-ng",
            Self::Espeak => "espeak",
        }
    }

    /// Arguments for speaking `text` in `language`.
    pub fn args(self, text: &str, language: &str) -> Vec<String> {
        match self {
            // `say` picks the system voice; it has no language switch.
            Self::Say => vec![text.to_owned()],
            Self::EspeakNg | Self::Espeak => vec![
                "-v".to_owned(),
                espeak_voice(language),
                text.to_owned(),
            ],
        }
    }
}

/// espeak voices are lower-case language tags (`en-us`, `de`).
fn espeak_voice(language: &str) -> String {
    let tag = language.trim();
    if tag.is_empty() {
        "en".to_owned()
    } else {
        tag.to_ascii_lowercase().replace('_', "-")
    }
}

/// Find the first available speech program on `PATH`.
pub fn detect_program() -> Option<SpeechProgram> {
    let candidates: &[SpeechProgram] = if cfg!(target_os = "macos") {
        &[SpeechProgram::Say, SpeechProgram::EspeakNg, SpeechProgram::Espeak]
    } else {
        &[SpeechProgram::EspeakNg, SpeechProgram::Espeak]
    };
    candidates
        .iter()
        .copied()
        .find(|program| find_on_path(program.binary()).is_some())
}

fn find_on_path(binary: &str) -> Option<PathBuf> {
    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(binary))
        .find(|candidate| candidate.is_file())
}

/// Speech backed by a child process.
pub struct SystemSpeech {
    program: Option<SpeechProgram>,
    current: Mutex<Option<Child>>,
}

impl SystemSpeech {
    /// Use whichever speech program is installed.
    pub fn detect() -> Self {
        let program = detect_program();
        match program {
            Some(p) => info!(program = p.binary(), "speech voice available"),
            None => warn!("no speech program found on PATH; read-aloud is disabled"),
        }
        Self::with_program(program)
    }

    pub fn with_program(program: Option<SpeechProgram>) -> Self {
        Self {
            program,
            current: Mutex::new(None),
        }
    }

    /// Forget a child that already exited on its own.
    fn reap_finished(slot: &mut Option<Child>) {
        let Some(child) = slot.as_mut() else {
            return;
        };
        match child.try_wait() {
            Ok(None) => {}
            Ok(Some(status)) => {
                debug!(%status, "utterance finished");
                *slot = None;
            }
            Err(e) => {
                debug!(error = %e, "speech process cannot be queried");
                *slot = None;
            }
        }
    }

    fn stop_child(slot: &mut Option<Child>) {
        if let Some(mut child) = slot.take() {
            if let Err(e) = child.kill() {
                debug!(error = %e, "speech process already gone");
            }
            let _ = child.wait();
        }
    }
}

impl NativeSpeech for SystemSpeech {
    fn speak(&self, text: &str, language: &str) -> Result<()> {
        let program = self.program.ok_or(LesewerkError::PlatformUnavailable)?;
        let mut slot = self
            .current
            .lock()
            .map_err(|_| LesewerkError::Speech("speech state poisoned".into()))?;
        Self::reap_finished(&mut slot);
        Self::stop_child(&mut slot);

        let child = Command::new(program.binary())
            .args(program.args(text, language))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                LesewerkError::Speech(format!("failed to start {}: {}", program.binary(), e))
            })?;

        info!(program = program.binary(), chars = text.chars().count(), language, "speaking");
        *slot = Some(child);
        Ok(())
    }

    fn cancel(&self) -> Result<()> {
        let mut slot = self
            .current
            .lock()
            .map_err(|_| LesewerkError::Speech("speech state poisoned".into()))?;
        if slot.is_some() {
            info!("speech cancelled");
        }
        Self::stop_child(&mut slot);
        Ok(())
    }

    fn is_speaking(&self) -> bool {
        let Ok(mut slot) = self.current.lock() else {
            return false;
        };
        Self::reap_finished(&mut slot);
        slot.is_some()
    }
}

impl Drop for SystemSpeech {
    fn drop(&mut self) {
        if let Ok(slot) = self.current.get_mut() {
            Self::stop_child(slot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn espeak_gets_lowercase_voice() {
        let args = SpeechProgram::EspeakNg.args("HELLO", "en-US");
        assert_eq!(args, vec!["-v", "en-us", "HELLO"]);
    }

    #[test]
    fn say_takes_text_only() {
        assert_eq!(SpeechProgram::Say.args("hi", "en-US"), vec!["hi"]);
    }

    #[test]
    fn empty_language_falls_back_to_english() {
        assert_eq!(espeak_voice("  "), "en");
        assert_eq!(espeak_voice("pt_BR"), "pt-br");
    }

    #[test]
    fn without_a_program_speech_is_unavailable() {
        let speech = SystemSpeech::with_program(None);
        assert!(matches!(
            speech.speak("hello", "en-US"),
            Err(LesewerkError::PlatformUnavailable)
        ));
        assert!(!speech.is_speaking());
        assert!(speech.cancel().is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn finished_utterance_is_reaped() {
        let mut slot = Some(Command::new("true").spawn().unwrap());
        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
        while slot.is_some() && std::time::Instant::now() < deadline {
            SystemSpeech::reap_finished(&mut slot);
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        assert!(slot.is_none());
    }

    #[cfg(unix)]
    #[test]
    fn running_utterance_is_kept_until_cancelled() {
        let speech = SystemSpeech::with_program(Some(SpeechProgram::Espeak));
        *speech.current.lock().unwrap() = Some(Command::new("sleep").arg("30").spawn().unwrap());

        assert!(speech.is_speaking());
        speech.cancel().unwrap();
        assert!(!speech.is_speaking());
    }
}
