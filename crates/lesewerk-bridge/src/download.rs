// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Desktop downloads — write text files into a downloads directory without
// ever overwriting an earlier download.

use std::path::{Path, PathBuf};

use lesewerk_core::error::{LesewerkError, Result};
use tracing::info;

use crate::traits::NativeDownload;

/// Give up looking for a free `name (n).ext` after this many attempts.
const MAX_SUFFIX: u32 = 10_000;

/// Return the user's downloads directory.
///
/// `$XDG_DOWNLOAD_DIR`, then `~/Downloads`, then the current directory.
pub fn default_download_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("XDG_DOWNLOAD_DIR") {
        return PathBuf::from(dir);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join("Downloads");
    }
    PathBuf::from(".")
}

/// Saves downloads as files inside one directory.
#[derive(Debug, Clone)]
pub struct DirectoryDownloader {
    dir: PathBuf,
}

impl DirectoryDownloader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Default for DirectoryDownloader {
    fn default() -> Self {
        Self::new(default_download_dir())
    }
}

impl NativeDownload for DirectoryDownloader {
    fn save_text(&self, file_name: &str, text: &str) -> Result<PathBuf> {
        let file_name = sanitize_file_name(file_name)?;
        std::fs::create_dir_all(&self.dir)?;
        let path = free_path(&self.dir, &file_name)?;
        std::fs::write(&path, text)?;
        info!(path = %path.display(), bytes = text.len(), "text downloaded");
        Ok(path)
    }
}

/// Strip directory components so a name can never escape the download dir.
fn sanitize_file_name(file_name: &str) -> Result<String> {
    let name = Path::new(file_name.trim())
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_owned)
        .unwrap_or_default();
    if name.is_empty() || name == "." || name == ".." {
        return Err(LesewerkError::Bridge(format!(
            "invalid download file name '{file_name}'"
        )));
    }
    Ok(name)
}

/// `dir/name`, or `dir/stem (n).ext` for the first `n` not yet taken.
fn free_path(dir: &Path, file_name: &str) -> Result<PathBuf> {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return Ok(candidate);
    }

    let as_path = Path::new(file_name);
    let stem = as_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    let ext = as_path.extension().and_then(|e| e.to_str());

    for n in 1..=MAX_SUFFIX {
        let name = match ext {
            Some(ext) => format!("{stem} ({n}).{ext}"),
            None => format!("{stem} ({n})"),
        };
        let candidate = dir.join(name);
        if !candidate.exists() {
            return Ok(candidate);
        }
    }

    Err(LesewerkError::Bridge(format!(
        "no free file name for '{file_name}' in {}",
        dir.display()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let downloader = DirectoryDownloader::new(dir.path());
        let path = downloader.save_text("extracted-text.txt", "HELLO").unwrap();
        assert_eq!(path, dir.path().join("extracted-text.txt"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "HELLO");
    }

    #[test]
    fn never_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let downloader = DirectoryDownloader::new(dir.path());
        downloader.save_text("extracted-text.txt", "first").unwrap();
        let second = downloader.save_text("extracted-text.txt", "second").unwrap();
        assert_eq!(second, dir.path().join("extracted-text (1).txt"));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("extracted-text.txt")).unwrap(),
            "first"
        );
    }

    #[test]
    fn creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let path = DirectoryDownloader::new(&nested).save_text("out.txt", "x").unwrap();
        assert!(path.starts_with(&nested));
    }

    #[test]
    fn path_components_are_stripped() {
        let dir = tempfile::tempdir().unwrap();
        let path = DirectoryDownloader::new(dir.path())
            .save_text("../../etc/notes.txt", "x")
            .unwrap();
        assert_eq!(path, dir.path().join("notes.txt"));
    }

    #[test]
    fn empty_name_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        assert!(DirectoryDownloader::new(dir.path()).save_text("  ", "x").is_err());
    }
}
