//! Path utilities for run artifacts

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::domain::errors::DomainError;

/// Suffixes yt-dlp leaves behind for unfinished downloads
const PARTIAL_SUFFIXES: &[&str] = &[".part", ".ytdl", ".temp"];

/// Locate the finished download for `source_id` in `dir`.
///
/// Only direct children named `<source_id>.<ext>` count, and partial files
/// are ignored. An `.mp4` wins over other containers.
pub fn find_downloaded_file(dir: &Path, source_id: &str) -> Option<PathBuf> {
    let prefix = format!("{}.", source_id);

    let mut matches: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            let name = entry.file_name().to_string_lossy();
            name.starts_with(&prefix)
                && !PARTIAL_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
        })
        .map(|entry| entry.into_path())
        .collect();

    matches.sort();
    let preferred = matches
        .iter()
        .position(|path| path.extension().is_some_and(|ext| ext == "mp4"))
        .unwrap_or(0);

    if matches.is_empty() {
        None
    } else {
        Some(matches.swap_remove(preferred))
    }
}

/// Make a source id safe to use as a single path component
pub fn sanitize_component(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "_".to_string()
    } else {
        cleaned
    }
}

/// Directory that is removed, with its contents, when dropped
#[derive(Debug)]
pub struct ScopedDir {
    path: PathBuf,
}

impl ScopedDir {
    /// Create `path` (and its parents); an existing directory is reused
    pub fn create(path: impl Into<PathBuf>) -> Result<Self, DomainError> {
        let path = path.into();
        fs::create_dir_all(&path).map_err(|e| {
            DomainError::FsFail(format!("Failed to create {}: {}", path.display(), e))
        })?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScopedDir {
    fn drop(&mut self) {
        match fs::remove_dir_all(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "Removed artifacts"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to remove artifacts"),
        }
    }
}
