//! Persistent record of already-published source videos
//!
//! The record is a JSON array of source ids. It is read once at the start of
//! a run and rewritten in full only after a publish succeeds.

use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::domain::errors::DomainError;

/// Set of published source ids backed by a single JSON file
#[derive(Debug, Clone)]
pub struct DedupStore {
    path: PathBuf,
    published: HashSet<String>,
}

impl DedupStore {
    /// Load the record at `path`.
    ///
    /// A missing, unreadable or corrupt record yields an empty set. The run
    /// carries on; the worst outcome is republishing a video.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let published = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Vec<String>>(&content) {
                Ok(ids) => ids.into_iter().collect(),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Dedup record is corrupt, starting empty");
                    HashSet::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No dedup record yet");
                HashSet::new()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Dedup record is unreadable, starting empty");
                HashSet::new()
            }
        };

        Self { path, published }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, source_id: &str) -> bool {
        self.published.contains(source_id)
    }

    /// Record a source id in memory; call [`persist`](Self::persist) to save
    pub fn add(&mut self, source_id: impl Into<String>) -> bool {
        self.published.insert(source_id.into())
    }

    pub fn len(&self) -> usize {
        self.published.len()
    }

    pub fn is_empty(&self) -> bool {
        self.published.is_empty()
    }

    /// Published ids as a set, for candidate pooling
    pub fn as_set(&self) -> &HashSet<String> {
        &self.published
    }

    /// Published ids in sorted order
    pub fn ids(&self) -> Vec<&str> {
        let sorted: BTreeSet<&str> = self.published.iter().map(String::as_str).collect();
        sorted.into_iter().collect()
    }

    /// Overwrite the backing record with the full in-memory set.
    ///
    /// Writes to a temporary file next to the record and renames it into
    /// place, so readers never observe a half-written record.
    pub fn persist(&self) -> Result<(), DomainError> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent).map_err(|e| {
            DomainError::FsFail(format!("Failed to create {}: {}", parent.display(), e))
        })?;

        let content = serde_json::to_string(&self.ids()).map_err(|e| {
            DomainError::InternalError(format!("Failed to serialize dedup record: {}", e))
        })?;

        let mut temp = tempfile::NamedTempFile::new_in(&parent).map_err(|e| {
            DomainError::FsFail(format!("Failed to create temporary record: {}", e))
        })?;
        temp.write_all(content.as_bytes())
            .and_then(|_| temp.as_file().sync_all())
            .map_err(|e| DomainError::FsFail(format!("Failed to write dedup record: {}", e)))?;
        temp.persist(&self.path).map_err(|e| {
            DomainError::FsFail(format!(
                "Failed to replace {}: {}",
                self.path.display(),
                e.error
            ))
        })?;

        debug!(path = %self.path.display(), count = self.published.len(), "Dedup record saved");
        Ok(())
    }
}
