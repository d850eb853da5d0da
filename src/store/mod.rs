pub mod document;

use crate::error::StoreError;
use crate::stats::{DailyEntry, History, Summary};
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub use document::{DocumentStore, FileDocument};

/// Persistence for the rolling history and the latest summary.
///
/// Loads never fail: a missing or unreadable artifact is treated as empty.
pub trait SnapshotStore {
    fn load_history(&self) -> Vec<DailyEntry>;
    fn load_summary(&self) -> Option<Summary>;
    fn save(&self, history: &History, summary: &Summary) -> Result<(), StoreError>;
}

/// History and summary kept as two pretty-printed JSON files.
pub struct JsonFileStore {
    history_path: PathBuf,
    summary_path: PathBuf,
}

impl JsonFileStore {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(history_path: P, summary_path: Q) -> Self {
        Self {
            history_path: history_path.as_ref().to_path_buf(),
            summary_path: summary_path.as_ref().to_path_buf(),
        }
    }

    fn read(path: &Path) -> Option<String> {
        match fs::read_to_string(path) {
            Ok(content) => Some(content),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read store file");
                None
            }
        }
    }
}

impl SnapshotStore for JsonFileStore {
    fn load_history(&self) -> Vec<DailyEntry> {
        let Some(content) = Self::read(&self.history_path) else {
            return Vec::new();
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %self.history_path.display(), error = %e, "error loading daily stats");
            Vec::new()
        })
    }

    fn load_summary(&self) -> Option<Summary> {
        let content = Self::read(&self.summary_path)?;
        let value: serde_json::Value = match serde_json::from_str(&content) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(path = %self.summary_path.display(), error = %e, "error loading summary");
                return None;
            }
        };
        // `{}` is what a fresh checkout ships with; treat it as no baseline.
        if value.as_object().is_some_and(|map| map.is_empty()) {
            return None;
        }
        match serde_json::from_value(value) {
            Ok(summary) => Some(summary),
            Err(e) => {
                tracing::warn!(path = %self.summary_path.display(), error = %e, "error loading summary");
                None
            }
        }
    }

    fn save(&self, history: &History, summary: &Summary) -> Result<(), StoreError> {
        write_json(&self.history_path, history.entries())?;
        write_json(&self.summary_path, summary)?;
        Ok(())
    }
}

/// Writes next to the target and renames, so a failed write keeps the old file.
fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let mut content = serde_json::to_string_pretty(value)?;
    content.push('\n');

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)?;
    Ok(())
}
