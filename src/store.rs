//! Reminder persistence.
//!
//! Reminders live in a single JSON object file keyed by their
//! `YYYY-MM-DD HH:MM` timestamp. The whole file is read before each
//! operation and rewritten pretty-printed after each mutation; a
//! missing file is an empty store. Insertion order is preserved both
//! on disk and in memory, since removal scans in insertion order.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::repeat::Repeat;

/// Timestamp key format, local wall-clock time.
pub const KEY_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read reminder file {path}: {source}")]
    Read {
        path: PathBuf,
        source: io::Error,
    },
    #[error("failed to write reminder file {path}: {source}")]
    Write {
        path: PathBuf,
        source: io::Error,
    },
    #[error("reminder file {path} is not valid JSON: {source}")]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to encode reminders for {path}: {source}")]
    Encode {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// A persisted reminder. `datetime` duplicates the map key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor: Option<String>,
    pub datetime: String,
    pub repeat: Repeat,
}

pub type ReminderMap = IndexMap<String, Reminder>;

pub struct ReminderStore {
    path: PathBuf,
}

impl ReminderStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full reminder map. A missing file is an empty map.
    pub fn load(&self) -> Result<ReminderMap, StoreError> {
        if !self.path.exists() {
            debug!("No reminder file at {}, starting empty", self.path.display());
            return Ok(ReminderMap::new());
        }

        let contents = fs::read_to_string(&self.path).map_err(|source| StoreError::Read {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| StoreError::Decode {
            path: self.path.clone(),
            source,
        })
    }

    /// Replace the file with a pretty-printed dump of the full map.
    pub fn save(&self, reminders: &ReminderMap) -> Result<(), StoreError> {
        let json =
            serde_json::to_string_pretty(reminders).map_err(|source| StoreError::Encode {
                path: self.path.clone(),
                source,
            })?;
        fs::write(&self.path, json).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!(
            "Saved {} reminder(s) to {}",
            reminders.len(),
            self.path.display()
        );
        Ok(())
    }
}
