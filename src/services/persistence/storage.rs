use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde_json::{self, Error as SerdeError};

use super::PollStore;
use crate::models::draft::PollDraft;

/// Stores the draft as a pretty-printed JSON snapshot on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `draft.json` in the platform data directory.
    pub fn default_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "Ken24T", "RustPollCalendar")
            .context("Failed to resolve the data directory")?;
        Ok(dirs.data_dir().join("draft.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PollStore for JsonFileStore {
    fn save(&self, draft: &PollDraft) -> Result<()> {
        save_snapshot(&self.path, draft)
    }

    fn load(&self) -> Result<Option<PollDraft>> {
        load_snapshot(&self.path)
    }
}

pub fn load_snapshot(path: &Path) -> Result<Option<PollDraft>> {
    if !path.exists() {
        return Ok(None);
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read draft from {}", path.display()))?;
    let snapshot = serde_json::from_str(&data).map_err(|err| map_deser_error(err, path))?;
    Ok(Some(snapshot))
}

pub fn save_snapshot(path: &Path, snapshot: &PollDraft) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create dir {}", parent.display()))?;
    }

    let data = serde_json::to_string_pretty(snapshot)?;
    fs::write(path, data)
        .with_context(|| format!("failed to write draft to {}", path.display()))?;
    Ok(())
}

fn map_deser_error(err: SerdeError, path: &Path) -> anyhow::Error {
    anyhow::Error::new(err).context(format!(
        "failed to deserialize draft from {}",
        path.display()
    ))
}
