//! Boundary to the persistence collaborator.
//!
//! The editor hands a [`PollDraft`] to a [`PollStore`] on explicit save and
//! through the debounced autosave. It only looks at success or failure.

mod autosave;
mod storage;

use anyhow::Result;
#[cfg(test)]
use mockall::automock;

use crate::models::draft::PollDraft;

pub use autosave::{AutosaveScheduler, SaveWarning};
pub use storage::{load_snapshot, save_snapshot, JsonFileStore};

#[cfg_attr(test, automock)]
pub trait PollStore: Send + Sync {
    fn save(&self, draft: &PollDraft) -> Result<()>;

    fn load(&self) -> Result<Option<PollDraft>>;
}
