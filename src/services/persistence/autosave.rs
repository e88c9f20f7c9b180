//! Debounced, fire-and-forget autosave of the poll draft.
//!
//! Edits queue the latest draft; once no edit has arrived for the debounce
//! window the draft is written on a blocking tokio task. The editor never
//! waits for the result. A failed save is reported on the warning channel
//! and in-memory state is left as it is.

use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use super::PollStore;
use crate::models::draft::PollDraft;

/// Non-blocking notice that a background save did not go through.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaveWarning {
    #[error("Autosave failed: {0}")]
    Failed(String),
}

pub struct AutosaveScheduler {
    debounce: Duration,
    pending: Option<PollDraft>,
    last_change: Option<Instant>,
    warnings: UnboundedSender<SaveWarning>,
}

impl AutosaveScheduler {
    /// Create a scheduler and the receiving end of its warning channel.
    pub fn new(debounce: Duration) -> (Self, UnboundedReceiver<SaveWarning>) {
        let (warnings, receiver) = mpsc::unbounded_channel();
        let scheduler = Self {
            debounce,
            pending: None,
            last_change: None,
            warnings,
        };
        (scheduler, receiver)
    }

    /// Replace the pending draft and restart the debounce window.
    pub fn queue(&mut self, draft: PollDraft, now: Instant) {
        self.pending = Some(draft);
        self.last_change = Some(now);
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether a pending draft has been quiet for the whole debounce window.
    pub fn is_due(&self, now: Instant) -> bool {
        match (self.pending.as_ref(), self.last_change) {
            (Some(_), Some(last)) => now.saturating_duration_since(last) >= self.debounce,
            _ => false,
        }
    }

    /// Start saving the pending draft if it is due. The returned handle can
    /// be dropped; the save runs to completion either way.
    pub fn flush_due(
        &mut self,
        now: Instant,
        store: &Arc<dyn PollStore>,
        runtime: &Handle,
    ) -> Option<JoinHandle<()>> {
        if !self.is_due(now) {
            return None;
        }
        let draft = self.pending.take()?;
        self.last_change = None;

        let store = Arc::clone(store);
        let warnings = self.warnings.clone();
        Some(runtime.spawn_blocking(move || {
            if let Err(err) = store.save(&draft) {
                log::warn!("Autosave failed: {:#}", err);
                let _ = warnings.send(SaveWarning::Failed(format!("{:#}", err)));
            } else {
                log::debug!(
                    "Autosaved draft with {} date(s)",
                    draft.selected_dates.len()
                );
            }
        }))
    }
}
