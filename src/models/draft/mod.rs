//! Poll draft handed to the persistence collaborator.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::time_slot::{Granularity, SlotsByDate};

/// Snapshot of an editing session as saved on explicit save/finalize calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PollDraft {
    pub selected_dates: BTreeSet<NaiveDate>,
    pub time_slots_by_date: SlotsByDate,
    pub time_granularity: Granularity,
}

impl PollDraft {
    pub fn is_empty(&self) -> bool {
        self.selected_dates.is_empty() && self.time_slots_by_date.is_empty()
    }
}
