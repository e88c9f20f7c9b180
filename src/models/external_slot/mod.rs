//! Externally suggested time ranges.
//!
//! The assistant proposes availability as `HH:MM` ranges, optionally pinned
//! to specific dates. Ranges without dates apply to the session's default
//! dates.

use serde::{Deserialize, Serialize};

use crate::models::time_slot::MINUTES_PER_DAY;

/// One suggested time range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalSlot {
    /// Start time, `HH:MM`
    pub start: String,
    /// End time, `HH:MM` (exclusive); `24:00` means midnight at the end of the day
    pub end: String,
    /// Target dates as `YYYY-MM-DD` keys; the default dates are used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dates: Option<Vec<String>>,
}

impl ExternalSlot {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            dates: None,
        }
    }

    pub fn on_dates<I, S>(mut self, dates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dates = Some(dates.into_iter().map(Into::into).collect());
        self
    }

    /// Start and end as minutes since midnight, `None` when either is malformed.
    pub fn minute_range(&self) -> Option<(u32, u32)> {
        Some((parse_clock_time(&self.start)?, parse_clock_time(&self.end)?))
    }
}

/// The assistant's payload for one session: suggested ranges plus dates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestions {
    #[serde(default)]
    pub slots: Vec<ExternalSlot>,
    #[serde(default)]
    pub dates: Vec<String>,
}

/// Parse `HH:MM` into minutes since midnight. `24:00` is accepted as the end of day.
pub fn parse_clock_time(raw: &str) -> Option<u32> {
    let (hours, minutes) = raw.trim().split_once(':')?;
    if hours.is_empty() || hours.len() > 2 || minutes.len() != 2 {
        return None;
    }
    if !hours.chars().chain(minutes.chars()).all(|c| c.is_ascii_digit()) {
        return None;
    }
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    let total = hours * 60 + minutes;
    (total <= MINUTES_PER_DAY).then_some(total)
}
